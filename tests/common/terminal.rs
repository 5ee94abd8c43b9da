//! TUI testing utilities using Ratatui's TestBackend

use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use traceview::App;

/// Create a test terminal with custom dimensions
pub fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(width, height)).expect("Failed to create test terminal")
}

/// Draw one frame of the app and return the rendered buffer as text
pub fn render_app(app: &App, width: u16, height: u16) -> String {
    let mut terminal = create_test_terminal(width, height);
    terminal.draw(|f| app.draw(f)).expect("Failed to draw");
    buffer_to_trimmed_string(terminal.backend().buffer())
}

/// One buffer row per line, trailing whitespace removed
pub fn buffer_to_trimmed_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    (area.y..area.y + area.height)
        .map(|y| row(buffer, y).trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text of a single row
pub fn row(buffer: &Buffer, y: u16) -> String {
    let area = buffer.area;
    (area.x..area.x + area.width)
        .filter_map(|x| buffer.cell((x, y)).map(|cell| cell.symbol().to_string()))
        .collect()
}

/// Line of rendered text containing `needle`, if any
pub fn line_containing<'a>(screen: &'a str, needle: &str) -> Option<&'a str> {
    screen.lines().find(|line| line.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    #[test]
    fn test_buffer_to_trimmed_string() {
        let mut terminal = create_test_terminal(10, 2);
        terminal
            .draw(|f| f.render_widget(Paragraph::new("Hello\nWorld"), f.area()))
            .unwrap();

        assert_eq!(
            buffer_to_trimmed_string(terminal.backend().buffer()),
            "Hello\nWorld"
        );
    }
}
