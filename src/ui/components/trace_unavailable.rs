use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::trace::TraceError;

use super::{ACCENT_ERROR, TEXT_MUTED, TEXT_SECONDARY};

/// Placeholder for a viewer whose trace was rejected at load
pub struct TraceUnavailable<'a> {
    label: &'a str,
    error: &'a TraceError,
}

impl<'a> TraceUnavailable<'a> {
    pub fn new(label: &'a str, error: &'a TraceError) -> Self {
        Self { label, error }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let width = area.width.clamp(20, 64).min(area.width);
        let height = 7.min(area.height);
        let dialog = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT_ERROR))
            .title(Span::styled(
                " Trace unavailable ",
                Style::default()
                    .fg(ACCENT_ERROR)
                    .add_modifier(Modifier::BOLD),
            ));

        let lines = vec![
            Line::from(Span::styled(
                self.label.to_string(),
                Style::default().fg(TEXT_SECONDARY),
            )),
            Line::default(),
            Line::from(self.error.to_string()),
            Line::from(Span::styled(
                format!("({})", self.error.kind()),
                Style::default().fg(TEXT_MUTED),
            )),
        ];

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(dialog, buf);
    }
}
