use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::{ACCENT_ERROR, ACCENT_PRIMARY, BG_BAR, TEXT_MUTED, TEXT_PRIMARY};

/// One tab per mounted viewer
pub struct TabBar {
    tabs: Vec<String>,
    /// Tabs whose trace failed to load
    unavailable: Vec<bool>,
    active: usize,
}

impl TabBar {
    pub fn new(tabs: Vec<String>, active: usize) -> Self {
        let unavailable = vec![false; tabs.len()];
        Self {
            tabs,
            unavailable,
            active,
        }
    }

    pub fn with_unavailable(mut self, unavailable: Vec<bool>) -> Self {
        self.unavailable = unavailable;
        self
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();

        for (i, tab) in self.tabs.iter().enumerate() {
            let is_active = i == self.active;

            if is_active {
                spans.push(Span::styled(" ▶ ", Style::default().fg(ACCENT_PRIMARY)));
            } else {
                spans.push(Span::raw("   "));
            }

            let broken = self.unavailable.get(i).copied().unwrap_or(false);
            let tab_style = match (is_active, broken) {
                (true, false) => Style::default()
                    .fg(TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
                (true, true) => Style::default()
                    .fg(ACCENT_ERROR)
                    .add_modifier(Modifier::BOLD),
                (false, true) => Style::default().fg(ACCENT_ERROR),
                (false, false) => Style::default().fg(TEXT_MUTED),
            };

            spans.push(Span::styled(format!("[{}] {}", i + 1, tab), tab_style));
            spans.push(Span::raw("  "));
        }

        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(BG_BAR))
            .render(area, buf);
    }
}
