use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget},
};

use crate::viewer::PlayMode;

use super::{ACCENT_ERROR, ACCENT_PRIMARY, ACCENT_SUCCESS, BG_BAR, TEXT_MUTED, TEXT_PRIMARY, TEXT_SECONDARY};

/// Previous / play-pause / next controls with a progress gauge
pub struct TransportBar {
    current: usize,
    len: usize,
    mode: PlayMode,
    interval: Duration,
    media_ready: bool,
    media_failed: bool,
}

impl TransportBar {
    pub fn new(current: usize, len: usize, mode: PlayMode) -> Self {
        Self {
            current,
            len,
            mode,
            interval: Duration::ZERO,
            media_ready: false,
            media_failed: false,
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn media_ready(mut self, ready: bool) -> Self {
        self.media_ready = ready;
        self
    }

    pub fn media_failed(mut self, failed: bool) -> Self {
        self.media_failed = failed;
        self
    }

    fn media_status(&self) -> Span<'static> {
        if self.media_failed {
            Span::styled("media unavailable", Style::default().fg(ACCENT_ERROR))
        } else if self.media_ready {
            Span::styled("media ready", Style::default().fg(ACCENT_SUCCESS))
        } else {
            Span::styled("media loading", Style::default().fg(TEXT_MUTED))
        }
    }

    fn controls(&self) -> Line<'static> {
        let enabled = Style::default().fg(TEXT_PRIMARY);
        let disabled = Style::default().fg(TEXT_MUTED);
        let at_start = self.current == 0;
        let at_end = self.current + 1 >= self.len;

        let play = if self.mode.is_playing() {
            Span::styled(
                " ❚❚ Pause ",
                Style::default()
                    .fg(ACCENT_SUCCESS)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(
                " ▶ Play ",
                Style::default()
                    .fg(ACCENT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )
        };

        Line::from(vec![
            Span::styled(" ◀ Prev ", if at_start { disabled } else { enabled }),
            play,
            Span::styled(" Next ▶ ", if at_end { disabled } else { enabled }),
            Span::raw("   "),
            Span::styled(
                format!("Step {}/{}", self.current + 1, self.len),
                Style::default().fg(TEXT_PRIMARY),
            ),
            Span::raw("   "),
            Span::styled(
                self.mode.display_name().to_string(),
                Style::default().fg(TEXT_SECONDARY),
            ),
            Span::raw("   "),
            Span::styled(
                format!("{:.1}s/step", self.interval.as_secs_f64()),
                Style::default().fg(TEXT_MUTED),
            ),
            Span::raw("   "),
            self.media_status(),
        ])
    }

    fn ratio(&self) -> f64 {
        if self.len == 0 {
            0.0
        } else {
            ((self.current + 1) as f64 / self.len as f64).clamp(0.0, 1.0)
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        Paragraph::new(self.controls())
            .style(Style::default().bg(BG_BAR))
            .render(rows[0], buf);

        Gauge::default()
            .gauge_style(Style::default().fg(ACCENT_PRIMARY).bg(BG_BAR))
            .ratio(self.ratio())
            .label("")
            .render(rows[1], buf);
    }
}
