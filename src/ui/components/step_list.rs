use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget},
};
use unicode_width::UnicodeWidthChar;

use crate::trace::TraceItem;

use super::{ACCENT_PRIMARY, BG_HIGHLIGHT, TEXT_MUTED, TEXT_SECONDARY};

/// Left-hand list of every step's action label
pub struct StepList<'a> {
    steps: &'a [TraceItem],
    current: usize,
}

impl<'a> StepList<'a> {
    pub fn new(steps: &'a [TraceItem], current: usize) -> Self {
        Self { steps, current }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::RIGHT)
            .border_style(Style::default().fg(TEXT_MUTED))
            .title(Span::styled(
                format!(" Steps ({}) ", self.steps.len()),
                Style::default().fg(TEXT_SECONDARY),
            ));

        let number_width = self.steps.len().to_string().len();
        // Number, one space, and the right border
        let label_width = (area.width as usize).saturating_sub(number_width + 2);

        let items: Vec<ListItem> = self
            .steps
            .iter()
            .map(|step| {
                let number_style = if step.index == self.current {
                    Style::default().fg(ACCENT_PRIMARY)
                } else {
                    Style::default().fg(TEXT_MUTED)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:>width$} ", step.index + 1, width = number_width),
                        number_style,
                    ),
                    Span::raw(truncate_to_width(&step.action, label_width)),
                ]))
            })
            .collect();

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(BG_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        );

        let mut state = ListState::default().with_selected(Some(self.current));
        StatefulWidget::render(list, area, buf, &mut state);
    }
}

/// Cut `text` to at most `max` display columns, marking the cut with '…'
pub fn truncate_to_width(text: &str, max: usize) -> String {
    let total: usize = text.chars().filter_map(UnicodeWidthChar::width).sum();
    if total <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
