//! Markdown rendering for step reasoning.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};

use super::{ACCENT_PRIMARY, TEXT_MUTED, TEXT_PRIMARY};

const CODE_BG: Color = Color::Rgb(40, 40, 40);

pub struct MarkdownRenderer {
    base_style: Style,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Lines built so far plus the inline styling in effect
struct Builder {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    /// One entry per open list: next number, or None for bullets
    lists: Vec<Option<u64>>,
    code_block: Option<String>,
}

impl Builder {
    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, f: impl FnOnce(Style) -> Style) {
        let next = f(self.style());
        self.styles.push(next);
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn flush(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
    }

    fn blank(&mut self) {
        self.flush();
        if self.lines.last().is_some_and(|l| l.width() > 0) {
            self.lines.push(Line::default());
        }
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            base_style: Style::default().fg(TEXT_PRIMARY),
        }
    }

    /// Render markdown to styled lines. Trailing blank lines are dropped.
    pub fn render(&self, markdown: &str) -> Text<'static> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);

        let mut b = Builder {
            lines: Vec::new(),
            spans: Vec::new(),
            styles: vec![self.base_style],
            lists: Vec::new(),
            code_block: None,
        };

        for event in Parser::new_ext(markdown, options) {
            match event {
                Event::Start(tag) => match tag {
                    Tag::Heading { level, .. } => {
                        b.styles.push(heading_style(level));
                    }
                    Tag::BlockQuote(_) => {
                        b.spans
                            .push(Span::styled("│ ", Style::default().fg(TEXT_MUTED)));
                        b.push_style(|s| s.add_modifier(Modifier::ITALIC));
                    }
                    Tag::CodeBlock(_) => b.code_block = Some(String::new()),
                    Tag::List(start) => b.lists.push(start),
                    Tag::Item => {
                        let indent = "  ".repeat(b.lists.len().saturating_sub(1));
                        let bullet = match b.lists.last_mut() {
                            Some(Some(n)) => {
                                let bullet = format!("{indent}{n}. ");
                                *n += 1;
                                bullet
                            }
                            _ => format!("{indent}• "),
                        };
                        b.spans
                            .push(Span::styled(bullet, Style::default().fg(ACCENT_PRIMARY)));
                    }
                    Tag::Emphasis => b.push_style(|s| s.add_modifier(Modifier::ITALIC)),
                    Tag::Strong => b.push_style(|s| s.add_modifier(Modifier::BOLD)),
                    Tag::Strikethrough => b.push_style(|s| s.add_modifier(Modifier::CROSSED_OUT)),
                    Tag::Link { .. } => b.push_style(|s| {
                        s.fg(Color::Blue).add_modifier(Modifier::UNDERLINED)
                    }),
                    _ => {}
                },
                Event::End(tag) => match tag {
                    TagEnd::Paragraph | TagEnd::Heading(_) => {
                        if matches!(tag, TagEnd::Heading(_)) {
                            b.pop_style();
                        }
                        if b.lists.is_empty() {
                            b.blank();
                        } else {
                            b.flush();
                        }
                    }
                    TagEnd::BlockQuote(_) => {
                        b.pop_style();
                        b.blank();
                    }
                    TagEnd::CodeBlock => {
                        let code = b.code_block.take().unwrap_or_default();
                        let style = Style::default().fg(Color::Green).bg(CODE_BG);
                        for line in code.lines() {
                            b.lines.push(Line::from(Span::styled(format!(" {line} "), style)));
                        }
                        b.blank();
                    }
                    TagEnd::List(_) => {
                        b.lists.pop();
                        if b.lists.is_empty() {
                            b.blank();
                        }
                    }
                    TagEnd::Item => b.flush(),
                    TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                        b.pop_style();
                    }
                    _ => {}
                },
                Event::Text(text) => match b.code_block.as_mut() {
                    Some(code) => code.push_str(&text),
                    None => {
                        let style = b.style();
                        b.spans.push(Span::styled(text.into_string(), style));
                    }
                },
                Event::Code(code) => {
                    b.spans.push(Span::styled(
                        format!("`{code}`"),
                        Style::default().fg(Color::Yellow).bg(CODE_BG),
                    ));
                }
                Event::SoftBreak => b.spans.push(Span::raw(" ")),
                Event::HardBreak => b.flush(),
                Event::Rule => {
                    b.flush();
                    b.lines.push(Line::from(Span::styled(
                        "─".repeat(40),
                        Style::default().fg(TEXT_MUTED),
                    )));
                }
                _ => {}
            }
        }

        b.flush();
        while b.lines.last().is_some_and(|l| l.width() == 0) {
            b.lines.pop();
        }

        Text::from(b.lines)
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeadingLevel::H2 => Style::default()
            .fg(ACCENT_PRIMARY)
            .add_modifier(Modifier::BOLD),
        _ => Style::default().add_modifier(Modifier::BOLD),
    }
}
