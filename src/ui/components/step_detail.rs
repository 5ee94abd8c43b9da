use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use crate::media::{MediaSynchronizer, ScreenshotInfo, SurfaceState, VideoInfo, VideoPlayback};
use crate::trace::TraceItem;

use super::{
    MarkdownRenderer, ACCENT_ERROR, ACCENT_SUCCESS, ACCENT_WARNING, TEXT_MUTED, TEXT_PRIMARY,
    TEXT_SECONDARY,
};

/// Everything known about the current step and its media surfaces
pub struct StepDetail<'a> {
    step: &'a TraceItem,
    media: &'a MediaSynchronizer,
}

impl<'a> StepDetail<'a> {
    pub fn new(step: &'a TraceItem, media: &'a MediaSynchronizer) -> Self {
        Self { step, media }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let label = Style::default().fg(TEXT_MUTED);
        let mut lines = vec![Line::from(Span::styled(
            self.step.action.clone(),
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ))];

        if let Some(ts) = self.step.display_timestamp() {
            lines.push(Line::from(Span::styled(ts, label)));
        }
        lines.push(Line::default());

        let screenshot = self.media.screenshot();
        lines.push(Line::from(vec![
            Span::styled("Screenshot  ", label),
            Span::raw(screenshot.source.clone().unwrap_or_default()),
        ]));
        lines.push(Line::from(vec![
            Span::raw("            "),
            screenshot_state(&screenshot.state),
        ]));

        let video = self.media.video();
        match &video.source {
            Some(source) => {
                lines.push(Line::from(vec![
                    Span::styled("Video       ", label),
                    Span::raw(source.clone()),
                ]));
                lines.push(Line::from(vec![
                    Span::raw("            "),
                    video_state(&video.state, video.playback),
                ]));
            }
            None => lines.push(Line::from(vec![
                Span::styled("Video       ", label),
                Span::styled("none", label),
            ])),
        }

        if let Some(reasoning) = self.step.reasoning.as_deref().filter(|r| !r.trim().is_empty()) {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled("Reasoning", label)));
            lines.extend(MarkdownRenderer::new().render(reasoning).lines);
        }

        if !self.step.details.is_empty() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled("Details", label)));
            for (key, value) in &self.step.details {
                let value = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("  {key}: "), Style::default().fg(TEXT_SECONDARY)),
                    Span::raw(value),
                ]));
            }
        }

        lines
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().title(Span::styled(
            format!(" Step {} ", self.step.index + 1),
            Style::default().fg(TEXT_SECONDARY),
        ));
        Paragraph::new(Text::from(self.lines()))
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

fn screenshot_state(state: &SurfaceState<ScreenshotInfo>) -> Span<'static> {
    match state {
        SurfaceState::Hidden => Span::styled("hidden", Style::default().fg(TEXT_MUTED)),
        SurfaceState::Loading => Span::styled("loading…", Style::default().fg(ACCENT_WARNING)),
        SurfaceState::Ready(info) => Span::styled(
            format!("{}×{}", info.width, info.height),
            Style::default().fg(ACCENT_SUCCESS),
        ),
        SurfaceState::Failed(reason) => Span::styled(
            format!("unavailable: {reason}"),
            Style::default().fg(ACCENT_ERROR),
        ),
    }
}

fn video_state(state: &SurfaceState<VideoInfo>, playback: VideoPlayback) -> Span<'static> {
    match state {
        SurfaceState::Hidden => Span::styled("hidden", Style::default().fg(TEXT_MUTED)),
        SurfaceState::Loading => Span::styled("loading…", Style::default().fg(ACCENT_WARNING)),
        SurfaceState::Ready(info) => {
            let playback = match playback {
                VideoPlayback::Playing => "playing",
                VideoPlayback::Paused => "paused at first frame",
                VideoPlayback::Stopped => "stopped",
            };
            Span::styled(
                format!("{} {}, {playback}", info.container.as_str(), format_bytes(info.bytes)),
                Style::default().fg(ACCENT_SUCCESS),
            )
        }
        SurfaceState::Failed(reason) => Span::styled(
            format!("unavailable: {reason}"),
            Style::default().fg(ACCENT_ERROR),
        ),
    }
}

fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b >= KIB * KIB {
        format!("{:.1} MiB", b / (KIB * KIB))
    } else if b >= KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{bytes} B")
    }
}
