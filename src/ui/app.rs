use std::io;
use std::sync::Arc;
use std::time::Instant;

use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{enable_raw_mode, EnterAlternateScreen},
};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::config::{Config, KeyCombo, KeyContext};
use crate::media::{LoadOutcome, MediaDispatcher, MediaLoader};
use crate::ui::action::Action;
use crate::ui::components::{
    FooterContext, GlobalFooter, StepDetail, StepList, TabBar, TraceUnavailable, TransportBar,
    ACCENT_ERROR, ACCENT_PRIMARY, BG_BAR, TEXT_MUTED, TEXT_SECONDARY,
};
use crate::ui::events::{AppEvent, InputMode};
use crate::ui::terminal_guard::TerminalGuard;
use crate::viewer::{Viewer, ViewerContent, ViewerRegistry};

/// Longest step number the seek prompt accepts
const MAX_SEEK_DIGITS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Main application state
pub struct App {
    config: Config,
    registry: ViewerRegistry,
    dispatcher: MediaDispatcher,
    outcome_rx: mpsc::UnboundedReceiver<LoadOutcome>,
    input_mode: InputMode,
    /// Digits typed after `:`
    seek_input: String,
    status: Option<StatusMessage>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, registry: ViewerRegistry, loader: Arc<dyn MediaLoader>) -> Self {
        let (dispatcher, outcome_rx) = MediaDispatcher::new(loader);
        Self {
            config,
            registry,
            dispatcher,
            outcome_rx,
            input_mode: InputMode::Normal,
            seek_input: String::new(),
            status: None,
            should_quit: false,
        }
    }

    pub fn registry(&self) -> &ViewerRegistry {
        &self.registry
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn seek_input(&self) -> &str {
        &self.seek_input
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut guard = TerminalGuard::new();
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal).await;

        guard.cleanup()?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut input = EventStream::new();

        loop {
            self.poll_timers(Instant::now());
            self.sync_media();
            terminal.draw(|f| self.draw(f))?;

            if self.should_quit {
                break;
            }

            let deadline = self.next_deadline();
            let event = tokio::select! {
                maybe = input.next() => match maybe {
                    Some(Ok(event)) => AppEvent::Input(event),
                    Some(Err(e)) => {
                        return Err(anyhow::Error::new(e).context("Failed to read terminal input"));
                    }
                    None => break,
                },
                Some(outcome) = self.next_media_outcome() => AppEvent::MediaLoaded(outcome),
                _ = sleep_until(deadline) => AppEvent::Tick,
            };

            self.handle_app_event(event, Instant::now());
        }

        Ok(())
    }

    pub fn handle_app_event(&mut self, event: AppEvent, now: Instant) {
        match event {
            AppEvent::Input(Event::Key(key)) => self.handle_key_event(key, now),
            AppEvent::Input(_) => {}
            AppEvent::MediaLoaded(outcome) => self.apply_outcome(outcome),
            AppEvent::Tick => self.poll_timers(now),
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        if self.input_mode == InputMode::SeekPrompt {
            if let KeyCode::Char(c) = key.code {
                let plain = !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
                if plain && c.is_ascii_digit() {
                    if self.seek_input.len() < MAX_SEEK_DIGITS {
                        self.seek_input.push(c);
                    }
                    return;
                }
            }
        }

        let combo = KeyCombo::from_key_event(&key);
        let context = KeyContext::from_input_mode(self.input_mode);
        if let Some(action) = self.config.keybindings.get_action(&combo, context).cloned() {
            self.handle_action(action, now);
        }
    }

    pub fn handle_action(&mut self, action: Action, now: Instant) {
        if self.input_mode == InputMode::Normal {
            self.status = None;
        }

        match action {
            Action::Quit => self.should_quit = true,

            Action::NextStep => {
                if let Some(viewer) = self.active_viewer_mut() {
                    viewer.next();
                }
            }
            Action::PrevStep => {
                if let Some(viewer) = self.active_viewer_mut() {
                    viewer.previous();
                }
            }
            Action::TogglePlay => {
                if let Some(viewer) = self.active_viewer_mut() {
                    viewer.toggle_play(now);
                }
            }
            Action::FirstStep => {
                if let Some(viewer) = self.active_viewer_mut() {
                    viewer.first();
                }
            }
            Action::LastStep => {
                if let Some(viewer) = self.active_viewer_mut() {
                    viewer.last();
                }
            }
            Action::OpenSeekPrompt => {
                if self.active_viewer_mut().is_some() {
                    self.input_mode = InputMode::SeekPrompt;
                    self.seek_input.clear();
                }
            }

            Action::SubmitSeek => self.submit_seek(),
            Action::CancelSeek => {
                self.input_mode = InputMode::Normal;
                self.seek_input.clear();
            }
            Action::Backspace => {
                self.seek_input.pop();
            }

            Action::NextViewer => self.registry.next_viewer(),
            Action::PrevViewer => self.registry.prev_viewer(),
            Action::SwitchToViewer(n) => {
                if n > 0 {
                    self.registry.switch_to(usize::from(n) - 1);
                }
            }
            Action::CloseViewer => {
                if let Some(id) = self.registry.active().map(|i| i.id().clone()) {
                    self.dispatcher.cancel(&id);
                    self.registry.unmount(&id);
                }
                if self.registry.is_empty() {
                    self.should_quit = true;
                }
            }
        }
    }

    fn submit_seek(&mut self) {
        self.input_mode = InputMode::Normal;
        let typed = std::mem::take(&mut self.seek_input);
        if typed.is_empty() {
            return;
        }

        let Some(viewer) = self.active_viewer_mut() else {
            return;
        };
        let len = viewer.store().len();
        let result = typed
            .parse::<usize>()
            .ok()
            .and_then(|step| step.checked_sub(1))
            .map(|index| viewer.seek(index));

        let text = match result {
            Some(Ok(())) => return,
            Some(Err(e)) => {
                tracing::debug!(error = %e, "Seek rejected");
                format!("Step {typed} is out of range (1-{len})")
            }
            None => format!("Step {typed} is out of range (1-{len})"),
        };
        self.status = Some(StatusMessage {
            text,
            is_error: true,
        });
    }

    fn active_viewer_mut(&mut self) -> Option<&mut Viewer> {
        self.registry.active_mut().and_then(|i| i.viewer_mut())
    }

    /// Fire due auto-play ticks on every viewer, active or not.
    pub fn poll_timers(&mut self, now: Instant) {
        for instance in self.registry.iter_mut() {
            if let Some(viewer) = instance.viewer_mut() {
                viewer.poll_timer(now);
            }
        }
    }

    /// Earliest pending auto-play deadline across all viewers.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.registry
            .iter()
            .filter_map(|i| i.viewer())
            .filter_map(|v| v.controller().next_deadline())
            .min()
    }

    /// Deliver pending step notifications to each viewer's media and start
    /// the loads they ask for. Must be called from within a tokio runtime.
    pub fn sync_media(&mut self) {
        let mut requests = Vec::new();
        for instance in self.registry.iter_mut() {
            if let Some(viewer) = instance.viewer_mut() {
                requests.extend(viewer.pump());
            }
        }
        if !requests.is_empty() {
            self.dispatcher.dispatch(requests);
        }
    }

    /// Wait for the next finished media load.
    pub async fn next_media_outcome(&mut self) -> Option<LoadOutcome> {
        self.outcome_rx.recv().await
    }

    pub fn apply_outcome(&mut self, outcome: LoadOutcome) {
        let Some(viewer) = self
            .registry
            .get_mut(&outcome.viewer_id)
            .and_then(|i| i.viewer_mut())
        else {
            // Viewer was closed while the load was in flight
            return;
        };
        viewer.complete_load(outcome);
    }

    pub fn draw(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Tab bar
                Constraint::Min(5),    // Step list + detail
                Constraint::Length(2), // Transport bar
                Constraint::Length(1), // Status / seek prompt
                Constraint::Length(1), // Footer
            ])
            .split(f.area());

        let buf = f.buffer_mut();

        TabBar::new(self.registry.tab_names(), self.registry.active_index())
            .with_unavailable(self.registry.iter().map(|i| !i.is_available()).collect())
            .render(chunks[0], buf);

        match self.registry.active() {
            None => {
                Paragraph::new("No traces open")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(TEXT_MUTED))
                    .render(chunks[1], buf);
            }
            Some(instance) => match instance.content() {
                ViewerContent::Unavailable(error) => {
                    TraceUnavailable::new(instance.label(), error).render(chunks[1], buf);
                }
                ViewerContent::Ready(viewer) => {
                    self.draw_viewer(viewer, chunks[1], chunks[2], buf);
                }
            },
        }

        self.draw_status_line(chunks[3], buf);

        let active_available = self
            .registry
            .active()
            .is_some_and(|instance| instance.is_available());
        let context = FooterContext::from_state(
            self.input_mode,
            !self.registry.is_empty(),
            active_available,
        );
        GlobalFooter::for_context(context, &self.config.keybindings).render(chunks[4], buf);

        if self.input_mode == InputMode::SeekPrompt {
            let x = chunks[3].x + 1 + self.seek_input.len() as u16;
            f.set_cursor_position((x.min(chunks[3].right().saturating_sub(1)), chunks[3].y));
        }
    }

    fn draw_viewer(
        &self,
        viewer: &Viewer,
        body: Rect,
        transport: Rect,
        buf: &mut ratatui::buffer::Buffer,
    ) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Min(20)])
            .split(body);

        let state = viewer.state();
        StepList::new(viewer.store().steps(), state.current_index()).render(columns[0], buf);

        let detail_area = Rect {
            x: columns[1].x + 1,
            width: columns[1].width.saturating_sub(1),
            ..columns[1]
        };
        StepDetail::new(viewer.current_step(), viewer.media()).render(detail_area, buf);

        TransportBar::new(state.current_index(), viewer.store().len(), state.play_mode())
            .interval(viewer.controller().interval())
            .media_ready(state.media_ready())
            .media_failed(viewer.media().media_failed())
            .render(transport, buf);
    }

    fn draw_status_line(&self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let line = if self.input_mode == InputMode::SeekPrompt {
            Line::from(vec![
                Span::styled(":", Style::default().fg(ACCENT_PRIMARY)),
                Span::raw(self.seek_input.clone()),
            ])
        } else if let Some(status) = &self.status {
            let style = if status.is_error {
                Style::default().fg(ACCENT_ERROR)
            } else {
                Style::default().fg(TEXT_SECONDARY)
            };
            Line::from(Span::styled(status.text.clone(), style))
        } else {
            let title = self
                .registry
                .active()
                .and_then(|i| i.viewer())
                .map(|v| {
                    let store = v.store();
                    match (store.title(), store.subtitle()) {
                        (Some(t), Some(s)) => format!("{t} · {s}"),
                        (Some(t), None) => t.to_string(),
                        (None, _) => String::new(),
                    }
                })
                .unwrap_or_default();
            Line::from(Span::styled(
                title,
                Style::default()
                    .fg(TEXT_SECONDARY)
                    .add_modifier(Modifier::ITALIC),
            ))
        };

        Paragraph::new(line)
            .style(Style::default().bg(BG_BAR))
            .render(area, buf);
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        }
        None => std::future::pending::<()>().await,
    }
}
