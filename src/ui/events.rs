use crate::media::LoadOutcome;

/// Application-level events
#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Input(crossterm::event::Event),

    /// A media load finished (or failed) for some viewer
    MediaLoaded(LoadOutcome),

    /// The earliest auto-play deadline was reached
    Tick,
}

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Keys drive the active viewer
    #[default]
    Normal,
    /// Typing a 1-based step number after `:`
    SeekPrompt,
}
