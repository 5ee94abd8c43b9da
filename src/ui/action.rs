//! Actions that can be triggered by keybindings
//!
//! Each action is a single operation on the active viewer or on the set of
//! mounted viewers.

use serde::{Deserialize, Serialize};

/// All mappable UI actions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // ========== Global Actions ==========
    /// Quit the application
    Quit,

    // ========== Playback ==========
    /// Advance one step (pauses auto-play)
    NextStep,
    /// Go back one step (pauses auto-play)
    PrevStep,
    /// Start or pause auto-play
    TogglePlay,
    /// Jump to the first step
    FirstStep,
    /// Jump to the last step
    LastStep,
    /// Open the `:` seek prompt
    OpenSeekPrompt,

    // ========== Viewer Management ==========
    /// Close the active viewer
    CloseViewer,
    /// Switch to next viewer
    NextViewer,
    /// Switch to previous viewer
    PrevViewer,
    /// Switch to viewer by number (1-9)
    SwitchToViewer(u8),

    // ========== Seek Prompt ==========
    /// Seek to the typed step
    SubmitSeek,
    /// Close the prompt without seeking
    CancelSeek,
    /// Delete the last typed digit
    Backspace,
}

impl Action {
    /// Short description used in the footer hints
    pub fn description(&self) -> &'static str {
        match self {
            Action::Quit => "Quit",

            Action::NextStep => "Next",
            Action::PrevStep => "Previous",
            Action::TogglePlay => "Play/pause",
            Action::FirstStep => "First",
            Action::LastStep => "Last",
            Action::OpenSeekPrompt => "Go to step",

            Action::CloseViewer => "Close viewer",
            Action::NextViewer => "Next viewer",
            Action::PrevViewer => "Previous viewer",
            Action::SwitchToViewer(_) => "Switch to viewer",

            Action::SubmitSeek => "Seek",
            Action::CancelSeek => "Cancel",
            Action::Backspace => "Backspace",
        }
    }
}
