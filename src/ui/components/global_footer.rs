use ratatui::{buffer::Buffer, layout::Rect};

use crate::config::{KeyContext, KeybindingConfig};
use crate::ui::action::Action;
use crate::ui::components::{render_key_hints, KeyHintBarStyle, BG_BAR, BG_KEY_HINT};
use crate::ui::events::InputMode;

/// Context for determining which footer hints to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FooterContext {
    /// No viewers mounted
    Empty,
    /// Active viewer is interactive
    #[default]
    Viewer,
    /// Active viewer failed to load its trace
    Unavailable,
    /// Typing a step number
    SeekPrompt,
}

impl FooterContext {
    pub fn from_state(input_mode: InputMode, has_viewers: bool, active_available: bool) -> Self {
        if !has_viewers {
            return FooterContext::Empty;
        }
        match input_mode {
            InputMode::SeekPrompt => FooterContext::SeekPrompt,
            InputMode::Normal if active_available => FooterContext::Viewer,
            InputMode::Normal => FooterContext::Unavailable,
        }
    }

    fn actions(self) -> &'static [Action] {
        match self {
            FooterContext::Empty => &[Action::Quit],
            FooterContext::Viewer => &[
                Action::TogglePlay,
                Action::PrevStep,
                Action::NextStep,
                Action::FirstStep,
                Action::LastStep,
                Action::OpenSeekPrompt,
                Action::NextViewer,
                Action::Quit,
            ],
            FooterContext::Unavailable => &[Action::NextViewer, Action::CloseViewer, Action::Quit],
            FooterContext::SeekPrompt => &[Action::SubmitSeek, Action::CancelSeek],
        }
    }

    fn key_context(self) -> KeyContext {
        match self {
            FooterContext::SeekPrompt => KeyContext::SeekPrompt,
            _ => KeyContext::Viewer,
        }
    }
}

/// Footer showing the keys bound to the actions available right now
pub struct GlobalFooter {
    hints: Vec<(String, &'static str)>,
}

impl GlobalFooter {
    /// Build hints from the live keybindings. Unbound actions are left out.
    pub fn for_context(context: FooterContext, keys: &KeybindingConfig) -> Self {
        let key_context = context.key_context();
        let hints = context
            .actions()
            .iter()
            .filter_map(|action| {
                keys.key_for(action, key_context)
                    .map(|combo| (combo.to_string(), action.description()))
            })
            .collect();
        Self { hints }
    }

    pub fn hints(&self) -> &[(String, &'static str)] {
        &self.hints
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        render_key_hints(
            area,
            buf,
            &self.hints,
            KeyHintBarStyle::footer_bar(BG_KEY_HINT, BG_BAR),
        );
    }
}
