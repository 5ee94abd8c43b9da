//! Default keybindings, used when the config file does not override them.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};

use super::keys::{KeyCombo, KeyContext, KeybindingConfig};
use crate::ui::action::Action;

/// Helper to insert a keybinding
fn bind(map: &mut HashMap<KeyCombo, Action>, key: &str, action: Action) {
    if let Ok(combo) = key.parse() {
        map.insert(combo, action);
    }
}

/// Create the default keybindings configuration
pub fn default_keybindings() -> KeybindingConfig {
    let mut config = KeybindingConfig::new();

    // ========== Global Keybindings ==========
    bind(&mut config.global, "C-q", Action::Quit);
    bind(&mut config.global, "C-c", Action::Quit);

    // ========== Viewer ==========
    let viewer = config.context.entry(KeyContext::Viewer).or_default();

    bind(viewer, "q", Action::Quit);

    viewer.insert(KeyCombo::new(KeyCode::Right, KeyModifiers::NONE), Action::NextStep);
    viewer.insert(KeyCombo::new(KeyCode::Left, KeyModifiers::NONE), Action::PrevStep);
    bind(viewer, "l", Action::NextStep);
    bind(viewer, "h", Action::PrevStep);
    bind(viewer, "j", Action::NextStep);
    bind(viewer, "k", Action::PrevStep);
    viewer.insert(KeyCombo::new(KeyCode::Char(' '), KeyModifiers::NONE), Action::TogglePlay);
    bind(viewer, "p", Action::TogglePlay);

    viewer.insert(KeyCombo::new(KeyCode::Home, KeyModifiers::NONE), Action::FirstStep);
    viewer.insert(KeyCombo::new(KeyCode::End, KeyModifiers::NONE), Action::LastStep);
    bind(viewer, "g", Action::FirstStep);
    bind(viewer, "G", Action::LastStep);
    bind(viewer, ":", Action::OpenSeekPrompt);

    // Viewer cycling
    viewer.insert(KeyCombo::new(KeyCode::Tab, KeyModifiers::NONE), Action::NextViewer);
    viewer.insert(KeyCombo::new(KeyCode::BackTab, KeyModifiers::SHIFT), Action::PrevViewer);
    bind(viewer, "x", Action::CloseViewer);

    // 1-9 for viewer switching
    for i in 1..=9u8 {
        bind(viewer, &i.to_string(), Action::SwitchToViewer(i));
    }

    // ========== Seek Prompt ==========
    let seek = config.context.entry(KeyContext::SeekPrompt).or_default();

    seek.insert(KeyCombo::new(KeyCode::Enter, KeyModifiers::NONE), Action::SubmitSeek);
    seek.insert(KeyCombo::new(KeyCode::Esc, KeyModifiers::NONE), Action::CancelSeek);
    seek.insert(KeyCombo::new(KeyCode::Backspace, KeyModifiers::NONE), Action::Backspace);

    config
}
