//! Keybinding configuration types and parsing
//!
//! Key combos use vim-style notation ("C-x", "M-S-w", "<CR>").

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ui::action::Action;
use crate::ui::events::InputMode;

/// A key combination (key code + modifiers)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Create a KeyCombo from a crossterm KeyEvent
    ///
    /// This normalizes the key event to match the canonical form used by config parsing:
    /// - Uppercase characters are converted to lowercase + SHIFT modifier
    /// - This ensures "G" in config matches Shift+g key events
    pub fn from_key_event(event: &crossterm::event::KeyEvent) -> Self {
        match event.code {
            KeyCode::Char(c) if c.is_ascii_uppercase() => {
                // Normalize uppercase to lowercase + SHIFT
                Self {
                    code: KeyCode::Char(c.to_ascii_lowercase()),
                    modifiers: event.modifiers | KeyModifiers::SHIFT,
                }
            }
            // Shift is implied by the character itself (':' vs ';')
            KeyCode::Char(c) if c.is_ascii_punctuation() => Self {
                code: event.code,
                modifiers: event.modifiers.difference(KeyModifiers::SHIFT),
            },
            _ => Self {
                code: event.code,
                modifiers: event.modifiers,
            },
        }
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, prefix) in [
            (KeyModifiers::CONTROL, "C-"),
            (KeyModifiers::ALT, "M-"),
            (KeyModifiers::SHIFT, "S-"),
        ] {
            if self.modifiers.contains(flag) {
                f.write_str(prefix)?;
            }
        }

        match self.code {
            KeyCode::Char(' ') => f.write_str("<Space>"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "<F{n}>"),
            code => match display_name(code) {
                Some(name) => write!(f, "<{name}>"),
                None => write!(f, "{code:?}"),
            },
        }
    }
}

fn display_name(code: KeyCode) -> Option<&'static str> {
    Some(match code {
        KeyCode::Enter => "CR",
        KeyCode::Esc => "Esc",
        KeyCode::Tab => "Tab",
        KeyCode::Backspace => "BS",
        KeyCode::Delete => "Del",
        KeyCode::Up => "Up",
        KeyCode::Down => "Down",
        KeyCode::Left => "Left",
        KeyCode::Right => "Right",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        _ => return None,
    })
}

/// Context for keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyContext {
    /// Keys that work whenever no prompt is open
    Global,
    /// Normal viewing mode
    Viewer,
    /// Typing a step number after `:`
    SeekPrompt,
}

impl KeyContext {
    pub fn from_input_mode(mode: InputMode) -> Self {
        match mode {
            InputMode::Normal => KeyContext::Viewer,
            InputMode::SeekPrompt => KeyContext::SeekPrompt,
        }
    }
}

/// Configuration for all keybindings
#[derive(Debug, Clone, Default)]
pub struct KeybindingConfig {
    /// Global keybindings (apply to all contexts unless overridden)
    pub global: HashMap<KeyCombo, Action>,
    /// Context-specific keybindings
    pub context: HashMap<KeyContext, HashMap<KeyCombo, Action>>,
}

impl KeybindingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an action for a key combo in a given context
    /// First checks context-specific bindings, then falls back to global
    pub fn get_action(&self, key: &KeyCombo, context: KeyContext) -> Option<&Action> {
        // First check context-specific bindings
        if let Some(context_bindings) = self.context.get(&context) {
            if let Some(action) = context_bindings.get(key) {
                return Some(action);
            }
        }

        // Fall back to global bindings
        self.global.get(key)
    }

    /// The key shown for `action` in hints: the shortest binding that is
    /// not shadowed in `context`
    pub fn key_for(&self, action: &Action, context: KeyContext) -> Option<&KeyCombo> {
        let contextual = self.context.get(&context).into_iter().flatten();
        contextual
            .chain(self.global.iter())
            .filter(|(key, bound)| {
                *bound == action && self.get_action(key, context) == Some(action)
            })
            .map(|(key, _)| key)
            .min_by_key(|key| {
                let label = key.to_string();
                (label.chars().count(), label)
            })
    }

    /// Merge user configuration on top of defaults
    pub fn merge(&mut self, other: KeybindingConfig) {
        // Merge global bindings
        for (key, action) in other.global {
            self.global.insert(key, action);
        }

        // Merge context-specific bindings
        for (ctx, bindings) in other.context {
            let entry = self.context.entry(ctx).or_default();
            for (key, action) in bindings {
                entry.insert(key, action);
            }
        }
    }
}

/// Named keys accepted inside `<...>` (case-insensitive)
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("CR", KeyCode::Enter),
    ("ENTER", KeyCode::Enter),
    ("RETURN", KeyCode::Enter),
    ("ESC", KeyCode::Esc),
    ("ESCAPE", KeyCode::Esc),
    ("TAB", KeyCode::Tab),
    ("BS", KeyCode::Backspace),
    ("BACKSPACE", KeyCode::Backspace),
    ("DEL", KeyCode::Delete),
    ("DELETE", KeyCode::Delete),
    ("UP", KeyCode::Up),
    ("DOWN", KeyCode::Down),
    ("LEFT", KeyCode::Left),
    ("RIGHT", KeyCode::Right),
    ("PAGEUP", KeyCode::PageUp),
    ("PGUP", KeyCode::PageUp),
    ("PAGEDOWN", KeyCode::PageDown),
    ("PGDN", KeyCode::PageDown),
    ("HOME", KeyCode::Home),
    ("END", KeyCode::End),
    ("SPACE", KeyCode::Char(' ')),
];

fn named_key(name: &str) -> Option<KeyCode> {
    let upper = name.to_ascii_uppercase();
    if let Some((_, code)) = NAMED_KEYS.iter().find(|(n, _)| *n == upper) {
        return Some(*code);
    }
    let num: u8 = upper.strip_prefix('F')?.parse().ok()?;
    (1..=12).contains(&num).then_some(KeyCode::F(num))
}

fn modifier(part: &str) -> Option<KeyModifiers> {
    match part {
        "C" => Some(KeyModifiers::CONTROL),
        "M" => Some(KeyModifiers::ALT),
        "S" => Some(KeyModifiers::SHIFT),
        _ => None,
    }
}

/// Parse a vim-style key notation string into a KeyCombo
///
/// - `C-x`, `M-x`, `S-x` for Ctrl, Alt and Shift; combine as `C-S-x`
/// - `G` is Shift+g
/// - `<CR>`, `<Esc>`, `<Tab>`, `<BS>`, `<Del>`, `<Space>`
/// - `<Up>`, `<Down>`, `<Left>`, `<Right>`, `<PageUp>`, `<PageDown>`, `<Home>`, `<End>`
/// - `<F1>` through `<F12>`
/// - modifiers may go inside the brackets: `<S-Right>`
pub fn parse_key_notation(s: &str) -> Result<KeyCombo, KeyParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(KeyParseError::Empty);
    }

    if let Some(inner) = s.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
        return parse_bracketed(inner);
    }

    // A trailing '-' is the minus key itself, as in "C--"
    let (prefix, key) = match s.rsplit_once('-') {
        Some((prefix, "")) if !prefix.is_empty() => {
            (prefix.strip_suffix('-').unwrap_or(prefix), "-")
        }
        Some((prefix, key)) => (prefix, key),
        None => ("", s),
    };

    let mut modifiers = KeyModifiers::NONE;
    for part in prefix.split('-').filter(|p| !p.is_empty()) {
        modifiers |=
            modifier(part).ok_or_else(|| KeyParseError::InvalidModifier(part.to_string()))?;
    }

    if key.is_empty() {
        return Err(KeyParseError::NoKey);
    }

    let mut chars = key.chars();
    let code = match (chars.next(), chars.next()) {
        (Some(c), None) => {
            if c.is_ascii_uppercase() {
                modifiers |= KeyModifiers::SHIFT;
            }
            KeyCode::Char(c.to_ascii_lowercase())
        }
        _ => match key.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
            Some(inner) => parse_bracketed(inner)?.code,
            None => named_key(key).ok_or_else(|| KeyParseError::InvalidKey(key.to_string()))?,
        },
    };

    Ok(KeyCombo::new(code, modifiers))
}

/// Parse the inside of `<...>`, e.g. `CR` or `C-Right`
fn parse_bracketed(inner: &str) -> Result<KeyCombo, KeyParseError> {
    let mut parts: Vec<&str> = inner.split('-').collect();
    let name = parts
        .pop()
        .filter(|n| !n.is_empty())
        .ok_or(KeyParseError::NoKey)?;

    let mut modifiers = KeyModifiers::NONE;
    for part in parts {
        modifiers |=
            modifier(part).ok_or_else(|| KeyParseError::InvalidModifier(part.to_string()))?;
    }

    let code =
        named_key(name).ok_or_else(|| KeyParseError::InvalidSpecialKey(name.to_string()))?;
    Ok(KeyCombo::new(code, modifiers))
}

/// Error type for key parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("empty key notation")]
    Empty,
    #[error("no key specified")]
    NoKey,
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("invalid modifier: {0}")]
    InvalidModifier(String),
    #[error("invalid special key: {0}")]
    InvalidSpecialKey(String),
}

impl FromStr for KeyCombo {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key_notation(s)
    }
}
