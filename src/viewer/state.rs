use std::fmt;

use serde::{Deserialize, Serialize};

/// Caller-supplied identifier namespacing one mounted viewer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewerId(String);

impl ViewerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Default id for the n-th viewer on a page (1-based): `viewer1`, `viewer2`, ...
    pub fn nth(n: usize) -> Self {
        Self(format!("viewer{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ViewerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Auto-play mode of a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayMode {
    /// Nothing has happened yet, or auto-play ran off the end of the trace.
    #[default]
    Idle,
    Playing,
    Paused,
}

impl PlayMode {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlayMode::Playing)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlayMode::Idle => "Idle",
            PlayMode::Playing => "Playing",
            PlayMode::Paused => "Paused",
        }
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Per-instance cursor state. Only the playback controller mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewerState {
    pub(crate) current_index: usize,
    pub(crate) play_mode: PlayMode,
    pub(crate) media_ready: bool,
}

impl ViewerState {
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    pub fn media_ready(&self) -> bool {
        self.media_ready
    }
}
