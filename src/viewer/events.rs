use super::state::PlayMode;

/// Notifications emitted by a playback controller.
///
/// `seq` increases by one per emitted event, per controller, so consumers can
/// assert they observe changes in the order they were applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The cursor moved (or was announced on mount, with `previous: None`).
    StepChanged {
        seq: u64,
        index: usize,
        previous: Option<usize>,
        mode: PlayMode,
    },
    /// Auto-play mode changed without moving the cursor.
    ModeChanged {
        seq: u64,
        mode: PlayMode,
        previous: PlayMode,
    },
}

impl PlaybackEvent {
    pub fn seq(&self) -> u64 {
        match self {
            PlaybackEvent::StepChanged { seq, .. } | PlaybackEvent::ModeChanged { seq, .. } => {
                *seq
            }
        }
    }

    pub fn mode(&self) -> PlayMode {
        match self {
            PlaybackEvent::StepChanged { mode, .. } | PlaybackEvent::ModeChanged { mode, .. } => {
                *mode
            }
        }
    }
}
