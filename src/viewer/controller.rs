//! Playback controller: cursor, auto-play mode and the step timer.
//!
//! The controller is a plain state machine over `Idle | Playing | Paused`.
//! It does not own a thread or a runtime timer; instead it keeps the deadline
//! of the next auto-play tick and the host loop calls [`PlaybackController::poll_timer`]
//! every frame. Every applied change is broadcast to subscribers in order.

use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::mpsc;

use super::events::PlaybackEvent;
use super::state::{PlayMode, ViewerId, ViewerState};

/// Default per-step dwell time during auto-play.
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("Step {index} is out of range for a trace of {len} steps")]
    OutOfRange { index: usize, len: usize },
}

pub struct PlaybackController {
    viewer_id: ViewerId,
    len: usize,
    state: ViewerState,
    interval: Duration,
    /// When the next auto-play tick is due; `Some` only while playing
    deadline: Option<Instant>,
    seq: u64,
    subscribers: Vec<mpsc::UnboundedSender<PlaybackEvent>>,
}

impl PlaybackController {
    /// Create a controller for a trace of `len` steps (at least one).
    ///
    /// The cursor starts at step 0 in `Idle` mode.
    pub fn new(viewer_id: ViewerId, len: usize, interval: Duration) -> Self {
        debug_assert!(len > 0, "playback controller needs a non-empty trace");
        Self {
            viewer_id,
            len: len.max(1),
            state: ViewerState::default(),
            interval,
            deadline: None,
            seq: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn viewer_id(&self) -> &ViewerId {
        &self.viewer_id
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn play_mode(&self) -> PlayMode {
        self.state.play_mode
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn last_index(&self) -> usize {
        self.len - 1
    }

    /// Register a new subscriber for step and mode notifications.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<PlaybackEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Broadcast the current step, e.g. right after mounting.
    pub fn announce(&mut self) {
        let event = PlaybackEvent::StepChanged {
            seq: self.next_seq(),
            index: self.state.current_index,
            previous: None,
            mode: self.state.play_mode,
        };
        self.emit(event);
    }

    /// Advance one step. Saturates silently at the last step.
    pub fn next(&mut self) -> bool {
        if self.state.current_index >= self.last_index() {
            return false;
        }
        self.set_mode(PlayMode::Paused);
        self.move_to(self.state.current_index + 1);
        true
    }

    /// Go back one step. Saturates silently at step 0.
    pub fn previous(&mut self) -> bool {
        if self.state.current_index == 0 {
            return false;
        }
        self.set_mode(PlayMode::Paused);
        self.move_to(self.state.current_index - 1);
        true
    }

    /// Jump to `index`. Always leaves the controller paused.
    pub fn seek(&mut self, index: usize) -> Result<(), PlaybackError> {
        if index >= self.len {
            tracing::debug!(
                viewer_id = %self.viewer_id,
                index,
                len = self.len,
                "Rejected out-of-range seek"
            );
            return Err(PlaybackError::OutOfRange {
                index,
                len: self.len,
            });
        }
        self.set_mode(PlayMode::Paused);
        self.move_to(index);
        Ok(())
    }

    pub fn first(&mut self) {
        self.move_to_paused(0);
    }

    pub fn last(&mut self) {
        self.move_to_paused(self.last_index());
    }

    fn move_to_paused(&mut self, index: usize) {
        self.set_mode(PlayMode::Paused);
        self.move_to(index);
    }

    /// Flip between playing and not playing.
    pub fn toggle_play(&mut self, now: Instant) {
        if self.state.play_mode.is_playing() {
            self.pause();
        } else {
            self.play(now);
        }
    }

    /// Start auto-play. Starting from the last step rewinds to the first.
    pub fn play(&mut self, now: Instant) {
        if self.state.play_mode.is_playing() {
            return;
        }
        self.set_mode(PlayMode::Playing);
        if self.len > 1 && self.state.current_index == self.last_index() {
            self.move_to(0);
        }
        self.deadline = Some(now + self.interval);
    }

    pub fn pause(&mut self) {
        if self.state.play_mode.is_playing() {
            self.set_mode(PlayMode::Paused);
        }
    }

    /// One auto-play timer tick.
    ///
    /// Advances one step while playing; at the last step playback ends and
    /// the controller returns to `Idle` without wrapping around.
    pub fn tick(&mut self) -> bool {
        if !self.state.play_mode.is_playing() {
            return false;
        }
        if self.state.current_index < self.last_index() {
            self.move_to(self.state.current_index + 1);
        } else {
            self.set_mode(PlayMode::Idle);
        }
        true
    }

    /// Fire the timer if its deadline has passed. At most one tick per call.
    pub fn poll_timer(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = Some(now + self.interval);
                self.tick()
            }
            _ => false,
        }
    }

    pub fn set_media_ready(&mut self, ready: bool) {
        self.state.media_ready = ready;
    }

    fn set_mode(&mut self, mode: PlayMode) {
        let previous = self.state.play_mode;
        if previous == mode {
            return;
        }
        self.state.play_mode = mode;
        if !mode.is_playing() {
            self.deadline = None;
        }
        tracing::debug!(
            viewer_id = %self.viewer_id,
            from = %previous,
            to = %mode,
            "Play mode changed"
        );
        let event = PlaybackEvent::ModeChanged {
            seq: self.next_seq(),
            mode,
            previous,
        };
        self.emit(event);
    }

    fn move_to(&mut self, index: usize) {
        let previous = self.state.current_index;
        if previous == index {
            return;
        }
        self.state.current_index = index;
        self.state.media_ready = false;
        tracing::debug!(
            viewer_id = %self.viewer_id,
            from = previous,
            to = index,
            "Step changed"
        );
        let event = PlaybackEvent::StepChanged {
            seq: self.next_seq(),
            index,
            previous: Some(previous),
            mode: self.state.play_mode,
        };
        self.emit(event);
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}
