//! A mounted viewer: one trace, one cursor, one set of media surfaces.
//!
//! The controller and the synchronizer are wired together through the
//! controller's notification channel rather than by direct calls. Rendering
//! code gets read-only access to the state and surfaces; all changes go
//! through the navigation methods here.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::media::{LoadOutcome, LoadRequest, MediaSynchronizer};
use crate::trace::{TraceError, TraceItem, TraceStore};

use super::controller::{PlaybackController, PlaybackError, DEFAULT_STEP_INTERVAL};
use super::events::PlaybackEvent;
use super::state::{ViewerId, ViewerState};

/// Settings applied to every viewer on mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSettings {
    pub interval: Duration,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_STEP_INTERVAL,
        }
    }
}

pub struct Viewer {
    store: Arc<TraceStore>,
    controller: PlaybackController,
    media: MediaSynchronizer,
    events: mpsc::UnboundedReceiver<PlaybackEvent>,
}

impl Viewer {
    pub fn new(id: ViewerId, store: Arc<TraceStore>, settings: &PlaybackSettings) -> Self {
        let mut controller = PlaybackController::new(id.clone(), store.len(), settings.interval);
        let events = controller.subscribe();
        controller.announce();

        Self {
            store,
            controller,
            media: MediaSynchronizer::new(id),
            events,
        }
    }

    pub fn store(&self) -> &Arc<TraceStore> {
        &self.store
    }

    pub fn state(&self) -> &ViewerState {
        self.controller.state()
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn media(&self) -> &MediaSynchronizer {
        &self.media
    }

    pub fn current_step(&self) -> &TraceItem {
        &self.store.steps()[self.controller.current_index()]
    }

    /// Subscribe to this viewer's step and mode notifications.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<PlaybackEvent> {
        self.controller.subscribe()
    }

    pub fn next(&mut self) -> bool {
        self.controller.next()
    }

    pub fn previous(&mut self) -> bool {
        self.controller.previous()
    }

    pub fn seek(&mut self, index: usize) -> Result<(), PlaybackError> {
        self.controller.seek(index)
    }

    pub fn first(&mut self) {
        self.controller.first();
    }

    pub fn last(&mut self) {
        self.controller.last();
    }

    pub fn toggle_play(&mut self, now: Instant) {
        self.controller.toggle_play(now);
    }

    pub fn play(&mut self, now: Instant) {
        self.controller.play(now);
    }

    pub fn pause(&mut self) {
        self.controller.pause();
    }

    pub fn poll_timer(&mut self, now: Instant) -> bool {
        self.controller.poll_timer(now)
    }

    /// Apply pending notifications to the media surfaces, in order.
    ///
    /// Returns the loads the host should start. Requests issued for a step
    /// that was already superseded inside the same batch are dropped.
    pub fn pump(&mut self) -> Vec<LoadRequest> {
        let mut requests = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            match event {
                PlaybackEvent::StepChanged { index, mode, .. } => {
                    let step = &self.store.steps()[index];
                    requests = self.media.on_step_changed(step, mode);
                    self.controller.set_media_ready(false);
                }
                PlaybackEvent::ModeChanged { mode, .. } => {
                    self.media.on_mode_changed(mode);
                }
            }
        }
        requests
    }

    /// Apply a finished load. Returns false when it was stale.
    pub fn complete_load(&mut self, outcome: LoadOutcome) -> bool {
        let applied = self.media.on_load_complete(outcome);
        if applied {
            self.controller.set_media_ready(self.media.media_ready());
        }
        applied
    }
}

pub enum ViewerContent {
    Ready(Box<Viewer>),
    /// The trace was rejected at load; nothing is interactive.
    Unavailable(TraceError),
}

pub struct ViewerInstance {
    id: ViewerId,
    label: String,
    content: ViewerContent,
}

impl ViewerInstance {
    /// Mount a viewer over an already-loaded trace (or its load error).
    ///
    /// The label defaults to the trace title, then to the id.
    pub fn mount(
        id: ViewerId,
        label: Option<String>,
        trace: Result<Arc<TraceStore>, TraceError>,
        settings: &PlaybackSettings,
    ) -> Self {
        let content = match trace {
            Ok(store) => {
                tracing::info!(viewer_id = %id, steps = store.len(), "Mounted viewer");
                ViewerContent::Ready(Box::new(Viewer::new(id.clone(), store, settings)))
            }
            Err(e) => {
                tracing::warn!(viewer_id = %id, error = %e, "Trace unavailable");
                ViewerContent::Unavailable(e)
            }
        };

        let label = label
            .or_else(|| match &content {
                ViewerContent::Ready(viewer) => viewer.store().title().map(String::from),
                ViewerContent::Unavailable(_) => None,
            })
            .unwrap_or_else(|| id.to_string());

        Self { id, label, content }
    }

    pub fn id(&self) -> &ViewerId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn content(&self) -> &ViewerContent {
        &self.content
    }

    pub fn is_available(&self) -> bool {
        matches!(self.content, ViewerContent::Ready(_))
    }

    pub fn viewer(&self) -> Option<&Viewer> {
        match &self.content {
            ViewerContent::Ready(viewer) => Some(&**viewer),
            ViewerContent::Unavailable(_) => None,
        }
    }

    pub fn viewer_mut(&mut self) -> Option<&mut Viewer> {
        match &mut self.content {
            ViewerContent::Ready(viewer) => Some(&mut **viewer),
            ViewerContent::Unavailable(_) => None,
        }
    }

    pub fn unavailable_reason(&self) -> Option<&TraceError> {
        match &self.content {
            ViewerContent::Ready(_) => None,
            ViewerContent::Unavailable(e) => Some(e),
        }
    }

    /// Tab label including the step counter.
    pub fn tab_name(&self) -> String {
        match self.viewer() {
            Some(viewer) => format!(
                "{} {}/{}",
                self.label,
                viewer.state().current_index() + 1,
                viewer.store().len()
            ),
            None => format!("{} (unavailable)", self.label),
        }
    }
}
