use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::viewer::ViewerId;

use super::loader::{MediaInfo, MediaKind, MediaLoader};
use super::sync::{LoadOutcome, LoadRequest};

/// Runs media loads on the tokio runtime and reports their outcomes.
///
/// A new batch of requests for a viewer aborts that viewer's loads still in
/// flight. Viewers never share tasks, so preempting one viewer's loads leaves
/// every other viewer alone.
pub struct MediaDispatcher {
    loader: Arc<dyn MediaLoader>,
    outcome_tx: mpsc::UnboundedSender<LoadOutcome>,
    in_flight: HashMap<ViewerId, Vec<AbortHandle>>,
}

impl MediaDispatcher {
    pub fn new(loader: Arc<dyn MediaLoader>) -> (Self, mpsc::UnboundedReceiver<LoadOutcome>) {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        (
            Self {
                loader,
                outcome_tx,
                in_flight: HashMap::new(),
            },
            outcome_rx,
        )
    }

    /// Start loading `requests`. Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, requests: Vec<LoadRequest>) {
        let mut preempted: Vec<ViewerId> = Vec::new();

        for request in requests {
            if !preempted.contains(&request.viewer_id) {
                self.cancel(&request.viewer_id);
                preempted.push(request.viewer_id.clone());
            }

            let viewer_id = request.viewer_id.clone();
            let loader = Arc::clone(&self.loader);
            let tx = self.outcome_tx.clone();

            let handle = tokio::spawn(async move {
                let result = match request.kind {
                    MediaKind::Video => loader.load_video(&request.source).await.map(MediaInfo::Video),
                    MediaKind::Screenshot => loader
                        .read_screenshot(&request.source)
                        .await
                        .map(MediaInfo::Screenshot),
                };
                // Receiver gone means the app is shutting down
                let _ = tx.send(LoadOutcome::new(request, result));
            });

            self.in_flight
                .entry(viewer_id)
                .or_default()
                .push(handle.abort_handle());
        }
    }

    /// Abort every load still running for `viewer_id`.
    pub fn cancel(&mut self, viewer_id: &ViewerId) {
        if let Some(handles) = self.in_flight.remove(viewer_id) {
            let mut aborted = 0;
            for handle in handles {
                if !handle.is_finished() {
                    handle.abort();
                    aborted += 1;
                }
            }
            if aborted > 0 {
                tracing::debug!(viewer_id = %viewer_id, aborted, "Preempted media loads");
            }
        }
    }

    /// Number of loads for `viewer_id` that have not finished yet.
    pub fn in_flight(&self, viewer_id: &ViewerId) -> usize {
        self.in_flight
            .get(viewer_id)
            .map(|handles| handles.iter().filter(|h| !h.is_finished()).count())
            .unwrap_or(0)
    }
}
