//! Media synchronizer: keeps the video and screenshot surfaces of one viewer
//! consistent with its current step and play mode.
//!
//! Every step change starts a new generation. Load requests carry the
//! generation they were issued for and completions from an older generation
//! are dropped, so a slow load for step N can never overwrite the surfaces
//! after the viewer has moved on to step N+1. Generations are drawn from a
//! process-wide counter, so a viewer remounted under a reused id never
//! matches loads issued by its predecessor.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::trace::TraceItem;
use crate::viewer::{PlayMode, ViewerId};

use super::loader::{MediaError, MediaInfo, MediaKind, ScreenshotInfo, VideoInfo};

/// Load state of one media surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceState<T> {
    /// Nothing to show for this step.
    Hidden,
    Loading,
    Ready(T),
    /// Load failed; the surface shows an inert placeholder.
    Failed(String),
}

impl<T> SurfaceState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, SurfaceState::Ready(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SurfaceState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SurfaceState::Failed(_))
    }
}

/// Playback state of the video element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoPlayback {
    Stopped,
    /// Loaded and held at the first frame.
    Paused,
    Playing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSurface {
    pub source: Option<String>,
    pub state: SurfaceState<VideoInfo>,
    pub playback: VideoPlayback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotSurface {
    pub source: Option<String>,
    pub state: SurfaceState<ScreenshotInfo>,
}

/// A media fetch the host should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub viewer_id: ViewerId,
    pub generation: u64,
    pub kind: MediaKind,
    pub source: String,
}

/// Result of a [`LoadRequest`], reported back to the synchronizer.
#[derive(Debug)]
pub struct LoadOutcome {
    pub viewer_id: ViewerId,
    pub generation: u64,
    pub kind: MediaKind,
    pub source: String,
    pub result: Result<MediaInfo, MediaError>,
}

impl LoadOutcome {
    pub fn new(request: LoadRequest, result: Result<MediaInfo, MediaError>) -> Self {
        Self {
            viewer_id: request.viewer_id,
            generation: request.generation,
            kind: request.kind,
            source: request.source,
            result,
        }
    }
}

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

pub struct MediaSynchronizer {
    viewer_id: ViewerId,
    generation: u64,
    mode: PlayMode,
    video: VideoSurface,
    screenshot: ScreenshotSurface,
}

impl MediaSynchronizer {
    pub fn new(viewer_id: ViewerId) -> Self {
        Self {
            viewer_id,
            generation: 0,
            mode: PlayMode::Idle,
            video: VideoSurface {
                source: None,
                state: SurfaceState::Hidden,
                playback: VideoPlayback::Stopped,
            },
            screenshot: ScreenshotSurface {
                source: None,
                state: SurfaceState::Hidden,
            },
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn video(&self) -> &VideoSurface {
        &self.video
    }

    pub fn screenshot(&self) -> &ScreenshotSurface {
        &self.screenshot
    }

    /// Whether the surface that represents the current step can render.
    ///
    /// Steps with a clip are ready when the clip is; steps without one when
    /// the screenshot is.
    pub fn media_ready(&self) -> bool {
        if self.video.source.is_some() {
            self.video.state.is_ready()
        } else {
            self.screenshot.state.is_ready()
        }
    }

    /// Whether the surface that represents the current step failed to load.
    pub fn media_failed(&self) -> bool {
        if self.video.source.is_some() {
            self.video.state.is_failed()
        } else {
            self.screenshot.state.is_failed()
        }
    }

    /// Switch both surfaces to `step`.
    ///
    /// The old clip is stopped in the same call, before the new sources are
    /// requested.
    pub fn on_step_changed(&mut self, step: &TraceItem, mode: PlayMode) -> Vec<LoadRequest> {
        self.generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        self.mode = mode;
        self.video.playback = VideoPlayback::Stopped;

        let mut requests = Vec::with_capacity(2);

        self.screenshot.source = Some(step.screenshot_path.clone());
        self.screenshot.state = SurfaceState::Loading;
        requests.push(self.request(MediaKind::Screenshot, &step.screenshot_path));

        match &step.video_path {
            Some(video) => {
                self.video.source = Some(video.clone());
                self.video.state = SurfaceState::Loading;
                requests.push(self.request(MediaKind::Video, video));
            }
            None => {
                self.video.source = None;
                self.video.state = SurfaceState::Hidden;
            }
        }

        tracing::trace!(
            viewer_id = %self.viewer_id,
            generation = self.generation,
            index = step.index,
            "Media switched to new step"
        );

        requests
    }

    /// Reconcile clip playback with a new play mode.
    pub fn on_mode_changed(&mut self, mode: PlayMode) {
        self.mode = mode;
        if self.video.state.is_ready() {
            self.video.playback = playback_for(mode);
        }
    }

    /// Apply a finished load. Returns false when the outcome was stale.
    pub fn on_load_complete(&mut self, outcome: LoadOutcome) -> bool {
        let current_source = match outcome.kind {
            MediaKind::Video => self.video.source.as_deref(),
            MediaKind::Screenshot => self.screenshot.source.as_deref(),
        };
        if outcome.viewer_id != self.viewer_id
            || outcome.generation != self.generation
            || current_source != Some(outcome.source.as_str())
        {
            tracing::trace!(
                viewer_id = %self.viewer_id,
                generation = outcome.generation,
                current = self.generation,
                source = %outcome.source,
                "Discarded stale media load"
            );
            return false;
        }

        match (outcome.kind, outcome.result) {
            (MediaKind::Video, Ok(MediaInfo::Video(info))) => {
                self.video.state = SurfaceState::Ready(info);
                self.video.playback = playback_for(self.mode);
            }
            (MediaKind::Screenshot, Ok(MediaInfo::Screenshot(info))) => {
                self.screenshot.state = SurfaceState::Ready(info);
            }
            (kind, Ok(info)) => {
                tracing::warn!(
                    viewer_id = %self.viewer_id,
                    %kind,
                    ?info,
                    "Media load returned info for the wrong surface"
                );
                self.fail(kind, "unexpected media type".to_string());
            }
            (kind, Err(e)) => {
                tracing::warn!(
                    viewer_id = %self.viewer_id,
                    %kind,
                    source = %outcome.source,
                    error = %e,
                    "Media load failed"
                );
                self.fail(kind, e.to_string());
            }
        }
        true
    }

    fn fail(&mut self, kind: MediaKind, reason: String) {
        match kind {
            MediaKind::Video => {
                self.video.state = SurfaceState::Failed(reason);
                self.video.playback = VideoPlayback::Stopped;
            }
            MediaKind::Screenshot => {
                self.screenshot.state = SurfaceState::Failed(reason);
            }
        }
    }

    fn request(&self, kind: MediaKind, source: &str) -> LoadRequest {
        LoadRequest {
            viewer_id: self.viewer_id.clone(),
            generation: self.generation,
            kind,
            source: source.to_string(),
        }
    }
}

fn playback_for(mode: PlayMode) -> VideoPlayback {
    if mode.is_playing() {
        VideoPlayback::Playing
    } else {
        VideoPlayback::Paused
    }
}
