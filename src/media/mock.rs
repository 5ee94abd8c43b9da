//! Mock media loader for deterministic testing
//!
//! Implements [`MediaLoader`] without touching the filesystem. Sources can be
//! scripted to fail or to take a while, and every call is captured so tests
//! can assert which assets a viewer asked for.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::loader::{
    MediaError, MediaKind, MediaLoader, ScreenshotInfo, VideoContainer, VideoInfo,
};

/// Failure to simulate for a given source
#[derive(Clone, Debug)]
pub enum MockFailure {
    NotFound,
    Decode(String),
}

impl MockFailure {
    fn into_media_error(self, source: &str) -> MediaError {
        match self {
            MockFailure::NotFound => MediaError::NotFound(source.to_string()),
            MockFailure::Decode(msg) => MediaError::Decode(msg),
        }
    }
}

#[derive(Clone, Default)]
pub struct MockMediaLoader {
    failures: HashMap<String, MockFailure>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    calls: Arc<Mutex<Vec<(MediaKind, String)>>>,
}

impl MockMediaLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every load of `source` fail
    pub fn with_failure(mut self, source: impl Into<String>, failure: MockFailure) -> Self {
        self.failures.insert(source.into(), failure);
        self
    }

    /// Delay loads of `source` (simulates a slow fetch)
    pub fn with_delay(mut self, source: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(source.into(), delay);
        self
    }

    /// Delay applied to sources without a specific delay
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    /// All loads requested so far, in call order
    pub fn calls(&self) -> Vec<(MediaKind, String)> {
        self.calls.lock().clone()
    }

    async fn simulate(&self, kind: MediaKind, source: &str) -> Result<(), MediaError> {
        self.calls.lock().push((kind, source.to_string()));

        let delay = self
            .delays
            .get(source)
            .copied()
            .unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match self.failures.get(source) {
            Some(failure) => Err(failure.clone().into_media_error(source)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MediaLoader for MockMediaLoader {
    async fn load_video(&self, source: &str) -> Result<VideoInfo, MediaError> {
        self.simulate(MediaKind::Video, source).await?;
        let container = if source.ends_with(".webm") {
            VideoContainer::WebM
        } else {
            VideoContainer::Mp4
        };
        Ok(VideoInfo {
            container,
            bytes: 1024,
        })
    }

    async fn read_screenshot(&self, source: &str) -> Result<ScreenshotInfo, MediaError> {
        self.simulate(MediaKind::Screenshot, source).await?;
        Ok(ScreenshotInfo {
            width: 1440,
            height: 900,
        })
    }
}
