//! Media loading seam.
//!
//! A [`MediaLoader`] is the asynchronous resource fetch behind the video and
//! screenshot surfaces. [`FsMediaLoader`] serves resolved URLs from a static
//! export directory; tests use [`crate::media::mock::MockMediaLoader`].

use std::fmt;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncReadExt;

use crate::trace::BasePath;

/// Errors that degrade a single media surface.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to decode asset: {0}")]
    Decode(String),

    #[error("Unsupported media format: {0}")]
    UnsupportedFormat(String),

    #[error("Remote assets are not fetched: {0}")]
    Remote(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    Screenshot,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => f.write_str("video"),
            MediaKind::Screenshot => f.write_str("screenshot"),
        }
    }
}

/// Video containers the static export bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoContainer {
    Mp4,
    WebM,
}

impl VideoContainer {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoContainer::Mp4 => "mp4",
            VideoContainer::WebM => "webm",
        }
    }

    /// Identify a container from the first bytes of a file.
    pub fn sniff(header: &[u8]) -> Option<Self> {
        if header.len() >= 8 && &header[4..8] == b"ftyp" {
            Some(VideoContainer::Mp4)
        } else if header.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
            Some(VideoContainer::WebM)
        } else {
            None
        }
    }

    fn from_extension(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("mp4") => Some(VideoContainer::Mp4),
            Some("webm") => Some(VideoContainer::WebM),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoInfo {
    pub container: VideoContainer,
    pub bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenshotInfo {
    pub width: u32,
    pub height: u32,
}

/// What a surface reports once it can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaInfo {
    Video(VideoInfo),
    Screenshot(ScreenshotInfo),
}

#[async_trait]
pub trait MediaLoader: Send + Sync {
    /// Load a video clip far enough to know it can be played.
    async fn load_video(&self, source: &str) -> Result<VideoInfo, MediaError>;

    /// Load a screenshot far enough to know its dimensions.
    async fn read_screenshot(&self, source: &str) -> Result<ScreenshotInfo, MediaError>;
}

/// Serves resolved asset URLs from a directory on disk.
///
/// The base path is stripped from each URL and the remainder is looked up
/// under `root`, mirroring how a static host maps `/cua_demo/x.png` onto the
/// exported `x.png`.
#[derive(Debug, Clone)]
pub struct FsMediaLoader {
    root: PathBuf,
    base_path: BasePath,
}

impl FsMediaLoader {
    pub fn new(root: impl Into<PathBuf>, base_path: BasePath) -> Self {
        Self {
            root: root.into(),
            base_path,
        }
    }

    /// Map a resolved URL onto a file under the asset root.
    pub fn locate(&self, source: &str) -> Result<PathBuf, MediaError> {
        if source.contains("://") || source.starts_with("data:") || source.starts_with("//") {
            return Err(MediaError::Remote(source.to_string()));
        }

        let relative = Path::new(self.base_path.strip(source));
        // Reject anything that would escape the asset root
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(MediaError::NotFound(source.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl MediaLoader for FsMediaLoader {
    async fn load_video(&self, source: &str) -> Result<VideoInfo, MediaError> {
        let path = self.locate(source)?;
        let mut file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MediaError::NotFound(source.to_string()));
            }
            Err(e) => return Err(MediaError::Io(e)),
        };
        let bytes = file.metadata().await?.len();

        let mut header = [0u8; 12];
        let mut filled = 0;
        while filled < header.len() {
            let n = file.read(&mut header[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        match VideoContainer::sniff(&header[..filled]) {
            Some(container) => Ok(VideoInfo { container, bytes }),
            None if VideoContainer::from_extension(&path).is_some() => Err(MediaError::Decode(
                format!("{source}: unrecognized container header"),
            )),
            None => Err(MediaError::UnsupportedFormat(source.to_string())),
        }
    }

    async fn read_screenshot(&self, source: &str) -> Result<ScreenshotInfo, MediaError> {
        let path = self.locate(source)?;
        if !tokio::fs::try_exists(&path).await? {
            return Err(MediaError::NotFound(source.to_string()));
        }

        let source_owned = source.to_string();
        let (width, height) = tokio::task::spawn_blocking(move || image::image_dimensions(&path))
            .await
            .map_err(|e| MediaError::Io(std::io::Error::other(e)))?
            .map_err(|e| MediaError::Decode(format!("{source_owned}: {e}")))?;

        Ok(ScreenshotInfo { width, height })
    }
}
