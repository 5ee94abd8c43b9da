//! Media surfaces: loading, synchronization and load dispatch

pub mod dispatch;
pub mod loader;
pub mod mock;
pub mod sync;

pub use dispatch::MediaDispatcher;
pub use loader::{
    FsMediaLoader, MediaError, MediaInfo, MediaKind, MediaLoader, ScreenshotInfo, VideoContainer,
    VideoInfo,
};
pub use mock::{MockFailure, MockMediaLoader};
pub use sync::{
    LoadOutcome, LoadRequest, MediaSynchronizer, ScreenshotSurface, SurfaceState, VideoPlayback,
    VideoSurface,
};
