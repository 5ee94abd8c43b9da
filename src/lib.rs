pub mod config;
pub mod media;
pub mod trace;
pub mod ui;
pub mod util;
pub mod viewer;

pub use config::Config;
pub use media::{FsMediaLoader, MediaDispatcher, MediaLoader, MediaSynchronizer};
pub use trace::{resolve, BasePath, Environment, RawTrace, TraceError, TraceItem, TraceStore};
pub use ui::App;
pub use viewer::{
    PlayMode, PlaybackController, PlaybackError, Viewer, ViewerId, ViewerInstance, ViewerRegistry,
};
