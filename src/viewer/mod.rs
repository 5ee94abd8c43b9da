//! Trace viewers: per-instance playback state and its wiring to media

pub mod controller;
pub mod events;
pub mod instance;
pub mod registry;
pub mod state;

pub use controller::{PlaybackController, PlaybackError, DEFAULT_STEP_INTERVAL};
pub use events::PlaybackEvent;
pub use instance::{PlaybackSettings, Viewer, ViewerContent, ViewerInstance};
pub use registry::{RegistryError, ViewerRegistry};
pub use state::{PlayMode, ViewerId, ViewerState};
