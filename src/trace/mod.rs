//! Recorded traces: loading, asset path resolution and validation

pub mod error;
pub mod item;
pub mod resolver;
pub mod store;

pub use error::TraceError;
pub use item::{RawTrace, RawTraceItem, TraceItem};
pub use resolver::{resolve, BasePath, Environment, ResolvedTrace, DEFAULT_PRODUCTION_BASE_PATH};
pub use store::TraceStore;
