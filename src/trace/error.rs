use std::path::PathBuf;

use thiserror::Error;

/// Reasons a trace is rejected at load time.
///
/// Positions are 0-based offsets into the step list as it appeared in the
/// source file, which is not necessarily the step's declared `index`.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Failed to read trace {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse trace JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Trace contains no steps")]
    Empty,

    #[error("Step at position {position} has no index")]
    MissingIndex { position: usize },

    #[error("Step at position {position} has no action label")]
    MissingAction { position: usize },

    #[error("Step at position {position} has no screenshot path")]
    MissingScreenshot { position: usize },

    #[error("Duplicate step index {index} at position {position}")]
    DuplicateIndex { index: i64, position: usize },

    #[error("Step index {index} at position {position} does not follow {previous}")]
    NonMonotonicIndex {
        index: i64,
        previous: i64,
        position: usize,
    },

    #[error("Expected step index {expected} at position {position}, found {found}")]
    IndexGap {
        expected: i64,
        found: i64,
        position: usize,
    },
}

impl TraceError {
    /// Short label used in the "trace unavailable" view and `check` output.
    pub fn kind(&self) -> &'static str {
        match self {
            TraceError::Io { .. } => "unreadable",
            TraceError::Parse(_) => "malformed json",
            TraceError::Empty => "empty trace",
            TraceError::MissingIndex { .. }
            | TraceError::MissingAction { .. }
            | TraceError::MissingScreenshot { .. } => "missing field",
            TraceError::DuplicateIndex { .. }
            | TraceError::NonMonotonicIndex { .. }
            | TraceError::IndexGap { .. } => "bad step order",
        }
    }
}
