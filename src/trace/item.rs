//! Trace data model and JSON loading.
//!
//! A trace file is either a bare array of steps or an object wrapping the
//! steps together with an optional title. Step fields arrive in camelCase;
//! snake_case aliases are accepted as well. Anything not modelled explicitly
//! is kept in `details` so collaborator-specific fields survive the load.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::TraceError;

/// One step exactly as it appeared in the source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTraceItem {
    #[serde(default)]
    pub index: Option<i64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default, alias = "screenshot_path", alias = "screenshot")]
    pub screenshot_path: Option<String>,
    #[serde(default, alias = "video_path", alias = "video")]
    pub video_path: Option<String>,
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTraceDocument {
    List(Vec<RawTraceItem>),
    Wrapped {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        subtitle: Option<String>,
        #[serde(alias = "items", alias = "trace")]
        steps: Vec<RawTraceItem>,
    },
}

/// A trace as loaded from disk, before any path has been resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTrace {
    pub(crate) title: Option<String>,
    pub(crate) subtitle: Option<String>,
    pub(crate) items: Vec<RawTraceItem>,
}

impl RawTrace {
    pub fn new(items: Vec<RawTraceItem>) -> Self {
        Self {
            title: None,
            subtitle: None,
            items,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, TraceError> {
        let document: RawTraceDocument = serde_json::from_str(json)?;
        Ok(match document {
            RawTraceDocument::List(items) => Self::new(items),
            RawTraceDocument::Wrapped {
                title,
                subtitle,
                steps,
            } => Self {
                title,
                subtitle,
                items: steps,
            },
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, TraceError> {
        let contents = fs::read_to_string(path).map_err(|source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn items(&self) -> &[RawTraceItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One recorded step with resolved asset paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceItem {
    pub index: usize,
    pub timestamp: Option<String>,
    pub action: String,
    pub reasoning: Option<String>,
    pub screenshot_path: String,
    pub video_path: Option<String>,
    pub details: BTreeMap<String, Value>,
}

impl TraceItem {
    pub fn has_video(&self) -> bool {
        self.video_path.is_some()
    }

    /// Timestamp rendered for display.
    ///
    /// RFC 3339 timestamps are shown as local wall-clock time; anything else is
    /// shown verbatim.
    pub fn display_timestamp(&self) -> Option<String> {
        let raw = self.timestamp.as_deref()?;
        match chrono::DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => Some(
                ts.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
            ),
            Err(_) => Some(raw.to_string()),
        }
    }
}
