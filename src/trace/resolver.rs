//! Asset path resolution for static deployments.
//!
//! Media paths in a trace file are written relative to the site root. When the
//! site is exported under a prefix (production serves from `/cua_demo`), every
//! screenshot and video reference has to carry that prefix exactly once.
//! [`resolve`] consumes a [`RawTrace`] and yields a [`ResolvedTrace`], so an
//! already-resolved trace cannot be fed through the resolver a second time.

use std::fmt;

use serde::Deserialize;

use super::error::TraceError;
use super::item::{RawTrace, RawTraceItem, TraceItem};

/// Base path used by production exports.
pub const DEFAULT_PRODUCTION_BASE_PATH: &str = "/cua_demo";

/// Deployment environment the viewer is running under.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// URL prefix under which static assets are served.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasePath(String);

impl BasePath {
    /// The empty base path used in development.
    pub fn none() -> Self {
        Self(String::new())
    }

    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Self::none();
        }
        if trimmed.starts_with('/') {
            Self(trimmed.to_string())
        } else {
            Self(format!("/{trimmed}"))
        }
    }

    pub fn for_environment(environment: Environment, configured: Option<&str>) -> Self {
        match environment {
            Environment::Development => Self::none(),
            Environment::Production => {
                Self::new(configured.unwrap_or(DEFAULT_PRODUCTION_BASE_PATH))
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Prefix a single asset path.
    pub fn apply(&self, path: &str) -> String {
        if is_external(path) {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.0, path)
        } else {
            format!("{}/{}", self.0, path)
        }
    }

    /// Inverse of [`BasePath::apply`] for root-relative URLs: the path
    /// relative to the deployment root, without a leading `/`.
    pub fn strip<'a>(&self, url: &'a str) -> &'a str {
        let rest = if self.0.is_empty() {
            url
        } else {
            match url.strip_prefix(self.0.as_str()) {
                Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
                _ => url,
            }
        };
        rest.trim_start_matches('/')
    }
}

impl fmt::Display for BasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "/")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Paths with a URL scheme, or protocol-relative `//host/...` paths, point
/// outside the deployment and are left alone.
fn is_external(path: &str) -> bool {
    ["http://", "https://", "data:", "//"]
        .iter()
        .any(|scheme| path.starts_with(scheme))
}

/// A trace whose asset paths are valid under the deployment root.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTrace {
    pub(crate) title: Option<String>,
    pub(crate) subtitle: Option<String>,
    pub(crate) items: Vec<TraceItem>,
    pub(crate) base_path: BasePath,
}

impl ResolvedTrace {
    pub fn items(&self) -> &[TraceItem] {
        &self.items
    }

    pub fn base_path(&self) -> &BasePath {
        &self.base_path
    }
}

/// Resolve every screenshot and video path of `raw` against `base`.
pub fn resolve(raw: RawTrace, base: &BasePath) -> Result<ResolvedTrace, TraceError> {
    let items = raw
        .items
        .into_iter()
        .enumerate()
        .map(|(position, item)| resolve_item(position, item, base))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        base_path = %base,
        steps = items.len(),
        "Resolved trace asset paths"
    );

    Ok(ResolvedTrace {
        title: raw.title,
        subtitle: raw.subtitle,
        items,
        base_path: base.clone(),
    })
}

fn resolve_item(
    position: usize,
    item: RawTraceItem,
    base: &BasePath,
) -> Result<TraceItem, TraceError> {
    let index = item.index.ok_or(TraceError::MissingIndex { position })?;

    let action = item
        .action
        .filter(|action| !action.trim().is_empty())
        .ok_or(TraceError::MissingAction { position })?;

    let screenshot = item
        .screenshot_path
        .filter(|path| !path.trim().is_empty())
        .ok_or(TraceError::MissingScreenshot { position })?;

    let video_path = item
        .video_path
        .filter(|path| !path.trim().is_empty())
        .map(|path| base.apply(path.trim()));

    // Negative indices cannot be valid positions; the store reports them as
    // out of order against the expected dense sequence.
    let index = usize::try_from(index).map_err(|_| TraceError::IndexGap {
        expected: position as i64,
        found: index,
        position,
    })?;

    Ok(TraceItem {
        index,
        timestamp: item.timestamp,
        action,
        reasoning: item.reasoning.filter(|r| !r.trim().is_empty()),
        screenshot_path: base.apply(screenshot.trim()),
        video_path,
        details: item.details,
    })
}
