use std::path::Path;

use super::error::TraceError;
use super::item::{RawTrace, TraceItem};
use super::resolver::{resolve, BasePath, ResolvedTrace};

/// Validated, read-only trace.
///
/// Step indices are dense and start at zero, so a step's index is also its
/// position and lookups are direct.
#[derive(Debug, Clone)]
pub struct TraceStore {
    title: Option<String>,
    subtitle: Option<String>,
    steps: Vec<TraceItem>,
}

impl TraceStore {
    pub fn new(trace: ResolvedTrace) -> Result<Self, TraceError> {
        validate(&trace.items)?;
        Ok(Self {
            title: trace.title,
            subtitle: trace.subtitle,
            steps: trace.items,
        })
    }

    /// Read, resolve and validate a trace file.
    pub fn load(path: &Path, base: &BasePath) -> Result<Self, TraceError> {
        let raw = RawTrace::from_path(path)?;
        let store = Self::new(resolve(raw, base)?)?;
        tracing::info!(
            path = %path.display(),
            steps = store.len(),
            "Loaded trace"
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a constructed store; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn step(&self, index: usize) -> Option<&TraceItem> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[TraceItem] {
        &self.steps
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }
}

fn validate(items: &[TraceItem]) -> Result<(), TraceError> {
    if items.is_empty() {
        return Err(TraceError::Empty);
    }

    let mut previous: Option<i64> = None;
    for (position, item) in items.iter().enumerate() {
        if item.screenshot_path.trim().is_empty() {
            return Err(TraceError::MissingScreenshot { position });
        }

        let index = item.index as i64;
        let expected = position as i64;
        match previous {
            Some(prev) if index == prev => {
                return Err(TraceError::DuplicateIndex { index, position });
            }
            Some(prev) if index < prev => {
                return Err(TraceError::NonMonotonicIndex {
                    index,
                    previous: prev,
                    position,
                });
            }
            _ if index != expected => {
                return Err(TraceError::IndexGap {
                    expected,
                    found: index,
                    position,
                });
            }
            _ => {}
        }
        previous = Some(index);
    }

    Ok(())
}
