//! Trace fixtures
//!
//! Writes trace JSON and media assets into a temporary directory laid out
//! like a static export: trace files at the top, assets under `public/`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;
use traceview::trace::{resolve, BasePath, RawTrace, TraceStore};

/// Steps `0..len`; even steps carry a clip, odd steps are screenshot-only.
pub fn steps(len: usize) -> Value {
    Value::Array(
        (0..len)
            .map(|i| {
                let mut step = json!({
                    "index": i,
                    "timestamp": format!("2025-06-01T12:00:{:02}Z", i),
                    "action": format!("Step {i} action"),
                    "reasoning": format!("Because of **reason {i}**"),
                    "screenshotPath": format!("screens/{i}.png"),
                });
                if i % 2 == 0 {
                    step["videoPath"] = json!(format!("videos/{i}.mp4"));
                }
                step
            })
            .collect(),
    )
}

/// A validated in-memory store, development base path.
pub fn store(len: usize) -> Arc<TraceStore> {
    store_with_base(len, &BasePath::none())
}

pub fn store_with_base(len: usize, base: &BasePath) -> Arc<TraceStore> {
    let raw = RawTrace::from_json_str(&steps(len).to_string()).expect("fixture trace parses");
    let resolved = resolve(raw, base).expect("fixture trace resolves");
    Arc::new(TraceStore::new(resolved).expect("fixture trace validates"))
}

/// A temporary export directory
///
/// Cleaned up when dropped.
pub struct TraceDir {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TraceDir {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().to_path_buf();
        Self { _dir: dir, path }
    }

    /// Directory resolved asset URLs map onto
    pub fn asset_root(&self) -> PathBuf {
        self.path.join("public")
    }

    pub fn write_trace(&self, name: &str, trace: &Value) -> PathBuf {
        self.write_raw(name, &trace.to_string())
    }

    pub fn write_raw(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path.join(name);
        std::fs::write(&path, contents).expect("Failed to write trace");
        path
    }

    /// Write a real PNG of the given size under the asset root
    pub fn write_png(&self, relative: &str, width: u32, height: u32) {
        let path = self.asset_path(relative);
        image::RgbImage::new(width, height)
            .save(&path)
            .expect("Failed to write png");
    }

    /// Write a file that sniffs as an MP4 container under the asset root
    pub fn write_mp4(&self, relative: &str) {
        let mut bytes = vec![0, 0, 0, 0x18];
        bytes.extend_from_slice(b"ftypmp42");
        bytes.extend_from_slice(&[0; 64]);
        std::fs::write(self.asset_path(relative), bytes).expect("Failed to write mp4");
    }

    /// Assets for every step of [`steps`]
    pub fn write_assets(&self, len: usize) {
        for i in 0..len {
            self.write_png(&format!("screens/{i}.png"), 320, 200);
            if i % 2 == 0 {
                self.write_mp4(&format!("videos/{i}.mp4"));
            }
        }
    }

    fn asset_path(&self, relative: &str) -> PathBuf {
        let path = self.asset_root().join(relative);
        create_parent(&path);
        path
    }
}

impl Default for TraceDir {
    fn default() -> Self {
        Self::new()
    }
}

fn create_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create asset dir");
    }
}
