//! Locations under the traceview data directory

use std::path::PathBuf;
use std::sync::OnceLock;

/// Global storage for custom data directory path
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Initialize the data directory, `~/.traceview` unless overridden.
/// Call before any other function in this module.
pub fn init_data_dir(custom_path: Option<PathBuf>) {
    let path = custom_path.unwrap_or_else(default_data_dir);
    if DATA_DIR.set(path.clone()).is_err() {
        let existing = DATA_DIR
            .get()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        tracing::debug!(
            path = %path.display(),
            existing = %existing,
            "Data directory already initialized"
        );
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".traceview"))
        .unwrap_or_else(|| PathBuf::from(".traceview"))
}

/// The data directory set by [`init_data_dir`], or the default
pub fn data_dir() -> PathBuf {
    DATA_DIR.get().cloned().unwrap_or_else(default_data_dir)
}

/// Get the logs directory (~/.traceview/logs)
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Get the default log file path (~/.traceview/logs/traceview.log)
pub fn log_file_path() -> PathBuf {
    logs_dir().join("traceview.log")
}

/// Get the config file path (~/.traceview/config.toml)
pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}
