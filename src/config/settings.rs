use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::trace::{BasePath, Environment};
use crate::ui::action::Action;
use crate::util::paths::config_path;
use crate::viewer::{PlaybackSettings, DEFAULT_STEP_INTERVAL};

use super::default_keys::default_keybindings;
use super::keys::{parse_key_notation, KeyContext, KeyParseError, KeybindingConfig};

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Default number of viewers that can be open at once
pub const DEFAULT_MAX_VIEWERS: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("playback.interval_ms must be greater than zero")]
    ZeroInterval,

    #[error("viewers.max must be greater than zero")]
    ZeroMaxViewers,

    #[error("Unknown action '{0}' in [keys]")]
    UnknownAction(String),

    #[error("Invalid key '{key}' for action '{action}': {source}")]
    InvalidKey {
        action: String,
        key: String,
        #[source]
        source: KeyParseError,
    },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Dwell time per step during auto-play
    pub step_interval: Duration,
    /// Deployment environment, decides whether asset paths get a prefix
    pub environment: Environment,
    /// Prefix used in production (None = the default production prefix)
    pub base_path: Option<String>,
    /// Directory resolved asset URLs are served from
    pub asset_root: PathBuf,
    /// Maximum number of viewers open at once
    pub max_viewers: usize,
    /// Keybinding configuration
    pub keybindings: KeybindingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            step_interval: DEFAULT_STEP_INTERVAL,
            environment: Environment::Development,
            base_path: None,
            asset_root: PathBuf::from("public"),
            max_viewers: DEFAULT_MAX_VIEWERS,
            keybindings: default_keybindings(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlPlaybackConfig {
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlDeploymentConfig {
    pub environment: Option<Environment>,
    pub base_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlAssetsConfig {
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlViewersConfig {
    pub max: Option<usize>,
}

/// TOML representation of keybinding configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlKeybindings {
    /// Viewer keybindings (`action = "key"` directly under `[keys]`)
    #[serde(flatten)]
    pub viewer: HashMap<String, String>,

    /// Seek prompt keybindings
    pub seek_prompt: Option<HashMap<String, String>>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub playback: Option<TomlPlaybackConfig>,
    pub deployment: Option<TomlDeploymentConfig>,
    pub assets: Option<TomlAssetsConfig>,
    pub viewers: Option<TomlViewersConfig>,
    pub keys: Option<TomlKeybindings>,
}

impl TomlKeybindings {
    /// Convert TOML keybindings to KeybindingConfig, collecting bad entries
    fn to_keybinding_config(&self, problems: &mut Vec<ConfigError>) -> KeybindingConfig {
        let mut config = KeybindingConfig::new();

        parse_context_bindings(&mut config, KeyContext::Viewer, &self.viewer, problems);
        if let Some(seek) = &self.seek_prompt {
            parse_context_bindings(&mut config, KeyContext::SeekPrompt, seek, problems);
        }

        config
    }
}

/// Parse context-specific keybindings
fn parse_context_bindings(
    config: &mut KeybindingConfig,
    context: KeyContext,
    bindings: &HashMap<String, String>,
    problems: &mut Vec<ConfigError>,
) {
    let context_map = config.context.entry(context).or_default();
    for (action_name, key_str) in bindings {
        let Some(action) = parse_action(action_name) else {
            problems.push(ConfigError::UnknownAction(action_name.clone()));
            continue;
        };
        match parse_key_notation(key_str) {
            Ok(combo) => {
                context_map.insert(combo, action);
            }
            Err(source) => problems.push(ConfigError::InvalidKey {
                action: action_name.clone(),
                key: key_str.clone(),
                source,
            }),
        }
    }
}

/// Parse an action name string into an Action
pub fn parse_action(name: &str) -> Option<Action> {
    match name {
        "quit" => Some(Action::Quit),

        // Playback
        "next_step" => Some(Action::NextStep),
        "prev_step" => Some(Action::PrevStep),
        "toggle_play" => Some(Action::TogglePlay),
        "first_step" => Some(Action::FirstStep),
        "last_step" => Some(Action::LastStep),
        "open_seek_prompt" | "seek" => Some(Action::OpenSeekPrompt),

        // Viewers
        "close_viewer" => Some(Action::CloseViewer),
        "next_viewer" => Some(Action::NextViewer),
        "prev_viewer" => Some(Action::PrevViewer),

        // Seek prompt
        "submit_seek" => Some(Action::SubmitSeek),
        "cancel_seek" => Some(Action::CancelSeek),
        "backspace" => Some(Action::Backspace),

        _ => {
            let n: u8 = name.strip_prefix("switch_to_viewer_")?.parse().ok()?;
            (1..=9).contains(&n).then_some(Action::SwitchToViewer(n))
        }
    }
}

impl Config {
    /// Load configuration from the data directory, merging with defaults.
    ///
    /// Never fails: problems are logged and the affected settings keep their
    /// defaults.
    pub fn load() -> Self {
        let config_file = config_path();

        // Create example config on first run
        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        Self::load_from(&config_file)
    }

    /// Lenient load from an explicit path.
    pub fn load_from(path: &Path) -> Self {
        let mut config = Config::default();

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return config,
            Err(source) => {
                let error = ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                };
                tracing::warn!(error = %error, "Using default configuration");
                return config;
            }
        };

        match toml::from_str::<TomlConfig>(&contents) {
            Ok(toml_config) => {
                for problem in config.merge(toml_config) {
                    tracing::warn!(path = %path.display(), error = %problem, "Ignoring config entry");
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Using default configuration");
            }
        }

        config
    }

    /// Strict parse: any problem in the file is an error.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let toml_config = toml::from_str::<TomlConfig>(contents)?;
        let mut config = Config::default();
        match config.merge(toml_config).into_iter().next() {
            Some(problem) => Err(problem),
            None => Ok(config),
        }
    }

    /// Apply a parsed file on top of the current values. Valid entries are
    /// applied even when others are rejected.
    fn merge(&mut self, toml_config: TomlConfig) -> Vec<ConfigError> {
        let mut problems = Vec::new();

        if let Some(playback) = toml_config.playback {
            match playback.interval_ms {
                Some(0) => problems.push(ConfigError::ZeroInterval),
                Some(ms) => self.step_interval = Duration::from_millis(ms),
                None => {}
            }
        }

        if let Some(deployment) = toml_config.deployment {
            if let Some(environment) = deployment.environment {
                self.environment = environment;
            }
            if deployment.base_path.is_some() {
                self.base_path = deployment.base_path;
            }
        }

        if let Some(root) = toml_config.assets.and_then(|a| a.root) {
            self.asset_root = root;
        }

        if let Some(viewers) = toml_config.viewers {
            match viewers.max {
                Some(0) => problems.push(ConfigError::ZeroMaxViewers),
                Some(max) => self.max_viewers = max,
                None => {}
            }
        }

        // Merge user keybindings on top of defaults
        if let Some(keys) = toml_config.keys {
            let user_bindings = keys.to_keybinding_config(&mut problems);
            self.keybindings.merge(user_bindings);
        }

        problems
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %e, "Failed to create config directory");
                return;
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to write default config");
        }
    }

    /// Serve from an explicit prefix. Implies a production deployment.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.environment = Environment::Production;
        self.base_path = Some(base_path.into());
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_asset_root(mut self, root: PathBuf) -> Self {
        self.asset_root = root;
        self
    }

    pub fn with_step_interval(mut self, interval: Duration) -> Self {
        self.step_interval = interval;
        self
    }

    /// The prefix every resolved asset path receives.
    pub fn base_path(&self) -> BasePath {
        BasePath::for_environment(self.environment, self.base_path.as_deref())
    }

    pub fn playback_settings(&self) -> PlaybackSettings {
        PlaybackSettings {
            interval: self.step_interval,
        }
    }
}
