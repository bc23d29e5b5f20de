//! Configuration module for tablib
//!
//! Preferences are stored in `<config_dir>/tablib/config.toml`. Any key can
//! be overridden from the environment with a `TABLIB_` prefix, using `__` to
//! reach into tables (`TABLIB_OPTIMIZE__MAX_TABS=20`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::app::{OpenMode, ViewMode};
use crate::keybinds::KeybindConfig;
use crate::links::LinkFormat;
use crate::notify::{ChangeSource, NotifyError, Subscription};
use crate::optimize::Thresholds;
use crate::search::SearchMode;
use crate::ui::ToastQueue;

const ENV_PREFIX: &str = "TABLIB";

/// Change-notification settings
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct NotifyConfig {
    /// Fixed delay before reconnecting a dropped subscription
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

const fn default_reconnect_delay_ms() -> u64 {
    1000
}

const fn default_toast_ttl_secs() -> u64 {
    3
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TablibConfig {
    /// Fuzzy or substring matching
    #[serde(default)]
    pub search_mode: SearchMode,

    /// Row density of the tab list
    #[serde(default)]
    pub view_mode: ViewMode,

    /// Show urls even in compact view
    #[serde(default)]
    pub show_url_in_compact: bool,

    /// Default format for copied links
    #[serde(default)]
    pub copy_format: LinkFormat,

    /// Where pasted links open by default
    #[serde(default)]
    pub open_mode: OpenMode,

    /// Seconds a toast stays visible
    #[serde(default = "default_toast_ttl_secs")]
    pub toast_ttl_secs: u64,

    #[serde(default)]
    pub optimize: Thresholds,

    #[serde(default)]
    pub notify: NotifyConfig,

    #[serde(default)]
    pub keybinds: KeybindConfig,
}

impl Default for TablibConfig {
    fn default() -> Self {
        Self {
            search_mode: SearchMode::default(),
            view_mode: ViewMode::default(),
            show_url_in_compact: false,
            copy_format: LinkFormat::default(),
            open_mode: OpenMode::default(),
            toast_ttl_secs: default_toast_ttl_secs(),
            optimize: Thresholds::default(),
            notify: NotifyConfig::default(),
            keybinds: KeybindConfig::default(),
        }
    }
}

impl TablibConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("tablib").join("config.toml"))
    }

    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            log::info!("Created default config at {}", config_path.display());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file plus `TABLIB_*` overrides
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or a value has the
    /// wrong type.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env(path, Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load_with_env(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.to_path_buf()).format(FileFormat::Toml).required(false))
            .add_source(env)
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Same as [`save`](Self::save).
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        fs::write(path, self.to_toml()?)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Render as TOML
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))
    }

    #[must_use]
    pub const fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.notify.reconnect_delay_ms)
    }

    #[must_use]
    pub const fn toast_ttl(&self) -> Duration {
        Duration::from_secs(self.toast_ttl_secs)
    }

    /// Toast sink whose messages expire after `toast_ttl_secs`
    #[must_use]
    pub fn toast_queue(&self) -> ToastQueue {
        ToastQueue::with_ttl(self.toast_ttl())
    }

    /// Subscribe to `source`, reconnecting after `notify.reconnect_delay_ms`
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Spawn` if the worker thread cannot be created.
    pub fn subscribe<S: ChangeSource>(&self, source: S) -> Result<Subscription, NotifyError> {
        Subscription::start(source, self.reconnect_delay())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env() -> Environment {
        Environment::with_prefix(ENV_PREFIX).source(Some(config::Map::new()))
    }

    fn env(pairs: &[(&str, &str)]) -> Environment {
        let map = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn test_default_config() {
        let config = TablibConfig::default();
        assert_eq!(config.search_mode, SearchMode::Fuzzy);
        assert_eq!(config.optimize, Thresholds::default());
        assert_eq!(config.reconnect_delay(), Duration::from_secs(1));
        assert_eq!(config.toast_ttl(), Duration::from_secs(3));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = TablibConfig::default();
        config.copy_format = LinkFormat::Markdown;
        config.open_mode = OpenMode::CurrentWindow;
        config.optimize = Thresholds::new(3, 12).unwrap();
        config.save_to(&path).unwrap();

        let loaded = TablibConfig::load_with_env(&path, no_env()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "view_mode = \"cozy\"\n\n[optimize]\nmax_tabs = 20\n\n[keybinds]\nselect_all = \"none\"\n",
        )
        .unwrap();

        let config = TablibConfig::load_with_env(&path, no_env()).unwrap();
        assert_eq!(config.view_mode, ViewMode::Cozy);
        assert_eq!(config.optimize.min_tabs(), 5);
        assert_eq!(config.optimize.max_tabs(), 20);
        assert_eq!(config.copy_format, LinkFormat::Plain);
        assert!(config.keybinds.is_disabled("select_all"));
        assert_eq!(config.keybinds.get("focus_search"), vec!["ctrl-f"]);
    }

    #[test]
    fn test_missing_file_is_defaults() {
        let dir = TempDir::new().unwrap();
        let config = TablibConfig::load_with_env(&dir.path().join("absent.toml"), no_env()).unwrap();
        assert_eq!(config, TablibConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "search_mode = \"fuzzy\"\n").unwrap();

        let config = TablibConfig::load_with_env(
            &path,
            env(&[
                ("TABLIB_SEARCH_MODE", "substring"),
                ("TABLIB_OPTIMIZE__MAX_TABS", "30"),
            ]),
        )
        .unwrap();
        assert_eq!(config.search_mode, SearchMode::Substring);
        assert_eq!(config.optimize.max_tabs(), 30);
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[optimize]\nmin_tabs = 10\nmax_tabs = 4\n").unwrap();

        assert!(TablibConfig::load_with_env(&path, no_env()).is_err());
    }

    #[test]
    fn test_zero_thresholds_fall_back_to_defaults() {
        let config: TablibConfig = toml::from_str("[optimize]\nmin_tabs = 0\nmax_tabs = 0\n").unwrap();
        assert_eq!(config.optimize, Thresholds::default());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[optimize]\nmax_tabs = 0\n").unwrap();
        let loaded = TablibConfig::load_with_env(&path, no_env()).unwrap();
        assert_eq!(loaded.optimize.max_tabs(), 15);
    }

    #[test]
    fn test_toast_queue_uses_configured_ttl() {
        use crate::ui::OutputWriter;

        let mut config = TablibConfig::default();
        config.toast_ttl_secs = 0;
        let toasts = config.toast_queue();
        toasts.error("Failed to close tabs");
        assert!(toasts.is_empty());
        assert_eq!(toasts.history(), vec!["Failed to close tabs"]);

        let toasts = TablibConfig::default().toast_queue();
        toasts.error("Failed to close tabs");
        assert_eq!(toasts.len(), 1);
    }

    #[test]
    fn test_subscribe_retries_at_configured_delay() {
        use crate::notify::ChannelSource;
        use std::time::Instant;

        let mut config = TablibConfig::default();
        config.notify.reconnect_delay_ms = 10;
        let (source, feed) = ChannelSource::new();
        let _subscription = config.subscribe(source).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while feed.attempts() < 3 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(feed.attempts() >= 3);
    }

    #[test]
    fn test_unknown_format_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "copy_format = \"rtf\"\n").unwrap();

        assert!(TablibConfig::load_with_env(&path, no_env()).is_err());
    }
}
