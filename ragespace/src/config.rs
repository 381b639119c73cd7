//! Configuration for ragespace.
//!
//! One TOML file at `$XDG_CONFIG_HOME/ragespace/config.toml` (falling back
//! to `~/.config/ragespace/config.toml`). Everything is optional; a missing
//! or malformed file is a soft failure that yields defaults, reported to
//! stderr before the terminal is initialised. Config never aborts startup.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level config file shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme name resolved by `Theme::from_name`. Defaults to "ember".
    pub theme: Option<String>,
    /// Optional cloud account/sync settings.
    pub cloud: CloudConfig,
}

/// The `[cloud]` table.
///
/// Disabled by default; when disabled the cloud worker thread is never
/// spawned and the app runs purely local. `base_url` must be set for
/// `enabled = true` to have any effect.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub enabled: bool,
    /// Service root, e.g. `https://sync.example.com`.
    pub base_url: String,
    /// Account credentials for the startup login.
    pub email: String,
    pub password: String,
    /// Register the account on startup before logging in. Safe to leave on:
    /// a rejected registration falls through to a plain login.
    pub auto_register: bool,
}

impl CloudConfig {
    /// True when the worker should be spawned at startup.
    pub fn active(&self) -> bool {
        self.enabled && !self.base_url.is_empty()
    }
}

/// Returns the path to the ragespace config file.
///
/// Prefers `$XDG_CONFIG_HOME/ragespace/config.toml`; falls back to
/// `~/.config/ragespace/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("ragespace").join("config.toml")
}

/// Loads the config, defaulting on any failure.
///
/// Returns `Config::default()` if the file does not exist or cannot be
/// parsed. Never panics — parse errors are printed to stderr and the app
/// continues with defaults.
pub fn load() -> Config {
    let path = config_path();
    let raw = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(_) => return Config::default(),
    };
    match toml::from_str(&raw) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ragespace: config parse error in {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// The theme name to use, honoring the config override.
pub fn theme_name(config: &Config) -> &str {
    config.theme.as_deref().unwrap_or("ember")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.theme.is_none());
        assert!(!config.cloud.active());
        assert_eq!(theme_name(&config), "ember");
    }

    #[test]
    fn cloud_requires_base_url() {
        let config: Config = toml::from_str(
            "theme = \"dark\"\n[cloud]\nenabled = true\n",
        )
        .unwrap();
        assert_eq!(theme_name(&config), "dark");
        // enabled without a base_url stays inactive
        assert!(!config.cloud.active());

        let config: Config = toml::from_str(
            "[cloud]\nenabled = true\nbase_url = \"https://sync.example.com\"\n",
        )
        .unwrap();
        assert!(config.cloud.active());
    }
}
