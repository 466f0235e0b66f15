//! Configuration management for menugrab.
//!
//! TOML files with serde defaults, so an empty file (or no file at all) is a
//! valid configuration. API keys may reference environment variables with
//! `${VAR}` syntax; expansion happens at load time.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to expand '{value}': {reason}")]
    Expand { value: String, reason: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sandbox: SandboxSettings,
    pub extract: ExtractSettings,
}

/// Browser-sandbox API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SandboxSettings {
    /// Base URL of the sandbox HTTP API.
    pub base_url: String,
    /// API key; supports `${ENV_VAR}` expansion.
    pub api_key: Option<String>,
}

impl Default for SandboxSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.scrapybara.com".to_string(),
            api_key: None,
        }
    }
}

/// Extraction-engine tuning knobs.
///
/// Every wait the engine performs is bounded by one of these values; there is
/// no unbounded wait anywhere in a run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    /// Scroll step used while expanding the virtualized list, in pixels.
    pub increment_px: f64,
    /// Settle delay after each scroll or section jump, in milliseconds.
    pub settle_delay_ms: u64,
    /// Maximum scroll rounds before stabilization is declared failed.
    pub max_scroll_rounds: u32,
    /// How long to wait for an item's detail overlay to appear.
    pub popup_wait_ms: u64,
    /// Polling interval for condition waits.
    pub poll_interval_ms: u64,
    /// Quiet window for the post-navigation network-idle wait.
    pub network_idle_quiet_ms: u64,
    /// Hard bound on the network-idle wait.
    pub network_idle_timeout_ms: u64,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            increment_px: 1000.0,
            settle_delay_ms: 500,
            max_scroll_rounds: 60,
            popup_wait_ms: 5000,
            poll_interval_ms: 100,
            network_idle_quiet_ms: 750,
            network_idle_timeout_ms: 15000,
        }
    }
}

impl ExtractSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn popup_wait(&self) -> Duration {
        Duration::from_millis(self.popup_wait_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Config = toml::from_str(&content)?;
        config.expand()?;
        Ok(config)
    }

    /// Load from the given path, the default location, or fall back to
    /// built-in defaults when no file exists.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default = Self::default_path();
        if default.exists() {
            Self::load(&default)
        } else {
            Ok(Self::default())
        }
    }

    /// Default config file location under the user config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("menugrab")
            .join("config.toml")
    }

    /// Expand `${ENV_VAR}` references in credential fields.
    fn expand(&mut self) -> Result<(), ConfigError> {
        if let Some(key) = &self.sandbox.api_key {
            let expanded = shellexpand::env(key).map_err(|e| ConfigError::Expand {
                value: key.clone(),
                reason: e.to_string(),
            })?;
            self.sandbox.api_key = Some(expanded.into_owned());
        }
        Ok(())
    }
}
