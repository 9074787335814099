use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/sitemap-render/config.toml` on Unix,
    /// or the equivalent via `dirs::config_dir()` elsewhere.
    /// Falls back to the current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("sitemap-render").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - Otherwise parses it as TOML and validates it.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The sitemap type is not empty
    /// - The topic root does not end with `/`
    /// - The event channel holds at least one event
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rendering.sitemap_type.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "rendering.sitemap_type must not be empty".to_string(),
            });
        }

        let root = &self.rendering.topic_root;
        if root.is_empty() || root.ends_with('/') {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "rendering.topic_root '{}' must be non-empty and have no trailing '/'",
                    root
                ),
            });
        }

        if self.events.channel_capacity == 0 {
            return Err(ConfigError::ValidationError {
                message: "events.channel_capacity must be positive".to_string(),
            });
        }

        Ok(())
    }
}
