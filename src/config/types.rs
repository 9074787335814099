use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::events::bus::DEFAULT_CHANNEL_CAPACITY;
use crate::events::factory::{DEFAULT_SITEMAP_TYPE, DEFAULT_TOPIC_ROOT};
use crate::state::DEFAULT_ICON_PATH;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rendering: RenderingConfig,
    #[serde(default)]
    pub events: EventsConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How sitemaps are rendered and addressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderingConfig {
    /// Sitemap type in event topics (default: "smarthome").
    #[serde(default = "default_sitemap_type")]
    pub sitemap_type: String,
    /// Topic prefix of rendering events (default: "smarthome/sitemaps").
    #[serde(default = "default_topic_root")]
    pub topic_root: String,
    /// Base path of icon URLs (default: "/icon").
    #[serde(default = "default_icon_path")]
    pub icon_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Events buffered per bus receiver (default: 256).
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

/// Where definitions and translations are read from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default)]
    pub sitemaps_dir: Option<PathBuf>,
    #[serde(default)]
    pub translations_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG` (default: "info").
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_sitemap_type() -> String {
    DEFAULT_SITEMAP_TYPE.to_string()
}

fn default_topic_root() -> String {
    DEFAULT_TOPIC_ROOT.to_string()
}

fn default_icon_path() -> String {
    DEFAULT_ICON_PATH.to_string()
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            sitemap_type: default_sitemap_type(),
            topic_root: default_topic_root(),
            icon_path: default_icon_path(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}
