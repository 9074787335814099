//! Configuration: TOML file under the user config directory, defaults for
//! everything that is missing.

pub mod loader;
pub mod types;

pub use loader::ConfigError;
pub use types::{Config, EventsConfig, LoggingConfig, PathsConfig, RenderingConfig};
