//! Sitemap definitions in TOML and the transformer that renders them.

mod model;
mod store;
mod transformer;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

pub use model::{FrameDefinition, MappingDefinition, SitemapDefinition, StyleRule, WidgetDefinition};
pub use store::DefinitionStore;
pub use transformer::DefinitionTransformer;

/// Extension of sitemap definition files.
pub const FILE_EXTENSION: &str = "sitemap";

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Failed to read sitemap definition '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse sitemap definition '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Cannot derive a sitemap name from '{path}'")]
    InvalidFileName { path: PathBuf },
}

/// Source of sitemap definitions by name.
pub trait SitemapDefinitionProvider: Send + Sync {
    fn get_definition(&self, name: &str) -> Option<Arc<SitemapDefinition>>;

    /// Names of all known definitions, sorted.
    fn names(&self) -> Vec<String>;
}
