use std::sync::Arc;

use dashmap::DashMap;

use crate::component::ComponentRef;
use crate::reference::SitemapRegistry;
use crate::state::RenderingModelState;

/// A rendered sitemap and its live state.
#[derive(Debug)]
pub struct RenderingModel {
    sitemap: ComponentRef,
    state: RenderingModelState,
}

impl RenderingModel {
    pub fn new(sitemap: ComponentRef, state: RenderingModelState) -> Self {
        Self { sitemap, state }
    }

    pub fn sitemap(&self) -> &ComponentRef {
        &self.sitemap
    }

    pub fn state(&self) -> &RenderingModelState {
        &self.state
    }
}

/// Rendering models keyed by sitemap name.
#[derive(Debug, Default)]
pub struct RenderingModelCache {
    models: DashMap<String, Arc<RenderingModel>>,
}

impl RenderingModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<RenderingModel>> {
        self.models.get(name).map(|entry| entry.value().clone())
    }

    /// Store a model, returning the one it replaces.
    pub fn put(&self, name: &str, model: Arc<RenderingModel>) -> Option<Arc<RenderingModel>> {
        self.models.insert(name.to_string(), model)
    }

    pub fn remove(&self, name: &str) -> Option<Arc<RenderingModel>> {
        self.models.remove(name).map(|(_, model)| model)
    }

    /// Snapshot of the cached models.
    pub fn models(&self) -> Vec<Arc<RenderingModel>> {
        self.models.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.models.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl SitemapRegistry for RenderingModelCache {
    fn get_sitemap(&self, name: &str) -> Option<ComponentRef> {
        self.get(name).map(|model| model.sitemap().clone())
    }
}
