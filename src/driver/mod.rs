//! Rendering driver: renders sitemaps, caches the resulting models and
//! delivers source changes to every cached model.

mod cache;
mod renderer;
mod workflow;

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use thiserror::Error;

use crate::component::{ComponentError, ComponentRef, ComponentType};
use crate::events::{EventAction, SubscriberRef, SubscriberRegistry, Subscribers};
use crate::i18n::TranslationProvider;
use crate::reference::{ReferenceError, ReferenceResolver, SitemapRegistry};
use crate::source::{
    ItemRegistry, ItemStateChanged, SourceEvent, ThingRegistry, ThingStatusChanged,
    SUBSCRIBED_EVENT_TYPES,
};
use crate::state::{ExecutionContext, StateDependencyChangeListener, StateError, DEFAULT_ICON_PATH};

pub use cache::{RenderingModel, RenderingModelCache};
pub use renderer::SitemapRenderer;
pub use workflow::RenderPass;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("Sitemap definition '{name}' not found")]
    DefinitionNotFound { name: String },

    #[error("Rendering of '{name}' produced a {kind}, expected a SITEMAP")]
    NotASitemap { name: String, kind: ComponentType },

    #[error("A {kind} cannot be used as a widget")]
    UnsupportedWidget { kind: ComponentType },

    #[error("Widget '{id}' of type {kind} needs an item or thing")]
    MissingSource { id: String, kind: ComponentType },

    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    State(#[from] StateError),
}

/// Builds the component tree of a sitemap.
///
/// The sitemap type shown in event topics belongs to the
/// [`SitemapEventFactory`](crate::events::SitemapEventFactory), not to the
/// transformer.
pub trait SitemapTransformer: Send + Sync {
    /// Extension of the definition files this transformer reads.
    fn file_extension(&self) -> &str;

    /// Build the tree of the sitemap named by `pass`, registering a state
    /// per component. Returns the root, a SITEMAP container.
    fn transform(&self, pass: &RenderPass) -> Result<ComponentRef, RenderError>;
}

/// Kind of change to a definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelChange {
    Added,
    Modified,
    Removed,
}

/// Receiver of definition file changes.
pub trait ModelChangeListener: Send + Sync {
    /// `model_name` is a file name such as `kitchen.sitemap`.
    fn model_changed(&self, model_name: &str, change: ModelChange);
}

pub struct SitemapRenderingDriver {
    cache: Arc<RenderingModelCache>,
    resolver: Arc<ReferenceResolver>,
    subscribers: SubscriberRegistry,
    sitemap_extensions: RwLock<HashSet<String>>,
    icon_path: String,
}

impl SitemapRenderingDriver {
    pub fn new(
        items: Arc<dyn ItemRegistry>,
        things: Arc<dyn ThingRegistry>,
        translations: Arc<dyn TranslationProvider>,
    ) -> Self {
        let cache = Arc::new(RenderingModelCache::new());
        let sitemaps: Arc<dyn SitemapRegistry> = cache.clone();
        let sitemaps: Weak<dyn SitemapRegistry> = Arc::downgrade(&sitemaps);
        let resolver = Arc::new(ReferenceResolver::new(items, things, sitemaps, translations));
        Self {
            cache,
            resolver,
            subscribers: SubscriberRegistry::new(),
            sitemap_extensions: RwLock::new(HashSet::new()),
            icon_path: DEFAULT_ICON_PATH.to_string(),
        }
    }

    /// Base path of icon URLs.
    pub fn with_icon_path(mut self, icon_path: impl Into<String>) -> Self {
        self.icon_path = icon_path.into();
        self
    }

    pub fn resolver(&self) -> &Arc<ReferenceResolver> {
        &self.resolver
    }

    pub fn cache(&self) -> &Arc<RenderingModelCache> {
        &self.cache
    }

    pub fn subscribers(&self) -> Subscribers {
        self.subscribers.view()
    }

    pub fn add_subscriber(&self, subscriber: SubscriberRef) {
        self.subscribers.add(subscriber);
    }

    pub fn remove_subscriber(&self, subscriber: &SubscriberRef) -> bool {
        self.subscribers.remove(subscriber)
    }

    /// Event types [`Self::receive`] handles.
    pub fn subscribed_event_types(&self) -> &'static [&'static str] {
        &SUBSCRIBED_EVENT_TYPES
    }

    /// Start rendering the sitemap `name`.
    pub fn create_workflow(&self, name: &str) -> RenderPass {
        let context = ExecutionContext::new(self.resolver.clone(), self.icon_path.clone());
        RenderPass::new(name, context, self.subscribers.view())
    }

    /// Run `transformer` over `pass` and cache the result under the pass
    /// name.
    ///
    /// Subscribers get LOADED, or RELOADED when the model replaces one
    /// already cached.
    pub fn render_sitemap(
        &self,
        pass: RenderPass,
        transformer: &dyn SitemapTransformer,
    ) -> Result<Arc<RenderingModel>, RenderError> {
        let name = pass.name().to_string();
        let sitemap = transformer.transform(&pass).inspect_err(|e| {
            tracing::error!(sitemap = %name, error = %e, "Sitemap rendering failed");
        })?;
        if sitemap.kind() != ComponentType::Sitemap {
            return Err(RenderError::NotASitemap {
                name,
                kind: sitemap.kind(),
            });
        }

        let model = Arc::new(pass.finish(sitemap));
        let previous = self.cache.put(&name, model.clone());
        self.sitemap_extensions
            .write()
            .insert(transformer.file_extension().to_string());

        let action = if previous.is_some() {
            EventAction::Reloaded
        } else {
            EventAction::Loaded
        };
        tracing::debug!(
            sitemap = %name,
            states = model.state().len(),
            action = %action,
            "Rendering of sitemap successful"
        );
        for subscriber in self.subscribers.snapshot() {
            subscriber.sitemap_changed(action, model.sitemap());
        }
        Ok(model)
    }

    pub fn get_rendering_model_from_cache(&self, name: &str) -> Option<Arc<RenderingModel>> {
        self.cache.get(name)
    }

    /// Deliver a source change to every cached model.
    pub fn receive(&self, event: &SourceEvent) {
        tracing::trace!(
            event_type = event.event_type(),
            models = self.cache.len(),
            "Delivering source event"
        );
        self.source_changed(event);
    }
}

impl StateDependencyChangeListener for SitemapRenderingDriver {
    fn item_state_changed(&self, event: &ItemStateChanged) {
        for model in self.cache.models() {
            model.state().item_state_changed(event);
        }
    }

    fn thing_status_changed(&self, event: &ThingStatusChanged) {
        for model in self.cache.models() {
            model.state().thing_status_changed(event);
        }
    }
}

impl ModelChangeListener for SitemapRenderingDriver {
    /// Any change to a definition invalidates its rendering model; the next
    /// request renders it again.
    fn model_changed(&self, model_name: &str, change: ModelChange) {
        let Some((name, extension)) = model_name.rsplit_once('.') else {
            return;
        };
        if !self.sitemap_extensions.read().contains(extension) {
            return;
        }
        if let Some(previous) = self.cache.remove(name) {
            tracing::debug!(model = %model_name, change = ?change, "Rendering model invalidated");
            for subscriber in self.subscribers.snapshot() {
                subscriber.sitemap_changed(EventAction::Removed, previous.sitemap());
            }
        }
    }
}

impl fmt::Debug for SitemapRenderingDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SitemapRenderingDriver")
            .field("cached", &self.cache.names())
            .field("subscribers", &self.subscribers)
            .field("icon_path", &self.icon_path)
            .finish()
    }
}
