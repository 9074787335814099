//! Live rendering state: per-component recompute, diff and notify.
//!
//! Item and thing change events reach every [`ComponentState`] through its
//! [`RenderingModelState`]. A state ignores changes to sources it does not
//! depend on. Otherwise it recomputes under the scope lock of its
//! [`ExecutionContext`], which is shared by all states of one rendering
//! model, so recomputes of one model never interleave.

mod component;
pub mod convert;
mod model;

use std::sync::Arc;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use thiserror::Error;

use crate::component::ComponentRef;
use crate::reference::{ReferenceResolver, ValueReference};
use crate::source::{ItemStateChanged, SourceEvent, ThingStatusChanged};

pub use component::{ComponentState, Dependencies};
pub use model::RenderingModelState;

pub const DEFAULT_ICON_PATH: &str = "/icon";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    #[error("Atom '{id}' has no data expression")]
    MissingDataExpression { id: String },

    #[error("Container '{id}' derives its data and takes no data expression")]
    UnexpectedDataExpression { id: String },

    #[error("Component '{id}' depends on a reference of type NONE")]
    UnboundReference { id: String },
}

/// Receiver of source change events.
pub trait StateDependencyChangeListener {
    fn item_state_changed(&self, event: &ItemStateChanged);

    fn thing_status_changed(&self, event: &ThingStatusChanged);

    fn source_changed(&self, event: &SourceEvent) {
        match event {
            SourceEvent::ItemStateChanged(e) => self.item_state_changed(e),
            SourceEvent::ThingStatusChanged(e) => self.thing_status_changed(e),
        }
    }
}

/// Context shared by all component states of one rendering model.
#[derive(Debug)]
pub struct ExecutionContext {
    resolver: Arc<ReferenceResolver>,
    icon_path: String,
    scope: ReentrantMutex<()>,
}

impl ExecutionContext {
    pub fn new(resolver: Arc<ReferenceResolver>, icon_path: impl Into<String>) -> Self {
        Self {
            resolver,
            icon_path: icon_path.into(),
            scope: ReentrantMutex::new(()),
        }
    }

    pub fn resolver(&self) -> &ReferenceResolver {
        &self.resolver
    }

    pub fn icon_path(&self) -> &str {
        &self.icon_path
    }

    /// Enter the model-wide recompute scope.
    ///
    /// The scope is reentrant: a subscriber notified from inside it may
    /// deliver further changes to the same model on the same thread.
    pub fn lock_scope(&self) -> ReentrantMutexGuard<'_, ()> {
        self.scope.lock()
    }
}

/// Position of a component in the tree being rendered.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Root of the sitemap. `None` while the root itself is built.
    pub sitemap: Option<ComponentRef>,
    /// Innermost container holding the component.
    pub container: Option<ComponentRef>,
    /// Source backing the component's value.
    pub value_ref: ValueReference,
}
