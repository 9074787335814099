use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::cache::RenderingModel;
use crate::component::ComponentRef;
use crate::events::Subscribers;
use crate::expression::ExpressionRef;
use crate::reference::{IdBuilder, ReferenceResolver};
use crate::state::{ComponentState, ExecutionContext, Frame, RenderingModelState, StateError};

/// One rendering of one sitemap.
///
/// Transformers build the component tree through the pass: it hands out
/// auto ids and creates and registers a [`ComponentState`] per component.
pub struct RenderPass {
    name: String,
    context: Arc<ExecutionContext>,
    state: RenderingModelState,
    ids: IdBuilder,
}

impl RenderPass {
    pub(crate) fn new(name: &str, context: ExecutionContext, subscribers: Subscribers) -> Self {
        Self {
            name: name.to_string(),
            context: Arc::new(context),
            state: RenderingModelState::new(subscribers),
            ids: IdBuilder::new(),
        }
    }

    /// Name of the sitemap being rendered.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolver(&self) -> &ReferenceResolver {
        self.context.resolver()
    }

    pub fn ids(&self) -> &IdBuilder {
        &self.ids
    }

    pub fn state(&self) -> &RenderingModelState {
        &self.state
    }

    pub fn atom_state(
        &self,
        atom: ComponentRef,
        data: ExpressionRef,
        style: Option<BTreeMap<String, ExpressionRef>>,
        frame: Frame,
    ) -> Result<Arc<ComponentState>, StateError> {
        self.register(ComponentState::new(
            atom,
            Some(data),
            style,
            frame,
            self.context.clone(),
        )?)
    }

    pub fn container_state(
        &self,
        container: ComponentRef,
        style: Option<BTreeMap<String, ExpressionRef>>,
        frame: Frame,
    ) -> Result<Arc<ComponentState>, StateError> {
        self.register(ComponentState::new(
            container,
            None,
            style,
            frame,
            self.context.clone(),
        )?)
    }

    fn register(&self, state: ComponentState) -> Result<Arc<ComponentState>, StateError> {
        let state = Arc::new(state);
        if self.state.add(state.clone()).is_some() {
            tracing::warn!(
                sitemap = %self.name,
                component = %state.component().id(),
                "Duplicate component id, previous state replaced"
            );
        }
        Ok(state)
    }

    pub(crate) fn finish(self, sitemap: ComponentRef) -> RenderingModel {
        RenderingModel::new(sitemap, self.state)
    }
}

impl fmt::Debug for RenderPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderPass")
            .field("name", &self.name)
            .field("states", &self.state.len())
            .finish()
    }
}
