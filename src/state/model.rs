use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::component::ComponentState;
use super::StateDependencyChangeListener;
use crate::events::Subscribers;
use crate::source::{ItemStateChanged, ThingStatusChanged};

/// Every component state of one rendering model, keyed by component id.
pub struct RenderingModelState {
    states: RwLock<HashMap<String, Arc<ComponentState>>>,
    subscribers: Subscribers,
}

impl RenderingModelState {
    pub fn new(subscribers: Subscribers) -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
            subscribers,
        }
    }

    /// Register a state and hand it the subscriber view. Returns the state
    /// previously held for the same component.
    pub fn add(&self, state: Arc<ComponentState>) -> Option<Arc<ComponentState>> {
        state.set_subscribers(Some(self.subscribers.clone()));
        let id = state.component().id().to_string();
        let previous = self.states.write().insert(id, state);
        if let Some(previous) = &previous {
            previous.set_subscribers(None);
        }
        previous
    }

    /// Unregister a state. It no longer notifies anyone.
    pub fn remove(&self, component_id: &str) -> Option<Arc<ComponentState>> {
        let removed = self.states.write().remove(component_id);
        if let Some(state) = &removed {
            state.set_subscribers(None);
        }
        removed
    }

    pub fn get(&self, component_id: &str) -> Option<Arc<ComponentState>> {
        self.states.read().get(component_id).cloned()
    }

    /// Snapshot of the held states.
    pub fn component_states(&self) -> Vec<Arc<ComponentState>> {
        self.states.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.states.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.read().is_empty()
    }
}

impl StateDependencyChangeListener for RenderingModelState {
    fn item_state_changed(&self, event: &ItemStateChanged) {
        for state in self.component_states() {
            state.item_state_changed(event);
        }
    }

    fn thing_status_changed(&self, event: &ThingStatusChanged) {
        for state in self.component_states() {
            state.thing_status_changed(event);
        }
    }
}

impl fmt::Debug for RenderingModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderingModelState")
            .field("states", &self.len())
            .field("subscribers", &self.subscribers)
            .finish()
    }
}
