//! Item and thing lookups.
//!
//! The rendering engine only reads through the [`ItemRegistry`] and
//! [`ThingRegistry`] traits. The in-memory implementations also own state
//! updates and hand back the change event that must be delivered to the
//! driver.

use std::sync::Arc;

use dashmap::DashMap;

use super::events::{ItemStateChanged, ThingStatusChanged};
use super::item::Item;
use super::state::State;
use super::thing::{Thing, ThingStatusInfo};

/// Lookup of items by name.
pub trait ItemRegistry: Send + Sync {
    fn get_item(&self, name: &str) -> Option<Arc<Item>>;
}

/// Lookup of things by UID.
pub trait ThingRegistry: Send + Sync {
    fn get_thing(&self, uid: &str) -> Option<Arc<Thing>>;
}

#[derive(Debug, Default)]
pub struct MemoryItemRegistry {
    items: DashMap<String, Arc<Item>>,
}

impl MemoryItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, item: Item) -> Arc<Item> {
        let item = Arc::new(item);
        self.items.insert(item.name().to_string(), item.clone());
        item
    }

    pub fn remove(&self, name: &str) -> Option<Arc<Item>> {
        self.items.remove(name).map(|(_, item)| item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Set an item's state.
    ///
    /// Returns the event to deliver, or `None` when the item is unknown or
    /// the state did not change.
    pub fn update_state(&self, name: &str, state: State) -> Option<ItemStateChanged> {
        let item = self.get_item(name)?;
        let old_state = item.set_state(state.clone());
        if old_state == state {
            tracing::trace!(item = %name, "Item state unchanged");
            return None;
        }

        tracing::debug!(item = %name, old = %old_state, new = %state, "Item state updated");
        Some(ItemStateChanged {
            item_name: name.to_string(),
            state,
            old_state,
        })
    }
}

impl ItemRegistry for MemoryItemRegistry {
    fn get_item(&self, name: &str) -> Option<Arc<Item>> {
        self.items.get(name).map(|entry| entry.value().clone())
    }
}

#[derive(Debug, Default)]
pub struct MemoryThingRegistry {
    things: DashMap<String, Arc<Thing>>,
}

impl MemoryThingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, thing: Thing) -> Arc<Thing> {
        let thing = Arc::new(thing);
        self.things.insert(thing.uid().to_string(), thing.clone());
        thing
    }

    pub fn remove(&self, uid: &str) -> Option<Arc<Thing>> {
        self.things.remove(uid).map(|(_, thing)| thing)
    }

    /// Set a thing's status. Same contract as [`MemoryItemRegistry::update_state`].
    pub fn update_status(&self, uid: &str, status: ThingStatusInfo) -> Option<ThingStatusChanged> {
        let thing = self.get_thing(uid)?;
        let old_status = thing.set_status(status.clone());
        if old_status == status {
            return None;
        }

        tracing::debug!(thing = %uid, old = %old_status, new = %status, "Thing status updated");
        Some(ThingStatusChanged {
            thing_uid: uid.to_string(),
            status,
            old_status,
        })
    }
}

impl ThingRegistry for MemoryThingRegistry {
    fn get_thing(&self, uid: &str) -> Option<Arc<Thing>> {
        self.things.get(uid).map(|entry| entry.value().clone())
    }
}
