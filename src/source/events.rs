//! Change events published by the item and thing registries.

use serde::{Deserialize, Serialize};

use super::state::State;
use super::thing::ThingStatusInfo;

/// Event type names the rendering driver subscribes to.
pub const SUBSCRIBED_EVENT_TYPES: [&str; 2] = [
    ItemStateChanged::TYPE,
    ThingStatusChanged::TYPE,
];

/// An item moved from one state to another.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStateChanged {
    pub item_name: String,
    pub state: State,
    pub old_state: State,
}

impl ItemStateChanged {
    pub const TYPE: &'static str = "ItemStateChangedEvent";
}

/// A thing's status changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThingStatusChanged {
    pub thing_uid: String,
    pub status: ThingStatusInfo,
    pub old_status: ThingStatusInfo,
}

impl ThingStatusChanged {
    pub const TYPE: &'static str = "ThingStatusInfoChangedEvent";
}

/// Events delivered from the source registries into the rendering driver.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    ItemStateChanged(ItemStateChanged),
    ThingStatusChanged(ThingStatusChanged),
}

impl SourceEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            SourceEvent::ItemStateChanged(_) => ItemStateChanged::TYPE,
            SourceEvent::ThingStatusChanged(_) => ThingStatusChanged::TYPE,
        }
    }
}

impl From<ItemStateChanged> for SourceEvent {
    fn from(event: ItemStateChanged) -> Self {
        SourceEvent::ItemStateChanged(event)
    }
}

impl From<ThingStatusChanged> for SourceEvent {
    fn from(event: ThingStatusChanged) -> Self {
        SourceEvent::ThingStatusChanged(event)
    }
}
