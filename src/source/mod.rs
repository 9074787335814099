//! External data sources: items, things and their registries.

pub mod events;
pub mod item;
pub mod registry;
pub mod state;
pub mod thing;

pub use events::{ItemStateChanged, SourceEvent, ThingStatusChanged, SUBSCRIBED_EVENT_TYPES};
pub use item::{Item, ItemDefinition, StateDescription, StateOption};
pub use registry::{ItemRegistry, MemoryItemRegistry, MemoryThingRegistry, ThingRegistry};
pub use state::{FormatError, OnOff, OpenClosed, State, StateParseError};
pub use thing::{Thing, ThingDefinition, ThingStatus, ThingStatusInfo};
