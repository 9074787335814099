//! Rendering events: subscriber contract, event types, topic factory and
//! the in-process bus.

pub mod bus;
pub mod factory;
mod subscriber;
mod types;

use thiserror::Error;

pub use bus::{EventBus, EventPublisher};
pub use factory::SitemapEventFactory;
pub use subscriber::{
    EventAction, SitemapEventSubscriber, SubscriberRef, SubscriberRegistry, Subscribers,
};
pub use types::{
    AtomEvent, AtomEventPayload, RenderingModelEvent, SitemapEvent, SitemapEventPayload,
    StyleEvent, StyleEventPayload,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EventError {
    #[error("{event_type} does not support action {action}")]
    UnsupportedAction {
        event_type: &'static str,
        action: EventAction,
    },

    #[error("Unknown event action '{action}'")]
    UnknownAction { action: String },

    #[error("Unsupported event type: {event_type}")]
    UnsupportedType { event_type: String },

    #[error("Malformed event topic '{topic}'")]
    MalformedTopic { topic: String },

    #[error("Invalid event payload: {message}")]
    Payload { message: String },
}
