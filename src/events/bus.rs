//! In-process delivery of rendering events.

use tokio::sync::broadcast;

use super::factory::SitemapEventFactory;
use super::subscriber::{EventAction, SitemapEventSubscriber};
use super::types::SitemapEvent;
use crate::component::{Component, Data};

pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Broadcast channel carrying [`SitemapEvent`]s to any number of receivers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SitemapEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SitemapEvent> {
        self.sender.subscribe()
    }

    /// Post an event. Returns the number of receivers it reached; events
    /// posted while nobody listens are dropped.
    pub fn publish(&self, event: SitemapEvent) -> usize {
        let topic = event.topic().to_string();
        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::trace!(topic = %topic, receivers, "Event published");
                receivers
            }
            Err(_) => {
                tracing::trace!(topic = %topic, "Event dropped, no receivers");
                0
            }
        }
    }
}

/// Subscriber that turns rendering notifications into events on a bus.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    factory: SitemapEventFactory,
    bus: EventBus,
}

impl EventPublisher {
    pub fn new(factory: SitemapEventFactory, bus: EventBus) -> Self {
        Self { factory, bus }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    fn post(&self, event: Result<impl Into<SitemapEvent>, super::EventError>) {
        match event {
            Ok(event) => {
                self.bus.publish(event.into());
            }
            Err(e) => tracing::error!(error = %e, "Failed to build sitemap event"),
        }
    }
}

impl SitemapEventSubscriber for EventPublisher {
    fn atom_changed(
        &self,
        action: EventAction,
        sitemap: &Component,
        _container: Option<&Component>,
        atom: &Component,
        previous: Option<&Data>,
    ) {
        self.post(self.factory.create_atom_event(action, sitemap, atom, previous));
    }

    fn style_changed(
        &self,
        action: EventAction,
        sitemap: &Component,
        component: &Component,
        style_name: &str,
    ) {
        self.post(self.factory.create_style_event(action, sitemap, component, style_name));
    }

    fn sitemap_changed(&self, action: EventAction, sitemap: &Component) {
        self.post(self.factory.create_sitemap_event(action, sitemap));
    }
}
