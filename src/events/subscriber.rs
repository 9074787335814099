use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::EventError;
use crate::component::{Component, Data};

/// What happened to a sitemap, component or style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventAction {
    Loaded,
    Reloaded,
    Changed,
    Removed,
}

impl EventAction {
    pub fn as_str(self) -> &'static str {
        match self {
            EventAction::Loaded => "LOADED",
            EventAction::Reloaded => "RELOADED",
            EventAction::Changed => "CHANGED",
            EventAction::Removed => "REMOVED",
        }
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventAction {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOADED" => Ok(EventAction::Loaded),
            "RELOADED" => Ok(EventAction::Reloaded),
            "CHANGED" => Ok(EventAction::Changed),
            "REMOVED" => Ok(EventAction::Removed),
            other => Err(EventError::UnknownAction {
                action: other.to_string(),
            }),
        }
    }
}

/// Receiver of rendering notifications.
pub trait SitemapEventSubscriber: Send + Sync {
    /// An atom's data changed. `atom` already holds the new value.
    fn atom_changed(
        &self,
        action: EventAction,
        sitemap: &Component,
        container: Option<&Component>,
        atom: &Component,
        previous: Option<&Data>,
    );

    /// A style property of `component` changed.
    fn style_changed(
        &self,
        action: EventAction,
        sitemap: &Component,
        component: &Component,
        style_name: &str,
    );

    /// A rendering model was loaded, reloaded or removed.
    fn sitemap_changed(&self, action: EventAction, sitemap: &Component);
}

pub type SubscriberRef = Arc<dyn SitemapEventSubscriber>;

fn same_subscriber(a: &SubscriberRef, b: &SubscriberRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Subscriber set owned by the rendering driver.
#[derive(Clone, Default)]
pub struct SubscriberRegistry {
    inner: Arc<RwLock<Vec<SubscriberRef>>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber. Adding the same subscriber twice has no effect.
    pub fn add(&self, subscriber: SubscriberRef) {
        let mut subscribers = self.inner.write();
        if !subscribers.iter().any(|s| same_subscriber(s, &subscriber)) {
            subscribers.push(subscriber);
        }
    }

    pub fn remove(&self, subscriber: &SubscriberRef) -> bool {
        let mut subscribers = self.inner.write();
        let before = subscribers.len();
        subscribers.retain(|s| !same_subscriber(s, subscriber));
        subscribers.len() != before
    }

    /// Read-only view that follows later additions and removals.
    pub fn view(&self) -> Subscribers {
        Subscribers {
            inner: self.inner.clone(),
        }
    }

    pub fn snapshot(&self) -> Vec<SubscriberRef> {
        self.inner.read().clone()
    }
}

impl fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field("len", &self.inner.read().len())
            .finish()
    }
}

/// Read-only view of a [`SubscriberRegistry`].
#[derive(Clone)]
pub struct Subscribers {
    inner: Arc<RwLock<Vec<SubscriberRef>>>,
}

impl Subscribers {
    /// Copy of the current subscribers, safe to iterate while the
    /// registry changes.
    pub fn snapshot(&self) -> Vec<SubscriberRef> {
        self.inner.read().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl SitemapEventSubscriber for Silent {
        fn atom_changed(&self, _: EventAction, _: &Component, _: Option<&Component>, _: &Component, _: Option<&Data>) {}
        fn style_changed(&self, _: EventAction, _: &Component, _: &Component, _: &str) {}
        fn sitemap_changed(&self, _: EventAction, _: &Component) {}
    }

    #[test]
    fn view_follows_registry() {
        let registry = SubscriberRegistry::new();
        let view = registry.view();
        let subscriber: SubscriberRef = Arc::new(Silent);

        registry.add(subscriber.clone());
        registry.add(subscriber.clone());
        assert_eq!(view.len(), 1);

        assert!(registry.remove(&subscriber));
        assert!(view.is_empty());
        assert!(!registry.remove(&subscriber));
    }

    #[test]
    fn action_round_trips_through_str() {
        for action in [
            EventAction::Loaded,
            EventAction::Reloaded,
            EventAction::Changed,
            EventAction::Removed,
        ] {
            assert_eq!(action.as_str().parse::<EventAction>().unwrap(), action);
        }
        assert!("UPDATED".parse::<EventAction>().is_err());
    }
}
