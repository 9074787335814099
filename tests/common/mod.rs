//! Shared fixtures: a kitchen home with items and a thing, a recording
//! subscriber and a driver wired to a definition store.

#![allow(dead_code, unused_imports)]

use std::sync::Arc;

use parking_lot::Mutex;
use sitemap_render::component::{Component, ComponentRef, Data};
use sitemap_render::definition::{DefinitionStore, DefinitionTransformer, SitemapDefinition};
use sitemap_render::driver::{RenderingModel, SitemapRenderer, SitemapRenderingDriver};
use sitemap_render::events::{EventAction, SitemapEventSubscriber, SubscriberRef};
use sitemap_render::i18n::{NoTranslations, TranslationProvider};
use sitemap_render::source::{
    Item, ItemRegistry, MemoryItemRegistry, MemoryThingRegistry, State, StateDescription, Thing,
    ThingStatus, ThingStatusInfo,
};
use sitemap_render::state::ComponentState;

pub const KITCHEN: &str = r#"
label = "Kitchen"
icon = "kitchen"

[[frame]]
label = "Lights"

[[frame.widget]]
type = "switch"
item = "KitchenLight"
style = { "value.color" = { item = "KitchenLight", equals = "ON", then = "yellow", else = "gray" } }

[[frame.widget]]
type = "text"
item = "Temperature"

[[frame.widget]]
type = "text"
item = "Battery"

[[frame]]
label = "Status"

[[frame.widget]]
type = "text"
thing = "zwave:device:1"
"#;

pub const HALLWAY: &str = r#"
label = "Hallway"

[[frame]]
label = "Lights"

[[frame.widget]]
type = "switch"
item = "KitchenLight"
label = "Kitchen"

[[frame.widget]]
type = "text"
item = "Door"
"#;

/// Something a subscriber was told.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Atom {
        action: EventAction,
        sitemap: String,
        container: Option<String>,
        atom: String,
        previous: Option<Data>,
        current: Option<Data>,
    },
    Style {
        action: EventAction,
        sitemap: String,
        component: String,
        style: String,
    },
    Sitemap {
        action: EventAction,
        sitemap: String,
    },
}

#[derive(Default)]
pub struct RecordingSubscriber {
    events: Mutex<Vec<Recorded>>,
}

impl RecordingSubscriber {
    /// Everything recorded so far, clearing the record.
    pub fn take(&self) -> Vec<Recorded> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn atom_events_for(&self, id: &str) -> Vec<Recorded> {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, Recorded::Atom { atom, .. } if atom == id))
            .cloned()
            .collect()
    }
}

impl SitemapEventSubscriber for RecordingSubscriber {
    fn atom_changed(
        &self,
        action: EventAction,
        sitemap: &Component,
        container: Option<&Component>,
        atom: &Component,
        previous: Option<&Data>,
    ) {
        self.events.lock().push(Recorded::Atom {
            action,
            sitemap: sitemap.id().to_string(),
            container: container.map(|c| c.id().to_string()),
            atom: atom.id().to_string(),
            previous: previous.cloned(),
            current: atom.data(),
        });
    }

    fn style_changed(
        &self,
        action: EventAction,
        sitemap: &Component,
        component: &Component,
        style_name: &str,
    ) {
        self.events.lock().push(Recorded::Style {
            action,
            sitemap: sitemap.id().to_string(),
            component: component.id().to_string(),
            style: style_name.to_string(),
        });
    }

    fn sitemap_changed(&self, action: EventAction, sitemap: &Component) {
        self.events.lock().push(Recorded::Sitemap {
            action,
            sitemap: sitemap.id().to_string(),
        });
    }
}

/// Items `KitchenLight` (Switch, OFF), `Temperature` (Number 21.5, pattern
/// `%.1f °C`), `Battery` (Number 80, category battery), `Door` (Contact,
/// CLOSED), group `Lights`, and thing `zwave:device:1` (ONLINE).
pub fn kitchen_items() -> (Arc<MemoryItemRegistry>, Arc<MemoryThingRegistry>) {
    let items = Arc::new(MemoryItemRegistry::new());
    items.add(
        Item::new("KitchenLight", "Switch")
            .with_label("Kitchen Light")
            .with_category("light")
            .with_state(State::parse("Switch", "OFF").unwrap()),
    );
    items.add(
        Item::new("Temperature", "Number")
            .with_label("Temperature")
            .with_state(State::Decimal(21.5))
            .with_state_description(StateDescription {
                pattern: Some("%.1f °C".to_string()),
                options: Vec::new(),
            }),
    );
    items.add(
        Item::new("Battery", "Number")
            .with_label("Battery")
            .with_category("battery")
            .with_state(State::Decimal(80.0)),
    );
    items.add(
        Item::new("Door", "Contact")
            .with_label("Front Door")
            .with_state(State::parse("Contact", "CLOSED").unwrap()),
    );
    items.add(
        Item::new("Lights", "Group")
            .with_label("All Lights")
            .with_members(vec!["KitchenLight".to_string()]),
    );

    let things = Arc::new(MemoryThingRegistry::new());
    things.add(
        Thing::new("zwave:device:1", ThingStatusInfo::new(ThingStatus::Online))
            .with_label("Z-Wave Stick"),
    );
    (items, things)
}

pub struct Home {
    pub items: Arc<MemoryItemRegistry>,
    pub things: Arc<MemoryThingRegistry>,
    pub store: Arc<DefinitionStore>,
    pub driver: Arc<SitemapRenderingDriver>,
    pub transformer: Arc<DefinitionTransformer>,
    pub renderer: SitemapRenderer,
    pub recorder: Arc<RecordingSubscriber>,
}

impl Home {
    pub fn new() -> Self {
        Self::with_translations(Arc::new(NoTranslations))
    }

    pub fn with_translations(translations: Arc<dyn TranslationProvider>) -> Self {
        let (items, things) = kitchen_items();
        let driver = Arc::new(SitemapRenderingDriver::new(
            items.clone(),
            things.clone(),
            translations,
        ));
        let recorder = Arc::new(RecordingSubscriber::default());
        driver.add_subscriber(recorder.clone());

        let store = Arc::new(DefinitionStore::new());
        store.add_listener(driver.clone());
        store.put(SitemapDefinition::parse("kitchen", KITCHEN).unwrap());
        store.put(SitemapDefinition::parse("hallway", HALLWAY).unwrap());

        let transformer = Arc::new(DefinitionTransformer::new(store.clone()));
        let renderer = SitemapRenderer::new(driver.clone(), transformer.clone());
        Self {
            items,
            things,
            store,
            driver,
            transformer,
            renderer,
            recorder,
        }
    }

    /// Render `name`, dropping the LOADED notification.
    pub fn render(&self, name: &str) -> Arc<RenderingModel> {
        let model = self.renderer.get(name).unwrap();
        self.recorder.take();
        model
    }

    /// Update an item the way a binding would and deliver the change.
    pub fn set(&self, item: &str, value: &str) {
        let item_type = self.items.get_item(item).unwrap().item_type().to_string();
        let state = State::parse(&item_type, value).unwrap();
        if let Some(event) = self.items.update_state(item, state) {
            self.driver.receive(&event.into());
        }
    }

    pub fn set_thing(&self, uid: &str, status: ThingStatus) {
        if let Some(event) = self
            .things
            .update_status(uid, ThingStatusInfo::new(status))
        {
            self.driver.receive(&event.into());
        }
    }
}

pub fn state_of(model: &RenderingModel, id: &str) -> Arc<ComponentState> {
    model
        .state()
        .get(id)
        .unwrap_or_else(|| panic!("no state for component {id}"))
}

pub fn data_of(model: &RenderingModel, id: &str) -> Option<Data> {
    state_of(model, id).component().data()
}

pub fn find(model: &RenderingModel, id: &str) -> ComponentRef {
    model
        .sitemap()
        .find(id)
        .unwrap_or_else(|| panic!("no component {id}"))
}
