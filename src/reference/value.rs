use std::fmt;
use std::sync::{Arc, Weak};

use crate::component::{Component, ComponentRef};
use crate::expression::Value;
use crate::source::{Item, Thing};

/// Kind of source a [`ValueReference`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableType {
    Item,
    Thing,
    Sitemap,
    None,
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VariableType::Item => "ITEM",
            VariableType::Thing => "THING",
            VariableType::Sitemap => "SITEMAP",
            VariableType::None => "NONE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
enum Source {
    Item(Weak<Item>),
    Thing(Weak<Thing>),
    Sitemap(Weak<Component>),
    None,
}

/// Handle to an external data source.
///
/// The source is held weakly: a reference never keeps an item, thing or
/// sitemap alive. Every accessor returns `None` once the source is gone,
/// and always for [`VariableType::None`].
#[derive(Debug, Clone)]
pub struct ValueReference {
    id: Option<String>,
    source: Source,
}

impl ValueReference {
    pub fn none() -> Self {
        Self {
            id: None,
            source: Source::None,
        }
    }

    pub fn for_item(item: &Arc<Item>) -> Self {
        Self {
            id: Some(item.name().to_string()),
            source: Source::Item(Arc::downgrade(item)),
        }
    }

    pub fn for_thing(thing: &Arc<Thing>) -> Self {
        Self {
            id: Some(thing.uid().to_string()),
            source: Source::Thing(Arc::downgrade(thing)),
        }
    }

    pub fn for_sitemap(sitemap: &ComponentRef) -> Self {
        Self {
            id: Some(sitemap.id().to_string()),
            source: Source::Sitemap(Arc::downgrade(sitemap)),
        }
    }

    pub fn variable_type(&self) -> VariableType {
        match self.source {
            Source::Item(_) => VariableType::Item,
            Source::Thing(_) => VariableType::Thing,
            Source::Sitemap(_) => VariableType::Sitemap,
            Source::None => VariableType::None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn item(&self) -> Option<Arc<Item>> {
        match &self.source {
            Source::Item(item) => item.upgrade(),
            _ => None,
        }
    }

    pub fn thing(&self) -> Option<Arc<Thing>> {
        match &self.source {
            Source::Thing(thing) => thing.upgrade(),
            _ => None,
        }
    }

    pub fn sitemap(&self) -> Option<ComponentRef> {
        match &self.source {
            Source::Sitemap(sitemap) => sitemap.upgrade(),
            _ => None,
        }
    }

    /// Item type for items, `Thing` for things, `smarthome` for sitemaps.
    pub fn source_type(&self) -> Option<String> {
        match &self.source {
            Source::Item(_) => self.item().map(|item| item.item_type().to_string()),
            Source::Thing(_) => Some("Thing".to_string()),
            Source::Sitemap(_) => Some("smarthome".to_string()),
            Source::None => None,
        }
    }

    pub fn label(&self) -> Option<String> {
        match &self.source {
            Source::Item(_) => self.item().and_then(|i| i.label().map(str::to_string)),
            Source::Thing(_) => self.thing().and_then(|t| t.label().map(str::to_string)),
            Source::Sitemap(_) => self
                .sitemap()
                .and_then(|s| s.label())
                .and_then(|label| label.data())
                .map(|data| data.to_string()),
            Source::None => None,
        }
    }

    /// Item category, or the icon of a sitemap.
    pub fn category(&self) -> Option<String> {
        match &self.source {
            Source::Item(_) => self.item().and_then(|i| i.category().map(str::to_string)),
            Source::Sitemap(_) => self
                .sitemap()
                .and_then(|s| s.icon())
                .and_then(|icon| icon.data())
                .map(|data| data.to_string()),
            Source::Thing(_) | Source::None => None,
        }
    }

    /// Current value: an item state, a thing status or a sitemap id.
    pub fn value(&self) -> Value {
        match &self.source {
            Source::Item(_) => self.item().map_or(Value::Null, |i| Value::State(i.state())),
            Source::Thing(_) => self.thing().map_or(Value::Null, |t| Value::Status(t.status())),
            Source::Sitemap(_) => self
                .sitemap()
                .map_or(Value::Null, |s| Value::Text(s.id().to_string())),
            Source::None => Value::Null,
        }
    }

    /// Whether the current value is absent or an undefined state.
    pub fn is_undefined(&self) -> bool {
        self.value().is_undefined()
    }
}

impl Default for ValueReference {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for ValueReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}:{}", self.variable_type(), id),
            None => write!(f, "{}", self.variable_type()),
        }
    }
}
