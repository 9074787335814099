use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use thiserror::Error;

use super::value::{ValueReference, VariableType};
use crate::component::{Component, ComponentError, ComponentRef, ComponentType, Options};
use crate::expression::Value;
use crate::i18n::TranslationProvider;
use crate::source::{FormatError, ItemRegistry, ThingRegistry};

/// Errors raised while resolving references.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReferenceError {
    #[error("Item not found: {name}")]
    ItemNotFound { name: String },

    #[error("Thing not found: {uid}")]
    ThingNotFound { uid: String },

    #[error("Sitemap not found: {id}")]
    SitemapNotFound { id: String },

    #[error("Item '{name}' is not a group")]
    NotAGroup { name: String },

    #[error("Source of reference {reference} is no longer available")]
    Dangling { reference: String },

    #[error("Cannot format item '{name}': {source}")]
    Format {
        name: String,
        #[source]
        source: FormatError,
    },
}

/// Lookup of rendered sitemaps by name.
pub trait SitemapRegistry: Send + Sync {
    fn get_sitemap(&self, name: &str) -> Option<ComponentRef>;
}

/// An item reference paired with the options it offers.
#[derive(Debug, Clone)]
pub struct MappingReference {
    reference: ValueReference,
    mappings: Vec<(String, String)>,
}

impl MappingReference {
    pub fn reference(&self) -> &ValueReference {
        &self.reference
    }

    pub fn mappings(&self) -> &[(String, String)] {
        &self.mappings
    }

    /// Options offered by the item, with nothing selected.
    ///
    /// Explicit mappings win, then the options of the item's state
    /// description, then the values of an enumerated item type. Empty when
    /// none apply.
    pub fn options(&self) -> Options {
        if !self.mappings.is_empty() {
            return Options::new(self.mappings.iter().cloned());
        }
        let Some(item) = self.reference.item() else {
            return Options::new(Vec::new());
        };
        if let Some(description) = item.state_description().filter(|d| !d.options.is_empty()) {
            return Options::new(
                description
                    .options
                    .iter()
                    .map(|o| (o.value.clone(), o.label.clone())),
            );
        }
        Options::new(item.enum_options().unwrap_or_default())
    }
}

/// Generates ids for components that have none and creates atoms by type
/// name.
#[derive(Debug, Default)]
pub struct IdBuilder {
    counters: Mutex<HashMap<ComponentType, u32>>,
}

impl IdBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for `kind`: `~`, the first two letters of the type name and
    /// a per-type counter, e.g. `~sl0002`.
    pub fn auto_id(&self, kind: ComponentType) -> String {
        let mut counters = self.counters.lock();
        let counter = counters.entry(kind).or_insert(0);
        *counter += 1;
        let name = kind.as_str().to_lowercase();
        format!("~{}{:04}", &name[..2.min(name.len())], counter)
    }

    /// Create an atom with an auto id from its type name.
    pub fn atom(&self, type_name: &str) -> Result<Component, ComponentError> {
        let kind: ComponentType = type_name.parse()?;
        Component::atom(self.auto_id(kind), kind)
    }
}

/// Resolves identifiers found in sitemap definitions to live sources.
pub struct ReferenceResolver {
    items: Arc<dyn ItemRegistry>,
    things: Arc<dyn ThingRegistry>,
    sitemaps: Weak<dyn SitemapRegistry>,
    translations: Arc<dyn TranslationProvider>,
}

impl ReferenceResolver {
    pub fn new(
        items: Arc<dyn ItemRegistry>,
        things: Arc<dyn ThingRegistry>,
        sitemaps: Weak<dyn SitemapRegistry>,
        translations: Arc<dyn TranslationProvider>,
    ) -> Self {
        Self {
            items,
            things,
            sitemaps,
            translations,
        }
    }

    pub fn translations(&self) -> &Arc<dyn TranslationProvider> {
        &self.translations
    }

    pub fn none(&self) -> ValueReference {
        ValueReference::none()
    }

    pub fn item(&self, name: Option<&str>) -> Result<ValueReference, ReferenceError> {
        let Some(name) = name else {
            return Ok(self.none());
        };
        self.items
            .get_item(name)
            .map(|item| ValueReference::for_item(&item))
            .ok_or_else(|| ReferenceError::ItemNotFound {
                name: name.to_string(),
            })
    }

    pub fn thing(&self, uid: Option<&str>) -> Result<ValueReference, ReferenceError> {
        let Some(uid) = uid else {
            return Ok(self.none());
        };
        self.things
            .get_thing(uid)
            .map(|thing| ValueReference::for_thing(&thing))
            .ok_or_else(|| ReferenceError::ThingNotFound {
                uid: uid.to_string(),
            })
    }

    /// Reference to another sitemap. Only sitemaps already rendered are
    /// found.
    pub fn sitemap(&self, id: Option<&str>) -> Result<ValueReference, ReferenceError> {
        let Some(id) = id else {
            return Ok(self.none());
        };
        self.sitemaps
            .upgrade()
            .and_then(|registry| registry.get_sitemap(id))
            .map(|sitemap| ValueReference::for_sitemap(&sitemap))
            .ok_or_else(|| ReferenceError::SitemapNotFound { id: id.to_string() })
    }

    /// Display text of a reference.
    ///
    /// Items use their display pattern when they have one and their full
    /// state string otherwise; undefined states have no text. Things and
    /// sitemaps use the string form of their value.
    pub fn formatting(&self, reference: &ValueReference) -> Result<Option<String>, ReferenceError> {
        let dangling = || ReferenceError::Dangling {
            reference: reference.to_string(),
        };

        match reference.variable_type() {
            VariableType::Item => {
                let item = reference.item().ok_or_else(dangling)?;
                let state = item.state();
                if state.is_undefined() {
                    return Ok(None);
                }
                match item.state_description().and_then(|d| d.pattern.as_deref()) {
                    None => Ok(Some(state.to_full_string())),
                    Some(pattern) => state.format(pattern).map(Some).map_err(|e| {
                        tracing::error!(item = %item.name(), error = %e, "Conversion error on item");
                        ReferenceError::Format {
                            name: item.name().to_string(),
                            source: e,
                        }
                    }),
                }
            }
            VariableType::Thing | VariableType::Sitemap => match reference.value() {
                Value::Null => Err(dangling()),
                value => Ok(Some(value.to_string())),
            },
            VariableType::None => Ok(None),
        }
    }

    pub fn options(&self, reference: ValueReference, mappings: Vec<(String, String)>) -> MappingReference {
        MappingReference {
            reference,
            mappings,
        }
    }

    /// References to the members of a group item.
    pub fn members(&self, reference: &ValueReference) -> Result<Vec<ValueReference>, ReferenceError> {
        let item = reference.item().ok_or_else(|| ReferenceError::Dangling {
            reference: reference.to_string(),
        })?;
        if !item.is_group() {
            return Err(ReferenceError::NotAGroup {
                name: item.name().to_string(),
            });
        }
        item.members()
            .iter()
            .map(|member| self.item(Some(member)))
            .collect()
    }

    pub fn builder(&self) -> IdBuilder {
        IdBuilder::new()
    }
}

impl std::fmt::Debug for ReferenceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceResolver")
            .field("sitemaps_alive", &(self.sitemaps.strong_count() > 0))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::NoTranslations;
    use crate::source::{
        Item, MemoryItemRegistry, MemoryThingRegistry, State, StateDescription, Thing,
        ThingStatus, ThingStatusInfo,
    };

    struct NoSitemaps;

    impl SitemapRegistry for NoSitemaps {
        fn get_sitemap(&self, _name: &str) -> Option<ComponentRef> {
            None
        }
    }

    fn resolver() -> (ReferenceResolver, Arc<MemoryItemRegistry>, Arc<dyn SitemapRegistry>) {
        let items = Arc::new(MemoryItemRegistry::new());
        let things = Arc::new(MemoryThingRegistry::new());
        things.add(Thing::new("hue:bridge:1", ThingStatusInfo::new(ThingStatus::Online)));
        let sitemaps: Arc<dyn SitemapRegistry> = Arc::new(NoSitemaps);
        let resolver = ReferenceResolver::new(
            items.clone(),
            things,
            Arc::downgrade(&sitemaps),
            Arc::new(NoTranslations),
        );
        (resolver, items, sitemaps)
    }

    #[test]
    fn absent_id_resolves_to_none_and_unknown_id_fails() {
        let (resolver, _items, _sitemaps) = resolver();
        assert_eq!(resolver.item(None).unwrap().variable_type(), VariableType::None);
        assert_eq!(resolver.thing(None).unwrap().variable_type(), VariableType::None);
        assert!(matches!(
            resolver.item(Some("Missing")),
            Err(ReferenceError::ItemNotFound { .. })
        ));
        assert!(matches!(
            resolver.thing(Some("zwave:node:9")),
            Err(ReferenceError::ThingNotFound { .. })
        ));
        assert!(matches!(
            resolver.sitemap(Some("other")),
            Err(ReferenceError::SitemapNotFound { .. })
        ));
    }

    #[test]
    fn formatting_uses_pattern_then_full_string() {
        let (resolver, items, _sitemaps) = resolver();
        items.add(
            Item::new("Temperature", "Number")
                .with_state(State::Decimal(21.46))
                .with_state_description(StateDescription {
                    pattern: Some("%.1f °C".to_string()),
                    options: Vec::new(),
                }),
        );
        items.add(Item::new("Humidity", "Number").with_state(State::Decimal(40.0)));
        items.add(Item::new("Pressure", "Number"));

        let temperature = resolver.item(Some("Temperature")).unwrap();
        assert_eq!(
            resolver.formatting(&temperature).unwrap().as_deref(),
            Some("21.5 °C")
        );
        let humidity = resolver.item(Some("Humidity")).unwrap();
        assert_eq!(resolver.formatting(&humidity).unwrap().as_deref(), Some("40"));
        let pressure = resolver.item(Some("Pressure")).unwrap();
        assert_eq!(resolver.formatting(&pressure).unwrap(), None);
        assert_eq!(resolver.formatting(&resolver.none()).unwrap(), None);

        let thing = resolver.thing(Some("hue:bridge:1")).unwrap();
        assert_eq!(resolver.formatting(&thing).unwrap().as_deref(), Some("ONLINE"));
    }

    #[test]
    fn formatting_rejects_pattern_mismatch() {
        let (resolver, items, _sitemaps) = resolver();
        items.add(
            Item::new("Mode", "String")
                .with_state(State::Text("eco".to_string()))
                .with_state_description(StateDescription {
                    pattern: Some("%d".to_string()),
                    options: Vec::new(),
                }),
        );
        let mode = resolver.item(Some("Mode")).unwrap();
        assert!(matches!(
            resolver.formatting(&mode),
            Err(ReferenceError::Format { .. })
        ));
    }

    #[test]
    fn options_prefer_mappings_then_description_then_enum() {
        let (resolver, items, _sitemaps) = resolver();
        items.add(Item::new("Light", "Switch"));
        let light = resolver.item(Some("Light")).unwrap();

        let mapped = resolver.options(light.clone(), vec![("ON".into(), "Bright".into())]);
        assert_eq!(mapped.options().len(), 1);
        assert_eq!(mapped.options().elements()[0].value, "Bright");

        let plain = resolver.options(light, Vec::new());
        assert_eq!(plain.options().len(), 2);

        let none = resolver.options(resolver.none(), Vec::new());
        assert!(none.options().is_empty());
    }

    #[test]
    fn members_of_group() {
        let (resolver, items, _sitemaps) = resolver();
        items.add(Item::new("Lamp1", "Switch"));
        items.add(Item::new("Lamp2", "Switch"));
        items.add(
            Item::new("Lamps", "Group").with_members(vec!["Lamp1".into(), "Lamp2".into()]),
        );

        let group = resolver.item(Some("Lamps")).unwrap();
        let members = resolver.members(&group).unwrap();
        let ids: Vec<_> = members.iter().filter_map(|m| m.id()).collect();
        assert_eq!(ids, vec!["Lamp1", "Lamp2"]);

        let lamp = resolver.item(Some("Lamp1")).unwrap();
        assert!(matches!(
            resolver.members(&lamp),
            Err(ReferenceError::NotAGroup { .. })
        ));
    }

    #[test]
    fn auto_ids_count_per_type() {
        let builder = IdBuilder::new();
        assert_eq!(builder.auto_id(ComponentType::Slider), "~sl0001");
        assert_eq!(builder.auto_id(ComponentType::Slider), "~sl0002");
        assert_eq!(builder.auto_id(ComponentType::Label), "~la0001");

        let atom = builder.atom("SWITCH").unwrap();
        assert_eq!(atom.id(), "~sw0001");
        assert!(builder.atom("FRAME").is_err());
    }
}
