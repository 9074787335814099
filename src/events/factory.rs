//! Builds rendering events and parses them back from their wire form.
//!
//! Topics have the form `{root}/{sitemap type}/{sitemap id}/{component id}/{ACTION}`
//! for atom and style events and `{root}/{sitemap type}/{sitemap id}/{ACTION}`
//! for rendering model events.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::subscriber::EventAction;
use super::types::{
    AtomEvent, AtomEventPayload, RenderingModelEvent, SitemapEvent, SitemapEventPayload,
    StyleEvent, StyleEventPayload,
};
use super::EventError;
use crate::component::{Component, Data};

pub const DEFAULT_TOPIC_ROOT: &str = "smarthome/sitemaps";
pub const DEFAULT_SITEMAP_TYPE: &str = "smarthome";

/// Source name stamped on events built by the factory.
pub const EVENT_SOURCE: &str = "SitemapEventFactory";

#[derive(Debug, Clone)]
pub struct SitemapEventFactory {
    sitemap_type: String,
    topic_root: String,
}

impl Default for SitemapEventFactory {
    fn default() -> Self {
        Self::new(DEFAULT_SITEMAP_TYPE, DEFAULT_TOPIC_ROOT)
    }
}

impl SitemapEventFactory {
    pub fn new(sitemap_type: impl Into<String>, topic_root: impl Into<String>) -> Self {
        Self {
            sitemap_type: sitemap_type.into(),
            topic_root: topic_root.into(),
        }
    }

    /// Event types this factory can parse.
    pub fn supported_types(&self) -> [&'static str; 3] {
        [AtomEvent::TYPE, StyleEvent::TYPE, RenderingModelEvent::TYPE]
    }

    fn sitemap_topic(&self, sitemap_id: &str) -> String {
        format!("{}/{}/{}/", self.topic_root, self.sitemap_type, sitemap_id)
    }

    pub fn component_topic(&self, sitemap_id: &str, component_id: &str, action: EventAction) -> String {
        format!("{}{}/{}", self.sitemap_topic(sitemap_id), component_id, action)
    }

    pub fn rendering_model_topic(&self, sitemap_id: &str, action: EventAction) -> String {
        format!("{}{}", self.sitemap_topic(sitemap_id), action)
    }

    /// Event for an atom whose data changed from `previous` to its current
    /// value.
    pub fn create_atom_event(
        &self,
        action: EventAction,
        sitemap: &Component,
        atom: &Component,
        previous: Option<&Data>,
    ) -> Result<AtomEvent, EventError> {
        let topic = self.component_topic(sitemap.id(), atom.id(), action);
        let new_data = atom.data();
        let previous_data = previous.cloned();
        let payload = serialize(&AtomEventPayload {
            previous_data: previous_data.clone(),
            new_data: new_data.clone(),
        })?;
        AtomEvent::new(
            action,
            topic,
            payload,
            Some(EVENT_SOURCE.to_string()),
            atom.id().to_string(),
            new_data,
            previous_data,
        )
    }

    pub fn create_style_event(
        &self,
        action: EventAction,
        sitemap: &Component,
        component: &Component,
        style_name: &str,
    ) -> Result<StyleEvent, EventError> {
        let topic = self.component_topic(sitemap.id(), component.id(), action);
        let new_value = component.style_property(style_name);
        let payload = serialize(&StyleEventPayload {
            style_name: style_name.to_string(),
            new_value: new_value.clone(),
        })?;
        StyleEvent::new(
            action,
            topic,
            payload,
            Some(EVENT_SOURCE.to_string()),
            style_name.to_string(),
            new_value,
        )
    }

    pub fn create_sitemap_event(
        &self,
        action: EventAction,
        sitemap: &Component,
    ) -> Result<RenderingModelEvent, EventError> {
        let topic = self.rendering_model_topic(sitemap.id(), action);
        let payload = serialize(&SitemapEventPayload {
            id: sitemap.id().to_string(),
        })?;
        RenderingModelEvent::new(
            action,
            topic,
            payload,
            Some(EVENT_SOURCE.to_string()),
            sitemap.id().to_string(),
        )
    }

    /// Rebuild an event from its type name, topic and JSON payload.
    ///
    /// The action is the last topic segment; for atom events the atom id is
    /// the segment before it.
    pub fn create_event(
        &self,
        event_type: &str,
        topic: &str,
        payload: &str,
        source: Option<&str>,
    ) -> Result<SitemapEvent, EventError> {
        let segments: Vec<&str> = topic.split('/').collect();
        let malformed = || EventError::MalformedTopic {
            topic: topic.to_string(),
        };
        let action: EventAction = segments.last().ok_or_else(malformed)?.parse()?;
        let source = source.map(str::to_string);

        match event_type {
            AtomEvent::TYPE => {
                let atom_id = segments
                    .len()
                    .checked_sub(2)
                    .and_then(|i| segments.get(i))
                    .filter(|id| !id.is_empty())
                    .ok_or_else(malformed)?;
                let bean: AtomEventPayload = deserialize(payload)?;
                Ok(AtomEvent::new(
                    action,
                    topic.to_string(),
                    payload.to_string(),
                    source,
                    atom_id.to_string(),
                    bean.new_data,
                    bean.previous_data,
                )?
                .into())
            }
            StyleEvent::TYPE => {
                let bean: StyleEventPayload = deserialize(payload)?;
                Ok(StyleEvent::new(
                    action,
                    topic.to_string(),
                    payload.to_string(),
                    source,
                    bean.style_name,
                    bean.new_value,
                )?
                .into())
            }
            RenderingModelEvent::TYPE => {
                let bean: SitemapEventPayload = deserialize(payload)?;
                Ok(RenderingModelEvent::new(
                    action,
                    topic.to_string(),
                    payload.to_string(),
                    source,
                    bean.id,
                )?
                .into())
            }
            other => Err(EventError::UnsupportedType {
                event_type: other.to_string(),
            }),
        }
    }
}

fn serialize<T: Serialize>(bean: &T) -> Result<String, EventError> {
    serde_json::to_string(bean).map_err(|e| EventError::Payload {
        message: e.to_string(),
    })
}

fn deserialize<T: DeserializeOwned>(payload: &str) -> Result<T, EventError> {
    serde_json::from_str(payload).map_err(|e| EventError::Payload {
        message: e.to_string(),
    })
}
