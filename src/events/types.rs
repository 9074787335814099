use serde::{Deserialize, Serialize};

use super::subscriber::EventAction;
use super::EventError;
use crate::component::{Data, StylePropertyValue};

fn check_action(
    event_type: &'static str,
    action: EventAction,
    supported: &[EventAction],
) -> Result<(), EventError> {
    if supported.contains(&action) {
        Ok(())
    } else {
        Err(EventError::UnsupportedAction { event_type, action })
    }
}

/// Payload of an [`AtomEvent`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtomEventPayload {
    #[serde(default)]
    pub previous_data: Option<Data>,
    #[serde(default)]
    pub new_data: Option<Data>,
}

/// Payload of a [`StyleEvent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleEventPayload {
    pub style_name: String,
    #[serde(default)]
    pub new_value: Option<StylePropertyValue>,
}

/// Payload of a [`RenderingModelEvent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapEventPayload {
    pub id: String,
}

/// The data of an atom changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtomEvent {
    pub action: EventAction,
    pub topic: String,
    pub payload: String,
    pub source: Option<String>,
    pub atom_id: String,
    pub new_data: Option<Data>,
    pub previous_data: Option<Data>,
}

impl AtomEvent {
    pub const TYPE: &'static str = "AtomEvent";
    pub const SUPPORTED_ACTIONS: &'static [EventAction] = &[EventAction::Changed];

    pub fn new(
        action: EventAction,
        topic: String,
        payload: String,
        source: Option<String>,
        atom_id: String,
        new_data: Option<Data>,
        previous_data: Option<Data>,
    ) -> Result<Self, EventError> {
        check_action(Self::TYPE, action, Self::SUPPORTED_ACTIONS)?;
        Ok(Self {
            action,
            topic,
            payload,
            source,
            atom_id,
            new_data,
            previous_data,
        })
    }
}

/// A style property of a component changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleEvent {
    pub action: EventAction,
    pub topic: String,
    pub payload: String,
    pub source: Option<String>,
    pub style_name: String,
    pub new_value: Option<StylePropertyValue>,
}

impl StyleEvent {
    pub const TYPE: &'static str = "StyleEvent";
    pub const SUPPORTED_ACTIONS: &'static [EventAction] = &[EventAction::Changed];

    pub fn new(
        action: EventAction,
        topic: String,
        payload: String,
        source: Option<String>,
        style_name: String,
        new_value: Option<StylePropertyValue>,
    ) -> Result<Self, EventError> {
        check_action(Self::TYPE, action, Self::SUPPORTED_ACTIONS)?;
        Ok(Self {
            action,
            topic,
            payload,
            source,
            style_name,
            new_value,
        })
    }
}

/// A rendering model was loaded, reloaded or removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderingModelEvent {
    pub action: EventAction,
    pub topic: String,
    pub payload: String,
    pub source: Option<String>,
    pub sitemap_id: String,
}

impl RenderingModelEvent {
    pub const TYPE: &'static str = "RenderingModelEvent";
    pub const SUPPORTED_ACTIONS: &'static [EventAction] = &[
        EventAction::Loaded,
        EventAction::Reloaded,
        EventAction::Removed,
    ];

    pub fn new(
        action: EventAction,
        topic: String,
        payload: String,
        source: Option<String>,
        sitemap_id: String,
    ) -> Result<Self, EventError> {
        check_action(Self::TYPE, action, Self::SUPPORTED_ACTIONS)?;
        Ok(Self {
            action,
            topic,
            payload,
            source,
            sitemap_id,
        })
    }
}

/// Any event produced by the rendering engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum SitemapEvent {
    AtomEvent(AtomEvent),
    StyleEvent(StyleEvent),
    RenderingModelEvent(RenderingModelEvent),
}

impl SitemapEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            SitemapEvent::AtomEvent(_) => AtomEvent::TYPE,
            SitemapEvent::StyleEvent(_) => StyleEvent::TYPE,
            SitemapEvent::RenderingModelEvent(_) => RenderingModelEvent::TYPE,
        }
    }

    pub fn action(&self) -> EventAction {
        match self {
            SitemapEvent::AtomEvent(e) => e.action,
            SitemapEvent::StyleEvent(e) => e.action,
            SitemapEvent::RenderingModelEvent(e) => e.action,
        }
    }

    pub fn topic(&self) -> &str {
        match self {
            SitemapEvent::AtomEvent(e) => &e.topic,
            SitemapEvent::StyleEvent(e) => &e.topic,
            SitemapEvent::RenderingModelEvent(e) => &e.topic,
        }
    }

    pub fn payload(&self) -> &str {
        match self {
            SitemapEvent::AtomEvent(e) => &e.payload,
            SitemapEvent::StyleEvent(e) => &e.payload,
            SitemapEvent::RenderingModelEvent(e) => &e.payload,
        }
    }
}

impl From<AtomEvent> for SitemapEvent {
    fn from(event: AtomEvent) -> Self {
        SitemapEvent::AtomEvent(event)
    }
}

impl From<StyleEvent> for SitemapEvent {
    fn from(event: StyleEvent) -> Self {
        SitemapEvent::StyleEvent(event)
    }
}

impl From<RenderingModelEvent> for SitemapEvent {
    fn from(event: RenderingModelEvent) -> Self {
        SitemapEvent::RenderingModelEvent(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atom_event_only_accepts_changed() {
        let result = AtomEvent::new(
            EventAction::Loaded,
            "t".into(),
            "{}".into(),
            None,
            "a1".into(),
            None,
            None,
        );
        assert!(matches!(
            result,
            Err(EventError::UnsupportedAction {
                event_type: "AtomEvent",
                action: EventAction::Loaded
            })
        ));
    }

    #[test]
    fn rendering_model_event_rejects_changed() {
        let result = RenderingModelEvent::new(
            EventAction::Changed,
            "t".into(),
            "{}".into(),
            None,
            "home".into(),
        );
        assert!(matches!(result, Err(EventError::UnsupportedAction { .. })));

        for action in RenderingModelEvent::SUPPORTED_ACTIONS {
            assert!(RenderingModelEvent::new(*action, "t".into(), "{}".into(), None, "home".into()).is_ok());
        }
    }

    #[test]
    fn style_event_rejects_removed() {
        let result = StyleEvent::new(
            EventAction::Removed,
            "t".into(),
            "{}".into(),
            None,
            "color".into(),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn atom_payload_uses_camel_case() {
        let payload = AtomEventPayload {
            previous_data: Some(Data::Text("OFF".into())),
            new_data: Some(Data::Number(1.0)),
        };
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"previousData":"OFF","newData":1.0}"#
        );
    }
}
