//! Serializable copy of a component tree.

use serde::{Deserialize, Serialize};

use super::data::Data;
use super::kind::ComponentType;
use super::node::{Component, Style};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSnapshot {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ComponentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Box<ComponentSnapshot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Box<ComponentSnapshot>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ComponentSnapshot>,
}

impl ComponentSnapshot {
    pub fn capture(component: &Component) -> Self {
        Self {
            id: component.id().to_string(),
            kind: component.kind(),
            data: component.data(),
            style: component.style(),
            layout: component.layout().map(str::to_string),
            label: component.label().map(|c| Box::new(Self::capture(&c))),
            icon: component.icon().map(|c| Box::new(Self::capture(&c))),
            children: component
                .children()
                .iter()
                .map(|c| Self::capture(c))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::sets::TaggedUnion;
    use pretty_assertions::assert_eq;

    #[test]
    fn snapshot_json_shape() {
        let frame = Component::container("f1", ComponentType::Frame, None).unwrap();
        let switch = Component::atom("sw1", ComponentType::Switch).unwrap();
        let mut options = TaggedUnion::new([
            ("ON".to_string(), "ON".to_string()),
            ("OFF".to_string(), "OFF".to_string()),
        ]);
        options.set_index(1).unwrap();
        switch.set_data(Some(Data::Options(options))).unwrap();
        switch.set_style_property("color", Some("green".into()));
        frame.add_child(Arc::new(switch)).unwrap();

        let json = serde_json::to_value(ComponentSnapshot::capture(&frame)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "f1",
                "type": "frame",
                "children": [{
                    "id": "sw1",
                    "type": "switch",
                    "data": {"index": 1, "elements": {"ON": "ON", "OFF": "OFF"}},
                    "style": {"color": "green"}
                }]
            })
        );
    }
}
