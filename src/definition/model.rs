use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::component::ComponentType;

/// A sitemap as written in a `.sitemap` file.
///
/// ```toml
/// label = "Kitchen"
/// icon = "kitchen"
///
/// [[frame]]
/// label = "Lights"
///
/// [[frame.widget]]
/// type = "switch"
/// item = "KitchenLight"
/// style = { "value.color" = { item = "KitchenLight", equals = "ON", then = "yellow", else = "gray" } }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SitemapDefinition {
    /// Taken from the file name when loaded from disk.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default, rename = "frame")]
    pub frames: Vec<FrameDefinition>,
}

impl SitemapDefinition {
    /// Parse a definition from TOML, naming it `name`.
    pub fn parse(name: &str, content: &str) -> Result<Self, toml::de::Error> {
        let mut definition: SitemapDefinition = toml::from_str(content)?;
        definition.name = name.to_string();
        Ok(definition)
    }

    /// Items referenced anywhere in the definition.
    pub fn item_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for widget in self.frames.iter().flat_map(|f| &f.widgets) {
            let styled = widget.style.values().filter_map(|rule| match rule {
                StyleRule::Conditional { item, .. } => Some(item.as_str()),
                StyleRule::Literal(_) => None,
            });
            for name in widget.item.as_deref().into_iter().chain(styled) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameDefinition {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default, rename = "widget")]
    pub widgets: Vec<WidgetDefinition>,

    #[serde(default)]
    pub style: BTreeMap<String, StyleRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetDefinition {
    /// Component type of the value shown, e.g. `switch` or `text`.
    #[serde(rename = "type")]
    pub kind: ComponentType,

    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub item: Option<String>,

    #[serde(default)]
    pub thing: Option<String>,

    /// Fixed label. Without it the label of the item or thing is shown.
    #[serde(default)]
    pub label: Option<String>,

    /// Id of the label atom; its text comes from the translation bundle.
    #[serde(default)]
    pub label_key: Option<String>,

    /// Icon category. Defaults to the category of the item.
    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub mappings: Vec<MappingDefinition>,

    #[serde(default)]
    pub layout: Option<String>,

    /// Style expressions by prefixed property name (`color`,
    /// `label.color`, `value.color`, `icon.size`).
    #[serde(default)]
    pub style: BTreeMap<String, StyleRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingDefinition {
    pub key: String,
    pub label: String,
}

/// Value of a style property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleRule {
    Literal(String),
    Conditional {
        item: String,
        equals: String,
        then: String,
        #[serde(default, rename = "else")]
        otherwise: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const KITCHEN: &str = r#"
label = "Kitchen"
icon = "kitchen"

[[frame]]
label = "Lights"

[[frame.widget]]
type = "switch"
item = "KitchenLight"
mappings = [{ key = "ON", label = "On" }, { key = "OFF", label = "Off" }]
style = { "value.color" = { item = "KitchenLight", equals = "ON", then = "yellow", else = "gray" }, "label.font" = "bold" }

[[frame.widget]]
type = "text"
item = "Temperature"
label_key = "temperature"
"#;

    #[test]
    fn parses_frames_widgets_and_style_rules() {
        let definition = SitemapDefinition::parse("kitchen", KITCHEN).unwrap();
        assert_eq!(definition.name, "kitchen");
        assert_eq!(definition.label.as_deref(), Some("Kitchen"));
        assert_eq!(definition.frames.len(), 1);

        let widgets = &definition.frames[0].widgets;
        assert_eq!(widgets[0].kind, ComponentType::Switch);
        assert_eq!(widgets[0].mappings.len(), 2);
        assert_eq!(
            widgets[0].style["label.font"],
            StyleRule::Literal("bold".to_string())
        );
        assert_eq!(
            widgets[0].style["value.color"],
            StyleRule::Conditional {
                item: "KitchenLight".to_string(),
                equals: "ON".to_string(),
                then: "yellow".to_string(),
                otherwise: Some("gray".to_string()),
            }
        );
        assert_eq!(widgets[1].kind, ComponentType::Text);
        assert_eq!(widgets[1].label_key.as_deref(), Some("temperature"));
    }

    #[test]
    fn collects_referenced_items_once() {
        let definition = SitemapDefinition::parse("kitchen", KITCHEN).unwrap();
        assert_eq!(definition.item_names(), vec!["KitchenLight", "Temperature"]);
    }

    #[test]
    fn unknown_widget_type_is_rejected() {
        let result = SitemapDefinition::parse("x", "[[frame]]\n[[frame.widget]]\ntype = \"chart\"\n");
        assert!(result.is_err());
    }
}
