use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ComponentError;

/// Structural shape implemented by a component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Container,
    Atom,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Container => f.write_str("container"),
            Shape::Atom => f.write_str("atom"),
        }
    }
}

/// Kind of value an atom stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Uri,
    Text,
    Number,
    Options,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataKind::Uri => "URI",
            DataKind::Text => "String",
            DataKind::Number => "Double",
            DataKind::Options => "TaggedUnion",
        };
        f.write_str(name)
    }
}

/// Closed set of display component types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Sitemap,
    Frame,
    Page,
    Group,
    Widget,
    Icon,
    Label,
    Text,
    Switch,
    Selection,
    Slider,
    Colorpicker,
    Mapview,
}

impl ComponentType {
    pub const ALL: [ComponentType; 13] = [
        ComponentType::Sitemap,
        ComponentType::Frame,
        ComponentType::Page,
        ComponentType::Group,
        ComponentType::Widget,
        ComponentType::Icon,
        ComponentType::Label,
        ComponentType::Text,
        ComponentType::Switch,
        ComponentType::Selection,
        ComponentType::Slider,
        ComponentType::Colorpicker,
        ComponentType::Mapview,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentType::Sitemap => "SITEMAP",
            ComponentType::Frame => "FRAME",
            ComponentType::Page => "PAGE",
            ComponentType::Group => "GROUP",
            ComponentType::Widget => "WIDGET",
            ComponentType::Icon => "ICON",
            ComponentType::Label => "LABEL",
            ComponentType::Text => "TEXT",
            ComponentType::Switch => "SWITCH",
            ComponentType::Selection => "SELECTION",
            ComponentType::Slider => "SLIDER",
            ComponentType::Colorpicker => "COLORPICKER",
            ComponentType::Mapview => "MAPVIEW",
        }
    }

    pub fn shape(self) -> Shape {
        match self {
            ComponentType::Sitemap
            | ComponentType::Frame
            | ComponentType::Page
            | ComponentType::Widget => Shape::Container,
            ComponentType::Group
            | ComponentType::Icon
            | ComponentType::Label
            | ComponentType::Text
            | ComponentType::Switch
            | ComponentType::Selection
            | ComponentType::Slider
            | ComponentType::Colorpicker
            | ComponentType::Mapview => Shape::Atom,
        }
    }

    /// Kind of value held by atoms of this type. `None` for containers,
    /// whose data is derived from their children.
    pub fn data_kind(self) -> Option<DataKind> {
        match self {
            ComponentType::Sitemap
            | ComponentType::Frame
            | ComponentType::Page
            | ComponentType::Widget => None,
            ComponentType::Group | ComponentType::Icon => Some(DataKind::Uri),
            ComponentType::Label
            | ComponentType::Text
            | ComponentType::Colorpicker
            | ComponentType::Mapview => Some(DataKind::Text),
            ComponentType::Slider => Some(DataKind::Number),
            ComponentType::Switch | ComponentType::Selection => Some(DataKind::Options),
        }
    }

    /// Style key prefix owned by this type. `None` means the type keeps
    /// only un-prefixed keys.
    pub fn style_prefix(self) -> Option<&'static str> {
        match self {
            ComponentType::Sitemap
            | ComponentType::Frame
            | ComponentType::Page
            | ComponentType::Widget
            | ComponentType::Group => None,
            ComponentType::Icon => Some("icon"),
            ComponentType::Label => Some("label"),
            ComponentType::Colorpicker
            | ComponentType::Mapview
            | ComponentType::Selection
            | ComponentType::Slider
            | ComponentType::Switch
            | ComponentType::Text => Some("value"),
        }
    }

    /// Map a raw style key onto the property name this type stores, or
    /// `None` when the key belongs to another type.
    pub fn style_property<'a>(self, key: &'a str) -> Option<&'a str> {
        match self.style_prefix() {
            None => (!key.contains('.')).then_some(key),
            Some(prefix) => key
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('.'))
                .filter(|name| !name.is_empty()),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ComponentError::UnknownType {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_keeps_only_label_prefixed_styles() {
        let t = ComponentType::Label;
        assert_eq!(t.style_property("label.color"), Some("color"));
        assert_eq!(t.style_property("color"), None);
        assert_eq!(t.style_property("icon.color"), None);
        assert_eq!(t.style_property("labelcolor"), None);
    }

    #[test]
    fn containers_keep_unprefixed_styles() {
        for t in [ComponentType::Frame, ComponentType::Widget, ComponentType::Group] {
            assert_eq!(t.style_property("visibility"), Some("visibility"));
            assert_eq!(t.style_property("value.color"), None);
        }
    }

    #[test]
    fn value_atoms_share_value_prefix() {
        for t in [
            ComponentType::Colorpicker,
            ComponentType::Mapview,
            ComponentType::Selection,
            ComponentType::Slider,
            ComponentType::Switch,
            ComponentType::Text,
        ] {
            assert_eq!(t.style_property("value.color"), Some("color"));
        }
    }

    #[test]
    fn every_type_has_consistent_shape_and_data_kind() {
        for t in ComponentType::ALL {
            match t.shape() {
                Shape::Container => assert!(t.data_kind().is_none(), "{t}"),
                Shape::Atom => assert!(t.data_kind().is_some(), "{t}"),
            }
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("switch".parse::<ComponentType>().unwrap(), ComponentType::Switch);
        assert_eq!("MAPVIEW".parse::<ComponentType>().unwrap(), ComponentType::Mapview);
        assert!(matches!(
            "chart".parse::<ComponentType>(),
            Err(ComponentError::UnknownType { .. })
        ));
    }
}
