use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::RwLock;

use super::data::{Data, StylePropertyValue};
use super::error::{ComponentError, ConversionError};
use super::kind::{ComponentType, DataKind, Shape};

pub type ComponentRef = Arc<Component>;

/// Style properties of a component. A `None` value is an unset property.
pub type Style = BTreeMap<String, Option<StylePropertyValue>>;

#[derive(Debug)]
enum Body {
    Atom {
        data: RwLock<Option<Data>>,
    },
    Container {
        layout: Option<String>,
        label: RwLock<Option<ComponentRef>>,
        icon: RwLock<Option<ComponentRef>>,
        children: RwLock<Vec<ComponentRef>>,
    },
}

/// A node of the rendered component tree.
///
/// Components are shared behind [`ComponentRef`] and mutated in place by
/// their state. Equality and hashing use the id only.
#[derive(Debug)]
pub struct Component {
    id: String,
    kind: ComponentType,
    style: RwLock<Option<Style>>,
    body: Body,
}

impl Component {
    pub fn atom(id: impl Into<String>, kind: ComponentType) -> Result<Self, ComponentError> {
        let id = Self::checked_id(id.into(), kind, Shape::Atom)?;
        Ok(Self {
            id,
            kind,
            style: RwLock::new(None),
            body: Body::Atom {
                data: RwLock::new(None),
            },
        })
    }

    pub fn container(
        id: impl Into<String>,
        kind: ComponentType,
        layout: Option<String>,
    ) -> Result<Self, ComponentError> {
        let id = Self::checked_id(id.into(), kind, Shape::Container)?;
        Ok(Self {
            id,
            kind,
            style: RwLock::new(None),
            body: Body::Container {
                layout,
                label: RwLock::new(None),
                icon: RwLock::new(None),
                children: RwLock::new(Vec::new()),
            },
        })
    }

    fn checked_id(id: String, kind: ComponentType, requested: Shape) -> Result<String, ComponentError> {
        if id.is_empty() {
            return Err(ComponentError::EmptyId);
        }
        if kind.shape() != requested {
            return Err(ComponentError::ShapeMismatch { id, kind, requested });
        }
        Ok(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ComponentType {
        self.kind
    }

    pub fn is_atom(&self) -> bool {
        matches!(self.body, Body::Atom { .. })
    }

    /// Current data.
    ///
    /// Containers derive it: a widget shows the URI of its first group
    /// child, other containers the text of their label atom.
    pub fn data(&self) -> Option<Data> {
        match &self.body {
            Body::Atom { data } => data.read().clone(),
            Body::Container {
                label, children, ..
            } => match self.kind {
                ComponentType::Widget => children
                    .read()
                    .iter()
                    .find(|child| child.kind == ComponentType::Group)
                    .and_then(|child| child.data()),
                _ => label.read().as_ref().and_then(|label| label.data()),
            },
        }
    }

    /// Replace an atom's data, returning the previous value.
    pub fn set_data(&self, value: Option<Data>) -> Result<Option<Data>, ComponentError> {
        let Body::Atom { data } = &self.body else {
            return Err(ComponentError::DerivedData {
                id: self.id.clone(),
            });
        };
        if let (Some(value), Some(expected)) = (&value, self.kind.data_kind()) {
            if value.kind() != expected {
                return Err(ComponentError::DataKind {
                    id: self.id.clone(),
                    expected,
                    found: value.kind(),
                });
            }
        }
        Ok(std::mem::replace(&mut *data.write(), value))
    }

    /// Current data viewed as `target`.
    pub fn convert(&self, target: DataKind) -> Result<Option<Data>, ConversionError> {
        self.data().map(|data| data.convert(target)).transpose()
    }

    pub fn style(&self) -> Option<Style> {
        self.style.read().clone()
    }

    pub fn style_property(&self, name: &str) -> Option<StylePropertyValue> {
        self.style
            .read()
            .as_ref()
            .and_then(|style| style.get(name).cloned().flatten())
    }

    /// Set one style property, creating the style map on first use.
    pub fn set_style_property(&self, name: impl Into<String>, value: Option<StylePropertyValue>) {
        self.style
            .write()
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value);
    }

    pub fn layout(&self) -> Option<&str> {
        match &self.body {
            Body::Container { layout, .. } => layout.as_deref(),
            Body::Atom { .. } => None,
        }
    }

    pub fn label(&self) -> Option<ComponentRef> {
        match &self.body {
            Body::Container { label, .. } => label.read().clone(),
            Body::Atom { .. } => None,
        }
    }

    pub fn icon(&self) -> Option<ComponentRef> {
        match &self.body {
            Body::Container { icon, .. } => icon.read().clone(),
            Body::Atom { .. } => None,
        }
    }

    pub fn children(&self) -> Vec<ComponentRef> {
        match &self.body {
            Body::Container { children, .. } => children.read().clone(),
            Body::Atom { .. } => Vec::new(),
        }
    }

    pub fn set_label(&self, atom: ComponentRef) -> Result<(), ComponentError> {
        let Body::Container { label, .. } = &self.body else {
            return Err(self.not_a_container());
        };
        *label.write() = Some(atom);
        Ok(())
    }

    pub fn set_icon(&self, atom: ComponentRef) -> Result<(), ComponentError> {
        let Body::Container { icon, .. } = &self.body else {
            return Err(self.not_a_container());
        };
        *icon.write() = Some(atom);
        Ok(())
    }

    pub fn add_child(&self, child: ComponentRef) -> Result<(), ComponentError> {
        let Body::Container { children, .. } = &self.body else {
            return Err(self.not_a_container());
        };
        children.write().push(child);
        Ok(())
    }

    /// Depth-first search for a component by id, this one included.
    pub fn find(self: &Arc<Self>, id: &str) -> Option<ComponentRef> {
        if self.id == id {
            return Some(self.clone());
        }
        if self.is_atom() {
            return None;
        }
        self.label()
            .into_iter()
            .chain(self.icon())
            .chain(self.children())
            .find_map(|child| child.find(id))
    }

    fn not_a_container(&self) -> ComponentError {
        ComponentError::NotAContainer {
            id: self.id.clone(),
        }
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Component {}

impl Hash for Component {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(id: &str, kind: ComponentType, data: Data) -> ComponentRef {
        let atom = Component::atom(id, kind).unwrap();
        atom.set_data(Some(data)).unwrap();
        Arc::new(atom)
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        assert!(matches!(
            Component::atom("f1", ComponentType::Frame),
            Err(ComponentError::ShapeMismatch {
                requested: Shape::Atom,
                ..
            })
        ));
        assert!(matches!(
            Component::container("s1", ComponentType::Switch, None),
            Err(ComponentError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            Component::atom("", ComponentType::Label),
            Err(ComponentError::EmptyId)
        ));
    }

    #[test]
    fn widget_data_is_first_group_uri() {
        let widget = Component::container("w1", ComponentType::Widget, None).unwrap();
        widget
            .add_child(atom("l1", ComponentType::Label, Data::Text("Lights".into())))
            .unwrap();
        widget
            .add_child(atom("g1", ComponentType::Group, Data::Uri("/groups/lights".into())))
            .unwrap();
        widget
            .add_child(atom("g2", ComponentType::Group, Data::Uri("/groups/other".into())))
            .unwrap();

        assert_eq!(widget.data(), Some(Data::Uri("/groups/lights".into())));
        assert!(matches!(
            widget.set_data(None),
            Err(ComponentError::DerivedData { .. })
        ));
    }

    #[test]
    fn frame_data_is_label_text() {
        let frame = Component::container("f1", ComponentType::Frame, None).unwrap();
        assert_eq!(frame.data(), None);
        frame
            .set_label(atom("f1-label", ComponentType::Label, Data::Text("Kitchen".into())))
            .unwrap();
        assert_eq!(frame.data(), Some(Data::Text("Kitchen".into())));
    }

    #[test]
    fn set_data_checks_kind() {
        let slider = Component::atom("dimmer", ComponentType::Slider).unwrap();
        assert!(matches!(
            slider.set_data(Some(Data::Text("50".into()))),
            Err(ComponentError::DataKind {
                expected: DataKind::Number,
                found: DataKind::Text,
                ..
            })
        ));
        assert_eq!(slider.set_data(Some(Data::Number(50.0))).unwrap(), None);
        assert_eq!(
            slider.convert(DataKind::Text).unwrap(),
            Some(Data::Text("50".into()))
        );
    }

    #[test]
    fn equality_by_id_only() {
        let a = Component::atom("x", ComponentType::Label).unwrap();
        let b = Component::atom("x", ComponentType::Text).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn style_properties() {
        let label = Component::atom("l1", ComponentType::Label).unwrap();
        assert!(label.style().is_none());
        label.set_style_property("color", Some("red".into()));
        assert_eq!(label.style_property("color").unwrap().as_str(), "red");
        label.set_style_property("color", None);
        assert!(label.style_property("color").is_none());
        assert_eq!(label.style().map(|s| s.len()), Some(1));
    }
}
