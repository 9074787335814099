//! Items: named, typed holders of a live state.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::state::{OnOff, OpenClosed, State, StateParseError};

/// One selectable option published by an item's state description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateOption {
    pub value: String,
    pub label: String,
}

/// Display metadata attached to an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDescription {
    /// Display pattern, e.g. `"%.1f °C"`.
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub options: Vec<StateOption>,
}

/// A named data point whose state changes over time.
#[derive(Debug)]
pub struct Item {
    name: String,
    item_type: String,
    label: Option<String>,
    category: Option<String>,
    state: RwLock<State>,
    state_description: Option<StateDescription>,
    members: Vec<String>,
}

impl Item {
    pub fn new(name: impl Into<String>, item_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            item_type: item_type.into(),
            label: None,
            category: None,
            state: RwLock::new(State::Null),
            state_description: None,
            members: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_state(self, state: State) -> Self {
        *self.state.write() = state;
        self
    }

    pub fn with_state_description(mut self, description: StateDescription) -> Self {
        self.state_description = Some(description);
        self
    }

    /// Mark this item as a group with the given member item names.
    pub fn with_members(mut self, members: Vec<String>) -> Self {
        self.members = members;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn state(&self) -> State {
        self.state.read().clone()
    }

    /// Replace the state, returning the previous one.
    pub fn set_state(&self, state: State) -> State {
        std::mem::replace(&mut *self.state.write(), state)
    }

    pub fn state_description(&self) -> Option<&StateDescription> {
        self.state_description.as_ref()
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn is_group(&self) -> bool {
        self.item_type == "Group"
    }

    /// Key/label pairs implied by enumerated item types.
    pub fn enum_options(&self) -> Option<Vec<(String, String)>> {
        let names: Vec<&str> = match self.item_type.as_str() {
            "Switch" => OnOff::ALL.iter().map(|v| v.as_str()).collect(),
            "Contact" => OpenClosed::ALL.iter().map(|v| v.as_str()).collect(),
            _ => return None,
        };
        Some(
            names
                .into_iter()
                .map(|name| (name.to_string(), name.to_string()))
                .collect(),
        )
    }
}

/// Serialized form of an item, as found in item definition files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Initial state in its string form; `NULL` when absent.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub options: Vec<StateOption>,
    #[serde(default)]
    pub members: Vec<String>,
}

impl ItemDefinition {
    pub fn into_item(self) -> Result<Item, StateParseError> {
        let state = match &self.state {
            Some(value) => State::parse(&self.item_type, value)?,
            None => State::Null,
        };

        let mut item = Item::new(self.name, self.item_type)
            .with_state(state)
            .with_members(self.members);
        if let Some(label) = self.label {
            item = item.with_label(label);
        }
        if let Some(category) = self.category {
            item = item.with_category(category);
        }
        if self.pattern.is_some() || !self.options.is_empty() {
            item = item.with_state_description(StateDescription {
                pattern: self.pattern,
                options: self.options,
            });
        }
        Ok(item)
    }
}
