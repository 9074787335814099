use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ConversionError;
use super::kind::DataKind;
use crate::sets::TaggedUnion;

/// Option set carried by switch and selection atoms.
pub type Options = TaggedUnion<String, String>;

/// Value held by an atom.
///
/// The JSON form is untagged, so a `Uri` reads back as `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Data {
    Number(f64),
    Text(String),
    Uri(String),
    Options(Options),
}

impl Data {
    pub fn kind(&self) -> DataKind {
        match self {
            Data::Number(_) => DataKind::Number,
            Data::Text(_) => DataKind::Text,
            Data::Uri(_) => DataKind::Uri,
            Data::Options(_) => DataKind::Options,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Data::Text(text) | Data::Uri(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Data::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_options(&self) -> Option<&Options> {
        match self {
            Data::Options(options) => Some(options),
            _ => None,
        }
    }

    /// View the value as another kind.
    ///
    /// The same kind is returned as is and every kind widens to `Text`;
    /// anything else fails.
    pub fn convert(&self, target: DataKind) -> Result<Data, ConversionError> {
        if self.kind() == target {
            return Ok(self.clone());
        }
        match target {
            DataKind::Text => Ok(Data::Text(self.to_string())),
            _ => Err(ConversionError::Unsupported {
                from: self.kind().to_string(),
                to: target,
            }),
        }
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Data::Number(value) => write!(f, "{}", value),
            Data::Text(text) | Data::Uri(text) => f.write_str(text),
            Data::Options(options) => write!(f, "{}", options),
        }
    }
}

/// Value of a single style property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StylePropertyValue {
    String(String),
}

impl StylePropertyValue {
    pub fn as_str(&self) -> &str {
        match self {
            StylePropertyValue::String(value) => value,
        }
    }
}

impl fmt::Display for StylePropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for StylePropertyValue {
    fn from(value: &str) -> Self {
        StylePropertyValue::String(value.to_string())
    }
}
