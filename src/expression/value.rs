use std::fmt;

use crate::component::{Data, Options};
use crate::source::{State, ThingStatusInfo};

/// Raw result of evaluating an expression, before conversion to the
/// target component's data kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Number(f64),
    Uri(String),
    State(State),
    Status(ThingStatusInfo),
    Options(Options),
}

impl Value {
    /// `Null`, or an item state that is `NULL`/`UNDEF`.
    pub fn is_undefined(&self) -> bool {
        match self {
            Value::Null => true,
            Value::State(state) => state.is_undefined(),
            _ => false,
        }
    }

    /// Short name of the variant, used in conversion errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Text(_) => "String",
            Value::Number(_) => "Double",
            Value::Uri(_) => "URI",
            Value::State(_) => "State",
            Value::Status(_) => "ThingStatusInfo",
            Value::Options(_) => "TaggedUnion",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Text(text) | Value::Uri(text) => f.write_str(text),
            Value::Number(value) => write!(f, "{}", value),
            Value::State(state) => write!(f, "{}", state),
            Value::Status(status) => write!(f, "{}", status),
            Value::Options(options) => write!(f, "{}", options),
        }
    }
}

impl From<Data> for Value {
    fn from(data: Data) -> Self {
        match data {
            Data::Number(value) => Value::Number(value),
            Data::Text(text) => Value::Text(text),
            Data::Uri(uri) => Value::Uri(uri),
            Data::Options(options) => Value::Options(options),
        }
    }
}

impl From<Option<String>> for Value {
    fn from(text: Option<String>) -> Self {
        text.map_or(Value::Null, Value::Text)
    }
}
