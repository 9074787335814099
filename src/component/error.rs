use thiserror::Error;

use super::kind::{ComponentType, DataKind, Shape};

/// Structural errors in a component tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComponentError {
    #[error("Component id must not be empty")]
    EmptyId,

    #[error("Unknown component type '{name}'")]
    UnknownType { name: String },

    #[error("Component '{id}' of type {kind} cannot be built as a {requested}")]
    ShapeMismatch {
        id: String,
        kind: ComponentType,
        requested: Shape,
    },

    #[error("Component '{id}' is not a container")]
    NotAContainer { id: String },

    #[error("Data of container '{id}' is derived from its children")]
    DerivedData { id: String },

    #[error("Component '{id}' holds {expected} data, got {found}")]
    DataKind {
        id: String,
        expected: DataKind,
        found: DataKind,
    },
}

/// A value cannot be converted to the requested kind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Don't know how to convert {from} to {to}")]
    Unsupported { from: String, to: DataKind },
}
