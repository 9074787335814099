//! Display components and their types.

mod data;
mod error;
mod kind;
mod node;
pub mod snapshot;

pub use data::{Data, Options, StylePropertyValue};
pub use error::{ComponentError, ConversionError};
pub use kind::{ComponentType, DataKind, Shape};
pub use node::{Component, ComponentRef, Style};
pub use snapshot::ComponentSnapshot;
