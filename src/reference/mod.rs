//! References from expressions to external data sources.

mod resolver;
mod value;

pub use resolver::{IdBuilder, MappingReference, ReferenceError, ReferenceResolver, SitemapRegistry};
pub use value::{ValueReference, VariableType};
