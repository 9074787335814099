//! Duplicate-free ordered collections used for option data.

mod ordered;
mod tagged_union;

pub use ordered::OrderedSet;
pub use tagged_union::{Element, TaggedUnion, TaggedUnionError};
