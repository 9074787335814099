//! Side-effect free expressions computing component data and styles.
//!
//! The engine treats expressions as opaque: it evaluates them against an
//! [`EvalContext`] and walks their structure once to find the
//! [`ValueReference`] nodes a component depends on. The node types in
//! [`nodes`] are what the definition transformer builds.

pub mod nodes;
mod value;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::component::ComponentRef;
use crate::reference::{ReferenceError, ReferenceResolver, ValueReference};

pub use value::Value;

/// Shared handle to an expression.
pub type ExpressionRef = Arc<dyn Expression>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("Cannot evaluate {expression}: {message}")]
    Failed { expression: String, message: String },
}

/// Variables visible to an expression while it is evaluated.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    pub resolver: &'a ReferenceResolver,
    /// Root of the sitemap being rendered.
    pub sitemap: Option<&'a ComponentRef>,
    /// Container holding the component.
    pub container: Option<&'a ComponentRef>,
    pub component: &'a ComponentRef,
    /// Source backing the component's value.
    pub value_ref: &'a ValueReference,
}

impl fmt::Debug for EvalContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalContext")
            .field("sitemap", &self.sitemap.map(|s| s.id()))
            .field("container", &self.container.map(|c| c.id()))
            .field("component", &self.component.id())
            .field("value_ref", &self.value_ref.to_string())
            .finish()
    }
}

pub trait Expression: Send + Sync + fmt::Debug {
    fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<Value, EvalError>;

    /// Direct sub-expressions.
    fn children(&self) -> Vec<&dyn Expression> {
        Vec::new()
    }

    /// The source this node reads, if it is a value-reference node.
    fn value_reference(&self) -> Option<&ValueReference> {
        None
    }
}

/// Every value-reference node of the tree, depth first.
pub fn value_references(expression: &dyn Expression) -> Vec<&ValueReference> {
    let mut found = Vec::new();
    collect(expression, &mut found);
    found
}

fn collect<'a>(expression: &'a dyn Expression, found: &mut Vec<&'a ValueReference>) {
    if let Some(reference) = expression.value_reference() {
        found.push(reference);
    }
    for child in expression.children() {
        collect(child, found);
    }
}

#[cfg(test)]
mod tests {
    use super::nodes::{Conditional, Literal, Reference};
    use super::*;
    use crate::reference::VariableType;

    #[test]
    fn walk_finds_nested_references() {
        let item = Arc::new(crate::source::Item::new("Light", "Switch"));
        let thing = Arc::new(crate::source::Thing::new(
            "hue:bulb:1",
            crate::source::ThingStatusInfo::new(crate::source::ThingStatus::Online),
        ));

        let expression = Conditional::new(
            Arc::new(Reference::new(ValueReference::for_item(&item))),
            "ON",
            Arc::new(Reference::new(ValueReference::for_thing(&thing))),
            Arc::new(Literal::new(Value::Null)),
        );

        let found: Vec<_> = value_references(&expression)
            .into_iter()
            .map(|r| (r.variable_type(), r.id().map(str::to_string)))
            .collect();
        assert_eq!(
            found,
            vec![
                (VariableType::Item, Some("Light".to_string())),
                (VariableType::Thing, Some("hue:bulb:1".to_string())),
            ]
        );
    }
}
