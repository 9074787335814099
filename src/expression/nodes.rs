//! Expression node types.

use super::{EvalContext, EvalError, Expression, ExpressionRef, Value};
use crate::reference::{MappingReference, ValueReference};

/// A constant.
#[derive(Debug, Clone)]
pub struct Literal {
    value: Value,
}

impl Literal {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Value::Text(text.into()))
    }
}

impl Expression for Literal {
    fn evaluate(&self, _ctx: &EvalContext<'_>) -> Result<Value, EvalError> {
        Ok(self.value.clone())
    }
}

/// The raw value of a source: an item state, a thing status or a sitemap id.
#[derive(Debug, Clone)]
pub struct Reference {
    reference: ValueReference,
}

impl Reference {
    pub fn new(reference: ValueReference) -> Self {
        Self { reference }
    }
}

impl Expression for Reference {
    fn evaluate(&self, _ctx: &EvalContext<'_>) -> Result<Value, EvalError> {
        Ok(self.reference.value())
    }

    fn value_reference(&self) -> Option<&ValueReference> {
        Some(&self.reference)
    }
}

/// Display text of a source, see
/// [`ReferenceResolver::formatting`](crate::reference::ReferenceResolver::formatting).
#[derive(Debug, Clone)]
pub struct Formatted {
    reference: ValueReference,
}

impl Formatted {
    pub fn new(reference: ValueReference) -> Self {
        Self { reference }
    }
}

impl Expression for Formatted {
    fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<Value, EvalError> {
        Ok(ctx.resolver.formatting(&self.reference)?.into())
    }

    fn value_reference(&self) -> Option<&ValueReference> {
        Some(&self.reference)
    }
}

/// Category of a source, used for icons.
#[derive(Debug, Clone)]
pub struct Category {
    reference: ValueReference,
}

impl Category {
    pub fn new(reference: ValueReference) -> Self {
        Self { reference }
    }
}

impl Expression for Category {
    fn evaluate(&self, _ctx: &EvalContext<'_>) -> Result<Value, EvalError> {
        Ok(self.reference.category().into())
    }

    fn value_reference(&self) -> Option<&ValueReference> {
        Some(&self.reference)
    }
}

/// Label of a source.
#[derive(Debug, Clone)]
pub struct Label {
    reference: ValueReference,
}

impl Label {
    pub fn new(reference: ValueReference) -> Self {
        Self { reference }
    }
}

impl Expression for Label {
    fn evaluate(&self, _ctx: &EvalContext<'_>) -> Result<Value, EvalError> {
        Ok(self.reference.label().into())
    }

    fn value_reference(&self) -> Option<&ValueReference> {
        Some(&self.reference)
    }
}

/// Options offered by an item, unselected.
#[derive(Debug, Clone)]
pub struct Options {
    mapping: MappingReference,
}

impl Options {
    pub fn new(mapping: MappingReference) -> Self {
        Self { mapping }
    }
}

impl Expression for Options {
    fn evaluate(&self, _ctx: &EvalContext<'_>) -> Result<Value, EvalError> {
        Ok(Value::Options(self.mapping.options()))
    }

    fn value_reference(&self) -> Option<&ValueReference> {
        Some(self.mapping.reference())
    }
}

/// `then` when the string form of `condition` equals `expected`,
/// `otherwise` if not.
#[derive(Debug, Clone)]
pub struct Conditional {
    condition: ExpressionRef,
    expected: String,
    then: ExpressionRef,
    otherwise: ExpressionRef,
}

impl Conditional {
    pub fn new(
        condition: ExpressionRef,
        expected: impl Into<String>,
        then: ExpressionRef,
        otherwise: ExpressionRef,
    ) -> Self {
        Self {
            condition,
            expected: expected.into(),
            then,
            otherwise,
        }
    }
}

impl Expression for Conditional {
    fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<Value, EvalError> {
        let actual = self.condition.evaluate(ctx)?;
        if actual.to_string() == self.expected {
            self.then.evaluate(ctx)
        } else {
            self.otherwise.evaluate(ctx)
        }
    }

    fn children(&self) -> Vec<&dyn Expression> {
        vec![&*self.condition, &*self.then, &*self.otherwise]
    }
}

/// String concatenation of the parts. Null parts are skipped; the result is
/// null when every part is.
#[derive(Debug, Clone)]
pub struct Concat {
    parts: Vec<ExpressionRef>,
}

impl Concat {
    pub fn new(parts: Vec<ExpressionRef>) -> Self {
        Self { parts }
    }
}

impl Expression for Concat {
    fn evaluate(&self, ctx: &EvalContext<'_>) -> Result<Value, EvalError> {
        let mut text: Option<String> = None;
        for part in &self.parts {
            match part.evaluate(ctx)? {
                Value::Null => {}
                value => text.get_or_insert_with(String::new).push_str(&value.to_string()),
            }
        }
        Ok(text.into())
    }

    fn children(&self) -> Vec<&dyn Expression> {
        self.parts.iter().map(|part| &**part).collect()
    }
}
