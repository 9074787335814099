use std::collections::BTreeMap;
use std::sync::Arc;

use super::model::{FrameDefinition, SitemapDefinition, StyleRule, WidgetDefinition};
use super::{SitemapDefinitionProvider, FILE_EXTENSION};
use crate::component::{Component, ComponentRef, ComponentType};
use crate::driver::{RenderError, RenderPass, SitemapTransformer};
use crate::expression::nodes::{Category, Conditional, Formatted, Label, Literal, Options, Reference};
use crate::expression::{ExpressionRef, Value};
use crate::reference::{ValueReference, VariableType};
use crate::state::Frame;

type StyleExpressions = BTreeMap<String, ExpressionRef>;

/// Builds rendering models from [`SitemapDefinition`]s.
///
/// The tree is SITEMAP > FRAME > WIDGET. A widget carries a header label
/// and icon and one value atom of the widget's type. A `group` widget holds
/// a GROUP link and a PAGE listing the members of its group item.
pub struct DefinitionTransformer {
    definitions: Arc<dyn SitemapDefinitionProvider>,
}

impl DefinitionTransformer {
    pub fn new(definitions: Arc<dyn SitemapDefinitionProvider>) -> Self {
        Self { definitions }
    }
}

impl SitemapTransformer for DefinitionTransformer {
    fn file_extension(&self) -> &str {
        FILE_EXTENSION
    }

    fn transform(&self, pass: &RenderPass) -> Result<ComponentRef, RenderError> {
        let definition =
            self.definitions
                .get_definition(pass.name())
                .ok_or_else(|| RenderError::DefinitionNotFound {
                    name: pass.name().to_string(),
                })?;
        TreeBuilder::new(pass, &definition)?.build(&definition)
    }
}

struct TreeBuilder<'a> {
    pass: &'a RenderPass,
    root: ComponentRef,
}

impl<'a> TreeBuilder<'a> {
    fn new(pass: &'a RenderPass, definition: &SitemapDefinition) -> Result<Self, RenderError> {
        let root = Arc::new(Component::container(
            definition.name.as_str(),
            ComponentType::Sitemap,
            None,
        )?);
        Ok(Self { pass, root })
    }

    fn build(self, definition: &SitemapDefinition) -> Result<ComponentRef, RenderError> {
        let frame = self.frame(&self.root, self.pass.resolver().none());
        if let Some(label) = &definition.label {
            let atom = self.atom(ComponentType::Label, None, literal(label), &BTreeMap::new(), &frame)?;
            self.root.set_label(atom)?;
        }
        if let Some(icon) = &definition.icon {
            let atom = self.atom(ComponentType::Icon, None, literal(icon), &BTreeMap::new(), &frame)?;
            self.root.set_icon(atom)?;
        }
        for frame_definition in &definition.frames {
            self.root.add_child(self.build_frame(frame_definition)?)?;
        }
        self.pass.container_state(self.root.clone(), None, frame)?;
        Ok(self.root)
    }

    fn build_frame(&self, definition: &FrameDefinition) -> Result<ComponentRef, RenderError> {
        let id = definition
            .id
            .clone()
            .unwrap_or_else(|| self.pass.ids().auto_id(ComponentType::Frame));
        let container = Arc::new(Component::container(id, ComponentType::Frame, None)?);
        let style = self.style(&definition.style)?;
        let frame = self.frame(&container, self.pass.resolver().none());

        if let Some(label) = &definition.label {
            let atom = self.atom(ComponentType::Label, None, literal(label), &style, &frame)?;
            container.set_label(atom)?;
        }
        for widget in &definition.widgets {
            container.add_child(self.build_widget(&container, widget)?)?;
        }
        self.pass.container_state(
            container.clone(),
            Some(style),
            self.frame(&self.root, self.pass.resolver().none()),
        )?;
        Ok(container)
    }

    fn build_widget(
        &self,
        parent: &ComponentRef,
        definition: &WidgetDefinition,
    ) -> Result<ComponentRef, RenderError> {
        let resolver = self.pass.resolver();
        let id = definition
            .id
            .clone()
            .unwrap_or_else(|| self.pass.ids().auto_id(ComponentType::Widget));
        let container = Arc::new(Component::container(
            id,
            ComponentType::Widget,
            definition.layout.clone(),
        )?);
        let value_ref = match (&definition.item, &definition.thing) {
            (Some(item), _) => resolver.item(Some(item))?,
            (None, Some(thing)) => resolver.thing(Some(thing))?,
            (None, None) => resolver.none(),
        };
        let bound = value_ref.variable_type() != VariableType::None;
        let style = self.style(&definition.style)?;
        let frame = self.frame(&container, value_ref.clone());

        let label = match (&definition.label_key, &definition.label) {
            (Some(key), _) => Some((Some(key.clone()), literal(key))),
            (None, Some(label)) => Some((None, literal(label))),
            (None, None) if bound => Some((None, Arc::new(Label::new(value_ref.clone())) as ExpressionRef)),
            (None, None) => None,
        };
        if let Some((label_id, expression)) = label {
            let atom = self.atom(ComponentType::Label, label_id, expression, &style, &frame)?;
            container.set_label(atom)?;
        }

        let icon = match &definition.icon {
            Some(icon) => Some(literal(icon)),
            None if value_ref.category().is_some() => {
                Some(Arc::new(Category::new(value_ref.clone())) as ExpressionRef)
            }
            None => None,
        };
        if let Some(expression) = icon {
            let atom = self.atom(ComponentType::Icon, None, expression, &style, &frame)?;
            container.set_icon(atom)?;
        }

        let kind = definition.kind;
        let missing_source = || RenderError::MissingSource {
            id: container.id().to_string(),
            kind,
        };
        let value: Option<ExpressionRef> = match kind {
            ComponentType::Label => None,
            ComponentType::Switch | ComponentType::Selection => {
                if value_ref.variable_type() != VariableType::Item {
                    return Err(missing_source());
                }
                let mappings = definition
                    .mappings
                    .iter()
                    .map(|m| (m.key.clone(), m.label.clone()))
                    .collect();
                Some(Arc::new(Options::new(resolver.options(value_ref.clone(), mappings))) as ExpressionRef)
            }
            ComponentType::Text => {
                if !bound {
                    return Err(missing_source());
                }
                Some(Arc::new(Formatted::new(value_ref.clone())) as ExpressionRef)
            }
            ComponentType::Slider | ComponentType::Colorpicker | ComponentType::Mapview => {
                if !bound {
                    return Err(missing_source());
                }
                Some(Arc::new(Reference::new(value_ref.clone())) as ExpressionRef)
            }
            ComponentType::Group => {
                if value_ref.variable_type() != VariableType::Item {
                    return Err(missing_source());
                }
                self.build_group(&container, &value_ref, &style, &frame)?;
                None
            }
            ComponentType::Icon
            | ComponentType::Sitemap
            | ComponentType::Frame
            | ComponentType::Page
            | ComponentType::Widget => return Err(RenderError::UnsupportedWidget { kind }),
        };
        if let Some(expression) = value {
            let atom = self.atom(kind, None, expression, &style, &frame)?;
            container.add_child(atom)?;
        }

        self.pass.container_state(
            container.clone(),
            Some(style),
            self.frame(parent, value_ref),
        )?;
        Ok(container)
    }

    /// A GROUP atom linking to a PAGE with one text widget per member.
    fn build_group(
        &self,
        widget: &ComponentRef,
        group: &ValueReference,
        style: &StyleExpressions,
        frame: &Frame,
    ) -> Result<(), RenderError> {
        let page_id = self.pass.ids().auto_id(ComponentType::Page);
        let link = literal_value(Value::Uri(format!("{}/{}", self.root.id(), page_id)));
        let atom = self.atom(ComponentType::Group, None, link, style, frame)?;
        widget.add_child(atom)?;

        let page = Arc::new(Component::container(page_id, ComponentType::Page, None)?);
        let page_frame = self.frame(&page, group.clone());
        let title = self.atom(
            ComponentType::Label,
            None,
            Arc::new(Label::new(group.clone())),
            &BTreeMap::new(),
            &page_frame,
        )?;
        page.set_label(title)?;

        for member in self.pass.resolver().members(group)? {
            let definition = WidgetDefinition {
                kind: ComponentType::Text,
                id: None,
                item: member.id().map(str::to_string),
                thing: None,
                label: None,
                label_key: None,
                icon: None,
                mappings: Vec::new(),
                layout: None,
                style: BTreeMap::new(),
            };
            page.add_child(self.build_widget(&page, &definition)?)?;
        }
        self.pass.container_state(page.clone(), None, frame.clone())?;
        widget.add_child(page)?;
        Ok(())
    }

    fn atom(
        &self,
        kind: ComponentType,
        id: Option<String>,
        data: ExpressionRef,
        style: &StyleExpressions,
        frame: &Frame,
    ) -> Result<ComponentRef, RenderError> {
        let id = id.unwrap_or_else(|| self.pass.ids().auto_id(kind));
        let atom = Arc::new(Component::atom(id, kind)?);
        self.pass
            .atom_state(atom.clone(), data, Some(style.clone()), frame.clone())?;
        Ok(atom)
    }

    fn frame(&self, container: &ComponentRef, value_ref: ValueReference) -> Frame {
        Frame {
            sitemap: Some(self.root.clone()),
            container: Some(container.clone()),
            value_ref,
        }
    }

    fn style(&self, rules: &BTreeMap<String, StyleRule>) -> Result<StyleExpressions, RenderError> {
        rules
            .iter()
            .map(|(name, rule)| Ok((name.clone(), self.style_expression(rule)?)))
            .collect()
    }

    fn style_expression(&self, rule: &StyleRule) -> Result<ExpressionRef, RenderError> {
        match rule {
            StyleRule::Literal(value) => Ok(literal(value)),
            StyleRule::Conditional {
                item,
                equals,
                then,
                otherwise,
            } => {
                let reference = self.pass.resolver().item(Some(item))?;
                let otherwise = match otherwise {
                    Some(value) => literal(value),
                    None => literal_value(Value::Null),
                };
                Ok(Arc::new(Conditional::new(
                    Arc::new(Reference::new(reference)),
                    equals.as_str(),
                    literal(then),
                    otherwise,
                )))
            }
        }
    }
}

fn literal(text: &str) -> ExpressionRef {
    Arc::new(Literal::text(text))
}

fn literal_value(value: Value) -> ExpressionRef {
    Arc::new(Literal::new(value))
}
