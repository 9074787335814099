use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::convert::convert_value;
use super::{ExecutionContext, Frame, StateDependencyChangeListener, StateError};
use crate::component::{Component, ComponentRef, ComponentType, Data, StylePropertyValue};
use crate::events::{EventAction, SitemapEventSubscriber, Subscribers};
use crate::expression::{value_references, EvalContext, Expression, ExpressionRef, Value};
use crate::reference::VariableType;
use crate::source::{ItemStateChanged, ThingStatusChanged};

/// Sources whose change triggers a recompute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    pub items: HashSet<String>,
    pub things: HashSet<String>,
    pub sitemaps: HashSet<String>,
}

impl Dependencies {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.things.is_empty() && self.sitemaps.is_empty()
    }
}

/// Live state of one rendered component.
///
/// Dependencies are collected once, when the state is built. Afterwards a
/// change to any of them re-evaluates every style expression and, for
/// atoms, the data expression. The component is only mutated, and
/// subscribers only notified, when a value actually differs.
pub struct ComponentState {
    component: ComponentRef,
    data: Option<ExpressionRef>,
    styles: BTreeMap<String, ExpressionRef>,
    dependencies: Dependencies,
    frame: Frame,
    context: Arc<ExecutionContext>,
    subscribers: RwLock<Option<Subscribers>>,
    recomputes: AtomicU64,
}

impl ComponentState {
    /// Build the state of `component`, evaluating its initial data and
    /// style.
    ///
    /// Atoms need a data expression; containers take none. Style keys are
    /// filtered to those owned by the component type and stored without
    /// their prefix.
    pub fn new(
        component: ComponentRef,
        data: Option<ExpressionRef>,
        style: Option<BTreeMap<String, ExpressionRef>>,
        frame: Frame,
        context: Arc<ExecutionContext>,
    ) -> Result<Self, StateError> {
        match (component.is_atom(), &data) {
            (true, None) => {
                return Err(StateError::MissingDataExpression {
                    id: component.id().to_string(),
                })
            }
            (false, Some(_)) => {
                return Err(StateError::UnexpectedDataExpression {
                    id: component.id().to_string(),
                })
            }
            _ => {}
        }

        let styles = filter_styles(component.kind(), style.unwrap_or_default());
        let dependencies = collect_dependencies(component.id(), data.as_ref(), &styles)?;

        let state = Self {
            component,
            data,
            styles,
            dependencies,
            frame,
            context,
            subscribers: RwLock::new(None),
            recomputes: AtomicU64::new(0),
        };

        for (name, expression) in &state.styles {
            let value = state.evaluate_style(name, expression.as_ref());
            state.component.set_style_property(name.clone(), value);
        }
        if state.component.is_atom() {
            let value = state.recalculate_data();
            state.store_data(value);
        }

        tracing::trace!(
            component = %state.component.id(),
            items = state.dependencies.items.len(),
            things = state.dependencies.things.len(),
            styles = state.styles.len(),
            "Component state created"
        );
        Ok(state)
    }

    pub fn component(&self) -> &ComponentRef {
        &self.component
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Names of the style properties this state computes.
    pub fn style_names(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }

    /// How many times a dependency change triggered a recompute.
    pub fn recompute_count(&self) -> u64 {
        self.recomputes.load(Ordering::Relaxed)
    }

    pub(crate) fn set_subscribers(&self, subscribers: Option<Subscribers>) {
        *self.subscribers.write() = subscribers;
    }

    /// Text shown for the component.
    ///
    /// A label whose data equals its own id is looked up in the
    /// translations of the sitemap.
    pub fn display_value(&self, locale: Option<&str>) -> Option<String> {
        let data = self.component.data()?;
        let text = data.to_string();
        if self.component.kind() == ComponentType::Label && text == self.component.id() {
            let sitemap_id = self
                .frame
                .sitemap
                .as_ref()
                .map_or(self.component.id(), |s| s.id());
            return Some(self.context.resolver().translations().get_text(
                sitemap_id,
                self.component.id(),
                &text,
                locale,
                &[],
            ));
        }
        Some(text)
    }

    fn eval_context(&self) -> EvalContext<'_> {
        EvalContext {
            resolver: self.context.resolver(),
            sitemap: self.frame.sitemap.as_ref(),
            container: self.frame.container.as_ref(),
            component: &self.component,
            value_ref: &self.frame.value_ref,
        }
    }

    fn evaluate_style(&self, name: &str, expression: &dyn Expression) -> Option<StylePropertyValue> {
        match expression.evaluate(&self.eval_context()) {
            Ok(Value::Null) => None,
            Ok(value) => Some(StylePropertyValue::String(value.to_string())),
            Err(e) => {
                tracing::error!(
                    component = %self.component.id(),
                    style = %name,
                    error = %e,
                    "Style evaluation failed"
                );
                None
            }
        }
    }

    /// Evaluate and convert the data expression. Failures are logged and
    /// yield no value.
    fn recalculate_data(&self) -> Option<Data> {
        let expression = self.data.as_ref()?;
        let raw = match expression.evaluate(&self.eval_context()) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(component = %self.component.id(), error = %e, "Data evaluation failed");
                return None;
            }
        };
        match convert_value(
            self.component.kind(),
            raw,
            &self.frame.value_ref,
            self.context.icon_path(),
        ) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(component = %self.component.id(), error = %e, "Data conversion failed");
                None
            }
        }
    }

    fn store_data(&self, value: Option<Data>) -> Option<Data> {
        match self.component.set_data(value) {
            Ok(previous) => previous,
            Err(e) => {
                tracing::error!(component = %self.component.id(), error = %e, "Failed to set data");
                None
            }
        }
    }

    fn notify<F>(&self, notify: F)
    where
        F: Fn(&dyn SitemapEventSubscriber, &Component),
    {
        let Some(subscribers) = self.subscribers.read().clone() else {
            return;
        };
        let sitemap: &Component = self.frame.sitemap.as_deref().unwrap_or(&self.component);
        for subscriber in subscribers.snapshot() {
            notify(subscriber.as_ref(), sitemap);
        }
    }

    fn refresh_styles(&self) {
        for (name, expression) in &self.styles {
            let value = self.evaluate_style(name, expression.as_ref());
            if self.component.style_property(name) == value {
                continue;
            }
            self.component.set_style_property(name.clone(), value);
            self.notify(|subscriber, sitemap| {
                subscriber.style_changed(EventAction::Changed, sitemap, &self.component, name)
            });
        }
    }

    fn refresh_data(&self) {
        let value = self.recalculate_data();
        if self.component.data() == value {
            return;
        }
        let previous = self.store_data(value);
        tracing::debug!(component = %self.component.id(), "Atom data changed");
        self.notify(|subscriber, sitemap| {
            subscriber.atom_changed(
                EventAction::Changed,
                sitemap,
                self.frame.container.as_deref(),
                &self.component,
                previous.as_ref(),
            )
        });
    }

    /// Recompute under the model scope.
    fn handle_dependency_change(&self) {
        let _scope = self.context.lock_scope();
        self.recomputes.fetch_add(1, Ordering::Relaxed);
        self.refresh_styles();
        if self.component.is_atom() {
            self.refresh_data();
        }
    }
}

impl StateDependencyChangeListener for ComponentState {
    fn item_state_changed(&self, event: &ItemStateChanged) {
        if !self.dependencies.items.contains(&event.item_name) {
            return;
        }
        tracing::trace!(component = %self.component.id(), item = %event.item_name, "Dependency changed");
        self.handle_dependency_change();
    }

    fn thing_status_changed(&self, event: &ThingStatusChanged) {
        if !self.dependencies.things.contains(&event.thing_uid) {
            return;
        }
        tracing::trace!(component = %self.component.id(), thing = %event.thing_uid, "Dependency changed");
        self.handle_dependency_change();
    }
}

impl fmt::Debug for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentState")
            .field("component", &self.component.id())
            .field("kind", &self.component.kind())
            .field("dependencies", &self.dependencies)
            .field("styles", &self.styles.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn filter_styles(
    kind: ComponentType,
    style: BTreeMap<String, ExpressionRef>,
) -> BTreeMap<String, ExpressionRef> {
    style
        .into_iter()
        .filter_map(|(key, expression)| {
            kind.style_property(&key)
                .map(|name| (name.to_string(), expression))
        })
        .collect()
}

fn collect_dependencies(
    id: &str,
    data: Option<&ExpressionRef>,
    styles: &BTreeMap<String, ExpressionRef>,
) -> Result<Dependencies, StateError> {
    let mut dependencies = Dependencies::default();
    for expression in data.into_iter().chain(styles.values()) {
        for reference in value_references(expression.as_ref()) {
            let set = match reference.variable_type() {
                VariableType::Item => &mut dependencies.items,
                VariableType::Thing => &mut dependencies.things,
                VariableType::Sitemap => &mut dependencies.sitemaps,
                VariableType::None => {
                    return Err(StateError::UnboundReference { id: id.to_string() })
                }
            };
            if let Some(source) = reference.id() {
                set.insert(source.to_string());
            }
        }
    }
    Ok(dependencies)
}
