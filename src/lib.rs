//! Sitemap rendering state engine.
//!
//! A sitemap definition is transformed into a tree of display components.
//! Every component gets a [`state::ComponentState`] that knows which items,
//! things and sitemaps its data and style depend on. Source change events
//! delivered to the [`driver::SitemapRenderingDriver`] reach every cached
//! rendering model; the affected components recompute, and subscribers are
//! told about values that actually changed.

pub mod component;
pub mod config;
pub mod definition;
pub mod driver;
pub mod events;
pub mod expression;
pub mod i18n;
pub mod logging;
pub mod reference;
pub mod sets;
pub mod source;
pub mod state;
