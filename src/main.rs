use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;
use tokio::sync::broadcast::{self, error::TryRecvError};

use sitemap_render::component::ComponentSnapshot;
use sitemap_render::config::Config;
use sitemap_render::definition::{DefinitionStore, DefinitionTransformer};
use sitemap_render::driver::{SitemapRenderer, SitemapRenderingDriver};
use sitemap_render::events::{EventBus, EventPublisher, SitemapEvent, SitemapEventFactory};
use sitemap_render::i18n::BundleTranslationProvider;
use sitemap_render::logging;
use sitemap_render::source::{
    ItemDefinition, ItemRegistry, MemoryItemRegistry, MemoryThingRegistry, State, Thing,
    ThingDefinition,
};

#[derive(Parser)]
#[command(
    name = "sitemap-render",
    about = "Render a sitemap and print the events caused by item updates"
)]
struct Cli {
    /// Sitemap definition file (`<name>.sitemap`)
    sitemap: PathBuf,

    /// Items and things, as `[[item]]` and `[[thing]]` TOML tables
    #[arg(long)]
    sources: Option<PathBuf>,

    /// Config file (default: the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of translation bundles
    #[arg(long)]
    translations: Option<PathBuf>,

    /// Item update applied after rendering; repeatable
    #[arg(long = "set", value_name = "ITEM=STATE")]
    updates: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SourceFile {
    #[serde(default, rename = "item")]
    items: Vec<ItemDefinition>,
    #[serde(default, rename = "thing")]
    things: Vec<ThingDefinition>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    logging::init_tracing(&config.logging.filter);

    let items = Arc::new(MemoryItemRegistry::new());
    let things = Arc::new(MemoryThingRegistry::new());
    if let Some(path) = &cli.sources {
        load_sources(path, &items, &things)?;
    }

    let translations = Arc::new(BundleTranslationProvider::new());
    if let Some(dir) = cli
        .translations
        .as_ref()
        .or(config.paths.translations_dir.as_ref())
    {
        let bundles = translations.load_dir(dir)?;
        tracing::info!(dir = %dir.display(), bundles, "Translations loaded");
    }

    let driver = Arc::new(
        SitemapRenderingDriver::new(items.clone(), things, translations)
            .with_icon_path(config.rendering.icon_path.as_str()),
    );
    let bus = EventBus::new(config.events.channel_capacity);
    let mut events = bus.subscribe();
    let factory = SitemapEventFactory::new(
        config.rendering.sitemap_type.as_str(),
        config.rendering.topic_root.as_str(),
    );
    driver.add_subscriber(Arc::new(EventPublisher::new(factory, bus)));

    let store = Arc::new(DefinitionStore::new());
    store.add_listener(driver.clone());
    if let Some(dir) = &config.paths.sitemaps_dir {
        let loaded = store.load_dir(dir)?;
        tracing::info!(dir = %dir.display(), sitemaps = loaded, "Sitemap definitions loaded");
    }
    let name = store.load_file(&cli.sitemap)?;
    let transformer = Arc::new(DefinitionTransformer::new(store.clone()));
    let renderer = SitemapRenderer::new(driver.clone(), transformer);

    let model = renderer
        .get(&name)
        .with_context(|| format!("Failed to render sitemap '{}'", name))?;
    let snapshot = ComponentSnapshot::capture(model.sitemap());
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    print_events(&mut events)?;

    for update in &cli.updates {
        let Some((item_name, value)) = update.split_once('=') else {
            bail!("Invalid update '{}', expected ITEM=STATE", update);
        };
        let Some(item) = items.get_item(item_name) else {
            bail!("Unknown item '{}'", item_name);
        };
        let state = State::parse(item.item_type(), value)?;
        if let Some(event) = items.update_state(item_name, state) {
            driver.receive(&event.into());
        }
        print_events(&mut events)?;
    }
    Ok(())
}

fn load_sources(
    path: &Path,
    items: &MemoryItemRegistry,
    things: &MemoryThingRegistry,
) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read sources '{}'", path.display()))?;
    let sources: SourceFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse sources '{}'", path.display()))?;

    let (item_count, thing_count) = (sources.items.len(), sources.things.len());
    for definition in sources.items {
        items.add(definition.into_item()?);
    }
    for definition in sources.things {
        things.add(Thing::from(definition));
    }
    tracing::info!(items = item_count, things = thing_count, "Sources loaded");
    Ok(())
}

/// Print pending events as JSON lines.
fn print_events(events: &mut broadcast::Receiver<SitemapEvent>) -> Result<()> {
    loop {
        match events.try_recv() {
            Ok(event) => println!("{}", serde_json::to_string(&event)?),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event receiver lagged");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => return Ok(()),
        }
    }
}
