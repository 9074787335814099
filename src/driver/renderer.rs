use std::sync::Arc;

use super::{RenderError, RenderingModel, SitemapRenderingDriver, SitemapTransformer};

/// Serves rendering models, rendering a sitemap on its first request.
pub struct SitemapRenderer {
    driver: Arc<SitemapRenderingDriver>,
    transformer: Arc<dyn SitemapTransformer>,
}

impl SitemapRenderer {
    pub fn new(driver: Arc<SitemapRenderingDriver>, transformer: Arc<dyn SitemapTransformer>) -> Self {
        Self { driver, transformer }
    }

    pub fn driver(&self) -> &Arc<SitemapRenderingDriver> {
        &self.driver
    }

    /// Cached model of `name`, rendered first if it is not cached.
    pub fn get(&self, name: &str) -> Result<Arc<RenderingModel>, RenderError> {
        if let Some(model) = self.driver.get_rendering_model_from_cache(name) {
            tracing::trace!(sitemap = %name, "Rendering model served from cache");
            return Ok(model);
        }
        let pass = self.driver.create_workflow(name);
        self.driver.render_sitemap(pass, self.transformer.as_ref())
    }
}
