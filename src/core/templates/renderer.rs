//! Two-tier template rendering with memoization.
//!
//! `render` resolves a template id against the render cache first, then
//! the backing store, and finally the built-in default generators. Source
//! text found in the store goes through a single Tera pass with
//! auto-escaping disabled (the output is source code, not markup) and the
//! result is cached under the canonical (template id, render data) key.
//! A missing source is not a failure; a malformed one is, and the error
//! carries the template id it came from.

// Internal imports (std, crate)
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use log::debug;
use tera::Tera;

use super::cache::{CacheStats, RenderCache};
use super::context::RenderData;
use super::defaults;
use super::registry::TemplateRegistry;
use super::source::TemplateSource;
use crate::core::error::{Error, Result};

/// Cache-fronted renderer over a template source store
pub struct TemplateRenderer {
    registry: Arc<TemplateRegistry>,
    store: Arc<dyn TemplateSource>,
    cache: RenderCache,
    /// Renders that actually executed the templating pass (cache misses
    /// with a backing source); fallback content is not counted
    source_renders: AtomicU64,
    cache_requests: AtomicU64,
    cache_hits: AtomicU64,
}

impl TemplateRenderer {
    /// Create a renderer with the default cache expiry window
    pub fn new(registry: Arc<TemplateRegistry>, store: Arc<dyn TemplateSource>) -> Self {
        Self::with_cache_expiry(registry, store, super::cache::DEFAULT_EXPIRY)
    }

    /// Create a renderer with a custom cache expiry window
    pub fn with_cache_expiry(
        registry: Arc<TemplateRegistry>,
        store: Arc<dyn TemplateSource>,
        expiry: Duration,
    ) -> Self {
        Self {
            registry,
            store,
            cache: RenderCache::with_expiry(expiry),
            source_renders: AtomicU64::new(0),
            cache_requests: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
        }
    }

    /// Produce final file text for a template id and render data.
    ///
    /// Within the expiry window, repeated calls with structurally equal
    /// data return the cached text without touching the store again.
    pub async fn render(&self, template_id: &str, data: &RenderData) -> Result<String> {
        let key = RenderCache::cache_key(template_id, data);
        self.cache_requests.fetch_add(1, Ordering::Relaxed);

        if let Some(content) = self.cache.get(&key) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            debug!("Render cache hit: {template_id}");
            return Ok(content);
        }

        match self.store.load(template_id).await? {
            Some(source_text) => {
                let content = self.render_source(template_id, &source_text, data)?;
                self.cache.put(&key, &content, data);
                Ok(content)
            }
            None => {
                debug!("No source for {template_id}, using built-in default content");
                let template = data
                    .get_str("template")
                    .and_then(|name| self.registry.get(name).ok());
                Ok(defaults::default_content(template_id, data, template))
            }
        }
    }

    fn render_source(&self, template_id: &str, source_text: &str, data: &RenderData) -> Result<String> {
        self.source_renders.fetch_add(1, Ordering::Relaxed);
        let context =
            tera::Context::from_value(data.to_value()).map_err(|e| Error::render(template_id, e))?;
        // Autoescape stays off: rendered files are TypeScript/JSON/YAML,
        // and HTML entities would corrupt them.
        Tera::one_off(source_text, &context, false).map_err(|e| Error::render(template_id, e))
    }

    /// Number of renders that executed the templating pass
    pub fn render_count(&self) -> u64 {
        self.source_renders.load(Ordering::Relaxed)
    }

    /// Percentage of render requests answered from the cache
    pub fn cache_hit_rate(&self) -> f64 {
        let requests = self.cache_requests.load(Ordering::Relaxed);
        if requests == 0 {
            return 0.0;
        }
        self.cache_hits.load(Ordering::Relaxed) as f64 / requests as f64 * 100.0
    }

    /// Diagnostic snapshot of the render cache
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop all cached renders
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::templates::source::MemoryTemplateSource;

    fn sample_data() -> RenderData {
        let mut data = RenderData::new();
        data.insert("name", "my-api");
        data.insert("description", "my-api - Express.js API");
        data.insert("author", "Nukta Solutions");
        data.insert("license", "MIT");
        data.insert("template", "basic");
        data
    }

    fn renderer_with(source: MemoryTemplateSource) -> TemplateRenderer {
        TemplateRenderer::new(
            Arc::new(TemplateRegistry::builtin().unwrap()),
            Arc::new(source),
        )
    }

    #[tokio::test]
    async fn test_render_substitutes_without_escaping() {
        let source = MemoryTemplateSource::new().with_template(
            "src/app/constants.ts.tera",
            "export const APP_NAME = \"{{ name }}\";\nexport const BLURB = `{{ description }}`;\n",
        );
        let renderer = renderer_with(source);

        let mut data = sample_data();
        data.insert("description", "a <strong> & \"quoted\" blurb");

        let content = renderer
            .render("src/app/constants.ts.tera", &data)
            .await
            .unwrap();
        assert!(content.contains("export const APP_NAME = \"my-api\";"));
        // Angle brackets, ampersands, and quotes must survive verbatim.
        assert!(content.contains("`a <strong> & \"quoted\" blurb`"));
    }

    #[tokio::test]
    async fn test_repeat_render_is_served_from_cache() {
        let source = MemoryTemplateSource::new()
            .with_template("src/server.ts.tera", "app.listen(); // {{ name }}");
        let renderer = renderer_with(source);
        let data = sample_data();

        let first = renderer.render("src/server.ts.tera", &data).await.unwrap();
        let second = renderer.render("src/server.ts.tera", &data).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(renderer.render_count(), 1);
        assert_eq!(renderer.cache_hit_rate(), 50.0);
    }

    #[tokio::test]
    async fn test_structurally_equal_data_hits_regardless_of_insertion_order() {
        let source = MemoryTemplateSource::new()
            .with_template("README.md.tera", "# {{ name }} by {{ author }}");
        let renderer = renderer_with(source);

        let mut forward = RenderData::new();
        forward.insert("name", "my-api");
        forward.insert("author", "Nukta Solutions");
        let mut reverse = RenderData::new();
        reverse.insert("author", "Nukta Solutions");
        reverse.insert("name", "my-api");

        renderer.render("README.md.tera", &forward).await.unwrap();
        renderer.render("README.md.tera", &reverse).await.unwrap();
        assert_eq!(renderer.render_count(), 1);
    }

    #[tokio::test]
    async fn test_different_data_misses_the_cache() {
        let source = MemoryTemplateSource::new()
            .with_template("src/server.ts.tera", "// {{ name }}");
        let renderer = renderer_with(source);

        let mut first = sample_data();
        renderer.render("src/server.ts.tera", &first).await.unwrap();
        first.insert("name", "other-api");
        renderer.render("src/server.ts.tera", &first).await.unwrap();

        assert_eq!(renderer.render_count(), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_renders_again() {
        let source = MemoryTemplateSource::new()
            .with_template("src/server.ts.tera", "// {{ name }}");
        let renderer = TemplateRenderer::with_cache_expiry(
            Arc::new(TemplateRegistry::builtin().unwrap()),
            Arc::new(source),
            Duration::from_millis(20),
        );
        let data = sample_data();

        renderer.render("src/server.ts.tera", &data).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        renderer.render("src/server.ts.tera", &data).await.unwrap();

        assert_eq!(renderer.render_count(), 2);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_a_fresh_render() {
        let source = MemoryTemplateSource::new()
            .with_template("src/server.ts.tera", "// {{ name }}");
        let renderer = renderer_with(source);
        let data = sample_data();

        renderer.render("src/server.ts.tera", &data).await.unwrap();
        renderer.clear_cache();
        renderer.render("src/server.ts.tera", &data).await.unwrap();

        assert_eq!(renderer.render_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_source_falls_back_to_manifest_generator() {
        let renderer = renderer_with(MemoryTemplateSource::new());
        let content = renderer
            .render("package.json.tera", &sample_data())
            .await
            .unwrap();

        let manifest: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(manifest["name"], "my-api");
        // The basic template's dependency map flows into the manifest.
        assert_eq!(manifest["dependencies"]["express"], "^4.18.2");
        assert!(manifest["dependencies"].get("mongoose").is_none());
    }

    #[tokio::test]
    async fn test_fallback_content_is_not_cached() {
        let renderer = renderer_with(MemoryTemplateSource::new());
        let data = sample_data();

        renderer.render("src/app.ts.tera", &data).await.unwrap();
        renderer.render("src/app.ts.tera", &data).await.unwrap();

        assert_eq!(renderer.render_count(), 0);
        assert_eq!(renderer.cache_stats().size, 0);
    }

    #[tokio::test]
    async fn test_fallback_placeholder_for_unrecognized_names() {
        let renderer = renderer_with(MemoryTemplateSource::new());
        let content = renderer
            .render("src/app/routes/index.ts.tera", &sample_data())
            .await
            .unwrap();
        assert_eq!(
            content,
            "// Generated file: index.ts\n// Template: src/app/routes/index.ts.tera\n"
        );
    }

    #[tokio::test]
    async fn test_malformed_source_is_a_render_error() {
        let source = MemoryTemplateSource::new()
            .with_template("src/app.ts.tera", "const x = {{ name ;");
        let renderer = renderer_with(source);

        let error = renderer
            .render("src/app.ts.tera", &sample_data())
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            crate::core::error::Error::Render { .. }
        ));
        assert!(
            error
                .to_string()
                .contains("Failed to render template \"src/app.ts.tera\"")
        );
        // Nothing malformed lands in the cache.
        assert_eq!(renderer.cache_stats().size, 0);
    }
}
