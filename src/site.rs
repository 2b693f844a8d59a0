use anyhow::Context as _;

use crate::config::SiteConfig;
use crate::metadata::{PageMetadata, build_metadata, default_metadata};
use crate::page::compose_landing;
use crate::render::Document;
use crate::scripts::ScriptCatalog;
use crate::viewport::{VIEWPORT, ViewportConfig};

/// Validated startup state. Shared read-only by every document build.
#[derive(Debug, Clone)]
pub struct Site {
    config: SiteConfig,
    viewport: ViewportConfig,
    scripts: ScriptCatalog,
}

impl Site {
    pub fn new(config: SiteConfig) -> anyhow::Result<Self> {
        Self::with_viewport(config, VIEWPORT)
    }

    pub fn with_viewport(config: SiteConfig, viewport: ViewportConfig) -> anyhow::Result<Self> {
        viewport.validate().context("validate viewport")?;
        default_metadata(&config)
            .title
            .validate()
            .context("validate title")?;
        let scripts = ScriptCatalog::from_config(&config).context("build script catalog")?;

        tracing::info!(
            base_url = %config.base_url,
            profile = ?config.profile,
            analytics = config.analytics_id.is_some(),
            scripts = scripts.directives().len(),
            "site configured"
        );

        Ok(Self {
            config,
            viewport,
            scripts,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn document(&self, page: &PageMetadata) -> Document {
        Document {
            metadata: build_metadata(&self.config, page),
            viewport: self.viewport.clone(),
            scripts: self.scripts.plan(self.config.profile),
            body: compose_landing(),
        }
    }

    pub fn render(&self, page: &PageMetadata) -> String {
        self.document(page).to_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildProfile, FALLBACK_BASE_URL};
    use crate::metadata::DEFAULT_TITLE;
    use crate::scripts::ScriptSource;

    #[test]
    fn rejects_invalid_viewport_at_startup() {
        let viewport = ViewportConfig {
            initial_scale: 3.0,
            maximum_scale: 2.0,
            ..VIEWPORT
        };
        let err = Site::with_viewport(SiteConfig::default(), viewport).unwrap_err();
        assert!(format!("{err:#}").contains("validate viewport"));
    }

    #[test]
    fn unset_environment_uses_defaults() {
        let site = Site::new(SiteConfig::from_lookup(|_| None)).unwrap();
        let doc = site.document(&PageMetadata::default());

        assert_eq!(doc.metadata.title.resolved(), DEFAULT_TITLE);
        assert_eq!(doc.metadata.canonical_url(), format!("{FALLBACK_BASE_URL}/"));
        assert!(doc.scripts.iter().all(|s| !s.is_analytics()));
    }

    #[test]
    fn production_with_measurement_id_emits_analytics_in_order() {
        let site = Site::new(SiteConfig {
            analytics_id: Some("G-TEST123".to_string()),
            profile: BuildProfile::Production,
            ..SiteConfig::default()
        })
        .unwrap();
        let doc = site.document(&PageMetadata::default());

        let config_at = doc
            .scripts
            .iter()
            .position(|s| s.id == "google-analytics-config")
            .unwrap();
        let loader_at = doc
            .scripts
            .iter()
            .position(|s| s.id == "google-analytics")
            .unwrap();
        assert!(config_at < loader_at);
        assert!(matches!(
            &doc.scripts[config_at].source,
            ScriptSource::Inline(payload) if payload.contains("G-TEST123")
        ));
    }

    #[test]
    fn each_build_is_independent() {
        let site = Site::new(SiteConfig::default()).unwrap();
        let first = site.render(&PageMetadata::titled("One"));
        let second = site.render(&PageMetadata::default());
        assert!(first.contains("<title>One | Invoice Generator Pro</title>"));
        assert!(!second.contains("One | Invoice Generator Pro"));
    }
}
