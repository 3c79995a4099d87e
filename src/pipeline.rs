//! Font Pipeline - Single Entry Point
//!
//! cache hit -> rules straight from the cache file
//! cache miss -> discover -> resolve -> build rules -> (optionally) store cache

use thiserror::Error;

use crate::cache::{CacheDocument, CacheError, FontCache};
use crate::config::Settings;
use crate::discovery::discover_all;
use crate::metadata::{FontError, FontLoader, TtfLoader};
use crate::resolver::{prepare_fonts, ResolvedFont};
use crate::rules::{create_font_classes, create_font_faces, FontClass, StyleRuleSet};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Font discovery failed: {0}")]
    Discovery(#[from] std::io::Error),

    #[error(transparent)]
    Font(#[from] FontError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

pub struct FontPipeline {
    settings: Settings,
    loader: Box<dyn FontLoader>,
    cache: Option<FontCache>,
}

impl FontPipeline {
    /// Caching follows `settings.build_performance`
    pub fn new(settings: Settings) -> Self {
        let cache = settings
            .build_performance
            .then(|| FontCache::new(settings.cache_file.clone()));

        Self {
            settings,
            loader: Box::new(TtfLoader),
            cache,
        }
    }

    pub fn with_loader(mut self, loader: impl FontLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Use an explicit cache store, enabling caching
    pub fn with_cache(mut self, cache: FontCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Discover and resolve every configured font, ignoring the cache
    pub fn resolve_fonts(&self) -> Result<Vec<ResolvedFont>, PipelineError> {
        let files = discover_all(&self.settings.font_paths)?;
        tracing::info!(
            "Discovered {} font files in {} directories",
            files.len(),
            self.settings.font_paths.len()
        );

        Ok(prepare_fonts(
            &files,
            self.loader.as_ref(),
            &self.settings.destination_path,
        )?)
    }

    /// Produce the rule set, through the cache when one is configured
    pub fn run(&self) -> Result<StyleRuleSet, PipelineError> {
        if let Some(cache) = &self.cache {
            if let Some(document) = cache.load()? {
                tracing::info!(
                    "Using cached fonts from {} ({} fonts)",
                    cache.path().display(),
                    document.fonts.len()
                );
                return Ok(rules_from_cache(&document));
            }
        }

        let fonts = self.resolve_fonts()?;
        let classes: Vec<FontClass> = if self.settings.auto_classes {
            fonts.iter().map(FontClass::from).collect()
        } else {
            vec![]
        };

        let rules = StyleRuleSet {
            font_face_rules: create_font_faces(&fonts, self.settings.web_performance),
            utility_class_rules: create_font_classes(&classes, &self.settings.fallback, false),
        };

        if let Some(cache) = &self.cache {
            let document = CacheDocument {
                fonts,
                web_performance: self.settings.web_performance,
                classes: classes.iter().map(FontClass::slugged).collect(),
                fallback: self.settings.fallback.clone(),
            };
            cache.store(&document)?;
            tracing::info!("Wrote font cache to {}", cache.path().display());
        }

        tracing::info!(
            "Generated {} @font-face rules and {} utility classes",
            rules.font_face_rules.len(),
            rules.utility_class_rules.len()
        );
        Ok(rules)
    }
}

/// Rebuild rules from a cache document without touching the filesystem
pub fn rules_from_cache(document: &CacheDocument) -> StyleRuleSet {
    StyleRuleSet {
        font_face_rules: create_font_faces(&document.fonts, document.web_performance),
        utility_class_rules: create_font_classes(&document.classes, &document.fallback, true),
    }
}

impl Default for FontPipeline {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
