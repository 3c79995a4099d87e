//! LocalFonts Core - @font-face compiler for locally hosted fonts
//!
//! Scans font directories, reads family/weight/style/stretch from the font
//! binaries (falling back to file name keywords) and emits `@font-face`
//! rules plus optional `.font-*` utility classes.
//!
//! # Pipeline
//! 1. Cache gate: a stored run short-circuits everything below
//! 2. Discovery: `woff`, `woff2`, `ttf`, `otf` files per directory
//! 3. Resolution: binary metadata first, file name second
//! 4. Rule building
//! 5. Cache write, when build caching is enabled

pub mod cache;
pub mod config;
pub mod container;
pub mod descriptors;
pub mod discovery;
pub mod metadata;
pub mod pipeline;
pub mod resolver;
pub mod rules;

pub use cache::{CacheDocument, CacheError, FontCache};
pub use config::{Config, ConfigError, Fallback, FontPaths, Settings};
pub use descriptors::{FontStretch, FontStyle, FontWeight};
pub use discovery::{discover_all, discover_fonts, FontFile, FontFormat};
pub use metadata::{FaceMetadata, FontError, FontLoader, FontMetadata, TtfLoader};
pub use pipeline::{FontPipeline, PipelineError};
pub use resolver::{prepare_fonts, resolve_font, ResolvedFont};
pub use rules::{create_font_classes, create_font_faces, FontClass, StyleRule, StyleRuleSet};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
