//! Build Cache - single JSON file holding a resolved run
//!
//! Written once, never invalidated: delete the file (or turn caching off)
//! to pick up changed fonts.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::Fallback;
use crate::resolver::ResolvedFont;
use crate::rules::FontClass;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error on {file}: {1}", file = .0.display())]
    Io(PathBuf, #[source] io::Error),

    #[error("Corrupt cache file {file}: {1}", file = .0.display())]
    Corrupt(PathBuf, #[source] serde_json::Error),
}

/// On-disk shape: `{fonts, webPerformance, classes, fallback}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheDocument {
    pub fonts: Vec<ResolvedFont>,
    pub web_performance: bool,
    /// Class names are stored already slugged
    pub classes: Vec<FontClass>,
    pub fallback: Fallback,
}

#[derive(Debug, Clone)]
pub struct FontCache {
    path: PathBuf,
}

impl FontCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when no cache has been written yet
    pub fn load(&self) -> Result<Option<CacheDocument>, CacheError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::Io(self.path.clone(), e)),
        };

        let document = serde_json::from_str(&content)
            .map_err(|e| CacheError::Corrupt(self.path.clone(), e))?;
        Ok(Some(document))
    }

    /// Overwrites any previous cache
    pub fn store(&self, document: &CacheDocument) -> Result<(), CacheError> {
        let json = serde_json::to_string(document)
            .map_err(|e| CacheError::Corrupt(self.path.clone(), e))?;
        fs::write(&self.path, json).map_err(|e| CacheError::Io(self.path.clone(), e))
    }
}
