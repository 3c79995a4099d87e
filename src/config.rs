//! Configuration - options as written by the user, and resolved settings

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_FONT_PATH: &str = "src/fonts";
pub const DEFAULT_DESTINATION_PATH: &str = "/assets/fonts";
pub const DEFAULT_FALLBACK: &str = "sans-serif";
pub const DEFAULT_CACHE_FILE: &str = "font-cache.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {file}: {1}", file = .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid config {file}: {1}", file = .0.display())]
    Parse(PathBuf, #[source] serde_json::Error),
}

/// One directory or several
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontPaths {
    Single(PathBuf),
    Many(Vec<PathBuf>),
}

impl FontPaths {
    pub fn to_vec(&self) -> Vec<PathBuf> {
        match self {
            FontPaths::Single(path) => vec![path.clone()],
            FontPaths::Many(paths) => paths.clone(),
        }
    }
}

/// Generic family appended to utility classes; `false` in JSON when disabled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    Family(String),
    Disabled,
}

impl Fallback {
    pub fn family(&self) -> Option<&str> {
        match self {
            Fallback::Family(family) if !family.is_empty() => Some(family.as_str()),
            _ => None,
        }
    }
}

impl Default for Fallback {
    fn default() -> Self {
        Fallback::Family(DEFAULT_FALLBACK.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFallback {
    Flag(bool),
    Family(String),
}

impl Serialize for Fallback {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.family() {
            Some(family) => serializer.serialize_str(family),
            None => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for Fallback {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawFallback::deserialize(deserializer)? {
            RawFallback::Flag(true) => Fallback::default(),
            RawFallback::Flag(false) => Fallback::Disabled,
            RawFallback::Family(family) if family.is_empty() => Fallback::Disabled,
            RawFallback::Family(family) => Fallback::Family(family),
        })
    }
}

/// User options, every field optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub local_font_path: Option<FontPaths>,
    #[serde(default)]
    pub destination_path: Option<String>,
    #[serde(default)]
    pub auto_classes: Option<bool>,
    #[serde(default)]
    pub web_performance: Option<bool>,
    #[serde(default)]
    pub build_performance: Option<bool>,
    #[serde(default)]
    pub fallback: Option<Fallback>,
    #[serde(default)]
    pub cache_file: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    /// Apply defaults
    pub fn resolve(&self) -> Settings {
        let auto_classes = self.auto_classes.unwrap_or(false);
        let fallback = if auto_classes {
            self.fallback.clone().unwrap_or_default()
        } else {
            Fallback::Disabled
        };

        Settings {
            font_paths: self
                .local_font_path
                .as_ref()
                .map(FontPaths::to_vec)
                .unwrap_or_else(|| vec![PathBuf::from(DEFAULT_FONT_PATH)]),
            destination_path: self
                .destination_path
                .clone()
                .unwrap_or_else(|| DEFAULT_DESTINATION_PATH.to_string()),
            auto_classes,
            web_performance: self.web_performance.unwrap_or(false),
            build_performance: self.build_performance.unwrap_or(false),
            fallback,
            cache_file: self
                .cache_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_FILE)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub font_paths: Vec<PathBuf>,
    pub destination_path: String,
    pub auto_classes: bool,
    pub web_performance: bool,
    pub build_performance: bool,
    pub fallback: Fallback,
    pub cache_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Config::default().resolve()
    }
}
