//! File Discovery - font files in a source directory
//!
//! Directories are scanned non-recursively. A missing directory yields no
//! fonts rather than an error.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extensions picked up by the scan, compared case-sensitively
pub const FONT_EXTENSIONS: [&str; 4] = ["woff", "woff2", "ttf", "otf"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFormat {
    Truetype,
    Opentype,
    Woff,
    Woff2,
}

impl FontFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "ttf" => Some(FontFormat::Truetype),
            "otf" => Some(FontFormat::Opentype),
            "woff" => Some(FontFormat::Woff),
            "woff2" => Some(FontFormat::Woff2),
            _ => None,
        }
    }

    /// Keyword used in `format()` of a `src` descriptor
    pub fn as_str(self) -> &'static str {
        match self {
            FontFormat::Truetype => "truetype",
            FontFormat::Opentype => "opentype",
            FontFormat::Woff => "woff",
            FontFormat::Woff2 => "woff2",
        }
    }
}

impl fmt::Display for FontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontFile {
    /// File name without its final extension, e.g. "Roboto-Bold"
    pub name: String,
    pub path: PathBuf,
    pub extension: String,
    #[serde(rename = "type")]
    pub format: FontFormat,
}

impl FontFile {
    /// Build a record from a file name, or `None` when it is not a font
    pub fn from_file_name(dir: &Path, file_name: &str) -> Option<Self> {
        let (name, extension) = file_name.rsplit_once('.')?;
        let format = FontFormat::from_extension(extension)?;

        Some(Self {
            name: name.to_string(),
            path: dir.join(file_name),
            extension: extension.to_string(),
            format,
        })
    }
}

/// List the font files in `dir`, in directory listing order
pub fn discover_fonts(dir: &Path) -> Result<Vec<FontFile>, io::Error> {
    if !dir.exists() {
        tracing::warn!("Font directory {} does not exist, skipping", dir.display());
        return Ok(vec![]);
    }

    let mut files = vec![];
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            tracing::warn!(
                "Skipping {}: file name is not valid UTF-8",
                dir.join(&file_name).display()
            );
            continue;
        };

        if let Some(file) = FontFile::from_file_name(dir, file_name) {
            tracing::debug!("Discovered {} font {}", file.format, file.path.display());
            files.push(file);
        }
    }

    Ok(files)
}

/// Scan several directories, concatenating results in argument order
pub fn discover_all<P: AsRef<Path>>(dirs: &[P]) -> Result<Vec<FontFile>, io::Error> {
    let mut files = vec![];
    for dir in dirs {
        files.extend(discover_fonts(dir.as_ref())?);
    }
    Ok(files)
}
