//! Binary Font Metadata
//!
//! The resolver only sees the [`FontMetadata`] capability. Parsing itself is
//! delegated to `ttf-parser` through [`TtfLoader`].

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use ttf_parser::{name_id, Face, Language, Style};

use crate::container::{self, ContainerError};
use crate::discovery::FontFile;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("Failed to read font {file}: {source}", file = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to unpack font {file}: {source}", file = .path.display())]
    Container {
        path: PathBuf,
        #[source]
        source: ContainerError,
    },

    #[error("Failed to parse font {file}: {reason}", file = .path.display())]
    Parse { path: PathBuf, reason: String },
}

/// Naming and classification fields read from a font's header tables
///
/// Every lookup is optional: a field the font does not carry is `None`.
pub trait FontMetadata {
    /// Name ID 1
    fn family_name(&self) -> Option<&str>;
    /// Name ID 4
    fn full_name(&self) -> Option<&str>;
    /// Name ID 16
    fn preferred_family(&self) -> Option<&str>;
    /// OS/2 usWeightClass
    fn weight_class(&self) -> Option<u16>;
    /// OS/2 usWidthClass
    fn width_class(&self) -> Option<u16>;
    /// OS/2 fsSelection italic bit
    fn is_italic(&self) -> Option<bool>;
    /// post italicAngle
    fn italic_angle(&self) -> Option<f32>;
}

/// Owned snapshot of the metadata of one face
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceMetadata {
    pub family_name: Option<String>,
    pub full_name: Option<String>,
    pub preferred_family: Option<String>,
    pub weight_class: Option<u16>,
    pub width_class: Option<u16>,
    pub italic: Option<bool>,
    pub italic_angle: Option<f32>,
}

impl FaceMetadata {
    /// Parse sfnt, WOFF or WOFF2 bytes
    pub fn from_data(path: &Path, data: &[u8]) -> Result<Self, FontError> {
        let sfnt = container::to_sfnt(data).map_err(|source| FontError::Container {
            path: path.to_path_buf(),
            source,
        })?;
        let face = Face::parse(&sfnt, 0).map_err(|e| FontError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_face(&face))
    }

    pub fn from_face(face: &Face<'_>) -> Self {
        let os2 = face.tables().os2.as_ref();

        Self {
            family_name: english_name(face, name_id::FAMILY),
            full_name: english_name(face, name_id::FULL_NAME),
            preferred_family: english_name(face, name_id::TYPOGRAPHIC_FAMILY),
            weight_class: os2.map(|table| table.weight().to_number()),
            width_class: os2.map(|table| table.width().to_number()),
            italic: os2.map(|table| table.style() == Style::Italic),
            italic_angle: face.tables().post.as_ref().map(|table| table.italic_angle),
        }
    }
}

/// Prefer the en-US record, otherwise the first decodable one
fn english_name(face: &Face<'_>, id: u16) -> Option<String> {
    let mut fallback = None;
    for name in face.names() {
        if name.name_id != id {
            continue;
        }
        let Some(value) = name.to_string() else {
            continue;
        };
        if name.language() == Language::English_UnitedStates {
            return Some(value);
        }
        fallback.get_or_insert(value);
    }
    fallback
}

impl FontMetadata for FaceMetadata {
    fn family_name(&self) -> Option<&str> {
        self.family_name.as_deref()
    }

    fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    fn preferred_family(&self) -> Option<&str> {
        self.preferred_family.as_deref()
    }

    fn weight_class(&self) -> Option<u16> {
        self.weight_class
    }

    fn width_class(&self) -> Option<u16> {
        self.width_class
    }

    fn is_italic(&self) -> Option<bool> {
        self.italic
    }

    fn italic_angle(&self) -> Option<f32> {
        self.italic_angle
    }
}

/// Produces metadata for a discovered font file
pub trait FontLoader {
    fn load(&self, file: &FontFile) -> Result<Box<dyn FontMetadata>, FontError>;
}

/// Reads the file from disk and parses it with `ttf-parser`
#[derive(Debug, Clone, Copy, Default)]
pub struct TtfLoader;

impl FontLoader for TtfLoader {
    fn load(&self, file: &FontFile) -> Result<Box<dyn FontMetadata>, FontError> {
        let data = fs::read(&file.path).map_err(|source| FontError::Io {
            path: file.path.clone(),
            source,
        })?;
        let metadata = FaceMetadata::from_data(&file.path, &data)?;
        tracing::debug!(
            "Parsed {}: family={:?} weight={:?} width={:?}",
            file.path.display(),
            metadata.family_name,
            metadata.weight_class,
            metadata.width_class
        );
        Ok(Box::new(metadata))
    }
}
