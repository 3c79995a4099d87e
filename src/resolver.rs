//! Metadata Resolver
//!
//! Binary metadata wins; filename keywords are the fallback.

use serde::{Deserialize, Serialize};

use crate::descriptors::{self, FontStretch, FontStyle, FontWeight};
use crate::discovery::{FontFile, FontFormat};
use crate::metadata::{FontError, FontLoader, FontMetadata};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFont {
    pub name: String,
    pub weight: FontWeight,
    pub style: FontStyle,
    pub stretch: FontStretch,
    pub format: FontFormat,
    /// Public path under the destination, e.g. "/assets/fonts/Roboto-Bold.ttf"
    pub path: String,
}

/// Resolve one font from its file record and parsed metadata
pub fn resolve_font(
    file: &FontFile,
    font: &dyn FontMetadata,
    destination_path: &str,
) -> ResolvedFont {
    ResolvedFont {
        name: common_name(file, font),
        weight: font_weight(file, font),
        style: font_style(file, font),
        stretch: font_stretch(file, font),
        format: file.format,
        path: format!("{}/{}.{}", destination_path, file.name, file.extension),
    }
}

/// Load and resolve every file in order; the first unparseable font aborts
pub fn prepare_fonts(
    files: &[FontFile],
    loader: &dyn FontLoader,
    destination_path: &str,
) -> Result<Vec<ResolvedFont>, FontError> {
    files
        .iter()
        .map(|file| {
            let font = loader.load(file)?;
            let resolved = resolve_font(file, font.as_ref(), destination_path);
            tracing::debug!(
                "Resolved {} as \"{}\" {} {} {}",
                file.path.display(),
                resolved.name,
                resolved.weight,
                resolved.style,
                resolved.stretch
            );
            Ok(resolved)
        })
        .collect()
}

/// Family name with weight/style/stretch words removed
pub fn common_name(file: &FontFile, font: &dyn FontMetadata) -> String {
    let raw = [font.family_name(), font.full_name(), font.preferred_family()]
        .into_iter()
        .flatten()
        .find(|name| !name.trim().is_empty())
        .unwrap_or(file.name.as_str());

    strip_descriptors(raw)
}

pub fn strip_descriptors(name: &str) -> String {
    descriptors::descriptor_pattern()
        .replace_all(name, "")
        .trim_matches(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .to_string()
}

fn font_weight(file: &FontFile, font: &dyn FontMetadata) -> FontWeight {
    font.weight_class()
        .and_then(FontWeight::from_class)
        .or_else(|| descriptors::weight_in_name(&file.name))
        .unwrap_or_default()
}

// Each signal is checked on its own: a clear italic bit does not veto the angle.
fn font_style(file: &FontFile, font: &dyn FontMetadata) -> FontStyle {
    let italic_bit = font.is_italic().unwrap_or(false);
    let slanted = font.italic_angle().is_some_and(|angle| angle != 0.0);

    if italic_bit || slanted {
        return FontStyle::Italic;
    }

    descriptors::style_in_name(&file.name).unwrap_or_default()
}

fn font_stretch(file: &FontFile, font: &dyn FontMetadata) -> FontStretch {
    if let Some(stretch) = font.width_class().and_then(FontStretch::from_index) {
        return stretch;
    }

    descriptors::stretch_in_name(&file.name).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::FaceMetadata;
    use std::path::Path;

    fn file(name: &str) -> FontFile {
        FontFile::from_file_name(Path::new("src/fonts"), name).unwrap()
    }

    #[test]
    fn test_filename_only_bold() {
        let resolved = resolve_font(&file("Roboto-Bold.ttf"), &FaceMetadata::default(), "/assets/fonts");

        assert_eq!(resolved.name, "Roboto");
        assert_eq!(resolved.weight, FontWeight::Bold);
        assert_eq!(resolved.style, FontStyle::Normal);
        assert_eq!(resolved.stretch, FontStretch::Normal);
        assert_eq!(resolved.format, FontFormat::Truetype);
        assert_eq!(resolved.path, "/assets/fonts/Roboto-Bold.ttf");
    }

    #[test]
    fn test_weight_class_as_index() {
        let meta = FaceMetadata {
            weight_class: Some(3),
            ..Default::default()
        };
        let resolved = resolve_font(&file("Mystery.otf"), &meta, "/f");
        assert_eq!(resolved.weight, FontWeight::Light);
        assert_eq!(resolved.weight.value(), 300);
    }

    #[test]
    fn test_binary_weight_beats_filename() {
        let meta = FaceMetadata {
            weight_class: Some(500),
            ..Default::default()
        };
        let resolved = resolve_font(&file("Roboto-Bold.ttf"), &meta, "/f");
        assert_eq!(resolved.weight, FontWeight::Medium);
    }

    #[test]
    fn test_binary_names_in_order() {
        let meta = FaceMetadata {
            family_name: Some("  ".to_string()),
            full_name: Some("Source Serif SemiBold Italic".to_string()),
            preferred_family: Some("Source Serif 4".to_string()),
            ..Default::default()
        };
        assert_eq!(common_name(&file("SS.woff"), &meta), "Source Serif");
    }

    #[test]
    fn test_strip_descriptors() {
        assert_eq!(strip_descriptors("Inter-Regular"), "Inter");
        assert_eq!(strip_descriptors("Open Sans Extra Light"), "Open Sans");
        assert_eq!(strip_descriptors("Roboto_CondensedBold"), "Roboto");
        assert_eq!(strip_descriptors("Fira Code"), "Fira Code");
    }

    #[test]
    fn test_italic_signals_are_independent() {
        let angle_only = FaceMetadata {
            italic: Some(false),
            italic_angle: Some(-12.0),
            ..Default::default()
        };
        assert_eq!(resolve_font(&file("Lora.ttf"), &angle_only, "/f").style, FontStyle::Italic);

        let keyword_only = FaceMetadata {
            italic: Some(false),
            italic_angle: Some(0.0),
            ..Default::default()
        };
        assert_eq!(
            resolve_font(&file("Lora-Oblique.ttf"), &keyword_only, "/f").style,
            FontStyle::Oblique
        );
        assert_eq!(resolve_font(&file("Lora.ttf"), &keyword_only, "/f").style, FontStyle::Normal);
    }

    #[test]
    fn test_stretch_from_width_class_then_filename() {
        let condensed = FaceMetadata {
            width_class: Some(2),
            ..Default::default()
        };
        assert_eq!(
            resolve_font(&file("Roboto-Expanded.ttf"), &condensed, "/f").stretch,
            FontStretch::ExtraCondensed
        );
        assert_eq!(
            resolve_font(&file("Roboto-SemiExpanded.ttf"), &FaceMetadata::default(), "/f").stretch,
            FontStretch::SemiExpanded
        );
    }
}
