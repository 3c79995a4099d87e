//! Descriptor Tables - CSS weight, style and stretch keywords
//!
//! Binary OS/2 values and filename keywords both land on these enums.
//! Ordering of the variants is significant: index-based lookups use it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum FontWeight {
    Thin,
    ExtraLight,
    Light,
    #[default]
    Normal,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
}

impl FontWeight {
    pub const ALL: [FontWeight; 9] = [
        FontWeight::Thin,
        FontWeight::ExtraLight,
        FontWeight::Light,
        FontWeight::Normal,
        FontWeight::Medium,
        FontWeight::SemiBold,
        FontWeight::Bold,
        FontWeight::ExtraBold,
        FontWeight::Black,
    ];

    pub fn value(self) -> u16 {
        (self as u16 + 1) * 100
    }

    /// 1-based position in the enumeration, as some fonts store it in usWeightClass
    pub fn from_index(index: u16) -> Option<Self> {
        let position = usize::from(index).checked_sub(1)?;
        Self::ALL.get(position).copied()
    }

    /// Nearest bucket for a CSS-scale weight, clamped to 100..=900
    pub fn from_css(value: u16) -> Self {
        let bucket = ((u32::from(value) + 50) / 100).clamp(1, 9) as u16;
        Self::ALL[usize::from(bucket - 1)]
    }

    /// Interpret a raw weight class: values below 100 are indices, others CSS weights
    pub fn from_class(value: u16) -> Option<Self> {
        match value {
            0 => None,
            1..=99 => Self::from_index(value),
            _ => Some(Self::from_css(value)),
        }
    }

    /// Match a weight keyword such as "Bold", "SemiBold" or "extra-light"
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match normalize_keyword(keyword).as_str() {
            "thin" => Some(FontWeight::Thin),
            "extralight" => Some(FontWeight::ExtraLight),
            "light" => Some(FontWeight::Light),
            "normal" | "regular" => Some(FontWeight::Normal),
            "medium" => Some(FontWeight::Medium),
            "semibold" => Some(FontWeight::SemiBold),
            "bold" => Some(FontWeight::Bold),
            "extrabold" => Some(FontWeight::ExtraBold),
            "black" => Some(FontWeight::Black),
            _ => None,
        }
    }
}

impl From<FontWeight> for u16 {
    fn from(weight: FontWeight) -> Self {
        weight.value()
    }
}

impl TryFrom<u16> for FontWeight {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|weight| weight.value() == value)
            .ok_or_else(|| format!("{} is not a standard font weight", value))
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl FontStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
            FontStyle::Oblique => "oblique",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "normal" => Some(FontStyle::Normal),
            "italic" => Some(FontStyle::Italic),
            "oblique" => Some(FontStyle::Oblique),
            _ => None,
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontStretch {
    UltraCondensed,
    ExtraCondensed,
    Condensed,
    SemiCondensed,
    #[default]
    Normal,
    SemiExpanded,
    Expanded,
    ExtraExpanded,
    UltraExpanded,
}

impl FontStretch {
    pub const ALL: [FontStretch; 9] = [
        FontStretch::UltraCondensed,
        FontStretch::ExtraCondensed,
        FontStretch::Condensed,
        FontStretch::SemiCondensed,
        FontStretch::Normal,
        FontStretch::SemiExpanded,
        FontStretch::Expanded,
        FontStretch::ExtraExpanded,
        FontStretch::UltraExpanded,
    ];

    /// 1-based usWidthClass lookup
    pub fn from_index(index: u16) -> Option<Self> {
        let position = usize::from(index).checked_sub(1)?;
        Self::ALL.get(position).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FontStretch::UltraCondensed => "ultra-condensed",
            FontStretch::ExtraCondensed => "extra-condensed",
            FontStretch::Condensed => "condensed",
            FontStretch::SemiCondensed => "semi-condensed",
            FontStretch::Normal => "normal",
            FontStretch::SemiExpanded => "semi-expanded",
            FontStretch::Expanded => "expanded",
            FontStretch::ExtraExpanded => "extra-expanded",
            FontStretch::UltraExpanded => "ultra-expanded",
        }
    }

    /// Match a stretch keyword such as "Condensed" or "SemiExpanded"
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let normalized = normalize_keyword(keyword);
        Self::ALL
            .into_iter()
            .find(|stretch| stretch.as_str().replace('-', "") == normalized)
    }
}

impl fmt::Display for FontStretch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize_keyword(keyword: &str) -> String {
    keyword
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .collect::<String>()
        .to_ascii_lowercase()
}

fn regex(pattern: &'static str, desc: &'static str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid {desc} regex: {err}"))
}

/// Every descriptor word, with an optional leading separator
pub fn descriptor_pattern() -> &'static Regex {
    static DESCRIPTOR: OnceLock<Regex> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        regex(
            r"(?i)[-_ ]?(normal|regular|thin|black|medium|italic|oblique|(extra[-_ ]?)?light|((extra|semi)[-_ ]?)?bold|((ultra|extra|semi)[-_ ]?)?(condensed|expanded))",
            "descriptor",
        )
    })
}

fn weight_pattern() -> &'static Regex {
    static WEIGHT: OnceLock<Regex> = OnceLock::new();
    WEIGHT.get_or_init(|| {
        regex(
            r"(?i)(thin|black|medium|(extra[-_ ]?)?light|((extra|semi)[-_ ]?)?bold)",
            "weight",
        )
    })
}

fn style_pattern() -> &'static Regex {
    static STYLE: OnceLock<Regex> = OnceLock::new();
    STYLE.get_or_init(|| regex(r"(?i)(normal|italic|oblique)", "style"))
}

fn stretch_pattern() -> &'static Regex {
    static STRETCH: OnceLock<Regex> = OnceLock::new();
    STRETCH.get_or_init(|| {
        regex(
            r"(?i)((ultra|extra|semi)[-_ ]?)?(condensed|expanded)",
            "stretch",
        )
    })
}

/// First weight keyword in a file name
pub fn weight_in_name(name: &str) -> Option<FontWeight> {
    weight_pattern()
        .find(name)
        .and_then(|m| FontWeight::from_keyword(m.as_str()))
}

/// First style keyword in a file name
pub fn style_in_name(name: &str) -> Option<FontStyle> {
    style_pattern()
        .find(name)
        .and_then(|m| FontStyle::from_keyword(m.as_str()))
}

/// First stretch keyword in a file name
pub fn stretch_in_name(name: &str) -> Option<FontStretch> {
    stretch_pattern()
        .find(name)
        .and_then(|m| FontStretch::from_keyword(m.as_str()))
}
