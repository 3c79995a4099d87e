//! Style Rule Builder
//!
//! Turns resolved fonts into `@font-face` rules and `.font-*` utility classes.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

use crate::config::Fallback;
use crate::resolver::ResolvedFont;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

/// A selector with ordered declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
}

impl StyleRule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            declarations: vec![],
        }
    }

    pub fn declare(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.declarations.push(Declaration {
            property: property.into(),
            value: value.into(),
        });
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|d| d.property == property)
            .map(|d| d.value.as_str())
    }
}

struct Declarations<'a>(&'a [Declaration]);

impl Serialize for Declarations<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for declaration in self.0 {
            map.serialize_entry(&declaration.property, &declaration.value)?;
        }
        map.end()
    }
}

/// Serialized as `{ "<selector>": { "<property>": "<value>", ... } }`
impl Serialize for StyleRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.selector, &Declarations(&self.declarations))?;
        map.end()
    }
}

impl fmt::Display for StyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {{", self.selector)?;
        for declaration in &self.declarations {
            writeln!(f, "  {}: {};", declaration.property, declaration.value)?;
        }
        write!(f, "}}")
    }
}

/// Base rules and utility rules, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRuleSet {
    pub font_face_rules: Vec<StyleRule>,
    pub utility_class_rules: Vec<StyleRule>,
}

impl StyleRuleSet {
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for rule in self.font_face_rules.iter().chain(&self.utility_class_rules) {
            // Writing to a String cannot fail
            let _ = writeln!(css, "{}\n", rule);
        }
        css
    }
}

/// Class record as written to the cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontClass {
    /// Display name, or the slug once cached
    pub name: String,
    /// Family the class points at
    pub family: String,
}

impl From<&ResolvedFont> for FontClass {
    fn from(font: &ResolvedFont) -> Self {
        Self {
            name: font.name.clone(),
            family: font.name.clone(),
        }
    }
}

impl FontClass {
    /// Same class with its name replaced by the slug
    pub fn slugged(&self) -> Self {
        Self {
            name: slugify(&self.name),
            family: self.family.clone(),
        }
    }
}

/// Whitespace to hyphens, then lowercase
pub fn slugify(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect::<String>()
        .to_lowercase()
}

pub fn create_font_faces(fonts: &[ResolvedFont], web_performance: bool) -> Vec<StyleRule> {
    let display = if web_performance { "swap" } else { "block" };

    fonts
        .iter()
        .map(|font| {
            StyleRule::new("@font-face")
                .declare("font-family", format!("\"{}\"", font.name))
                .declare("font-weight", font.weight.value().to_string())
                .declare("font-style", font.style.as_str())
                .declare("font-stretch", font.stretch.as_str())
                .declare("font-display", display)
                .declare(
                    "src",
                    format!("url(\"{}\") format(\"{}\")", font.path, font.format),
                )
        })
        .collect()
}

/// One `.font-<slug>` rule per class; `cached` names are already slugs
///
/// Duplicate slugs are kept: the host's last registration wins.
pub fn create_font_classes(classes: &[FontClass], fallback: &Fallback, cached: bool) -> Vec<StyleRule> {
    classes
        .iter()
        .map(|class| {
            let slug = if cached {
                class.name.clone()
            } else {
                slugify(&class.name)
            };
            let family = match fallback.family() {
                Some(fallback) => format!("\"{}\", {}", class.family, fallback),
                None => format!("\"{}\"", class.family),
            };
            StyleRule::new(format!(".font-{}", slug)).declare("font-family", family)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::{FontStretch, FontStyle, FontWeight};
    use crate::discovery::FontFormat;

    fn font(name: &str) -> ResolvedFont {
        ResolvedFont {
            name: name.to_string(),
            weight: FontWeight::SemiBold,
            style: FontStyle::Italic,
            stretch: FontStretch::Condensed,
            format: FontFormat::Woff2,
            path: format!("/assets/fonts/{}.woff2", name),
        }
    }

    #[test]
    fn test_font_face_declarations() {
        let rules = create_font_faces(&[font("Open Sans")], false);
        assert_eq!(rules.len(), 1);

        let rule = &rules[0];
        assert_eq!(rule.selector, "@font-face");
        assert_eq!(rule.get("font-family"), Some("\"Open Sans\""));
        assert_eq!(rule.get("font-weight"), Some("600"));
        assert_eq!(rule.get("font-style"), Some("italic"));
        assert_eq!(rule.get("font-stretch"), Some("condensed"));
        assert_eq!(rule.get("font-display"), Some("block"));
        assert_eq!(
            rule.get("src"),
            Some("url(\"/assets/fonts/Open Sans.woff2\") format(\"woff2\")")
        );
    }

    #[test]
    fn test_web_performance_swaps() {
        let rules = create_font_faces(&[font("A"), font("B")], true);
        assert!(rules.iter().all(|r| r.get("font-display") == Some("swap")));
        assert_eq!(rules[1].get("font-family"), Some("\"B\""));
    }

    #[test]
    fn test_class_fallback_suffix() {
        let classes = vec![FontClass::from(&font("Open Sans"))];

        let with = create_font_classes(&classes, &Fallback::Family("sans-serif".into()), false);
        assert_eq!(with[0].selector, ".font-open-sans");
        assert_eq!(with[0].get("font-family"), Some("\"Open Sans\", sans-serif"));

        let without = create_font_classes(&classes, &Fallback::Disabled, false);
        assert_eq!(without[0].get("font-family"), Some("\"Open Sans\""));
    }

    #[test]
    fn test_cached_names_not_reslugged() {
        let cached = vec![FontClass::from(&font("Open Sans")).slugged()];
        let rules = create_font_classes(&cached, &Fallback::Disabled, true);
        assert_eq!(rules[0].selector, ".font-open-sans");
        assert_eq!(rules[0].get("font-family"), Some("\"Open Sans\""));
    }

    #[test]
    fn test_rule_json_shape() {
        let rule = StyleRule::new(".font-x")
            .declare("font-family", "\"X\"")
            .declare("color", "red");
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(json, r#"{".font-x":{"font-family":"\"X\"","color":"red"}}"#);
    }

    #[test]
    fn test_css_rendering() {
        let set = StyleRuleSet {
            font_face_rules: vec![],
            utility_class_rules: vec![StyleRule::new(".font-x").declare("font-family", "\"X\"")],
        };
        assert_eq!(set.to_css(), ".font-x {\n  font-family: \"X\";\n}\n\n");
    }
}
