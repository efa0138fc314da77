use crate::parser::clean_font_family;
use crate::types::EmbeddedFont;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Weight suffixes removed from an identifier to get its family key
///
/// Compound names come first so `ExtraBold` is not cut down to `Extra`.
const WEIGHT_SUFFIXES: [&str; 15] = [
    "extralight",
    "ultralight",
    "semibold",
    "demibold",
    "extrabold",
    "ultrabold",
    "regular",
    "normal",
    "medium",
    "light",
    "black",
    "heavy",
    "thin",
    "book",
    "bold",
];

/// Keyword to CSS weight mapping, checked in order
const WEIGHT_KEYWORDS: [(&str, u16); 15] = [
    ("extralight", 200),
    ("ultralight", 200),
    ("semibold", 600),
    ("demibold", 600),
    ("extrabold", 800),
    ("ultrabold", 800),
    ("thin", 100),
    ("light", 300),
    ("medium", 500),
    ("bold", 700),
    ("black", 900),
    ("heavy", 900),
    ("regular", 400),
    ("normal", 400),
    ("book", 400),
];

/// Weight used when no keyword matches
pub const DEFAULT_WEIGHT: u16 = 400;

/// Font asset entry of the target document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontAsset {
    pub family: String,
    pub weights: Vec<u16>,
    pub origin: String,
    pub source: String,
}

/// Font catalog derived from a layout's embedded fonts
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedFonts {
    /// Exact font identifier -> asset
    pub fonts: BTreeMap<String, FontAsset>,
    /// Sorted, deduplicated identifiers
    pub available: Vec<String>,
    pub default_font: String,
}

/// Resolve embedded fonts into a font catalog
///
/// Pure function, performs no IO.
///
/// # Arguments
/// * `embedded` - Embedded-font descriptors from the source layout
/// * `declared_default` - The layout's declared default font, if any
/// * `fallback` - Font used when nothing else is available
///
/// # Returns
/// The asset map keyed by exact identifier, the sorted list of available
/// names, and the default font family.
///
/// # Examples
/// ```
/// use layout2scene::fonts::resolve_fonts;
/// use layout2scene::types::EmbeddedFont;
///
/// let fonts = vec![EmbeddedFont::Populated {
///     file_name: "Roboto-Bold.ttf".to_string(),
///     url: "https://cdn/roboto-bold.ttf".to_string(),
/// }];
/// let resolved = resolve_fonts(&fonts, None, "Arial");
///
/// assert_eq!(resolved.available, vec!["Roboto-Bold".to_string()]);
/// assert_eq!(resolved.fonts["Roboto-Bold"].weights, vec![700]);
/// assert_eq!(resolved.default_font, "Roboto-Bold");
/// ```
pub fn resolve_fonts(
    embedded: &[EmbeddedFont],
    declared_default: Option<&str>,
    fallback: &str,
) -> ResolvedFonts {
    // 1. Collect unique identifiers in source order
    let mut entries: Vec<(String, String)> = Vec::new();
    let mut seen = BTreeSet::new();

    for font in embedded {
        let Some((raw_name, url)) = font.name_and_url() else {
            continue;
        };
        let identifier = font_identifier(raw_name);
        if identifier.is_empty() || !seen.insert(identifier.clone()) {
            continue;
        }
        entries.push((identifier, url.to_string()));
    }

    // 2. Aggregate weights per family key
    let mut family_weights: HashMap<String, BTreeSet<u16>> = HashMap::new();
    for (identifier, _) in &entries {
        family_weights
            .entry(family_key(identifier))
            .or_default()
            .insert(infer_weight(identifier));
    }

    // 3. Build assets
    let mut fonts = BTreeMap::new();
    for (identifier, url) in entries {
        let family = family_key(&identifier);
        let weights = family_weights
            .get(&family)
            .map(|w| w.iter().copied().collect())
            .unwrap_or_else(|| vec![DEFAULT_WEIGHT]);

        fonts.insert(
            identifier,
            FontAsset {
                family,
                weights,
                origin: "custom".to_string(),
                source: url,
            },
        );
    }

    let available: Vec<String> = fonts.keys().cloned().collect();
    let default_font = declared_default
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| available.first().cloned())
        .unwrap_or_else(|| fallback.to_string());

    ResolvedFonts {
        fonts,
        available,
        default_font,
    }
}

/// Exact font identifier: the file name without its font extension
pub fn font_identifier(raw_name: &str) -> String {
    clean_font_family(raw_name)
}

/// Family key: the identifier with a trailing weight suffix removed
///
/// `Roboto-Bold` and `Roboto_Light` both map to `Roboto`.
pub fn family_key(identifier: &str) -> String {
    let lower = identifier.to_ascii_lowercase();

    for suffix in WEIGHT_SUFFIXES {
        if lower.ends_with(suffix) {
            let base = identifier[..identifier.len() - suffix.len()]
                .trim_end_matches(['-', '_', ' ']);
            if !base.is_empty() {
                return base.to_string();
            }
        }
    }

    identifier.to_string()
}

/// Infer a CSS weight from keywords found in the identifier
pub fn infer_weight(identifier: &str) -> u16 {
    let normalized: String = identifier
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .collect::<String>()
        .to_ascii_lowercase();

    WEIGHT_KEYWORDS
        .iter()
        .find(|(keyword, _)| normalized.contains(keyword))
        .map(|(_, weight)| *weight)
        .unwrap_or(DEFAULT_WEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated(file_name: &str) -> EmbeddedFont {
        EmbeddedFont::Populated {
            file_name: file_name.to_string(),
            url: format!("https://cdn/{file_name}"),
        }
    }

    #[test]
    fn test_identifier_preserves_case_and_tokens() {
        assert_eq!(font_identifier("GT-Walsheim-Pro_BOLD.woff2"), "GT-Walsheim-Pro_BOLD");
        assert_eq!(font_identifier("roboto.TTF"), "roboto");
        assert_eq!(font_identifier("NoExtension"), "NoExtension");
    }

    #[test]
    fn test_family_key() {
        assert_eq!(family_key("Roboto-Bold"), "Roboto");
        assert_eq!(family_key("Roboto-ExtraBold"), "Roboto");
        assert_eq!(family_key("Roboto_light"), "Roboto");
        assert_eq!(family_key("Open Sans SemiBold"), "Open Sans");
        assert_eq!(family_key("Lato"), "Lato");
        // A bare weight name stays intact
        assert_eq!(family_key("Black"), "Black");
    }

    #[test]
    fn test_infer_weight() {
        assert_eq!(infer_weight("Roboto-Thin"), 100);
        assert_eq!(infer_weight("Roboto-ExtraLight"), 200);
        assert_eq!(infer_weight("Roboto-Light"), 300);
        assert_eq!(infer_weight("Roboto-Regular"), 400);
        assert_eq!(infer_weight("Roboto-Medium"), 500);
        assert_eq!(infer_weight("Roboto-Semi-Bold"), 600);
        assert_eq!(infer_weight("Roboto-Bold"), 700);
        assert_eq!(infer_weight("Roboto-ExtraBold"), 800);
        assert_eq!(infer_weight("Roboto-Black"), 900);
        assert_eq!(infer_weight("Roboto-Heavy"), 900);
        assert_eq!(infer_weight("Roboto"), DEFAULT_WEIGHT);
    }

    #[test]
    fn test_resolve_groups_weights_by_family() {
        let fonts = vec![
            populated("Roboto-Bold.ttf"),
            populated("Roboto-Light.ttf"),
            populated("Lato.otf"),
        ];
        let resolved = resolve_fonts(&fonts, None, "Arial");

        assert_eq!(resolved.available, vec!["Lato", "Roboto-Bold", "Roboto-Light"]);
        assert_eq!(resolved.fonts["Roboto-Bold"].family, "Roboto");
        assert_eq!(resolved.fonts["Roboto-Bold"].weights, vec![300, 700]);
        assert_eq!(resolved.fonts["Roboto-Light"].weights, vec![300, 700]);
        assert_eq!(resolved.fonts["Lato"].weights, vec![400]);
        assert_eq!(resolved.fonts["Lato"].origin, "custom");
        assert_eq!(resolved.fonts["Lato"].source, "https://cdn/Lato.otf");
    }

    #[test]
    fn test_resolve_skips_references_and_duplicates() {
        let fonts = vec![
            EmbeddedFont::Reference("5f1e0c".to_string()),
            populated("Inter.ttf"),
            EmbeddedFont::Legacy {
                font_name: "Inter".to_string(),
                url: "https://other/inter.ttf".to_string(),
            },
        ];
        let resolved = resolve_fonts(&fonts, None, "Arial");

        assert_eq!(resolved.available, vec!["Inter"]);
        assert_eq!(resolved.fonts["Inter"].source, "https://cdn/Inter.ttf");
    }

    #[test]
    fn test_default_font_selection() {
        let fonts = vec![populated("Zilla.ttf"), populated("Alegreya.ttf")];

        let declared = resolve_fonts(&fonts, Some("Zilla"), "Arial");
        assert_eq!(declared.default_font, "Zilla");

        let first = resolve_fonts(&fonts, Some("  "), "Arial");
        assert_eq!(first.default_font, "Alegreya");

        let fallback = resolve_fonts(&[], None, "Arial");
        assert_eq!(fallback.default_font, "Arial");
        assert!(fallback.fonts.is_empty());
    }
}
