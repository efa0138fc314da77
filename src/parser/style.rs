use crate::types::StyleMap;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Font file extensions stripped from font family names
const FONT_EXTENSIONS: [&str; 4] = [".woff2", ".woff", ".ttf", ".otf"];

/// Border line extracted from a style dictionary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Border {
    pub width: f64,
    pub style: String,
    pub color: String,
}

/// Structured view of a free-form style dictionary
///
/// Every geometry field has an explicit default so transformers never have to
/// deal with missing values; optional visual properties stay `Option`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStyle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub opacity: f64,
    pub visible: bool,
    pub z_index: i64,
    pub height_auto: bool,
    pub min_height: Option<f64>,
    pub background_color: Option<String>,
    pub background_image: Option<String>,
    pub border: Option<Border>,
    pub border_radius: Option<f64>,
    pub color: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<u16>,
    pub line_height: Option<f64>,
    pub letter_spacing: Option<f64>,
    pub text_align: Option<String>,
}

impl Default for ParsedStyle {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
            opacity: 1.0,
            visible: true,
            z_index: 0,
            height_auto: false,
            min_height: None,
            background_color: None,
            background_image: None,
            border: None,
            border_radius: None,
            color: None,
            font_family: None,
            font_size: None,
            font_weight: None,
            line_height: None,
            letter_spacing: None,
            text_align: None,
        }
    }
}

/// Parse a style dictionary into a [`ParsedStyle`]
///
/// # Arguments
/// * `styles` - Style dictionary from a source node (values may be strings or numbers)
///
/// # Returns
/// A fully populated style record; unparsable values keep their defaults.
///
/// # Examples
/// ```
/// use layout2scene::parser::parse_style;
/// use serde_json::json;
///
/// let styles = json!({"left": "10px", "top": 4, "height": "auto", "display": "none"});
/// let parsed = parse_style(styles.as_object().unwrap());
///
/// assert_eq!(parsed.x, 10.0);
/// assert_eq!(parsed.y, 4.0);
/// assert_eq!(parsed.height, 100.0);
/// assert!(parsed.height_auto);
/// assert!(!parsed.visible);
/// ```
pub fn parse_style(styles: &StyleMap) -> ParsedStyle {
    let defaults = ParsedStyle::default();
    let px = |key: &str| styles.get(key).and_then(parse_px);
    let text = |key: &str| styles.get(key).and_then(style_text);

    let hidden = text("display").is_some_and(|d| d.eq_ignore_ascii_case("none"))
        || text("visibility").is_some_and(|v| v.eq_ignore_ascii_case("hidden"));

    ParsedStyle {
        x: px("left").unwrap_or(defaults.x),
        y: px("top").unwrap_or(defaults.y),
        width: px("width").unwrap_or(defaults.width),
        height: px("height").unwrap_or(defaults.height),
        rotation: parse_rotation(styles).unwrap_or(defaults.rotation),
        opacity: styles
            .get("opacity")
            .and_then(parse_number)
            .map(|o| o.clamp(0.0, 1.0))
            .unwrap_or(defaults.opacity),
        visible: !hidden,
        z_index: styles
            .get("zIndex")
            .and_then(parse_number)
            .map(|z| z as i64)
            .unwrap_or(defaults.z_index),
        height_auto: text("height").is_some_and(|h| h.eq_ignore_ascii_case("auto")),
        min_height: px("minHeight"),
        background_color: text("backgroundColor").filter(|c| !c.eq_ignore_ascii_case("none")),
        background_image: text("backgroundImage").and_then(|v| unwrap_url(&v)),
        border: parse_border(styles),
        border_radius: px("borderRadius"),
        color: text("color"),
        font_family: text("fontFamily").map(|f| clean_font_family(&f)).filter(|f| !f.is_empty()),
        font_size: px("fontSize"),
        font_weight: styles.get("fontWeight").and_then(parse_font_weight),
        line_height: px("lineHeight"),
        letter_spacing: px("letterSpacing"),
        text_align: text("textAlign").map(|a| a.to_ascii_lowercase()),
    }
}

/// Parse a pixel length
///
/// Numbers pass through. Strings are trimmed and an optional `px` suffix is
/// removed. `"auto"`, `"none"`, empty and unparsable values yield `None`.
pub fn parse_px(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty()
                || trimmed.eq_ignore_ascii_case("auto")
                || trimmed.eq_ignore_ascii_case("none")
            {
                return None;
            }
            let number = trimmed
                .strip_suffix("px")
                .or_else(|| trimmed.strip_suffix("PX"))
                .unwrap_or(trimmed)
                .trim();
            number.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

/// Parse a unitless number (opacity, z-index)
fn parse_number(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Non-empty textual form of a style value
fn style_text(value: &JsonValue) -> Option<String> {
    let text = match value {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn parse_font_weight(value: &JsonValue) -> Option<u16> {
    match value {
        JsonValue::Number(n) => n.as_f64().map(|w| w.clamp(1.0, 1000.0) as u16),
        JsonValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(400),
            "bold" => Some(700),
            "lighter" => Some(300),
            "bolder" => Some(800),
            other => other.parse::<f64>().ok().map(|w| w.clamp(1.0, 1000.0) as u16),
        },
        _ => None,
    }
}

/// Rotation in degrees from `rotation` or a `transform: rotate(<n>deg)`
fn parse_rotation(styles: &StyleMap) -> Option<f64> {
    if let Some(rotation) = styles.get("rotation").and_then(parse_number) {
        return Some(rotation);
    }

    let transform = styles.get("transform")?.as_str()?;
    let start = transform.find("rotate(")? + "rotate(".len();
    let end = transform[start..].find(')')? + start;
    let angle = transform[start..end].trim();
    angle
        .strip_suffix("deg")
        .unwrap_or(angle)
        .trim()
        .parse::<f64>()
        .ok()
}

/// Extract the border in priority order
///
/// `border` shorthand, then the `borderWidth`/`borderStyle`/`borderColor`
/// longhands, then `borderBottom`, then `borderTop`.
fn parse_border(styles: &StyleMap) -> Option<Border> {
    if let Some(shorthand) = styles.get("border").and_then(style_text) {
        return parse_border_shorthand(&shorthand);
    }

    let width = styles.get("borderWidth");
    let style = styles.get("borderStyle").and_then(style_text);
    let color = styles.get("borderColor").and_then(style_text);
    if width.is_some() || style.is_some() || color.is_some() {
        let border = Border {
            width: width.and_then(parse_px).unwrap_or(1.0),
            style: style.unwrap_or_else(|| "solid".to_string()),
            color: color.unwrap_or_else(|| "#000000".to_string()),
        };
        return visible_border(border);
    }

    for key in ["borderBottom", "borderTop"] {
        if let Some(shorthand) = styles.get(key).and_then(style_text) {
            return parse_border_shorthand(&shorthand);
        }
    }

    None
}

/// Parse `"<width>px <style> <color>"`
///
/// The color may itself contain spaces (`rgb(0, 0, 0)`), so everything after
/// the style token is kept as the color.
pub fn parse_border_shorthand(shorthand: &str) -> Option<Border> {
    let trimmed = shorthand.trim();
    if trimmed.eq_ignore_ascii_case("none") || trimmed == "0" {
        return None;
    }

    let mut parts = trimmed.splitn(3, char::is_whitespace);
    let width = parts
        .next()
        .and_then(|w| parse_px(&JsonValue::String(w.to_string())))
        .unwrap_or(1.0);
    let style = parts
        .next()
        .map(str::to_string)
        .unwrap_or_else(|| "solid".to_string());
    let color = parts
        .next()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "#000000".to_string());

    visible_border(Border {
        width,
        style,
        color,
    })
}

fn visible_border(border: Border) -> Option<Border> {
    if border.width <= 0.0 || border.style.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(border)
    }
}

/// Unwrap `url(...)` into a bare URL; `"none"` and empty values are absent
pub fn unwrap_url(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return None;
    }

    let inner = trimmed
        .strip_prefix("url(")
        .and_then(|rest| rest.strip_suffix(')'))
        .map(str::trim)
        .unwrap_or(trimmed);
    let unquoted = strip_quotes(inner).trim();

    if unquoted.is_empty() {
        None
    } else {
        Some(unquoted.to_string())
    }
}

/// Clean a font family value
///
/// Strips surrounding quotes and a trailing font file extension
/// (case-insensitive). Nothing else about the name is altered.
pub fn clean_font_family(value: &str) -> String {
    let name = strip_quotes(value.trim());
    let lower = name.to_ascii_lowercase();
    for ext in FONT_EXTENSIONS {
        if lower.ends_with(ext) {
            return name[..name.len() - ext.len()].to_string();
        }
    }
    name.to_string()
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
