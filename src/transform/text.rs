use crate::parser::{convert_wildcards, parse_style, Color};
use crate::schema::{NodeKind, Paint, SceneNode, TextAlign, TextProps};
use crate::transform::context::TransformContext;
use crate::transform::styled_node;
use crate::types::SourceNode;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Default font size in pixels when the style declares none
const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Default font weight when the style declares none
const DEFAULT_FONT_WEIGHT: u16 = 400;

/// Attributes added by the legacy rich editor that carry no content
const SCAFFOLDING_ATTRIBUTES: [&str; 5] = [
    "contenteditable",
    "spellcheck",
    "autocorrect",
    "data-placeholder",
    "data-enable-grammarly",
];

static OPEN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([a-zA-Z][a-zA-Z0-9]*)(\s[^<>]*?)?\s*(/?)>").expect("valid regex"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("valid regex")
});

static CURSOR_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<span[^>]*class\s*=\s*["'][^"']*\bql-cursor\b[^"']*["'][^>]*>.*?</span>"#)
        .expect("valid regex")
});

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|</(?:p|div|li|h[1-6])\s*>").expect("valid regex"));

static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

static TEXT_ALIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)text-align\s*:\s*([a-z]+)").expect("valid regex"));

/// Transform a `localText` node into a TEXT scene node
///
/// - Picks the richer of the `content` and `value` fields
/// - Rewrites editor class hints into inline styles and strips editor scaffolding
/// - Converts template wildcards and remaps font names
/// - Derives the plain-text projection and the dominant paragraph alignment
///
/// # Arguments
/// * `node` - Source text node
/// * `parent_id` - Id of the parent scene node
/// * `ctx` - Transformation context
///
/// # Returns
/// A single TEXT scene node whose fill is the text color.
pub fn transform_text(node: &SourceNode, parent_id: &str, ctx: &mut TransformContext) -> SceneNode {
    let style = parse_style(&node.styles);

    let raw = select_markup(node.content.as_deref(), node.value.as_deref());
    let content = rewrite_markup(raw, ctx);
    let plain_text = plain_text(&content);

    let text_align = dominant_alignment(&content)
        .or_else(|| style.text_align.as_deref().and_then(TextAlign::from_css))
        .unwrap_or_default();

    let font_family = match style.font_family.as_deref() {
        Some(family) => ctx.map_font(family),
        None => ctx.default_font(),
    };

    let color = match style.color.as_deref() {
        Some(value) => ctx.color(value, node.name()),
        None => Color::BLACK,
    };

    let kind = NodeKind::Text(TextProps {
        content,
        plain_text,
        font_family,
        font_size: style.font_size.unwrap_or(DEFAULT_FONT_SIZE),
        font_weight: style.font_weight.unwrap_or(DEFAULT_FONT_WEIGHT),
        line_height: style.line_height,
        letter_spacing: style.letter_spacing,
        text_align,
    });

    let mut scene = styled_node(node, &style, parent_id, kind, ctx);
    scene.fills.push(Paint::solid(color));
    scene
}

/// Choose the richer of the two legacy text fields
///
/// Markup beats plain text; between equals the longer value wins, and
/// `content` wins a complete tie.
pub fn select_markup<'a>(content: Option<&'a str>, value: Option<&'a str>) -> &'a str {
    let content = content.filter(|c| !c.trim().is_empty());
    let value = value.filter(|v| !v.trim().is_empty());

    match (content, value) {
        (Some(c), Some(v)) => {
            if richness(v) > richness(c) {
                v
            } else {
                c
            }
        }
        (Some(c), None) => c,
        (None, Some(v)) => v,
        (None, None) => "",
    }
}

fn richness(text: &str) -> (bool, usize) {
    (ANY_TAG.is_match(text), text.len())
}

/// Normalize legacy rich-editor markup
///
/// Class-based formatting hints (`ql-align-*`, `ql-font-*`, `ql-size-*`,
/// `ql-indent-*`) become inline style declarations, editor-only attributes
/// and cursor spans are removed, font families are remapped and template
/// wildcards converted.
pub fn rewrite_markup(markup: &str, ctx: &TransformContext) -> String {
    let without_cursor = CURSOR_SPAN.replace_all(markup, "");
    let without_bom = without_cursor.replace('\u{feff}', "");

    let rewritten = OPEN_TAG.replace_all(&without_bom, |caps: &Captures| {
        let tag = &caps[1];
        let attributes = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let self_closing = !caps[3].is_empty();
        rewrite_tag(tag, attributes, self_closing, ctx)
    });

    convert_wildcards(&rewritten)
}

/// Rebuild one opening tag with normalized attributes
fn rewrite_tag(tag: &str, attributes: &str, self_closing: bool, ctx: &TransformContext) -> String {
    let mut kept: Vec<(String, Option<String>)> = Vec::new();
    let mut classes: Vec<String> = Vec::new();
    let mut hinted: Vec<(String, String)> = Vec::new();
    let mut inline: Vec<(String, String)> = Vec::new();

    for caps in ATTRIBUTE.captures_iter(attributes) {
        let name = caps[1].to_string();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str().to_string());
        let lower = name.to_ascii_lowercase();

        if SCAFFOLDING_ATTRIBUTES.contains(&lower.as_str()) || lower.starts_with("data-gramm") {
            continue;
        }

        match lower.as_str() {
            "class" => {
                for token in value.as_deref().unwrap_or("").split_whitespace() {
                    match class_hint(token) {
                        ClassHint::Declaration(property, val) => hinted.push((property, val)),
                        ClassHint::Drop => {}
                        ClassHint::Keep => classes.push(token.to_string()),
                    }
                }
            }
            "style" => inline.extend(parse_declarations(value.as_deref().unwrap_or(""))),
            _ => kept.push((name, value)),
        }
    }

    // Existing inline declarations win over class hints
    for (property, value) in hinted {
        if !inline.iter().any(|(p, _)| *p == property) {
            inline.push((property, value));
        }
    }

    for (property, value) in inline.iter_mut() {
        if property == "font-family" {
            *value = map_font_stack(value, ctx);
        }
    }

    let mut out = format!("<{tag}");
    for (name, value) in kept {
        match value {
            Some(v) => out.push_str(&format!(" {}=\"{}\"", name, escape_attribute(&v))),
            None => out.push_str(&format!(" {name}")),
        }
    }
    if !classes.is_empty() {
        out.push_str(&format!(" class=\"{}\"", classes.join(" ")));
    }
    if !inline.is_empty() {
        let declarations: Vec<String> = inline
            .iter()
            .map(|(property, value)| format!("{property}: {value}"))
            .collect();
        out.push_str(&format!(
            " style=\"{}\"",
            escape_attribute(&format!("{};", declarations.join("; ")))
        ));
    }
    if self_closing {
        out.push_str(" /");
    }
    out.push('>');
    out
}

enum ClassHint {
    Declaration(String, String),
    /// Editor-only class with no visual meaning
    Drop,
    Keep,
}

fn class_hint(token: &str) -> ClassHint {
    let Some(hint) = token.strip_prefix("ql-") else {
        return ClassHint::Keep;
    };

    if let Some(align) = hint.strip_prefix("align-") {
        return match TextAlign::from_css(align) {
            Some(_) => ClassHint::Declaration("text-align".to_string(), align.to_ascii_lowercase()),
            None => ClassHint::Drop,
        };
    }
    if let Some(font) = hint.strip_prefix("font-") {
        return ClassHint::Declaration("font-family".to_string(), font.to_string());
    }
    if let Some(size) = hint.strip_prefix("size-") {
        let number = size.strip_suffix("px").unwrap_or(size);
        return match number.parse::<f64>() {
            Ok(px) => ClassHint::Declaration("font-size".to_string(), format!("{px}px")),
            Err(_) => ClassHint::Drop,
        };
    }
    if let Some(level) = hint.strip_prefix("indent-") {
        return match level.parse::<u32>() {
            Ok(level) => ClassHint::Declaration("padding-left".to_string(), format!("{}em", level * 3)),
            Err(_) => ClassHint::Drop,
        };
    }

    ClassHint::Drop
}

/// Split an inline style attribute into `(property, value)` pairs
fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                None
            } else {
                Some((property, value.to_string()))
            }
        })
        .collect()
}

fn escape_attribute(value: &str) -> String {
    value.replace('"', "&quot;")
}

/// Plain-text projection of rich markup
///
/// Line breaks and closing block tags become newlines, remaining tags are
/// removed and common entities decoded.
pub fn plain_text(markup: &str) -> String {
    let normalized = markup.replace("\r\n", "\n");
    let with_breaks = LINE_BREAK.replace_all(&normalized, "\n");
    let stripped = ANY_TAG.replace_all(&with_breaks, "");

    stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
        .trim_end()
        .to_string()
}

/// Map the first family of a `font-family` stack, keeping the fallbacks
fn map_font_stack(value: &str, ctx: &TransformContext) -> String {
    match value.split_once(',') {
        Some((first, rest)) => format!("{}, {}", ctx.map_font(first), rest.trim()),
        None => ctx.map_font(value),
    }
}

/// Strongest inline alignment declared anywhere in the markup
///
/// Precedence is justify, then center, then right. `left` never wins since
/// it is the default anyway.
pub fn dominant_alignment(markup: &str) -> Option<TextAlign> {
    TEXT_ALIGN
        .captures_iter(markup)
        .filter_map(|caps| TextAlign::from_css(&caps[1]))
        .filter_map(|align| alignment_rank(align).map(|rank| (rank, align)))
        .max_by_key(|(rank, _)| *rank)
        .map(|(_, align)| align)
}

fn alignment_rank(align: TextAlign) -> Option<u8> {
    match align {
        TextAlign::Left => None,
        TextAlign::Right => Some(1),
        TextAlign::Center => Some(2),
        TextAlign::Justify => Some(3),
    }
}
