use crate::parser::{convert_wildcards, is_wildcard, parse_style, unwrap_url, Border, ParsedStyle};
use crate::schema::{ImageProps, NodeKind, Paint, RectangleProps, SceneNode, Stroke, IDENTITY_TRANSFORM};
use crate::transform::context::TransformContext;
use crate::transform::styled_node;
use crate::types::{SourceKind, SourceNode};

/// Transform a `localRectangle` or `localImage` node
///
/// Produces an IMAGE node when the node carries a valid image source (see
/// [`is_valid_image_source`]), otherwise a RECTANGLE with a solid fill from
/// the background color and a stroke from the border.
///
/// # Arguments
/// * `node` - Source rectangle or image node
/// * `parent_id` - Id of the parent scene node
/// * `ctx` - Transformation context
///
/// # Returns
/// A single IMAGE or RECTANGLE scene node.
pub fn transform_rectangle(node: &SourceNode, parent_id: &str, ctx: &mut TransformContext) -> SceneNode {
    let style = parse_style(&node.styles);

    match image_source(node, &style) {
        Some(source) if is_valid_image_source(&source) => image_node(node, &style, &source, parent_id, ctx),
        Some(source) => {
            ctx.warn(format!(
                "Invalid image source '{}' on '{}', rendered as rectangle",
                source,
                node.name()
            ));
            rectangle_node(node, &style, parent_id, ctx)
        }
        None => rectangle_node(node, &style, parent_id, ctx),
    }
}

/// Check whether a background image value can be used as an image reference
///
/// Valid sources are template wildcards, `http://`, `https://` and
/// protocol-relative `//` URLs, and `data:image/` URIs.
pub fn is_valid_image_source(source: &str) -> bool {
    if is_wildcard(source) {
        return true;
    }

    let lower = source.trim().to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("//")
        || lower.starts_with("data:image/")
}

/// Background image, or the node's own source for image nodes
fn image_source(node: &SourceNode, style: &ParsedStyle) -> Option<String> {
    if let Some(background) = &style.background_image {
        return Some(background.clone());
    }

    if node.kind() == SourceKind::Image {
        let value = node.value.as_deref().or(node.content.as_deref())?;
        return unwrap_url(value);
    }

    None
}

fn image_node(
    node: &SourceNode,
    style: &ParsedStyle,
    source: &str,
    parent_id: &str,
    ctx: &mut TransformContext,
) -> SceneNode {
    let image_ref = convert_wildcards(source.trim());
    if !is_wildcard(&image_ref) {
        ctx.record_image(&image_ref);
    }

    let kind = NodeKind::Image(ImageProps {
        image_ref,
        fill_mode: "fill".to_string(),
        transform: IDENTITY_TRANSFORM,
    });

    let mut scene = styled_node(node, style, parent_id, kind, ctx);
    if let Some(border) = &style.border {
        let stroke = border_stroke(border, node.name(), ctx);
        scene.strokes.push(stroke);
    }
    scene
}

fn rectangle_node(
    node: &SourceNode,
    style: &ParsedStyle,
    parent_id: &str,
    ctx: &mut TransformContext,
) -> SceneNode {
    let kind = NodeKind::Rectangle(RectangleProps {
        corner_radius: style.border_radius.unwrap_or(0.0).max(0.0),
    });

    let mut scene = styled_node(node, style, parent_id, kind, ctx);
    if let Some(background) = &style.background_color {
        let color = ctx.color(background, node.name());
        scene.fills.push(Paint::solid(color));
    }
    if let Some(border) = &style.border {
        let stroke = border_stroke(border, node.name(), ctx);
        scene.strokes.push(stroke);
    }
    scene
}

/// Convert a parsed border into a stroke
pub(crate) fn border_stroke(border: &Border, owner: &str, ctx: &mut TransformContext) -> Stroke {
    let color = ctx.color(&border.color, owner);
    Stroke::new(color, border.width, border.style.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IdStrategy, MigrationOptions};
    use crate::parser::Color;
    use serde_json::json;

    fn options() -> MigrationOptions {
        MigrationOptions {
            id_strategy: IdStrategy::Sequential,
            ..MigrationOptions::default()
        }
    }

    fn transform(value: serde_json::Value) -> (SceneNode, Vec<String>) {
        let options = options();
        let mut ctx = TransformContext::new(&options, None, "Arial");
        let node: SourceNode = serde_json::from_value(value).unwrap();
        let scene = transform_rectangle(&node, "root", &mut ctx);
        (scene, ctx.diagnostics)
    }

    #[test]
    fn test_valid_image_sources() {
        assert!(is_valid_image_source("{{ cover }}"));
        assert!(is_valid_image_source("https://cdn/a.png"));
        assert!(is_valid_image_source("HTTP://cdn/a.png"));
        assert!(is_valid_image_source("//cdn/a.png"));
        assert!(is_valid_image_source("data:image/png;base64,iVBORw0KGgo="));
        assert!(!is_valid_image_source("data:text/plain,hello"));
        assert!(!is_valid_image_source("images/local.png"));
        assert!(!is_valid_image_source("ftp://cdn/a.png"));
    }

    #[test]
    fn test_wildcard_background_becomes_image() {
        let (scene, diagnostics) = transform(json!({
            "type": "localRectangle",
            "name": "Cover",
            "styles": {"backgroundImage": "url(\"{{ cover }}\")", "width": "200px", "height": "150px"}
        }));

        match &scene.kind {
            NodeKind::Image(image) => {
                assert_eq!(image.image_ref, "{{{ cover }}}");
                assert_eq!(image.fill_mode, "fill");
                assert_eq!(image.transform, IDENTITY_TRANSFORM);
            }
            other => panic!("Expected IMAGE, got {other:?}"),
        }
        assert_eq!((scene.width, scene.height), (200.0, 150.0));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_image_node_uses_value() {
        let (scene, _) = transform(json!({
            "type": "localImage",
            "value": "https://cdn/logo.svg"
        }));
        assert_eq!(scene.kind_name(), "IMAGE");
    }

    #[test]
    fn test_plain_rectangle_fill_and_stroke() {
        let (scene, _) = transform(json!({
            "type": "localRectangle",
            "name": "Box",
            "styles": {
                "backgroundColor": "#00ff00",
                "border": "2px dashed #0000ff",
                "borderRadius": "4px"
            }
        }));

        assert_eq!(scene.kind, NodeKind::Rectangle(RectangleProps { corner_radius: 4.0 }));
        assert_eq!(scene.fills, vec![Paint::solid(Color::rgb(0, 255, 0))]);
        assert_eq!(scene.strokes, vec![Stroke::new(Color::rgb(0, 0, 255), 2.0, "dashed")]);
    }

    #[test]
    fn test_rectangle_without_color_has_no_fill() {
        let (scene, _) = transform(json!({"type": "localRectangle"}));
        assert!(scene.fills.is_empty());
        assert!(scene.strokes.is_empty());
        assert_eq!(scene.name, "rectangle");
    }

    #[test]
    fn test_invalid_image_falls_back_to_rectangle() {
        let (scene, diagnostics) = transform(json!({
            "type": "localRectangle",
            "name": "Bg",
            "styles": {"backgroundImage": "url(assets/bg.png)", "backgroundColor": "white"}
        }));

        assert_eq!(scene.kind_name(), "RECTANGLE");
        assert_eq!(scene.fills, vec![Paint::solid(Color::WHITE)]);
        assert_eq!(
            diagnostics,
            vec!["Invalid image source 'assets/bg.png' on 'Bg', rendered as rectangle"]
        );
    }
}
