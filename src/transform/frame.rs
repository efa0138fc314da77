use crate::parser::{convert_wildcards, is_wildcard, parse_px, parse_style, Color, ParsedStyle};
use crate::schema::{AutoGrow, FrameProps, NodeKind, Orientation, Page, PageSize, Paint, SceneNode};
use crate::transform::context::TransformContext;
use crate::transform::walk_children;
use crate::types::SourceNode;
use std::collections::BTreeSet;

/// A page together with every scene node it owns, root first
#[derive(Debug, Clone)]
pub struct PageBuild {
    pub page: Page,
    pub nodes: Vec<SceneNode>,
}

/// Transform a frame that matched no preset or marker into a page
///
/// The root FRAME takes its fill from the frame's background color (white
/// when absent) and an IMAGE paint from a background image. Children are
/// walked through the router in document order.
///
/// # Arguments
/// * `frame` - Source frame, one entry of the first page's children
/// * `index` - Zero-based position of the frame, used for the fallback name
/// * `ctx` - Transformation context
///
/// # Returns
/// The page and its nodes, the root FRAME first.
pub fn build_generic_page(frame: &SourceNode, index: usize, ctx: &mut TransformContext) -> PageBuild {
    let style = parse_style(&frame.styles);
    let size = page_size(frame, ctx);
    let name = page_name(frame, index);

    let root_id = ctx.next_id();
    let mut root = root_frame(root_id, &name, size, auto_grow(&style, size));

    let fill = match &style.background_color {
        Some(background) => ctx.color(background, &name),
        None => Color::WHITE,
    };
    root.fills.push(Paint::solid(fill));

    if let Some(image) = &style.background_image {
        let image_ref = convert_wildcards(image.trim());
        if !is_wildcard(&image_ref) {
            ctx.record_image(&image_ref);
        }
        root.fills.push(Paint::Image {
            image_ref,
            scale_mode: "fill".to_string(),
        });
    }

    let descendants = walk_children(&frame.children, &mut root, ctx);

    let page = Page {
        id: ctx.next_id(),
        name,
        root_id: root.id.clone(),
        orientation: Orientation::from_size(size.width, size.height),
        size,
        types: BTreeSet::new(),
        is_placeholder: false,
        placeholder: None,
    };

    let mut nodes = Vec::with_capacity(descendants.len() + 1);
    nodes.push(root);
    nodes.extend(descendants);
    PageBuild { page, nodes }
}

/// Create a page root FRAME at the origin
pub(crate) fn root_frame(id: String, name: &str, size: PageSize, auto_grow: Option<AutoGrow>) -> SceneNode {
    let kind = NodeKind::Frame(FrameProps {
        children: Vec::new(),
        clips_content: true,
        auto_grow,
    });
    let mut root = SceneNode::new(id, None, name, kind);
    root.width = size.width;
    root.height = size.height;
    root
}

/// Page size from the frame's explicit width and height
///
/// Missing or `auto` dimensions fall back to the configured page size.
pub(crate) fn page_size(frame: &SourceNode, ctx: &TransformContext) -> PageSize {
    let dimension = |key: &str| {
        frame
            .styles
            .get(key)
            .and_then(parse_px)
            .filter(|v| *v > 0.0)
    };

    PageSize {
        width: dimension("width").unwrap_or(ctx.options().page_width),
        height: dimension("height").unwrap_or(ctx.options().page_height),
    }
}

/// Auto-grow floor from the frame style
///
/// `height: auto` grows from the page height unless a `minHeight` is given;
/// an explicit `minHeight` alone also enables auto-grow.
pub(crate) fn auto_grow(style: &ParsedStyle, size: PageSize) -> Option<AutoGrow> {
    match (style.height_auto, style.min_height) {
        (_, Some(min_height)) => Some(AutoGrow { min_height }),
        (true, None) => Some(AutoGrow {
            min_height: size.height,
        }),
        (false, None) => None,
    }
}

pub(crate) fn page_name(frame: &SourceNode, index: usize) -> String {
    match frame.name().trim() {
        "" => format!("Page {}", index + 1),
        name => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IdStrategy, MigrationOptions};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn options() -> MigrationOptions {
        MigrationOptions {
            id_strategy: IdStrategy::Sequential,
            ..MigrationOptions::default()
        }
    }

    fn frame(value: serde_json::Value) -> SourceNode {
        serde_json::from_value(value).unwrap()
    }

    fn frame_props(node: &SceneNode) -> &FrameProps {
        match &node.kind {
            NodeKind::Frame(props) => props,
            other => panic!("Expected FRAME, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_to_white_portrait_page() {
        let options = options();
        let mut ctx = TransformContext::new(&options, None, "Arial");

        let build = build_generic_page(&frame(json!({"type": "localGroup"})), 2, &mut ctx);

        assert_eq!(build.page.name, "Page 3");
        assert_eq!(build.page.size, PageSize { width: 794.0, height: 1123.0 });
        assert_eq!(build.page.orientation, Orientation::Portrait);
        assert_eq!(build.page.root_id, build.nodes[0].id);
        assert!(!build.page.is_placeholder);

        let root = &build.nodes[0];
        assert_eq!(root.parent_id, None);
        assert_eq!(root.fills, vec![Paint::solid(Color::WHITE)]);
        assert_eq!(frame_props(root).auto_grow, None);
    }

    #[test]
    fn test_explicit_size_background_and_image() {
        let options = options();
        let mut ctx = TransformContext::new(&options, None, "Arial");
        let source = frame(json!({
            "name": "Cover",
            "styles": {
                "width": "1123px",
                "height": "794px",
                "backgroundColor": "#112233",
                "backgroundImage": "url('{{ hero }}')"
            }
        }));

        let build = build_generic_page(&source, 0, &mut ctx);

        assert_eq!(build.page.name, "Cover");
        assert_eq!(build.page.orientation, Orientation::Landscape);
        assert_eq!(
            build.nodes[0].fills,
            vec![
                Paint::solid(Color::rgb(0x11, 0x22, 0x33)),
                Paint::Image {
                    image_ref: "{{{ hero }}}".to_string(),
                    scale_mode: "fill".to_string()
                }
            ]
        );
    }

    #[test]
    fn test_auto_grow_from_style() {
        let options = options();
        let mut ctx = TransformContext::new(&options, None, "Arial");

        let grows = build_generic_page(&frame(json!({"styles": {"height": "auto"}})), 0, &mut ctx);
        assert_eq!(
            frame_props(&grows.nodes[0]).auto_grow,
            Some(AutoGrow { min_height: 1123.0 })
        );

        let floored = build_generic_page(&frame(json!({"styles": {"minHeight": "600px"}})), 0, &mut ctx);
        assert_eq!(
            frame_props(&floored.nodes[0]).auto_grow,
            Some(AutoGrow { min_height: 600.0 })
        );
    }

    #[test]
    fn test_children_attached_to_root() {
        let options = options();
        let mut ctx = TransformContext::new(&options, None, "Arial");
        let source = frame(json!({
            "children": [
                {"type": "localText", "content": "<p>{{ name }}</p>"},
                {"type": "localLine"}
            ]
        }));

        let build = build_generic_page(&source, 0, &mut ctx);

        assert_eq!(build.nodes.len(), 3);
        let root = &build.nodes[0];
        assert_eq!(
            root.children().unwrap(),
            &[build.nodes[1].id.clone(), build.nodes[2].id.clone()]
        );
        assert!(build.nodes[1..]
            .iter()
            .all(|n| n.parent_id.as_deref() == Some(root.id.as_str())));
    }
}
