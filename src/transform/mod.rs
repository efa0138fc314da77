/// Source node to scene node transformation
///
/// - `context`: mutable state threaded through the walk (ids, diagnostics, stats)
/// - `text`: rich text nodes
/// - `rectangle`: rectangles and images
/// - `line`: horizontal rules
/// - `component`: groups, plugin components and structural wrappers
/// - `frame`: generic page root frames
pub mod component;
pub mod context;
pub mod frame;
pub mod line;
pub mod rectangle;
pub mod text;

use crate::parser::ParsedStyle;
use crate::schema::{NodeKind, SceneNode};
use crate::types::{SourceKind, SourceNode};

// Re-export commonly used items
pub use component::{find_component_marker, lookup_plugin, transform_group, PluginSpec};
pub use context::{TransformContext, TransformStats};
pub use frame::{build_generic_page, PageBuild};
pub use line::transform_line;
pub use rectangle::{is_valid_image_source, transform_rectangle};
pub use text::transform_text;

/// Transform one source node into zero or more scene nodes
///
/// Dispatches on the node's kind. The returned vector is flat: the node's own
/// scene node comes first, followed by all of its descendants. Unknown kinds
/// produce nothing and a diagnostic; they never fail the migration.
///
/// # Arguments
/// * `node` - Source node to transform
/// * `parent_id` - Id of the scene node the result is attached under
/// * `ctx` - Transformation context
pub fn route_node(node: &SourceNode, parent_id: &str, ctx: &mut TransformContext) -> Vec<SceneNode> {
    ctx.stats.total += 1;

    let nodes = match node.kind() {
        SourceKind::Text => vec![transform_text(node, parent_id, ctx)],
        SourceKind::Rectangle | SourceKind::Image => vec![transform_rectangle(node, parent_id, ctx)],
        SourceKind::Line => vec![transform_line(node, parent_id, ctx)],
        SourceKind::Group => transform_group(node, parent_id, ctx),
        // Consumed by the enclosing group or page detection
        SourceKind::ComponentMarker | SourceKind::LayoutContent => Vec::new(),
        SourceKind::Unknown(tag) => {
            ctx.warn(format!(
                "Unknown node type '{}' on '{}', skipped",
                tag,
                node.name()
            ));
            Vec::new()
        }
    };

    if nodes.is_empty() {
        ctx.stats.skipped += 1;
    } else {
        ctx.stats.migrated += 1;
    }

    nodes
}

/// Walk `children` in order and attach the results under `container`
///
/// Only nodes whose `parentId` is the container are listed in its `children`;
/// deeper descendants are already listed by their own parents.
///
/// # Returns
/// All scene nodes produced for the children, flat, in document order.
pub fn walk_children(
    children: &[SourceNode],
    container: &mut SceneNode,
    ctx: &mut TransformContext,
) -> Vec<SceneNode> {
    let mut produced = Vec::new();

    for child in children {
        produced.extend(route_node(child, &container.id, ctx));
    }

    let direct: Vec<String> = produced
        .iter()
        .filter(|n| n.parent_id.as_deref() == Some(container.id.as_str()))
        .map(|n| n.id.clone())
        .collect();
    if let Some(list) = container.children_mut() {
        list.extend(direct);
    }

    produced
}

/// Create a scene node positioned and sized from a parsed style
pub(crate) fn styled_node(
    source: &SourceNode,
    style: &ParsedStyle,
    parent_id: &str,
    kind: NodeKind,
    ctx: &mut TransformContext,
) -> SceneNode {
    let name = if source.name().is_empty() {
        kind.name().to_ascii_lowercase()
    } else {
        source.name().to_string()
    };

    let mut node = SceneNode::new(ctx.next_id(), Some(parent_id.to_string()), name, kind);
    node.x = style.x;
    node.y = style.y;
    node.width = style.width;
    node.height = style.height;
    node.rotation = style.rotation;
    node.visible = style.visible;
    node.opacity = style.opacity;
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IdStrategy, MigrationOptions};
    use serde_json::json;

    fn options() -> MigrationOptions {
        MigrationOptions {
            id_strategy: IdStrategy::Sequential,
            ..MigrationOptions::default()
        }
    }

    fn source(value: serde_json::Value) -> SourceNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_unknown_type_is_skipped_with_warning() {
        let options = options();
        let mut ctx = TransformContext::new(&options, None, "Arial");

        let nodes = route_node(&source(json!({"type": "localVideo", "name": "Intro"})), "root", &mut ctx);

        assert!(nodes.is_empty());
        assert_eq!(ctx.stats.skipped, 1);
        assert_eq!(
            ctx.diagnostics,
            vec!["Unknown node type 'localVideo' on 'Intro', skipped"]
        );
    }

    #[test]
    fn test_markers_are_swallowed_silently() {
        let options = options();
        let mut ctx = TransformContext::new(&options, None, "Arial");

        let nodes = route_node(&source(json!({"type": "localCom", "name": "qrCode"})), "root", &mut ctx);

        assert!(nodes.is_empty());
        assert!(ctx.diagnostics.is_empty());
        assert_eq!(ctx.stats.total, 1);
    }

    #[test]
    fn test_walk_children_attaches_direct_children_only() {
        let options = options();
        let mut ctx = TransformContext::new(&options, None, "Arial");
        let mut root = SceneNode::new(
            "root".to_string(),
            None,
            "Root",
            NodeKind::Frame(Default::default()),
        );

        let children = vec![
            source(json!({"type": "localText", "name": "Title", "content": "Hello"})),
            source(json!({"type": "localGroup", "name": "Box", "children": [
                {"type": "localRectangle", "name": "Inner"}
            ]})),
            source(json!({"type": "localLine", "name": "Rule"})),
        ];

        let produced = walk_children(&children, &mut root, &mut ctx);

        let names: Vec<&str> = produced.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Title", "Box", "Inner", "Rule"]);

        let listed: Vec<&str> = root.children().unwrap().iter().map(String::as_str).collect();
        let expected: Vec<&str> = produced
            .iter()
            .filter(|n| n.name != "Inner")
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(listed, expected);

        let group = &produced[1];
        assert_eq!(group.children().unwrap(), &[produced[2].id.clone()]);
        assert_eq!(produced[2].parent_id.as_deref(), Some(group.id.as_str()));
    }
}
