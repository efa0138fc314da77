use crate::parser::{parse_style, Color};
use crate::schema::{NodeKind, SceneNode, Stroke};
use crate::transform::context::TransformContext;
use crate::transform::rectangle::border_stroke;
use crate::transform::styled_node;
use crate::types::SourceNode;

/// Transform a `localLine` node into a horizontal LINE
///
/// The stroke comes from the border when present, otherwise a 1px solid black
/// line is used. The line spans the node's width and its height collapses to
/// the stroke weight.
pub fn transform_line(node: &SourceNode, parent_id: &str, ctx: &mut TransformContext) -> SceneNode {
    let style = parse_style(&node.styles);

    let stroke = match &style.border {
        Some(border) => border_stroke(border, node.name(), ctx),
        None => Stroke::new(Color::BLACK, 1.0, "solid"),
    };

    let mut scene = styled_node(node, &style, parent_id, NodeKind::Line, ctx);
    scene.height = stroke.weight;
    scene.strokes.push(stroke);
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MigrationOptions;
    use serde_json::json;

    #[test]
    fn test_default_stroke() {
        let options = MigrationOptions::default();
        let mut ctx = TransformContext::new(&options, None, "Arial");
        let node: SourceNode =
            serde_json::from_value(json!({"type": "localLine", "styles": {"width": "320px", "top": 50}}))
                .unwrap();

        let scene = transform_line(&node, "root", &mut ctx);

        assert_eq!(scene.kind, NodeKind::Line);
        assert_eq!(scene.strokes, vec![Stroke::new(Color::BLACK, 1.0, "solid")]);
        assert_eq!((scene.y, scene.width, scene.height), (50.0, 320.0, 1.0));
    }

    #[test]
    fn test_stroke_from_border_bottom() {
        let options = MigrationOptions::default();
        let mut ctx = TransformContext::new(&options, None, "Arial");
        let node: SourceNode = serde_json::from_value(json!({
            "type": "localLine",
            "styles": {"borderBottom": "3px dotted #cccccc"}
        }))
        .unwrap();

        let scene = transform_line(&node, "root", &mut ctx);

        assert_eq!(
            scene.strokes,
            vec![Stroke::new(Color::rgb(204, 204, 204), 3.0, "dotted")]
        );
        assert_eq!(scene.height, 3.0);
    }
}
