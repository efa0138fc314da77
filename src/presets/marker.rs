use crate::parser::Color;
use crate::schema::{
    NodeKind, Orientation, Page, PageSize, Paint, Placeholder, PlaceholderRule, SceneNode, TextAlign,
    TextProps, MARKER_PAGE_TYPE,
};
use crate::transform::frame::{page_name, root_frame};
use crate::transform::{PageBuild, TransformContext};
use crate::types::{SourceKind, SourceNode};
use std::collections::BTreeSet;

pub const MARKER_PAGE_SIZE: PageSize = PageSize {
    width: 600.0,
    height: 200.0,
};

/// `#1f2937`
const MARKER_BACKGROUND: Color = Color::rgb(0x1f, 0x29, 0x37);

/// Content slot a marker page stands in for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    ProductSnippets,
    CustomContent,
}

impl MarkerKind {
    /// `placeholder.contentType` of the page
    pub fn content_type(&self) -> &'static str {
        match self {
            MarkerKind::ProductSnippets => "snippets",
            MarkerKind::CustomContent => "customContent",
        }
    }

    /// Reserved wildcard carried by the page's text node
    pub fn expression(&self) -> &'static str {
        match self {
            MarkerKind::ProductSnippets => "{{{productSnippets}}}",
            MarkerKind::CustomContent => "{{{customContent}}}",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if normalized.contains("snippet") {
            Some(MarkerKind::ProductSnippets)
        } else if normalized.contains("customcontent") {
            Some(MarkerKind::CustomContent)
        } else {
            None
        }
    }
}

/// Find a layout-content child that turns the frame into a marker page
///
/// The child's name is checked first, then its type tag, so a generic
/// `layoutContent` node named "Product snippets" is recognized as well.
pub fn detect_marker(frame: &SourceNode) -> Option<MarkerKind> {
    frame
        .children
        .iter()
        .filter(|child| child.kind() == SourceKind::LayoutContent)
        .find_map(|child| MarkerKind::from_label(child.name()).or_else(|| MarkerKind::from_label(child.tag())))
}

/// Replace a frame with a placeholder page for a content slot
///
/// The page is a small dark FRAME holding one TEXT node with the slot's
/// reserved expression. It is flagged as a placeholder hidden when the slot
/// resolves empty.
pub fn build_marker_page(
    frame: &SourceNode,
    marker: MarkerKind,
    index: usize,
    ctx: &mut TransformContext,
) -> PageBuild {
    let name = page_name(frame, index);

    let root_id = ctx.next_id();
    let mut root = root_frame(root_id, &name, MARKER_PAGE_SIZE, None);
    root.fills.push(Paint::solid(MARKER_BACKGROUND));

    let expression = marker.expression();
    let kind = NodeKind::Text(TextProps {
        content: expression.to_string(),
        plain_text: expression.to_string(),
        font_family: ctx.default_font(),
        font_size: 16.0,
        font_weight: 700,
        line_height: None,
        letter_spacing: None,
        text_align: TextAlign::Center,
    });
    let mut text = SceneNode::new(ctx.next_id(), Some(root.id.clone()), marker.content_type(), kind);
    text.x = 20.0;
    text.y = 84.0;
    text.width = MARKER_PAGE_SIZE.width - 40.0;
    text.height = 32.0;
    text.fills.push(Paint::solid(Color::WHITE));

    if let Some(children) = root.children_mut() {
        children.push(text.id.clone());
    }

    ctx.stats.markers += 1;
    ctx.note(format!(
        "Frame '{name}' replaced by '{}' marker page",
        marker.content_type()
    ));

    let page = Page {
        id: ctx.next_id(),
        name,
        root_id: root.id.clone(),
        orientation: Orientation::from_size(MARKER_PAGE_SIZE.width, MARKER_PAGE_SIZE.height),
        size: MARKER_PAGE_SIZE,
        types: BTreeSet::from([MARKER_PAGE_TYPE.to_string()]),
        is_placeholder: true,
        placeholder: Some(Placeholder {
            content_type: marker.content_type().to_string(),
            rules: vec![PlaceholderRule::hide_when_empty()],
        }),
    };

    PageBuild {
        page,
        nodes: vec![root, text],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IdStrategy, MigrationOptions};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn source(value: serde_json::Value) -> SourceNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_detect_marker() {
        let by_tag = source(json!({"children": [{"type": "layoutProductSnippets"}]}));
        assert_eq!(detect_marker(&by_tag), Some(MarkerKind::ProductSnippets));

        let by_name = source(json!({"children": [{"type": "layoutContent", "name": "Custom content"}]}));
        assert_eq!(detect_marker(&by_name), Some(MarkerKind::CustomContent));

        let unrelated = source(json!({"children": [
            {"type": "layoutContent", "name": "sidebar"},
            {"type": "localText", "name": "productSnippets"}
        ]}));
        assert_eq!(detect_marker(&unrelated), None);
    }

    #[test]
    fn test_marker_page_shape() {
        let options = MigrationOptions {
            id_strategy: IdStrategy::Sequential,
            ..MigrationOptions::default()
        };
        let mut ctx = TransformContext::new(&options, None, "Lato");
        let frame = source(json!({"type": "presetPage", "name": "Snippets"}));

        let build = build_marker_page(&frame, MarkerKind::ProductSnippets, 1, &mut ctx);

        assert!(build.page.is_placeholder);
        assert_eq!(build.page.types, BTreeSet::from(["marker".to_string()]));
        assert_eq!(build.page.size, MARKER_PAGE_SIZE);
        assert_eq!(build.page.orientation, Orientation::Landscape);
        assert_eq!(
            build.page.placeholder,
            Some(Placeholder {
                content_type: "snippets".to_string(),
                rules: vec![PlaceholderRule::hide_when_empty()],
            })
        );

        let root = &build.nodes[0];
        assert_eq!(root.fills, vec![Paint::solid(Color::rgb(0x1f, 0x29, 0x37))]);
        assert_eq!(root.children().unwrap(), &[build.nodes[1].id.clone()]);

        match &build.nodes[1].kind {
            NodeKind::Text(text) => {
                assert_eq!(text.content, "{{{productSnippets}}}");
                assert_eq!(text.font_family, "Lato");
            }
            other => panic!("Expected TEXT, got {other:?}"),
        }
        assert_eq!(ctx.stats.markers, 1);
    }
}
