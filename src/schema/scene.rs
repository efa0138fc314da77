//! Scene-graph (v2) node types.

use crate::parser::Color;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Identity affine transform `[[a, c, tx], [b, d, ty]]`
pub const IDENTITY_TRANSFORM: [[f64; 3]; 2] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

/// A node of the target scene graph
///
/// Common geometry and paint fields live here; the kind-specific payload is
/// flattened in next to them under a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    pub id: String,
    pub parent_id: Option<String>,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub visible: bool,
    pub locked: bool,
    pub opacity: f64,
    pub fills: Vec<Paint>,
    pub strokes: Vec<Stroke>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl SceneNode {
    /// Create a visible, unlocked, fully opaque node with no paints
    pub fn new(id: String, parent_id: Option<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            parent_id,
            name: name.into(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            visible: true,
            locked: false,
            opacity: 1.0,
            fills: Vec::new(),
            strokes: Vec::new(),
            kind,
        }
    }

    /// Upper-case kind tag (`FRAME`, `TEXT`, ...)
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    /// Child ids, for container kinds only
    pub fn children(&self) -> Option<&[String]> {
        match &self.kind {
            NodeKind::Frame(frame) => Some(&frame.children),
            NodeKind::Component(component) => Some(&component.children),
            _ => None,
        }
    }

    /// Mutable child ids, for container kinds only
    pub fn children_mut(&mut self) -> Option<&mut Vec<String>> {
        match &mut self.kind {
            NodeKind::Frame(frame) => Some(&mut frame.children),
            NodeKind::Component(component) => Some(&mut component.children),
            _ => None,
        }
    }
}

/// Kind-specific payload of a [`SceneNode`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum NodeKind {
    Frame(FrameProps),
    Text(TextProps),
    Rectangle(RectangleProps),
    Image(ImageProps),
    Line,
    Component(ComponentProps),
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Frame(_) => "FRAME",
            NodeKind::Text(_) => "TEXT",
            NodeKind::Rectangle(_) => "RECTANGLE",
            NodeKind::Image(_) => "IMAGE",
            NodeKind::Line => "LINE",
            NodeKind::Component(_) => "COMPONENT",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameProps {
    pub children: Vec<String>,
    pub clips_content: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_grow: Option<AutoGrow>,
}

/// Variable frame height with a floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoGrow {
    pub min_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    /// Rich markup
    pub content: String,
    pub plain_text: String,
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    pub text_align: TextAlign,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" | "end" => Some(TextAlign::Right),
            "justify" => Some(TextAlign::Justify),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectangleProps {
    pub corner_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProps {
    pub image_ref: String,
    pub fill_mode: String,
    pub transform: [[f64; 3]; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentProps {
    pub children: Vec<String>,
    pub plugin_id: String,
    pub plugin_name: String,
    pub props: Map<String, JsonValue>,
    pub fallback_render: FallbackRender,
}

/// What the editor shows for a component it cannot edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackRender {
    /// Editable plugin, placeholder shown while loading
    Placeholder,
    /// Render-only plugin, must still be exported
    Export,
}

/// Fill paint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Paint {
    Solid {
        color: Color,
        opacity: f64,
    },
    Image {
        #[serde(rename = "imageRef")]
        image_ref: String,
        #[serde(rename = "scaleMode")]
        scale_mode: String,
    },
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Paint::Solid {
            color,
            opacity: 1.0,
        }
    }
}

/// Stroke paint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub weight: f64,
    pub style: String,
    pub align: String,
}

impl Stroke {
    pub fn new(color: Color, weight: f64, style: impl Into<String>) -> Self {
        Self {
            color,
            weight,
            style: style.into(),
            align: "center".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialized_shape() {
        let mut node = SceneNode::new(
            "n1".to_string(),
            None,
            "Page",
            NodeKind::Frame(FrameProps::default()),
        );
        node.fills.push(Paint::solid(Color::WHITE));
        node.children_mut().unwrap().push("n2".to_string());

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "FRAME");
        assert_eq!(value["parentId"], JsonValue::Null);
        assert_eq!(value["children"], json!(["n2"]));
        assert_eq!(value["clipsContent"], false);
        assert!(value.get("autoGrow").is_none());
        assert_eq!(
            value["fills"][0],
            json!({"type": "SOLID", "color": {"r": 255, "g": 255, "b": 255, "a": 1.0}, "opacity": 1.0})
        );
    }

    #[test]
    fn test_line_has_no_children() {
        let mut node = SceneNode::new("l1".to_string(), Some("p".to_string()), "Line", NodeKind::Line);
        assert!(node.children().is_none());
        assert!(node.children_mut().is_none());
        assert_eq!(node.kind_name(), "LINE");

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "LINE");
        assert_eq!(value["parentId"], "p");
    }

    #[test]
    fn test_text_align_from_css() {
        assert_eq!(TextAlign::from_css("Center"), Some(TextAlign::Center));
        assert_eq!(TextAlign::from_css("justify"), Some(TextAlign::Justify));
        assert_eq!(TextAlign::from_css("middle"), None);
    }
}
