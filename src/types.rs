//! Source (v1) layout model.
//!
//! The v1 format is an untyped, recursive tree. Every field is optional and
//! values are loosely typed, so deserialization here is deliberately lenient:
//! malformed optional fields fall back to their empty value instead of
//! rejecting the whole document.

use crate::error::{MigrateError, Result};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value as JsonValue};

/// Free-form style dictionary (`string -> string | number`)
pub type StyleMap = Map<String, JsonValue>;

/// Per-plugin component configuration (`plugin name -> config object`)
pub type ComponentConfig = Map<String, JsonValue>;

/// A structurally validated v1 source document
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub content_template_name: String,
    pub template_type: String,
    pub pages: Vec<SourcePage>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub default_font: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub secondary_font: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub embedded_fonts: Vec<EmbeddedFont>,
    #[serde(default)]
    pub assets: Option<JsonValue>,
}

impl SourceDocument {
    /// Build a source document from an already schema-validated JSON value
    ///
    /// # Returns
    /// * `Ok(SourceDocument)` - The typed document
    /// * `Err(MigrateError::MissingInput)` - If the value is `null`
    /// * `Err(MigrateError::InvalidSource)` - If required fields are missing
    pub fn from_value(value: JsonValue) -> Result<Self> {
        if value.is_null() {
            return Err(MigrateError::MissingInput);
        }
        serde_json::from_value(value).map_err(|e| MigrateError::InvalidSource(e.to_string()))
    }

    /// Ordered frame list: the children of the first page
    pub fn frames(&self) -> &[SourceNode] {
        self.pages
            .first()
            .map(|page| page.children.as_slice())
            .unwrap_or(&[])
    }
}

/// One v1 page; only its children matter to the migration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcePage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<SourceNode>,
}

/// A node of the v1 layout tree
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNode {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub node_type: Option<String>,
    #[serde(default, deserialize_with = "object_or_default")]
    pub styles: StyleMap,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<SourceNode>,
    #[serde(default, deserialize_with = "object_or_default")]
    pub com_comp_config: ComponentConfig,
}

impl SourceNode {
    /// The node kind derived from its type tag
    pub fn kind(&self) -> SourceKind {
        SourceKind::from_tag(self.tag())
    }

    /// Raw type tag, empty when absent
    pub fn tag(&self) -> &str {
        self.node_type.as_deref().unwrap_or("")
    }

    /// Node name, empty when absent
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Configuration object declared on this node for `plugin`, if any
    pub fn config_for(&self, plugin: &str) -> Option<&Map<String, JsonValue>> {
        self.com_comp_config.get(plugin).and_then(|v| v.as_object())
    }
}

/// Closed set of source node kinds
///
/// Every v1 type tag maps to exactly one variant. Tags outside the known set
/// land in `Unknown`, which is always legal and never fails the migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Text,
    Rectangle,
    Image,
    Line,
    /// Structural group (`localGroup`, `presetPage`)
    Group,
    /// Marker naming the plugin its enclosing group instantiates
    ComponentMarker,
    /// Layout-content slot (product snippets, custom content)
    LayoutContent,
    Unknown(String),
}

impl SourceKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "localText" => SourceKind::Text,
            "localRectangle" => SourceKind::Rectangle,
            "localImage" => SourceKind::Image,
            "localLine" => SourceKind::Line,
            "localGroup" | "presetPage" => SourceKind::Group,
            "localCom" => SourceKind::ComponentMarker,
            "layoutContent" | "layoutProductSnippets" | "layoutCustomContent" => {
                SourceKind::LayoutContent
            }
            other => SourceKind::Unknown(other.to_string()),
        }
    }
}

/// Embedded font descriptor as found in `embeddedFonts`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EmbeddedFont {
    /// Populated object carrying the uploaded file name
    Populated {
        #[serde(rename = "fileName")]
        file_name: String,
        #[serde(alias = "src")]
        url: String,
    },
    /// Legacy object carrying only a font name
    Legacy {
        #[serde(rename = "fontName", alias = "name")]
        font_name: String,
        #[serde(alias = "src")]
        url: String,
    },
    /// Bare reference id without usable data
    Reference(String),
    Unrecognized(JsonValue),
}

impl EmbeddedFont {
    /// Raw name (file name or font name) and source URL, when usable
    pub fn name_and_url(&self) -> Option<(&str, &str)> {
        match self {
            EmbeddedFont::Populated { file_name, url } => Some((file_name, url)),
            EmbeddedFont::Legacy { font_name, url } => Some((font_name, url)),
            EmbeddedFont::Reference(_) | EmbeddedFont::Unrecognized(_) => None,
        }
    }
}

/// Accept strings and numbers, treat anything else as absent
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::String(s) => Some(s),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Treat `null` as the type's default value
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept only JSON objects, anything else becomes an empty map
fn object_or_default<'de, D>(deserializer: D) -> std::result::Result<Map<String, JsonValue>, D::Error>
where
    D: Deserializer<'de>,
{
    match JsonValue::deserialize(deserializer)? {
        JsonValue::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_source_kind_from_tag() {
        assert_eq!(SourceKind::from_tag("localText"), SourceKind::Text);
        assert_eq!(SourceKind::from_tag("presetPage"), SourceKind::Group);
        assert_eq!(SourceKind::from_tag("localCom"), SourceKind::ComponentMarker);
        assert_eq!(
            SourceKind::from_tag("layoutProductSnippets"),
            SourceKind::LayoutContent
        );
        assert_eq!(
            SourceKind::from_tag("localVideo"),
            SourceKind::Unknown("localVideo".to_string())
        );
    }

    #[test]
    fn test_null_input_is_missing() {
        let result = SourceDocument::from_value(JsonValue::Null);
        assert!(matches!(result, Err(MigrateError::MissingInput)));
    }

    #[test]
    fn test_missing_required_field_is_invalid() {
        let result = SourceDocument::from_value(json!({"_id": "abc"}));
        assert!(matches!(result, Err(MigrateError::InvalidSource(_))));
    }

    #[test]
    fn test_lenient_node_fields() {
        let node: SourceNode = serde_json::from_value(json!({
            "name": 42,
            "type": "localText",
            "styles": null,
            "children": null,
            "content": "<p>hi</p>",
            "comCompConfig": "garbage"
        }))
        .unwrap();

        assert_eq!(node.name(), "42");
        assert_eq!(node.kind(), SourceKind::Text);
        assert!(node.styles.is_empty());
        assert!(node.children.is_empty());
        assert!(node.com_comp_config.is_empty());
    }

    #[test]
    fn test_embedded_font_shapes() {
        let fonts: Vec<EmbeddedFont> = serde_json::from_value(json!([
            {"fileName": "Roboto-Bold.ttf", "url": "https://cdn/roboto-bold.ttf"},
            {"fontName": "OpenSans", "url": "https://cdn/opensans.ttf"},
            "64b0c0ffee",
            {"unexpected": true}
        ]))
        .unwrap();

        assert_eq!(
            fonts[0].name_and_url(),
            Some(("Roboto-Bold.ttf", "https://cdn/roboto-bold.ttf"))
        );
        assert_eq!(
            fonts[1].name_and_url(),
            Some(("OpenSans", "https://cdn/opensans.ttf"))
        );
        assert_eq!(fonts[2], EmbeddedFont::Reference("64b0c0ffee".to_string()));
        assert!(fonts[3].name_and_url().is_none());
    }

    #[test]
    fn test_frames_are_first_page_children() {
        let doc = SourceDocument::from_value(json!({
            "_id": "t1",
            "contentTemplateName": "Catalog",
            "templateType": "catalog",
            "pages": [
                {"children": [{"type": "localPage", "name": "A"}, {"type": "localPage", "name": "B"}]},
                {"children": [{"type": "localPage", "name": "ignored"}]}
            ]
        }))
        .unwrap();

        let names: Vec<&str> = doc.frames().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
