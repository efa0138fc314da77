//! Scene-graph (v2) document and page types.

use crate::fonts::FontAsset;
use crate::schema::scene::SceneNode;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Page type tag for marker placeholder pages
pub const MARKER_PAGE_TYPE: &str = "marker";

/// Page type tag for canonical preset pages
pub const PRESET_PAGE_TYPE: &str = "preset";

/// A complete v2 document
///
/// `nodes` keeps insertion order, which is source document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub version: String,
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub settings: Settings,
    pub assets: Assets,
    pub metadata: Metadata,
    pub pages: Vec<Page>,
    pub nodes: IndexMap<String, SceneNode>,
}

impl Document {
    /// Root frame of a page, when present
    pub fn page_root(&self, page: &Page) -> Option<&SceneNode> {
        self.nodes.get(&page.root_id)
    }

    /// Direct children of a node, resolved through the node map
    pub fn children_of(&self, node: &SceneNode) -> Vec<&SceneNode> {
        node.children()
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub name: String,
    pub root_id: String,
    pub orientation: Orientation,
    pub size: PageSize,
    pub types: BTreeSet<String>,
    pub is_placeholder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<Placeholder>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Landscape when strictly wider than tall
    pub fn from_size(width: f64, height: f64) -> Self {
        if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

/// Content slot descriptor of a placeholder page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placeholder {
    pub content_type: String,
    pub rules: Vec<PlaceholderRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderRule {
    pub when: String,
    pub action: String,
}

impl PlaceholderRule {
    /// Hide the page when its content resolves empty
    pub fn hide_when_empty() -> Self {
        Self {
            when: "empty".to_string(),
            action: "hide".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub typography: Typography,
    pub grid: Grid,
    pub rulers: Rulers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub default_font: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_font: Option<String>,
    pub available_fonts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub enabled: bool,
    pub size: f64,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            enabled: false,
            size: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rulers {
    pub enabled: bool,
    pub unit: String,
}

impl Default for Rulers {
    fn default() -> Self {
        Self {
            enabled: true,
            unit: "px".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assets {
    pub fonts: BTreeMap<String, FontAsset>,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub source_id: String,
    pub template_type: String,
    pub migrated_at: DateTime<Utc>,
    pub migrator: String,
}
