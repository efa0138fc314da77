use crate::error::Result;
use crate::fonts::resolver::font_identifier;
use crate::types::EmbeddedFont;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Outcome of reconciling fonts against the target font registry
///
/// The name map is keyed by source identifier, so the result does not depend
/// on the order in which individual fonts were processed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSyncReport {
    /// Source font identifier -> target registry name
    #[serde(default)]
    pub name_map: BTreeMap<String, String>,
    #[serde(default)]
    pub uploaded: Vec<String>,
    #[serde(default)]
    pub skipped: Vec<String>,
    #[serde(default)]
    pub failed: Vec<String>,
}

impl FontSyncReport {
    /// Target name for a source font, or the source name when unmapped
    pub fn map_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.name_map.get(name).map(String::as_str).unwrap_or(name)
    }
}

/// Reconciles embedded fonts with a target font registry
///
/// Implementations perform the IO (download, upload); the migration core only
/// consumes the resulting [`FontSyncReport`].
pub trait FontSynchronizer {
    fn sync(&self, fonts: &[EmbeddedFont]) -> Result<FontSyncReport>;
}

/// Font synchronizer backed by a pre-computed JSON file
///
/// The file holds either a full [`FontSyncReport`] or a bare
/// `{"identifier": "registry name"}` map. With a bare map, fonts found in it
/// are reported as skipped (already registered) and the rest as failed.
#[derive(Debug, Clone)]
pub struct FontMapFile {
    path: PathBuf,
}

impl FontMapFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FontSynchronizer for FontMapFile {
    fn sync(&self, fonts: &[EmbeddedFont]) -> Result<FontSyncReport> {
        let text = fs::read_to_string(&self.path)?;
        let value: JsonValue = serde_json::from_str(&text)?;

        if value.get("nameMap").is_some() {
            return Ok(serde_json::from_value(value)?);
        }

        let name_map: BTreeMap<String, String> = serde_json::from_value(value)?;
        let mut report = FontSyncReport {
            name_map,
            ..FontSyncReport::default()
        };

        // Fonts are reconciled one at a time, in source order
        for font in fonts {
            let Some((raw_name, _url)) = font.name_and_url() else {
                continue;
            };
            let identifier = font_identifier(raw_name);
            if report.skipped.contains(&identifier) || report.failed.contains(&identifier) {
                continue;
            }
            if report.name_map.contains_key(&identifier) {
                report.skipped.push(identifier);
            } else {
                tracing::warn!(font = %identifier, "font missing from font map");
                report.failed.push(identifier);
            }
        }

        Ok(report)
    }
}
