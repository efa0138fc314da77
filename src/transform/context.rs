use crate::config::{IdGenerator, MigrationOptions};
use crate::fonts::FontSyncReport;
use crate::parser::{clean_font_family, try_parse_color, Color};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counters collected during one migration run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformStats {
    /// Source nodes routed through the node router or dropped inside a component
    pub total: usize,
    /// Routed source nodes that produced at least one scene node
    pub migrated: usize,
    /// Source nodes that produced nothing
    pub skipped: usize,
    /// Frames replaced by a canonical preset page
    pub presets: usize,
    /// Frames replaced by a marker placeholder page
    pub markers: usize,
    /// Scene nodes in the final document, per kind
    pub by_kind: BTreeMap<String, usize>,
}

/// Mutable state threaded through the recursive tree walk
///
/// Diagnostics are appended in traversal order, which is source document order.
pub struct TransformContext<'a> {
    options: &'a MigrationOptions,
    font_sync: Option<&'a FontSyncReport>,
    default_font: String,
    ids: IdGenerator,
    images: Vec<String>,
    pub diagnostics: Vec<String>,
    pub stats: TransformStats,
}

impl<'a> TransformContext<'a> {
    pub fn new(
        options: &'a MigrationOptions,
        font_sync: Option<&'a FontSyncReport>,
        default_font: impl Into<String>,
    ) -> Self {
        Self {
            options,
            font_sync,
            default_font: default_font.into(),
            ids: IdGenerator::new(options.id_strategy),
            images: Vec::new(),
            diagnostics: Vec::new(),
            stats: TransformStats::default(),
        }
    }

    pub fn options(&self) -> &MigrationOptions {
        self.options
    }

    /// Mint a fresh id
    pub fn next_id(&mut self) -> String {
        self.ids.next_id()
    }

    /// Record a non-fatal diagnostic
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.diagnostics.push(message);
    }

    /// Record an informational diagnostic (preset and marker substitutions)
    pub fn note(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{message}");
        self.diagnostics.push(message);
    }

    /// Parse a color, recording a diagnostic when it falls back to black
    pub fn color(&mut self, value: &str, owner: &str) -> Color {
        match try_parse_color(value) {
            Some(color) => color,
            None => {
                self.warn(format!(
                    "Unrecognized color '{value}' on '{owner}', using black"
                ));
                Color::BLACK
            }
        }
    }

    /// Target name for a source font family
    ///
    /// Passes the cleaned name through unchanged when no font sync report is
    /// available or the font is not in its name map.
    pub fn map_font(&self, family: &str) -> String {
        let cleaned = clean_font_family(family);
        match self.font_sync {
            Some(report) => report.map_name(&cleaned).to_string(),
            None => cleaned,
        }
    }

    /// Default font family, already mapped
    pub fn default_font(&self) -> String {
        self.map_font(&self.default_font)
    }

    /// Remember an image URL for the document asset list
    pub fn record_image(&mut self, url: &str) {
        if !self.images.iter().any(|known| known == url) {
            self.images.push(url.to_string());
        }
    }

    /// Consume the context, returning diagnostics, stats and image assets
    pub fn finish(self) -> (Vec<String>, TransformStats, Vec<String>) {
        (self.diagnostics, self.stats, self.images)
    }
}
