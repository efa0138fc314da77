//! Document assembly: fonts, page detection, tree walk, validation.

use crate::config::MigrationOptions;
use crate::error::{MigrateError, Result};
use crate::fonts::{resolve_fonts, FontSyncReport};
use crate::presets::{build_marker_page, build_preset_page, detect_marker, PresetRegistry};
use crate::schema::{
    validate_scene_document, Assets, Document, Grid, Metadata, Rulers, Settings, Typography,
    ValidationResult,
};
use crate::transform::{build_generic_page, PageBuild, TransformContext, TransformStats};
use crate::types::{SourceDocument, SourceNode};
use chrono::Utc;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Everything a migration run produces
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationOutput {
    pub document: Document,
    pub validation: ValidationResult,
    pub stats: TransformStats,
    /// Human-readable notes in source traversal order, validator warnings last
    pub diagnostics: Vec<String>,
}

/// Migrate a raw v1 JSON value
///
/// # Errors
/// * `MigrateError::MissingInput` - The value is `null`
/// * `MigrateError::InvalidSource` - The value is not a v1 document
/// * `MigrateError::NoPages` - The document has no frames to migrate
pub fn migrate_value(
    value: JsonValue,
    font_sync: Option<&FontSyncReport>,
    options: &MigrationOptions,
) -> Result<MigrationOutput> {
    let source = SourceDocument::from_value(value)?;
    migrate_document(&source, font_sync, options)
}

/// Migrate a v1 document into a v2 document
///
/// Frames are processed in order. Each frame becomes exactly one page: a
/// canonical preset page, a marker placeholder page, or a generic page whose
/// children are walked through the node router. The assembled document is
/// validated before it is returned; validation errors do not fail the run.
///
/// # Arguments
/// * `source` - The v1 document
/// * `font_sync` - Font name table from a [`crate::fonts::FontSynchronizer`],
///   or `None` to keep source font names
/// * `options` - Migration options
///
/// # Returns
/// The document together with its validation result, statistics and
/// diagnostics.
///
/// # Examples
/// ```
/// use layout2scene::config::MigrationOptions;
/// use layout2scene::pipeline::migrate_value;
/// use serde_json::json;
///
/// let source = json!({
///     "_id": "tpl-1",
///     "contentTemplateName": "Spring catalog",
///     "templateType": "catalog",
///     "pages": [{"children": [{"type": "localGroup", "name": "Cover"}]}]
/// });
///
/// let output = migrate_value(source, None, &MigrationOptions::default()).unwrap();
/// assert_eq!(output.document.pages.len(), 1);
/// assert!(output.validation.valid);
/// ```
pub fn migrate_document(
    source: &SourceDocument,
    font_sync: Option<&FontSyncReport>,
    options: &MigrationOptions,
) -> Result<MigrationOutput> {
    let frames = source.frames();
    if frames.is_empty() {
        return Err(MigrateError::NoPages);
    }

    tracing::info!(
        source_id = %source.id,
        frames = frames.len(),
        "migrating document"
    );

    let fonts = resolve_fonts(
        &source.embedded_fonts,
        source.default_font.as_deref(),
        &options.fallback_font,
    );
    tracing::debug!(
        fonts = fonts.available.len(),
        default_font = %fonts.default_font,
        "resolved fonts"
    );

    let mut ctx = TransformContext::new(options, font_sync, fonts.default_font.clone());
    let registry = PresetRegistry::builtin();

    let mut pages = Vec::with_capacity(frames.len());
    let mut nodes = IndexMap::new();

    for (index, frame) in frames.iter().enumerate() {
        let build = build_page(&registry, frame, index, &mut ctx)?;
        tracing::debug!(
            page = %build.page.name,
            nodes = build.nodes.len(),
            "built page"
        );

        pages.push(build.page);
        for node in build.nodes {
            *ctx.stats.by_kind.entry(node.kind_name().to_string()).or_default() += 1;
            nodes.insert(node.id.clone(), node);
        }
    }

    let document_id = ctx.next_id();
    let typography = Typography {
        default_font: ctx.default_font(),
        secondary_font: source.secondary_font.as_deref().map(|font| ctx.map_font(font)),
        available_fonts: fonts.available.clone(),
    };
    let (mut diagnostics, stats, images) = ctx.finish();

    let now = Utc::now();
    let document = Document {
        version: options.document_version.clone(),
        id: document_id,
        name: source.content_template_name.clone(),
        created_at: now,
        updated_at: now,
        settings: Settings {
            typography,
            grid: Grid::default(),
            rulers: Rulers::default(),
        },
        assets: Assets {
            fonts: fonts.fonts,
            images,
        },
        metadata: Metadata {
            source_id: source.id.clone(),
            template_type: source.template_type.clone(),
            migrated_at: now,
            migrator: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        },
        pages,
        nodes,
    };

    let validation = validate_scene_document(&document)?;
    diagnostics.extend(validation.warnings.iter().map(ToString::to_string));

    if validation.valid {
        tracing::info!(
            pages = document.pages.len(),
            nodes = document.nodes.len(),
            skipped = stats.skipped,
            "migration complete"
        );
    } else {
        tracing::warn!(
            errors = validation.errors.len(),
            "migrated document failed validation"
        );
    }

    Ok(MigrationOutput {
        document,
        validation,
        stats,
        diagnostics,
    })
}

/// Build the page for one frame, presets first, then markers
fn build_page(
    registry: &PresetRegistry,
    frame: &SourceNode,
    index: usize,
    ctx: &mut TransformContext,
) -> Result<PageBuild> {
    if let Some(preset_id) = registry.detect(frame) {
        return build_preset_page(registry, preset_id, frame, index, ctx);
    }

    if let Some(marker) = detect_marker(frame) {
        return Ok(build_marker_page(frame, marker, index, ctx));
    }

    Ok(build_generic_page(frame, index, ctx))
}
