use crate::error::{MigrateError, Result};
use crate::parser::{parse_style, Color};
use crate::schema::{
    AutoGrow, ComponentProps, FallbackRender, NodeKind, Orientation, Page, PageSize, Paint, SceneNode,
    PRESET_PAGE_TYPE,
};
use crate::transform::component::{lookup_plugin, merge_config};
use crate::transform::frame::{auto_grow, page_name, root_frame};
use crate::transform::{PageBuild, TransformContext};
use crate::types::{SourceKind, SourceNode};
use serde_json::{json, Map, Value as JsonValue};
use std::collections::BTreeSet;

/// Canonical page a known preset frame is replaced with
#[derive(Debug, Clone, PartialEq)]
pub struct PresetDefinition {
    /// Group name that triggers the preset, also the plugin configuration key
    pub id: &'static str,
    pub size: PageSize,
    pub orientation: Orientation,
    /// Auto-grow floor used when the source frame declares none
    pub auto_grow: Option<f64>,
    pub default_props: Map<String, JsonValue>,
}

/// Closed set of known page presets
#[derive(Debug, Clone)]
pub struct PresetRegistry {
    presets: Vec<PresetDefinition>,
}

impl PresetRegistry {
    /// Registry with the built-in presets
    pub fn builtin() -> Self {
        let portrait = PageSize {
            width: 794.0,
            height: 1123.0,
        };
        let landscape = PageSize {
            width: 1123.0,
            height: 794.0,
        };

        let presets = vec![
            PresetDefinition {
                id: "tableOfContents",
                size: portrait,
                orientation: Orientation::Portrait,
                auto_grow: None,
                default_props: object(json!({
                    "title": "Table of Contents",
                    "levels": 2,
                    "showPageNumbers": true,
                    "style": {"fontSize": 14, "lineHeight": 1.6, "leader": "dots"}
                })),
            },
            PresetDefinition {
                id: "productIndex",
                size: portrait,
                orientation: Orientation::Portrait,
                auto_grow: Some(1123.0),
                default_props: object(json!({
                    "title": "Product Index",
                    "columns": 2,
                    "sortBy": "name",
                    "groupBy": "category",
                    "style": {"fontSize": 12}
                })),
            },
            PresetDefinition {
                id: "priceList",
                size: landscape,
                orientation: Orientation::Landscape,
                auto_grow: Some(794.0),
                default_props: object(json!({
                    "title": "Price List",
                    "columns": ["name", "sku", "price"],
                    "showImages": false,
                    "style": {"fontSize": 11, "zebra": true}
                })),
            },
        ];

        Self { presets }
    }

    /// Known preset ids in registry order
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.presets.iter().map(|preset| preset.id)
    }

    /// Look up a preset by id
    ///
    /// # Errors
    /// `MigrateError::UnknownPreset` when the id is outside the known set.
    pub fn resolve(&self, id: &str) -> Result<&PresetDefinition> {
        self.presets
            .iter()
            .find(|preset| preset.id == id)
            .ok_or_else(|| MigrateError::UnknownPreset(id.to_string()))
    }

    /// Find the preset a frame should be replaced with
    ///
    /// Matches a direct child group whose name equals a preset id, ignoring
    /// ASCII case. Returns the canonical preset id.
    pub fn detect(&self, frame: &SourceNode) -> Option<&'static str> {
        frame
            .children
            .iter()
            .filter(|child| child.kind() == SourceKind::Group)
            .find_map(|child| {
                let name = child.name().trim();
                self.presets
                    .iter()
                    .find(|preset| preset.id.eq_ignore_ascii_case(name))
                    .map(|preset| preset.id)
            })
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn object(value: JsonValue) -> Map<String, JsonValue> {
    match value {
        JsonValue::Object(map) => map,
        _ => Map::new(),
    }
}

/// Replace a frame with the canonical page of a preset
///
/// The page gets a white root FRAME holding one COMPONENT that covers the
/// page. Its props are the preset defaults deep-merged with the most deeply
/// nested configuration found anywhere in the frame, source values winning.
///
/// # Errors
/// `MigrateError::UnknownPreset` when `preset_id` is not registered.
pub fn build_preset_page(
    registry: &PresetRegistry,
    preset_id: &str,
    frame: &SourceNode,
    index: usize,
    ctx: &mut TransformContext,
) -> Result<PageBuild> {
    let preset = registry.resolve(preset_id)?;
    let style = parse_style(&frame.styles);
    let name = page_name(frame, index);

    let floor = auto_grow(&style, preset.size)
        .or_else(|| preset.auto_grow.map(|min_height| AutoGrow { min_height }));

    let root_id = ctx.next_id();
    let mut root = root_frame(root_id, &name, preset.size, floor);
    root.fills.push(Paint::solid(Color::WHITE));

    let mut props = preset.default_props.clone();
    if let Some(config) = deepest_config(frame, preset.id) {
        merge_config(&mut props, config);
    }

    let (plugin_id, plugin_name) = match lookup_plugin(preset.id) {
        Some(spec) => (spec.plugin_id.to_string(), spec.display_name.to_string()),
        None => (preset.id.to_string(), preset.id.to_string()),
    };

    let kind = NodeKind::Component(ComponentProps {
        children: Vec::new(),
        plugin_id,
        plugin_name: plugin_name.clone(),
        props,
        fallback_render: FallbackRender::Placeholder,
    });
    let mut component = SceneNode::new(ctx.next_id(), Some(root.id.clone()), plugin_name, kind);
    component.width = preset.size.width;
    component.height = preset.size.height;

    if let Some(children) = root.children_mut() {
        children.push(component.id.clone());
    }

    ctx.stats.presets += 1;
    ctx.note(format!(
        "Frame '{name}' replaced by preset page '{}'",
        preset.id
    ));

    let page = Page {
        id: ctx.next_id(),
        name,
        root_id: root.id.clone(),
        orientation: preset.orientation,
        size: preset.size,
        types: BTreeSet::from([PRESET_PAGE_TYPE.to_string()]),
        is_placeholder: false,
        placeholder: None,
    };

    Ok(PageBuild {
        page,
        nodes: vec![root, component],
    })
}

/// Most deeply nested configuration for `key` below and including `node`
///
/// On equal depth the first match in child order wins.
pub fn deepest_config<'a>(node: &'a SourceNode, key: &str) -> Option<&'a Map<String, JsonValue>> {
    let mut best: Option<(usize, &'a Map<String, JsonValue>)> = None;
    collect_config(node, key, 0, &mut best);
    best.map(|(_, config)| config)
}

fn collect_config<'a>(
    node: &'a SourceNode,
    key: &str,
    depth: usize,
    best: &mut Option<(usize, &'a Map<String, JsonValue>)>,
) {
    if let Some(config) = node.config_for(key) {
        let deeper = match best {
            Some((found, _)) => depth > *found,
            None => true,
        };
        if deeper {
            *best = Some((depth, config));
        }
    }
    for child in &node.children {
        collect_config(child, key, depth + 1, best);
    }
}
