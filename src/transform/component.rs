use crate::parser::parse_style;
use crate::schema::{ComponentProps, FallbackRender, FrameProps, NodeKind, Paint, SceneNode};
use crate::transform::context::TransformContext;
use crate::transform::{styled_node, walk_children};
use crate::types::{SourceKind, SourceNode};
use serde_json::{Map, Value as JsonValue};

/// Editor-only key excluded when merging component configuration
pub const RESERVED_CONFIG_KEY: &str = "_editor";

/// Target plugin for a legacy component name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginSpec {
    /// Name used by the marker node and as the configuration key
    pub source_name: &'static str,
    pub plugin_id: &'static str,
    pub display_name: &'static str,
    /// Cannot be edited in the target editor but must still be exported
    pub render_only: bool,
}

const PLUGINS: [PluginSpec; 9] = [
    PluginSpec {
        source_name: "qrCode",
        plugin_id: "qr-code",
        display_name: "QR Code",
        render_only: false,
    },
    PluginSpec {
        source_name: "barcode",
        plugin_id: "barcode",
        display_name: "Barcode",
        render_only: false,
    },
    PluginSpec {
        source_name: "productGrid",
        plugin_id: "product-grid",
        display_name: "Product Grid",
        render_only: false,
    },
    PluginSpec {
        source_name: "priceList",
        plugin_id: "price-list",
        display_name: "Price List",
        render_only: false,
    },
    PluginSpec {
        source_name: "tableOfContents",
        plugin_id: "table-of-contents",
        display_name: "Table of Contents",
        render_only: false,
    },
    PluginSpec {
        source_name: "productIndex",
        plugin_id: "product-index",
        display_name: "Product Index",
        render_only: false,
    },
    PluginSpec {
        source_name: "chart",
        plugin_id: "chart",
        display_name: "Chart",
        render_only: true,
    },
    PluginSpec {
        source_name: "staticMap",
        plugin_id: "static-map",
        display_name: "Static Map",
        render_only: true,
    },
    PluginSpec {
        source_name: "productSnippets",
        plugin_id: "product-snippets",
        display_name: "Product Snippets",
        render_only: true,
    },
];

/// Look up the plugin for a legacy component name
///
/// Exact matches win; otherwise the comparison ignores ASCII case.
pub fn lookup_plugin(name: &str) -> Option<&'static PluginSpec> {
    let name = name.trim();
    PLUGINS
        .iter()
        .find(|spec| spec.source_name == name)
        .or_else(|| PLUGINS.iter().find(|spec| spec.source_name.eq_ignore_ascii_case(name)))
}

/// A component marker found below a group
#[derive(Debug, Clone)]
pub struct MarkerMatch<'a> {
    pub marker: &'a SourceNode,
    /// Nodes on the path to the marker carrying configuration, outermost first
    pub config_chain: Vec<&'a SourceNode>,
}

impl<'a> MarkerMatch<'a> {
    /// Plugin name declared by the marker
    pub fn plugin_name(&self) -> &'a str {
        self.marker.name().trim()
    }

    /// Configuration for `key` owned by the deepest configured node
    ///
    /// Only the deepest node with a non-empty configuration is consulted.
    /// Shallower configuration is stale once a deeper node declares any.
    pub fn config_for(&self, key: &str) -> Option<&'a Map<String, JsonValue>> {
        self.config_chain.last().and_then(|node| node.config_for(key))
    }
}

/// Find the component marker below a group
///
/// Depth-first: at each level the direct children are checked for a marker
/// before descending, and subtrees are visited in child order, so the first
/// match in that order wins. Every node on the path that carries a
/// configuration object is recorded, including the marker itself.
pub fn find_component_marker(group: &SourceNode) -> Option<MarkerMatch<'_>> {
    let mut chain = Vec::new();
    search_marker(group, &mut chain)
}

fn search_marker<'a>(node: &'a SourceNode, chain: &mut Vec<&'a SourceNode>) -> Option<MarkerMatch<'a>> {
    let pushed = !node.com_comp_config.is_empty();
    if pushed {
        chain.push(node);
    }

    let direct = node
        .children
        .iter()
        .find(|child| child.kind() == SourceKind::ComponentMarker);

    let found = match direct {
        Some(marker) => {
            let mut config_chain = chain.clone();
            if !marker.com_comp_config.is_empty() {
                config_chain.push(marker);
            }
            Some(MarkerMatch {
                marker,
                config_chain,
            })
        }
        None => node
            .children
            .iter()
            .find_map(|child| search_marker(child, chain)),
    };

    if pushed {
        chain.pop();
    }
    found
}

/// Transform a structural group
///
/// Groups holding a component marker become a single COMPONENT node; their
/// other visual descendants are dropped, each with a diagnostic and a skipped
/// count. Groups without a marker become a FRAME wrapper whose children are
/// walked through the router.
///
/// # Returns
/// The group's node first, followed by any descendants.
pub fn transform_group(node: &SourceNode, parent_id: &str, ctx: &mut TransformContext) -> Vec<SceneNode> {
    match find_component_marker(node) {
        Some(found) => {
            let component = component_node(node, &found, parent_id, ctx);
            report_dropped(node, node.name(), ctx);
            vec![component]
        }
        None => {
            ctx.warn(format!(
                "Group '{}' has no component marker, kept as a plain frame",
                node.name()
            ));
            frame_wrapper(node, parent_id, ctx)
        }
    }
}

fn component_node(
    group: &SourceNode,
    found: &MarkerMatch<'_>,
    parent_id: &str,
    ctx: &mut TransformContext,
) -> SceneNode {
    let style = parse_style(&group.styles);
    let source_name = found.plugin_name();

    let (plugin_id, plugin_name, fallback_render) = match lookup_plugin(source_name) {
        Some(spec) => {
            if spec.render_only {
                ctx.warn(format!(
                    "Component '{}' uses render-only plugin '{}': not editable, still exported",
                    group.name(),
                    spec.plugin_id
                ));
            }
            let fallback = if spec.render_only {
                FallbackRender::Export
            } else {
                FallbackRender::Placeholder
            };
            (spec.plugin_id.to_string(), spec.display_name.to_string(), fallback)
        }
        None => {
            let derived = dash_case(source_name);
            ctx.warn(format!(
                "No plugin mapping for component '{source_name}', using '{derived}'"
            ));
            (derived, source_name.to_string(), FallbackRender::Placeholder)
        }
    };

    let mut props = Map::new();
    if let Some(config) = found.config_for(source_name) {
        merge_config(&mut props, config);
    }

    let kind = NodeKind::Component(ComponentProps {
        children: Vec::new(),
        plugin_id,
        plugin_name,
        props,
        fallback_render,
    });
    styled_node(group, &style, parent_id, kind, ctx)
}

/// Count and report visual nodes a component swallows
fn report_dropped(node: &SourceNode, component: &str, ctx: &mut TransformContext) {
    for child in &node.children {
        match child.kind() {
            SourceKind::Text | SourceKind::Rectangle | SourceKind::Image | SourceKind::Line => {
                ctx.stats.total += 1;
                ctx.stats.skipped += 1;
                ctx.note(format!(
                    "'{}' inside component '{component}' not migrated",
                    child.name()
                ));
            }
            SourceKind::Group => report_dropped(child, component, ctx),
            SourceKind::ComponentMarker | SourceKind::LayoutContent | SourceKind::Unknown(_) => {}
        }
    }
}

fn frame_wrapper(node: &SourceNode, parent_id: &str, ctx: &mut TransformContext) -> Vec<SceneNode> {
    let style = parse_style(&node.styles);
    let mut frame = styled_node(node, &style, parent_id, NodeKind::Frame(FrameProps::default()), ctx);
    if let Some(background) = &style.background_color {
        let color = ctx.color(background, node.name());
        frame.fills.push(Paint::solid(color));
    }

    let descendants = walk_children(&node.children, &mut frame, ctx);

    let mut nodes = Vec::with_capacity(descendants.len() + 1);
    nodes.push(frame);
    nodes.extend(descendants);
    nodes
}

/// Deep-merge `overlay` into `base`, overlay values winning key by key
///
/// Nested objects are merged recursively; any other value replaces the base
/// value. The reserved editor key is skipped at the top level.
pub fn merge_config(base: &mut Map<String, JsonValue>, overlay: &Map<String, JsonValue>) {
    for (key, value) in overlay {
        if key == RESERVED_CONFIG_KEY {
            continue;
        }
        merge_value(base, key, value);
    }
}

fn merge_value(base: &mut Map<String, JsonValue>, key: &str, value: &JsonValue) {
    match (base.get_mut(key), value) {
        (Some(JsonValue::Object(existing)), JsonValue::Object(incoming)) => {
            for (inner_key, inner_value) in incoming {
                merge_value(existing, inner_key, inner_value);
            }
        }
        _ => {
            base.insert(key.to_string(), value.clone());
        }
    }
}

/// Derive a dash-cased plugin id from a component name
///
/// `productCarousel` -> `product-carousel`, `Size Chart 2` -> `size-chart-2`
pub fn dash_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut previous: Option<char> = None;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            let boundary = c.is_ascii_uppercase()
                && previous.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit());
            if boundary && !out.ends_with('-') {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
        previous = Some(c);
    }

    out.trim_end_matches('-').to_string()
}
