/// Whole-frame page replacement
///
/// - `registry`: named page presets replaced by a canonical component page
/// - `marker`: layout-content slots replaced by a placeholder page
pub mod marker;
pub mod registry;

// Re-export commonly used items
pub use marker::{build_marker_page, detect_marker, MarkerKind, MARKER_PAGE_SIZE};
pub use registry::{build_preset_page, deepest_config, PresetDefinition, PresetRegistry};
