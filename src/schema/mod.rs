pub mod document;
pub mod scene;
pub mod validator;

// Re-export commonly used items
pub use document::{
    Assets, Document, Grid, Metadata, Orientation, Page, PageSize, Placeholder, PlaceholderRule,
    Rulers, Settings, Typography, MARKER_PAGE_TYPE, PRESET_PAGE_TYPE,
};
pub use scene::{
    AutoGrow, ComponentProps, FallbackRender, FrameProps, ImageProps, NodeKind, Paint,
    RectangleProps, SceneNode, Stroke, TextAlign, TextProps, IDENTITY_TRANSFORM,
};
pub use validator::{validate_document, validate_scene_document, ValidationIssue, ValidationResult};
