/// Font handling
///
/// - `resolver`: pure derivation of the font catalog and default font
/// - `sync`: IO boundary producing the source -> registry name table
pub mod resolver;
pub mod sync;

// Re-export commonly used items
pub use resolver::{resolve_fonts, FontAsset, ResolvedFonts, DEFAULT_WEIGHT};
pub use sync::{FontMapFile, FontSyncReport, FontSynchronizer};
