//! # layout2scene
//!
//! A library for migrating legacy tree-based layout documents ("v1") into
//! typed scene-graph documents ("v2").
//!
//! The nested v1 tree is walked once, in document order. Every frame becomes
//! a page: a canonical preset page, a marker placeholder page, or a generic
//! page whose nodes are converted one by one. The result is a flat node map
//! keyed by fresh ids, validated before it is returned.
//!
//! ## Example
//!
//! ```no_run
//! use layout2scene::config::MigrationOptions;
//! use layout2scene::storage::{DocumentSource, FileSource};
//! use layout2scene::pipeline::migrate_document;
//!
//! let source = FileSource::new("layouts").fetch("tpl-42").unwrap();
//! let output = migrate_document(&source, None, &MigrationOptions::default()).unwrap();
//!
//! println!("Pages: {}", output.document.pages.len());
//! println!("Valid: {}", output.validation.valid);
//! for note in &output.diagnostics {
//!     println!("{note}");
//! }
//! ```

pub mod config;
pub mod error;
pub mod fonts;
pub mod parser;
pub mod pipeline;
pub mod presets;
pub mod schema;
pub mod storage;
pub mod transform;
pub mod types;

// Re-export commonly used items
pub use config::MigrationOptions;
pub use error::{MigrateError, Result};
pub use pipeline::{migrate_document, migrate_value, MigrationOutput};
pub use schema::{validate_document, Document, ValidationResult};
pub use types::{SourceDocument, SourceNode};
