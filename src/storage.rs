//! Document retrieval and upload at the IO boundary.
//!
//! The migration core never performs IO itself; these traits are the seams the
//! command line (or a networked deployment) plugs into.

use crate::error::{MigrateError, Result};
use crate::schema::Document;
use crate::types::SourceDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Fetches v1 source documents by id
pub trait DocumentSource {
    fn fetch(&self, id: &str) -> Result<SourceDocument>;
}

/// Stores migrated v2 documents
pub trait DocumentSink {
    fn upload(&self, document: &Document, options: &UploadOptions) -> Result<UploadReceipt>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadOptions {
    /// Pretty-print the stored JSON
    pub pretty: bool,
    /// Replace an existing document with the same id
    pub overwrite: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            overwrite: false,
        }
    }
}

/// Identifies a stored document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Reads source documents from JSON files
///
/// `fetch(id)` reads `<dir>/<id>.json`. An id that is itself a path to an
/// existing file is read directly.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn locate(&self, id: &str) -> Option<PathBuf> {
        let direct = Path::new(id);
        if direct.is_file() {
            return Some(direct.to_path_buf());
        }

        let candidate = self.dir.join(format!("{id}.json"));
        candidate.is_file().then_some(candidate)
    }
}

impl DocumentSource for FileSource {
    fn fetch(&self, id: &str) -> Result<SourceDocument> {
        let path = self
            .locate(id)
            .ok_or_else(|| MigrateError::SourceNotFound(id.to_string()))?;
        tracing::debug!(path = %path.display(), "reading source document");

        let text = fs::read_to_string(&path)?;
        let value: JsonValue = serde_json::from_str(&text)?;
        SourceDocument::from_value(value)
    }
}

/// Writes migrated documents to `<dir>/<document id>.json`
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DocumentSink for FileSink {
    fn upload(&self, document: &Document, options: &UploadOptions) -> Result<UploadReceipt> {
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(format!("{}.json", document.id));
        if path.exists() && !options.overwrite {
            return Err(MigrateError::IoError(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            )));
        }

        let json = if options.pretty {
            serde_json::to_string_pretty(document)?
        } else {
            serde_json::to_string(document)?
        };
        fs::write(&path, json)?;
        tracing::info!(path = %path.display(), "stored document");

        Ok(UploadReceipt {
            id: document.id.clone(),
            name: document.name.clone(),
            location: Some(path.display().to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MigrationOptions;
    use crate::pipeline::migrate_document;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_source(dir: &Path, id: &str) {
        let source = json!({
            "_id": id,
            "contentTemplateName": "Stored",
            "templateType": "flyer",
            "pages": [{"children": [{"type": "localGroup", "name": "Only"}]}]
        });
        fs::write(dir.join(format!("{id}.json")), source.to_string()).unwrap();
    }

    #[test]
    fn test_file_source_reads_by_id_and_path() {
        let dir = TempDir::new().unwrap();
        write_source(dir.path(), "tpl-1");
        let source = FileSource::new(dir.path());

        assert_eq!(source.fetch("tpl-1").unwrap().id, "tpl-1");

        let direct = dir.path().join("tpl-1.json");
        assert_eq!(source.fetch(direct.to_str().unwrap()).unwrap().id, "tpl-1");

        assert!(matches!(
            source.fetch("missing"),
            Err(MigrateError::SourceNotFound(id)) if id == "missing"
        ));
    }

    #[test]
    fn test_file_sink_round_trip() {
        let dir = TempDir::new().unwrap();
        write_source(dir.path(), "tpl-2");
        let source = FileSource::new(dir.path()).fetch("tpl-2").unwrap();
        let output = migrate_document(&source, None, &MigrationOptions::default()).unwrap();

        let out_dir = dir.path().join("out");
        let sink = FileSink::new(&out_dir);
        let receipt = sink.upload(&output.document, &UploadOptions::default()).unwrap();

        assert_eq!(receipt.id, output.document.id);
        assert_eq!(receipt.name, "Stored");

        let stored: Document =
            serde_json::from_str(&fs::read_to_string(out_dir.join(format!("{}.json", receipt.id))).unwrap())
                .unwrap();
        assert_eq!(stored, output.document);
    }

    #[test]
    fn test_file_sink_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        write_source(dir.path(), "tpl-3");
        let source = FileSource::new(dir.path()).fetch("tpl-3").unwrap();
        let output = migrate_document(&source, None, &MigrationOptions::default()).unwrap();
        let sink = FileSink::new(dir.path());

        sink.upload(&output.document, &UploadOptions::default()).unwrap();
        assert!(sink.upload(&output.document, &UploadOptions::default()).is_err());

        let overwrite = UploadOptions {
            overwrite: true,
            ..UploadOptions::default()
        };
        assert!(sink.upload(&output.document, &overwrite).is_ok());
    }
}
