use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("No input document provided")]
    MissingInput,

    #[error("Source document has no pages")]
    NoPages,

    #[error("Unknown page preset: {0:?}")]
    UnknownPreset(String),

    #[error("Invalid source document: {0}")]
    InvalidSource(String),

    #[error("Source document not found: {0}")]
    SourceNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MigrateError>;
