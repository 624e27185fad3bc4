use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Type declared twice: {0}")]
    DuplicateType(String),
    #[error("Type `{referenced_by}` refers to unknown type `{name}`")]
    UnknownType { referenced_by: String, name: String },
    #[error("Empty name in declaration of `{0}`")]
    EmptyName(String),
}
