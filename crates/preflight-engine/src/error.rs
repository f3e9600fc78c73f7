use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a specification catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog has no {0}")]
    EmptyTable(&'static str),

    #[error("duplicate {table} id '{id}'")]
    DuplicateId { table: &'static str, id: String },

    #[error("{table} '{id}': {reason}")]
    InvalidEntry {
        table: &'static str,
        id: String,
        reason: String,
    },
}
