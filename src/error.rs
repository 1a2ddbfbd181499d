use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading the static hotel dataset
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed hotel dataset: {0}")]
    Json(#[from] simd_json::Error),
}

pub type Result<T> = std::result::Result<T, DataError>;
