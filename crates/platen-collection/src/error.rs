//! Error types for the collection pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the collection or writing derived files.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// The collection CSV does not exist
    #[error("Collection CSV not found: {}", .0.display())]
    CsvNotFound(PathBuf),

    /// The CSV could not be parsed
    #[error("Invalid CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// JSON serialization failed
    #[error("Failed to serialize collection: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CollectionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = CollectionError> = std::result::Result<T, E>;
