//! Error types for the note store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing the notes file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The notes file does not exist.
    #[error("notes file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The notes file exists but is not a valid notes document.
    #[error("failed to parse notes file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the notes file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory document could not be serialized.
    #[error("failed to serialize notes: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The temporary file could not be moved over the notes file.
    #[error("failed to replace notes file {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Returns true when the user can fix the problem by repairing or
    /// recreating the notes file.
    pub fn is_document_error(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Parse { .. })
    }
}

/// A specialized Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
