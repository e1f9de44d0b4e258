// crates/locality-core/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the record store.
///
/// These are fatal to the current operation and are always surfaced to the
/// caller; nothing in the crate retries or swallows them.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    Bincode(#[from] bincode::Error),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("snapshot format {found} is not supported (expected {expected})")]
    IncompatibleSnapshot { found: u32, expected: u32 },

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("could not persist snapshot to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StorageError>;
