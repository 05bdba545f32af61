//! Error types for genre-filer.
//!
//! Only configuration-level failures cross the planner boundary. Per-row
//! failures (folder creation, duplicate checks, moves) are captured in the
//! run report instead.

use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a [`crate::store::FolderStore`] implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Handle does not refer to a live folder or file
    #[error("Not found: {0}")]
    NotFound(String),

    /// Target of a move is already occupied
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Path cannot be carried in a string handle
    #[error("Path is not valid UTF-8: {0:?}")]
    NonUtf8Path(PathBuf),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure that aborts a filing run before (or instead of) row processing.
#[derive(Error, Debug)]
pub enum FilingError {
    /// Required folder or sheet is absent
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    /// Metadata sheet could not be read
    #[error("Metadata error: {0}")]
    Metadata(#[from] csv::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, FilingError>;
