//! Error types for storage operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Data directory could not be created or opened.
    #[error("Storage unavailable at {path}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Profile name empty after sanitization.
    #[error("Invalid profile name: {0:?}")]
    InvalidProfileName(String),

    /// Profile already exists under the target name.
    #[error("Profile already exists: {0:?}")]
    ProfileExists(String),

    /// Session already holds the maximum number of profiles.
    #[error("Profile limit reached: {max} per session")]
    ProfileLimitReached { max: usize },

    /// History is disabled by configuration.
    #[error("Snapshot history is disabled")]
    HistoryDisabled,

    /// Index 0 is the live snapshot, not a backup.
    #[error("History index 0 is already the current snapshot")]
    AlreadyCurrent,

    /// Requested index falls outside the ring.
    #[error("History index {index} out of range (ring size {size})")]
    BadHistoryIndex { index: usize, size: usize },

    /// No backup file exists at the requested index.
    #[error("No history backup at index {index}")]
    MissingBackup { index: usize },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Core error.
    #[error("Core error: {0}")]
    Core(#[from] restash_core::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, Error>;
