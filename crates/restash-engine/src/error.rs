//! Error types for the engine facade.

use thiserror::Error;

/// Errors surfaced by engine operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Core error.
    #[error("Core error: {0}")]
    Core(#[from] restash_core::Error),

    /// Storage error.
    #[error("Storage error: {0}")]
    Store(#[from] restash_store::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse error.
    #[error("Config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
