//! Error types for restash-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Session id failed the `[A-Za-z0-9_-]+` whitelist.
    #[error("Invalid session id: {0:?}")]
    InvalidSessionId(String),

    /// Snapshot source exceeds the decode size cap.
    #[error("Snapshot too large: {size} bytes (cap {max})")]
    SnapshotTooLarge { size: u64, max: u64 },

    /// Snapshot JSON does not match the expected shape.
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// Location token is neither an integer, a grid object, nor null.
    #[error("Malformed location on item {item}: {token}")]
    MalformedLocation { item: String, token: String },

    /// Profile contains no item with the equipment root template.
    #[error("No equipment root in profile")]
    NoEquipmentRoot,

    /// A parent-chain walk ran past the depth bound.
    #[error("Removal walk exceeded {max} levels (cycle or over-depth)")]
    CyclicOrDeepRemoval { max: usize },

    /// A structural guarantee did not hold after restoration.
    #[error("Restore invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
