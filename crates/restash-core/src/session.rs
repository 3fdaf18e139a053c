//! Session identity
//!
//! A session id names every on-disk artifact belonging to one raid session.
//! Validation happens at construction: [`SessionId::parse`] is the only way
//! to obtain a value, so the `[A-Za-z0-9_-]+` whitelist is enforced before
//! any id can reach a file-naming API. Rejected ids therefore never touch
//! the filesystem.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Validated identifier of a raid session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Validate a raw id against the whitelist
    ///
    /// Accepts non-empty strings of ASCII alphanumerics, `_` and `-`.
    /// Anything else, including path separators and dots, is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() || !raw.bytes().all(Self::allowed) {
            return Err(Error::InvalidSessionId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    fn allowed(byte: u8) -> bool {
        byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SessionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
