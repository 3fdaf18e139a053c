//! Engine configuration
//!
//! Options controlling where snapshots live on disk, how deep the history
//! ring goes, and what the capture adapter filters out. Configuration is
//! plain data; loaders accept RON from a string or a file and fall back to
//! defaults for any omitted field.

use crate::error::Result;
use restash_core::CaptureOptions;
use restash_store::DEFAULT_HISTORY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for the snapshot engine
///
/// Every field has a default, so an empty RON document `()` is a valid
/// configuration.
///
/// # Example
///
/// ```
/// use restash_engine::EngineConfig;
///
/// let config = EngineConfig::from_ron_str("(max_snapshot_history: 5)").unwrap();
/// assert_eq!(config.max_snapshot_history, 5);
/// assert!(config.included_slots_default.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Root directory of all on-disk state
    pub data_directory: PathBuf,

    /// History ring size; 0 disables history backups
    pub max_snapshot_history: usize,

    /// Managed-slot selection recorded into captures when the caller does
    /// not supply one; `None` captures and manages every slot
    pub included_slots_default: Option<Vec<String>>,

    /// Leave found-in-raid items out of captures
    pub protect_found_in_raid: bool,

    /// Leave insured items out of captures
    pub exclude_insured: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from("snapshots"),
            max_snapshot_history: DEFAULT_HISTORY,
            included_slots_default: None,
            protect_found_in_raid: false,
            exclude_insured: false,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from a RON string
    pub fn from_ron_str(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    /// Load a configuration from a RON file
    pub fn from_ron_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Capture-time filtering switches derived from this configuration
    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            included_slots: self.included_slots_default.clone(),
            protect_found_in_raid: self.protect_found_in_raid,
            exclude_insured: self.exclude_insured,
        }
    }
}
