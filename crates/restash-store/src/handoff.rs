//! Restoration summary hand-off
//!
//! After a successful restoration the engine publishes a one-shot summary
//! file for an external overlay to pick up. Reading consumes the file, so
//! each restoration is reported exactly once; a corrupt file is consumed
//! and discarded the same way.

use crate::atomic::write_atomic;
use crate::error::{Error, Result};
use crate::naming::SUMMARY_FILE;
use restash_core::RestorationSummary;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::warn;

/// Write the summary artifact into the data directory
pub fn publish_summary(dir: &Path, summary: &RestorationSummary) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(summary)
        .map_err(|e| Error::Serialization(e.to_string()))?;
    write_atomic(&dir.join(SUMMARY_FILE), &bytes)?;
    Ok(())
}

/// Read and consume the summary artifact, if present
pub fn take_summary(dir: &Path) -> Option<RestorationSummary> {
    let path = dir.join(SUMMARY_FILE);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) => {
            if err.kind() != ErrorKind::NotFound {
                warn!(%err, "summary artifact unreadable");
            }
            return None;
        }
    };
    if let Err(err) = fs::remove_file(&path) {
        warn!(%err, "failed to consume summary artifact");
    }
    match serde_json::from_slice(&bytes) {
        Ok(summary) => Some(summary),
        Err(err) => {
            warn!(%err, "summary artifact corrupt, discarded");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restash_core::{build_summary, Item};

    #[test]
    fn test_take_consumes_the_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let summary = build_summary(&[Item::new("a", "gpu")], &[]);
        publish_summary(dir.path(), &summary).unwrap();

        assert_eq!(take_summary(dir.path()), Some(summary));
        assert!(take_summary(dir.path()).is_none());
        assert!(!dir.path().join(SUMMARY_FILE).exists());
    }

    #[test]
    fn test_take_without_artifact() {
        let dir = tempfile::tempdir().unwrap();
        assert!(take_summary(dir.path()).is_none());
    }

    #[test]
    fn test_corrupt_artifact_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SUMMARY_FILE), b"not json").unwrap();

        assert!(take_summary(dir.path()).is_none());
        assert!(!dir.path().join(SUMMARY_FILE).exists());
    }

    #[test]
    fn test_republish_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let first = build_summary(&[Item::new("a", "gpu")], &[]);
        let second = build_summary(&[Item::new("b", "ledx")], &[]);
        publish_summary(dir.path(), &first).unwrap();
        publish_summary(dir.path(), &second).unwrap();

        assert_eq!(take_summary(dir.path()), Some(second));
    }
}
