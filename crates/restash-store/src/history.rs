//! Snapshot history ring
//!
//! A ring of `size` slots per session: slot 0 is the live `{session}.json`
//! file and slots 1 through `size - 1` are backup files `{session}.{k}.json`,
//! newest first. Rotation happens before every overwrite of the current
//! file, so the last few snapshots stay recoverable. Size 0 disables the
//! ring entirely; size 1 keeps only the current file.

use crate::atomic::write_atomic;
use crate::error::{Error, Result};
use crate::naming;
use chrono::{DateTime, Utc};
use restash_core::SessionId;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default ring size: the current snapshot plus two backups
pub const DEFAULT_HISTORY: usize = 3;

/// Ring of snapshot backups alongside the current file
pub struct HistoryStore {
    dir: PathBuf,
    size: usize,
}

/// One slot of the ring as presented to a UI
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// 0 for the current snapshot, the backup index otherwise
    pub index: usize,
    pub path: PathBuf,
    pub timestamp: Option<DateTime<Utc>>,
    pub label: String,
    pub is_current: bool,
}

impl HistoryStore {
    /// Create a ring over the given data directory
    pub fn new(dir: impl Into<PathBuf>, size: usize) -> Self {
        Self {
            dir: dir.into(),
            size,
        }
    }

    /// Ring size including the current slot
    pub fn size(&self) -> usize {
        self.size
    }

    /// File the current snapshot as backup 1, shifting older backups up
    ///
    /// Call before overwriting the current file. A missing current file or
    /// a ring without backup slots makes this a no-op.
    pub fn backup(&self, session: &SessionId) -> Result<()> {
        if self.size == 0 {
            return Ok(());
        }
        let current = naming::snapshot_path(&self.dir, session);
        if !current.is_file() {
            return Ok(());
        }
        let last = self.size - 1;
        if last == 0 {
            return Ok(());
        }

        let oldest = naming::history_path(&self.dir, session, last);
        if oldest.is_file() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..last).rev() {
            let from = naming::history_path(&self.dir, session, index);
            if from.is_file() {
                fs::rename(&from, naming::history_path(&self.dir, session, index + 1))?;
            }
        }
        fs::copy(&current, naming::history_path(&self.dir, session, 1))?;
        debug!(session = %session, "current snapshot filed as backup 1");
        Ok(())
    }

    /// Promote a backup to be the current snapshot
    ///
    /// The backup is read before the ring rotates, so `index` refers to the
    /// listing as the caller saw it; the displaced current snapshot becomes
    /// backup 1, which makes the operation reversible.
    pub fn restore_from(&self, session: &SessionId, index: usize) -> Result<()> {
        if self.size == 0 {
            return Err(Error::HistoryDisabled);
        }
        if index == 0 {
            return Err(Error::AlreadyCurrent);
        }
        if index > self.size - 1 {
            return Err(Error::BadHistoryIndex {
                index,
                size: self.size,
            });
        }

        let source = naming::history_path(&self.dir, session, index);
        let bytes = fs::read(&source).map_err(|err| match err.kind() {
            ErrorKind::NotFound => Error::MissingBackup { index },
            _ => Error::Io(err),
        })?;

        self.backup(session)?;
        write_atomic(&naming::snapshot_path(&self.dir, session), &bytes)?;
        debug!(session = %session, index, "history backup promoted to current");
        Ok(())
    }

    /// Enumerate the ring, newest first, starting with the current slot
    pub fn list(&self, session: &SessionId) -> Vec<HistoryEntry> {
        let mut entries = Vec::new();
        let current = naming::snapshot_path(&self.dir, session);
        if current.is_file() {
            entries.push(HistoryEntry {
                index: 0,
                timestamp: modified_time(&current),
                label: "current".to_string(),
                is_current: true,
                path: current,
            });
        }
        for index in 1..self.size {
            let path = naming::history_path(&self.dir, session, index);
            if path.is_file() {
                entries.push(HistoryEntry {
                    index,
                    timestamp: modified_time(&path),
                    label: format!("backup {}", index),
                    is_current: false,
                    path,
                });
            }
        }
        entries
    }
}

fn modified_time(path: &Path) -> Option<DateTime<Utc>> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Utc>::from(modified))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ring(size: usize) -> (TempDir, HistoryStore, SessionId) {
        let dir = tempfile::tempdir().unwrap();
        let history = HistoryStore::new(dir.path(), size);
        let session = SessionId::parse("raid-1").unwrap();
        (dir, history, session)
    }

    fn write_current(history: &HistoryStore, session: &SessionId, content: &str) {
        history.backup(session).unwrap();
        fs::write(
            naming::snapshot_path(&history.dir, session),
            content.as_bytes(),
        )
        .unwrap();
    }

    fn read(history: &HistoryStore, session: &SessionId, index: usize) -> Option<String> {
        let path = match index {
            0 => naming::snapshot_path(&history.dir, session),
            k => naming::history_path(&history.dir, session, k),
        };
        fs::read_to_string(path).ok()
    }

    #[test]
    fn test_ring_rotates_and_drops_oldest() {
        let (_dir, history, session) = ring(3);
        for generation in ["gen1", "gen2", "gen3", "gen4"] {
            write_current(&history, &session, generation);
        }
        assert_eq!(read(&history, &session, 0).unwrap(), "gen4");
        assert_eq!(read(&history, &session, 1).unwrap(), "gen3");
        assert_eq!(read(&history, &session, 2).unwrap(), "gen2");
        assert_eq!(read(&history, &session, 3), None);
    }

    #[test]
    fn test_backup_without_current_is_a_noop() {
        let (_dir, history, session) = ring(3);
        history.backup(&session).unwrap();
        assert_eq!(read(&history, &session, 1), None);
    }

    #[test]
    fn test_single_slot_ring_keeps_no_backups() {
        let (_dir, history, session) = ring(1);
        write_current(&history, &session, "gen1");
        write_current(&history, &session, "gen2");
        assert_eq!(read(&history, &session, 0).unwrap(), "gen2");
        assert_eq!(read(&history, &session, 1), None);
    }

    #[test]
    fn test_disabled_ring() {
        let (_dir, history, session) = ring(0);
        write_current(&history, &session, "gen1");
        write_current(&history, &session, "gen2");
        assert_eq!(read(&history, &session, 1), None);
        assert!(matches!(
            history.restore_from(&session, 1),
            Err(Error::HistoryDisabled)
        ));
    }

    #[test]
    fn test_restore_from_newest_backup_swaps_with_current() {
        let (_dir, history, session) = ring(3);
        write_current(&history, &session, "gen1");
        write_current(&history, &session, "gen2");

        history.restore_from(&session, 1).unwrap();
        assert_eq!(read(&history, &session, 0).unwrap(), "gen1");
        assert_eq!(read(&history, &session, 1).unwrap(), "gen2");
    }

    #[test]
    fn test_restore_from_deep_backup_is_reversible() {
        let (_dir, history, session) = ring(3);
        for generation in ["gen1", "gen2", "gen3"] {
            write_current(&history, &session, generation);
        }

        history.restore_from(&session, 2).unwrap();
        assert_eq!(read(&history, &session, 0).unwrap(), "gen1");
        assert_eq!(read(&history, &session, 1).unwrap(), "gen3");
        assert_eq!(read(&history, &session, 2).unwrap(), "gen2");
    }

    #[test]
    fn test_restore_from_rejects_index_zero() {
        let (_dir, history, session) = ring(3);
        write_current(&history, &session, "gen1");
        assert!(matches!(
            history.restore_from(&session, 0),
            Err(Error::AlreadyCurrent)
        ));
    }

    #[test]
    fn test_restore_from_rejects_out_of_ring_index() {
        let (_dir, history, session) = ring(3);
        assert!(matches!(
            history.restore_from(&session, 3),
            Err(Error::BadHistoryIndex { index: 3, size: 3 })
        ));
    }

    #[test]
    fn test_restore_from_missing_backup() {
        let (_dir, history, session) = ring(3);
        write_current(&history, &session, "gen1");
        assert!(matches!(
            history.restore_from(&session, 2),
            Err(Error::MissingBackup { index: 2 })
        ));
    }

    #[test]
    fn test_listing_starts_with_current() {
        let (_dir, history, session) = ring(3);
        for generation in ["gen1", "gen2", "gen3"] {
            write_current(&history, &session, generation);
        }

        let entries = history.list(&session);
        let indices: Vec<usize> = entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, [0, 1, 2]);
        assert!(entries[0].is_current);
        assert_eq!(entries[0].label, "current");
        assert!(!entries[1].is_current);
        assert_eq!(entries[2].label, "backup 2");
        assert!(entries.iter().all(|e| e.timestamp.is_some()));
    }

    #[test]
    fn test_listing_skips_absent_slots() {
        let (_dir, history, session) = ring(3);
        write_current(&history, &session, "gen1");
        let entries = history.list(&session);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_current);
    }
}
