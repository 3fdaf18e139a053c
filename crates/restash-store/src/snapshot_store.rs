//! Current-snapshot persistence
//!
//! One JSON file per session in a flat data directory. Saves are atomic.
//! Loads are forgiving: an absent file is `None`, and an oversized or
//! corrupt file is logged and treated the same, so bad on-disk state can
//! never wedge a raid. Callers tell the two apart by log, not return code.

use crate::atomic::write_atomic;
use crate::error::{Error, Result};
use crate::naming;
use restash_core::{decode, encode, SessionId, Snapshot, MAX_SNAPSHOT_BYTES};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

/// File-per-session snapshot storage
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Open the store, creating the data directory if needed
    ///
    /// An uncreatable directory is a hard error; nothing else in the crate
    /// can work without it.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| Error::StorageUnavailable {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// The data directory backing this store
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a session's current snapshot file
    pub fn path_for(&self, session: &SessionId) -> PathBuf {
        naming::snapshot_path(&self.dir, session)
    }

    /// Atomically write a session's current snapshot
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let bytes = encode(snapshot)?;
        write_atomic(&self.path_for(&snapshot.session_id), &bytes)?;
        debug!(
            session = %snapshot.session_id,
            bytes = bytes.len(),
            "snapshot saved"
        );
        Ok(())
    }

    /// Whether a current snapshot exists for the session
    pub fn exists(&self, session: &SessionId) -> bool {
        self.path_for(session).is_file()
    }

    /// Read a session's current snapshot
    pub fn load(&self, session: &SessionId) -> Option<Snapshot> {
        let path = self.path_for(session);
        let meta = fs::metadata(&path).ok()?;
        if meta.len() > MAX_SNAPSHOT_BYTES {
            warn!(
                session = %session,
                size = meta.len(),
                cap = MAX_SNAPSHOT_BYTES,
                "snapshot over size cap, ignoring"
            );
            return None;
        }
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(session = %session, %err, "snapshot unreadable, ignoring");
                return None;
            }
        };
        match decode(&bytes) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                warn!(session = %session, %err, "snapshot undecodable, ignoring");
                None
            }
        }
    }

    /// Delete a session's current snapshot
    ///
    /// Best-effort; reports success iff the file is gone afterwards.
    pub fn clear(&self, session: &SessionId) -> bool {
        let path = self.path_for(session);
        match fs::remove_file(&path) {
            Ok(()) => true,
            Err(err) if err.kind() == ErrorKind::NotFound => true,
            Err(err) => {
                warn!(session = %session, %err, "failed to delete snapshot");
                !path.exists()
            }
        }
    }

    /// Load the most recently written current snapshot in the directory
    ///
    /// History backups, profiles, temp files, and the summary artifact are
    /// not candidates.
    pub fn load_most_recent(&self) -> Option<(SessionId, Snapshot)> {
        let entries = fs::read_dir(&self.dir).ok()?;
        let mut newest: Option<(SystemTime, SessionId)> = None;
        for entry in entries.flatten() {
            let Some(session) = naming::session_of(&entry.path()) else {
                continue;
            };
            let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
                continue;
            };
            match &newest {
                Some((best, _)) if *best >= modified => {}
                _ => newest = Some((modified, session)),
            }
        }
        let (_, session) = newest?;
        let snapshot = self.load(&session)?;
        Some((session, snapshot))
    }
}
