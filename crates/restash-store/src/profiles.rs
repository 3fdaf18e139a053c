//! Named loadout profiles
//!
//! A profile is a snapshot saved under a human-chosen name, scoped to its
//! session. Names pass a strict whitelist before they can reach a filename,
//! and each session holds at most [`MAX_PROFILES`] of them. Loading stamps
//! the stored snapshot with the requesting session and the current time so
//! it can be applied as if freshly captured.

use crate::atomic::write_atomic;
use crate::error::{Error, Result};
use crate::naming;
use chrono::{DateTime, Utc};
use restash_core::{decode, encode, SessionId, Snapshot, MAX_SNAPSHOT_BYTES};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Maximum named profiles per session
pub const MAX_PROFILES: usize = 10;

/// Named loadout storage over the shared data directory
pub struct ProfileStore {
    dir: PathBuf,
}

/// One stored loadout as presented to a UI
#[derive(Debug, Clone)]
pub struct ProfileEntry {
    pub name: String,
    pub path: PathBuf,
    pub timestamp: Option<DateTime<Utc>>,
}

impl ProfileStore {
    /// Create a profile store over the given data directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Save a snapshot as a named loadout, returning the sanitized name
    ///
    /// Overwriting an existing name is always allowed; a new name is
    /// rejected once the session already holds [`MAX_PROFILES`] loadouts.
    pub fn save(&self, snapshot: &Snapshot, name: &str) -> Result<String> {
        let name = naming::sanitize_profile_name(name)?;
        let path = naming::profile_path(&self.dir, &name, &snapshot.session_id);
        if !path.is_file() && self.list(&snapshot.session_id).len() >= MAX_PROFILES {
            return Err(Error::ProfileLimitReached { max: MAX_PROFILES });
        }
        let bytes = encode(snapshot)?;
        write_atomic(&path, &bytes)?;
        debug!(session = %snapshot.session_id, name = %name, "profile saved");
        Ok(name)
    }

    /// Load a named loadout for the given session
    ///
    /// The stored session id and timestamp are rewritten to the requesting
    /// session and the current time. Absent, oversized, and corrupt files
    /// all come back as `None`; only a rejected name is an error.
    pub fn load(&self, session: &SessionId, name: &str) -> Result<Option<Snapshot>> {
        let name = naming::sanitize_profile_name(name)?;
        let path = naming::profile_path(&self.dir, &name, session);
        let Ok(meta) = fs::metadata(&path) else {
            return Ok(None);
        };
        if meta.len() > MAX_SNAPSHOT_BYTES {
            warn!(name = %name, size = meta.len(), "profile over size cap, ignoring");
            return Ok(None);
        }
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(name = %name, %err, "profile unreadable, ignoring");
                return Ok(None);
            }
        };
        match decode(&bytes) {
            Ok(mut snapshot) => {
                snapshot.session_id = session.clone();
                snapshot.timestamp = Utc::now();
                Ok(Some(snapshot))
            }
            Err(err) => {
                warn!(name = %name, %err, "profile undecodable, ignoring");
                Ok(None)
            }
        }
    }

    /// Enumerate a session's loadouts, sorted by name
    pub fn list(&self, session: &SessionId) -> Vec<ProfileEntry> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut profiles = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = naming::profile_name_of(&path, session) else {
                continue;
            };
            let timestamp = entry
                .metadata()
                .and_then(|m| m.modified())
                .ok()
                .map(DateTime::<Utc>::from);
            profiles.push(ProfileEntry {
                name,
                path,
                timestamp,
            });
        }
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        profiles
    }

    /// Rename a loadout, refusing to clobber an existing target
    pub fn rename(&self, session: &SessionId, old: &str, new: &str) -> Result<String> {
        let old = naming::sanitize_profile_name(old)?;
        let new = naming::sanitize_profile_name(new)?;
        let from = naming::profile_path(&self.dir, &old, session);
        let to = naming::profile_path(&self.dir, &new, session);
        if to.is_file() {
            return Err(Error::ProfileExists(new));
        }
        fs::rename(&from, &to)?;
        debug!(session = %session, old = %old, new = %new, "profile renamed");
        Ok(new)
    }

    /// Delete a loadout
    ///
    /// Best-effort; reports success iff the file is gone afterwards.
    pub fn delete(&self, session: &SessionId, name: &str) -> Result<bool> {
        let name = naming::sanitize_profile_name(name)?;
        let path = naming::profile_path(&self.dir, &name, session);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(true),
            Err(err) => {
                warn!(name = %name, %err, "failed to delete profile");
                Ok(!path.exists())
            }
        }
    }
}
