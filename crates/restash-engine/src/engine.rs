//! Session orchestration facade
//!
//! `Engine` ties the pieces together for a host integration: it owns the
//! snapshot, history, and profile stores over one data directory, runs
//! captures through the configured filters, and drives the restore pipeline
//! from pending snapshot to published summary.
//!
//! Session ids arrive here as untrusted strings and are whitelisted before
//! any path is built from them. Operations that merely read accept a bad id
//! or a broken file quietly; operations that write propagate their errors.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::price_cache::PriceCache;
use restash_core::{
    build_summary, capture, restore, CaptureSource, Item, RestorationSummary, RestoreCounters,
    SessionId, Snapshot,
};
use restash_store::{
    publish_summary, take_summary, HistoryEntry, HistoryStore, ProfileEntry, ProfileStore,
    SnapshotStore,
};
use tracing::{debug, warn};

/// Everything a completed restoration hands back to the caller
#[derive(Debug, Clone)]
pub struct RestoreReport {
    /// Replacement item list for the profile
    pub items: Vec<Item>,
    /// What the restoration did, in item counts
    pub counters: RestoreCounters,
    /// Recovered and lost loot, consolidated per template
    pub summary: RestorationSummary,
}

/// Facade over configuration, on-disk stores, and the restoration algorithm
pub struct Engine {
    config: EngineConfig,
    snapshots: SnapshotStore,
    history: HistoryStore,
    profiles: ProfileStore,
    prices: PriceCache,
}

impl Engine {
    /// Open an engine over the configured data directory
    ///
    /// Fails when the directory cannot be created or opened. Every other
    /// on-disk problem is deferred to the operation that hits it.
    pub fn open(config: EngineConfig) -> Result<Self> {
        let snapshots = SnapshotStore::new(&config.data_directory)?;
        let history = HistoryStore::new(&config.data_directory, config.max_snapshot_history);
        let profiles = ProfileStore::new(&config.data_directory);
        Ok(Self {
            config,
            snapshots,
            history,
            profiles,
            prices: PriceCache::new(),
        })
    }

    /// The configuration this engine was opened with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Capture a live inventory and save it as the session's pending snapshot
    pub fn capture_and_save(
        &self,
        source: &impl CaptureSource,
        session: &str,
        location_name: &str,
        taken_in_raid: bool,
    ) -> Result<Snapshot> {
        let session = SessionId::parse(session)?;
        let snapshot = capture(
            source,
            session,
            location_name,
            taken_in_raid,
            &self.config.capture_options(),
        );
        self.save_snapshot(&snapshot)?;
        Ok(snapshot)
    }

    /// Save a snapshot as its session's current one
    ///
    /// The previous current snapshot is filed into the history ring before
    /// it is overwritten.
    pub fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        self.history.backup(&snapshot.session_id)?;
        self.snapshots.save(snapshot)?;
        Ok(())
    }

    /// Load a session's pending snapshot, if one is stored and readable
    pub fn load_snapshot(&self, session: &str) -> Result<Option<Snapshot>> {
        let session = SessionId::parse(session)?;
        Ok(self.snapshots.load(&session))
    }

    /// Whether a session has a pending snapshot on disk
    pub fn has_snapshot(&self, session: &str) -> bool {
        match SessionId::parse(session) {
            Ok(session) => self.snapshots.exists(&session),
            Err(err) => {
                warn!(%err, "rejected session id");
                false
            }
        }
    }

    /// Delete a session's pending snapshot; history backups stay in place
    pub fn clear_snapshot(&self, session: &str) -> Result<bool> {
        let session = SessionId::parse(session)?;
        Ok(self.snapshots.clear(&session))
    }

    /// The most recently written snapshot across every session
    pub fn load_most_recent(&self) -> Option<(SessionId, Snapshot)> {
        self.snapshots.load_most_recent()
    }

    /// Restore a session's pending snapshot into the given profile items
    ///
    /// Returns `Ok(None)` when the session has nothing pending. On success
    /// the snapshot is consumed, the summary is published for the hand-off
    /// reader, and the report carries the profile's replacement item list.
    /// On failure the profile and the stored snapshot are both untouched.
    pub fn restore_session(
        &self,
        session: &str,
        profile_items: &[Item],
    ) -> Result<Option<RestoreReport>> {
        let session = SessionId::parse(session)?;
        let Some(snapshot) = self.snapshots.load(&session) else {
            debug!(session = %session, "no snapshot to restore");
            return Ok(None);
        };

        let outcome = restore(profile_items, &snapshot)?;
        let summary = build_summary(&snapshot.items, profile_items);
        if let Err(err) = publish_summary(self.snapshots.dir(), &summary) {
            warn!(%err, "restoration summary not published");
        }
        self.snapshots.clear(&session);
        debug!(
            session = %session,
            added = outcome.counters.added,
            removed = outcome.counters.removed,
            "snapshot restored"
        );
        Ok(Some(RestoreReport {
            items: outcome.items,
            counters: outcome.counters,
            summary,
        }))
    }

    /// Diff a session's pending snapshot against profile items without
    /// restoring or consuming anything
    pub fn summarize(&self, session: &str, profile_items: &[Item]) -> Option<RestorationSummary> {
        let session = match SessionId::parse(session) {
            Ok(session) => session,
            Err(err) => {
                warn!(%err, "rejected session id");
                return None;
            }
        };
        let snapshot = self.snapshots.load(&session)?;
        Some(build_summary(&snapshot.items, profile_items))
    }

    /// Take the published restoration summary, consuming it
    pub fn take_restoration_summary(&self) -> Option<RestorationSummary> {
        take_summary(self.snapshots.dir())
    }

    /// Enumerate a session's history ring, newest first
    pub fn history(&self, session: &str) -> Vec<HistoryEntry> {
        match SessionId::parse(session) {
            Ok(session) => self.history.list(&session),
            Err(err) => {
                warn!(%err, "rejected session id");
                Vec::new()
            }
        }
    }

    /// Promote a history backup to be the session's pending snapshot
    pub fn restore_history(&self, session: &str, index: usize) -> Result<()> {
        let session = SessionId::parse(session)?;
        self.history.restore_from(&session, index)?;
        Ok(())
    }

    /// Save the session's pending snapshot as a named profile
    ///
    /// Returns the stored name, which may differ from the requested one
    /// after sanitization, or `None` when the session has nothing pending.
    pub fn save_profile(&self, session: &str, name: &str) -> Result<Option<String>> {
        let session = SessionId::parse(session)?;
        let Some(snapshot) = self.snapshots.load(&session) else {
            warn!(session = %session, "no snapshot to save as a profile");
            return Ok(None);
        };
        let stored = self.profiles.save(&snapshot, name)?;
        Ok(Some(stored))
    }

    /// Load a named profile and install it as the session's pending snapshot
    pub fn load_profile(&self, session: &str, name: &str) -> Result<Option<Snapshot>> {
        let session = SessionId::parse(session)?;
        let Some(snapshot) = self.profiles.load(&session, name)? else {
            return Ok(None);
        };
        self.save_snapshot(&snapshot)?;
        Ok(Some(snapshot))
    }

    /// Profiles stored for a session, sorted by name
    pub fn list_profiles(&self, session: &str) -> Vec<ProfileEntry> {
        match SessionId::parse(session) {
            Ok(session) => self.profiles.list(&session),
            Err(err) => {
                warn!(%err, "rejected session id");
                Vec::new()
            }
        }
    }

    /// Rename a profile; the new name goes through the same sanitization
    pub fn rename_profile(&self, session: &str, old: &str, new: &str) -> Result<String> {
        let session = SessionId::parse(session)?;
        Ok(self.profiles.rename(&session, old, new)?)
    }

    /// Delete a profile, reporting whether a file was removed
    pub fn delete_profile(&self, session: &str, name: &str) -> Result<bool> {
        let session = SessionId::parse(session)?;
        Ok(self.profiles.delete(&session, name)?)
    }

    /// Shared template price cache
    pub fn prices(&self) -> &PriceCache {
        &self.prices
    }

    /// Mutable price cache access for whatever computes prices
    pub fn prices_mut(&mut self) -> &mut PriceCache {
        &mut self.prices
    }
}
