//! Restash Store - On-disk persistence for snapshots
//!
//! Everything lives flat in one configured data directory:
//! - Current snapshots, one JSON file per session, written atomically
//! - A small history ring of recent snapshots per session
//! - Named loadout profiles behind a strict name whitelist
//! - The one-shot restoration summary hand-off artifact
//!
//! Write paths fail loudly; read paths are forgiving and log instead, so a
//! corrupt file on disk degrades to "no snapshot" rather than an abort.

mod atomic;
mod error;
mod handoff;
mod history;
mod naming;
mod profiles;
mod snapshot_store;

pub use atomic::write_atomic;
pub use error::{Error, Result};
pub use handoff::{publish_summary, take_summary};
pub use history::{HistoryEntry, HistoryStore, DEFAULT_HISTORY};
pub use naming::{sanitize_profile_name, MAX_PROFILE_NAME_LEN, PROFILE_PREFIX, SUMMARY_FILE};
pub use profiles::{ProfileEntry, ProfileStore, MAX_PROFILES};
pub use snapshot_store::SnapshotStore;
