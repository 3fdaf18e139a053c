//! Captured snapshot of an equipment tree
//!
//! A snapshot is the unit of persistence and restoration: the flattened
//! item forest of one session's equipment plus capture metadata. The
//! `included_slots` field is deliberately tri-state; see [`SlotPolicy`].

use crate::item::{Item, ItemId};
use crate::session::SessionId;
use chrono::{DateTime, Utc};

/// Which top-level slots a restoration is allowed to manage
///
/// Derived from the snapshot's `included_slots` field. The distinction
/// between absent and empty is meaningful and must never be collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPolicy<'a> {
    /// Legacy snapshot with no recorded selection: manage the slots the
    /// snapshot itself occupies, plus its recorded empty slots
    SnapshotShape,
    /// An explicitly empty selection: manage nothing
    Disabled,
    /// Manage exactly the recorded slots
    Exact(&'a [String]),
}

/// A captured inventory snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub session_id: SessionId,
    pub timestamp: DateTime<Utc>,
    pub location_name: String,
    pub items: Vec<Item>,
    /// Recorded slot selection; `None` on legacy snapshots
    pub included_slots: Option<Vec<String>>,
    /// Top-level slots that were configured but empty at capture time
    pub empty_slots: Vec<String>,
    pub taken_in_raid: bool,
    pub mod_version: String,
}

impl Snapshot {
    /// Create an empty snapshot stamped with the current time
    pub fn new(session_id: SessionId, location_name: impl Into<String>) -> Self {
        Self {
            session_id,
            timestamp: Utc::now(),
            location_name: location_name.into(),
            items: Vec::new(),
            included_slots: None,
            empty_slots: Vec::new(),
            taken_in_raid: false,
            mod_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Slot management policy recorded in this snapshot
    pub fn slot_policy(&self) -> SlotPolicy<'_> {
        match &self.included_slots {
            None => SlotPolicy::SnapshotShape,
            Some(slots) if slots.is_empty() => SlotPolicy::Disabled,
            Some(slots) => SlotPolicy::Exact(slots),
        }
    }

    /// First item carrying the equipment root template, if any
    pub fn find_equipment(&self) -> Option<&Item> {
        self.items.iter().find(|it| it.is_equipment())
    }

    /// Ids of every item carrying the equipment root template
    pub fn equipment_ids(&self) -> Vec<&ItemId> {
        self.items
            .iter()
            .filter(|it| it.is_equipment())
            .map(|it| &it.id)
            .collect()
    }
}
