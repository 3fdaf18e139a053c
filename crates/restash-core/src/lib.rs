//! Restash Core - Inventory snapshot and restoration engine
//!
//! This crate provides the runtime-neutral heart of restash:
//! - Flat item forest model with polymorphic container positions
//! - Typed dynamic attributes (`Upd`) that round-trip unknown families
//! - Wire codec with a hard size cap and duplicate-id hygiene
//! - Pure restoration of a snapshot into a profile's item list
//! - Post-restore summaries of recovered and lost loot
//! - A capture seam ([`CaptureSource`]) for host integrations
//!
//! Nothing in here performs I/O; persistence lives in `restash-store` and
//! orchestration in `restash-engine`.

mod capture;
mod codec;
mod error;
mod item;
mod restore;
mod session;
mod snapshot;
mod summary;
mod tree;
mod upd;

pub use capture::{
    capture, CaptureOptions, CaptureSource, CapturedNode, TopLevelSlot, AMMO_BASE_TPL,
    CARTRIDGES_SLOT,
};
pub use codec::{decode, encode, MAX_SNAPSHOT_BYTES};
pub use error::{Error, Result};
pub use item::{
    slot_eq, GridPosition, Item, ItemId, Location, TemplateId, EQUIPMENT_TPL, SLOT_POCKETS,
    SLOT_SECURED_CONTAINER,
};
pub use restore::{restore, RestoreCounters, RestoreOutcome};
pub use session::SessionId;
pub use snapshot::{SlotPolicy, Snapshot};
pub use summary::{build_summary, RestorationSummary, SummaryLine};
pub use tree::{root_slot, ItemIndex, MAX_DEPTH};
pub use upd::{Dogtag, Foldable, FoodDrink, Key, MedKit, Repairable, Resource, Upd};
