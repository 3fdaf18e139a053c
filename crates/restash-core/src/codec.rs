//! Snapshot JSON codec
//!
//! The wire schema uses PascalCase keys and a polymorphic `Location` token:
//! a bare integer is a cartridge index, an object is a grid placement, null
//! or absence means no positional data. Decoding is gated by a hard size cap
//! before any parsing happens. Encoding drops case-insensitive duplicate
//! item ids, keeping the first occurrence, and reports the count.

use crate::error::{Error, Result};
use crate::item::{GridPosition, Item, ItemId, Location, TemplateId};
use crate::session::SessionId;
use crate::snapshot::Snapshot;
use crate::upd::Upd;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

/// Hard cap on snapshot file size, applied before parsing
pub const MAX_SNAPSHOT_BYTES: u64 = 10 * 1024 * 1024;

/// Serialize a snapshot to pretty-printed wire JSON
///
/// Items whose id collides case-insensitively with an earlier item are
/// dropped, first occurrence wins.
pub fn encode(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let mut seen: HashSet<String> = HashSet::with_capacity(snapshot.items.len());
    let mut kept: Vec<&Item> = Vec::with_capacity(snapshot.items.len());
    for item in &snapshot.items {
        if seen.insert(item.id.as_str().to_ascii_lowercase()) {
            kept.push(item);
        }
    }
    let dropped = snapshot.items.len() - kept.len();
    if dropped > 0 {
        warn!(
            dropped,
            session = %snapshot.session_id,
            "dropped items with duplicate ids before write"
        );
    }

    let wire = WireSnapshot::from_snapshot(snapshot, &kept);
    serde_json::to_vec_pretty(&wire).map_err(|e| Error::MalformedSnapshot(e.to_string()))
}

/// Parse wire JSON into a snapshot
///
/// Fails with [`Error::SnapshotTooLarge`] before parsing when the source
/// exceeds [`MAX_SNAPSHOT_BYTES`]. Structural failures report
/// [`Error::MalformedSnapshot`]; an unusable `Location` token reports
/// [`Error::MalformedLocation`] naming the item.
pub fn decode(bytes: &[u8]) -> Result<Snapshot> {
    let size = bytes.len() as u64;
    if size > MAX_SNAPSHOT_BYTES {
        return Err(Error::SnapshotTooLarge {
            size,
            max: MAX_SNAPSHOT_BYTES,
        });
    }
    let wire: WireSnapshot =
        serde_json::from_slice(bytes).map_err(|e| Error::MalformedSnapshot(e.to_string()))?;
    wire.to_snapshot()
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireSnapshot {
    session_id: String,
    timestamp: DateTime<Utc>,
    location: String,
    items: Vec<WireItem>,
    /// Tri-state on the wire: absent and null both mean a legacy snapshot
    #[serde(default)]
    included_slots: Option<Vec<String>>,
    #[serde(default)]
    empty_slots: Vec<String>,
    taken_in_raid: bool,
    mod_version: String,
}

impl WireSnapshot {
    fn from_snapshot(snapshot: &Snapshot, kept: &[&Item]) -> Self {
        Self {
            session_id: snapshot.session_id.to_string(),
            timestamp: snapshot.timestamp,
            location: snapshot.location_name.clone(),
            items: kept.iter().map(|&item| WireItem::from_item(item)).collect(),
            included_slots: snapshot.included_slots.clone(),
            empty_slots: snapshot.empty_slots.clone(),
            taken_in_raid: snapshot.taken_in_raid,
            mod_version: snapshot.mod_version.clone(),
        }
    }

    fn to_snapshot(self) -> Result<Snapshot> {
        let session_id = SessionId::parse(&self.session_id)
            .map_err(|_| Error::MalformedSnapshot(format!("bad session id {:?}", self.session_id)))?;
        let items = self
            .items
            .into_iter()
            .map(WireItem::into_item)
            .collect::<Result<Vec<_>>>()?;
        Ok(Snapshot {
            session_id,
            timestamp: self.timestamp,
            location_name: self.location,
            items,
            included_slots: self.included_slots,
            empty_slots: self.empty_slots,
            taken_in_raid: self.taken_in_raid,
            mod_version: self.mod_version,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireItem {
    id: ItemId,
    tpl: TemplateId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    slot_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upd: Option<Upd>,
}

impl WireItem {
    fn from_item(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            tpl: item.tpl.clone(),
            parent_id: item.parent_id.clone(),
            slot_id: item.slot_id.clone(),
            location: item.location.map(location_to_value),
            location_index: item.location_index,
            upd: item.upd.clone(),
        }
    }

    fn into_item(self) -> Result<Item> {
        let location = match self.location {
            Some(token) => Some(location_from_value(&self.id, token)?),
            None => None,
        };
        Ok(Item {
            id: self.id,
            tpl: self.tpl,
            parent_id: self.parent_id,
            slot_id: self.slot_id,
            location,
            location_index: self.location_index,
            upd: self.upd,
        })
    }
}

fn location_to_value(location: Location) -> Value {
    match location {
        Location::Cartridge(index) => Value::from(index),
        Location::Grid(grid) => {
            // GridPosition only holds plain scalars, serialization cannot fail
            serde_json::to_value(grid).unwrap_or(Value::Null)
        }
    }
}

fn location_from_value(item: &ItemId, token: Value) -> Result<Location> {
    match token {
        Value::Number(ref n) => match n.as_i64() {
            Some(index) if i32::try_from(index).is_ok() => {
                Ok(Location::Cartridge(index as i32))
            }
            _ => Err(malformed_location(item, &token)),
        },
        Value::Object(_) => serde_json::from_value::<GridPosition>(token.clone())
            .map(Location::Grid)
            .map_err(|_| malformed_location(item, &token)),
        _ => Err(malformed_location(item, &token)),
    }
}

fn malformed_location(item: &ItemId, token: &Value) -> Error {
    Error::MalformedLocation {
        item: item.to_string(),
        token: token.to_string(),
    }
}
