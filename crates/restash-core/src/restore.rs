//! Snapshot restoration
//!
//! The restorer is a pure function from a profile's item list and a snapshot
//! to a new item list plus counters. It derives the set of managed top-level
//! slots from the snapshot's slot policy, removes the profile subtrees
//! currently occupying those slots, then grafts the snapshot's subtrees back
//! under the profile's equipment root. The secured container and pockets are
//! never managed, whatever the snapshot says.
//!
//! Failures surface as errors, never panics, and the inputs are left
//! untouched either way.

use crate::error::{Error, Result};
use crate::item::{Item, ItemId, SLOT_POCKETS, SLOT_SECURED_CONTAINER};
use crate::snapshot::{SlotPolicy, Snapshot};
use crate::tree::{root_slot, ItemIndex, MAX_DEPTH};
use std::collections::HashSet;

/// Counters reported by a completed restoration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreCounters {
    /// Snapshot items grafted into the profile
    pub added: usize,
    /// Profile items removed from managed slots
    pub removed: usize,
    /// Snapshot items skipped because their id was already present
    pub duplicates_skipped: usize,
}

/// Output of a successful restoration
#[derive(Debug, Clone)]
pub struct RestoreOutcome {
    /// The profile's replacement item list
    pub items: Vec<Item>,
    pub counters: RestoreCounters,
}

/// Restore a snapshot into a profile's item list
///
/// Fails with [`Error::NoEquipmentRoot`] when the profile has no equipment
/// root to graft onto, and with [`Error::CyclicOrDeepRemoval`] when removal
/// would have to walk deeper than [`MAX_DEPTH`] levels. Cyclic subtrees on
/// the snapshot side are skipped item by item instead of failing the whole
/// restoration.
pub fn restore(profile_items: &[Item], snapshot: &Snapshot) -> Result<RestoreOutcome> {
    let profile_equipment: Vec<&ItemId> = profile_items
        .iter()
        .filter(|it| it.is_equipment())
        .map(|it| &it.id)
        .collect();
    let graft_root: ItemId = (*profile_equipment.first().ok_or(Error::NoEquipmentRoot)?).clone();

    let managed = managed_slots(snapshot);

    // Removal: seed with the occupants of managed slots under any equipment
    // root, then pull in their descendants level by level.
    let equipment_set: HashSet<&str> = profile_equipment.iter().map(|id| id.as_str()).collect();
    let mut doomed: HashSet<&str> = HashSet::new();
    let mut level: Vec<&Item> = Vec::new();
    for item in profile_items {
        if let (Some(parent), Some(slot)) = (&item.parent_id, &item.slot_id) {
            if equipment_set.contains(parent.as_str()) && managed.contains(&slot.to_ascii_lowercase())
            {
                doomed.insert(item.id.as_str());
                level.push(item);
            }
        }
    }

    let mut depth = 1;
    while !level.is_empty() {
        let parents: HashSet<&str> = level.iter().map(|it| it.id.as_str()).collect();
        let next: Vec<&Item> = profile_items
            .iter()
            .filter(|it| !doomed.contains(it.id.as_str()))
            .filter(|it| !it.in_protected_slot())
            .filter(|it| {
                it.parent_id
                    .as_ref()
                    .map_or(false, |p| parents.contains(p.as_str()))
            })
            .collect();
        if next.is_empty() {
            break;
        }
        depth += 1;
        if depth > MAX_DEPTH {
            return Err(Error::CyclicOrDeepRemoval { max: MAX_DEPTH });
        }
        for item in &next {
            doomed.insert(item.id.as_str());
        }
        level = next;
    }

    let mut result: Vec<Item> = profile_items
        .iter()
        .filter(|it| !doomed.contains(it.id.as_str()))
        .cloned()
        .collect();
    let mut counters = RestoreCounters {
        removed: doomed.len(),
        ..Default::default()
    };

    // Addition: graft snapshot subtrees whose root slot is managed.
    let snapshot_equipment: Option<&ItemId> = snapshot.find_equipment().map(|it| &it.id);
    let snap_index = ItemIndex::new(&snapshot.items);
    let mut present: HashSet<String> =
        result.iter().map(|it| it.id.as_str().to_string()).collect();

    for candidate in &snapshot.items {
        // Walk before anything else so cyclic subtrees skip silently,
        // without touching any counter.
        let slot = match snapshot_equipment {
            Some(equipment) => match root_slot(&snap_index, candidate, equipment) {
                Ok(slot) => slot,
                Err(_) => continue,
            },
            None => None,
        };
        if candidate.is_equipment() {
            continue;
        }
        if present.contains(candidate.id.as_str()) {
            counters.duplicates_skipped += 1;
            continue;
        }
        let Some(slot) = slot else { continue };
        if !managed.contains(&slot.to_ascii_lowercase()) {
            continue;
        }

        let mut item = candidate.clone();
        if item.parent_id.as_ref() == snapshot_equipment {
            item.parent_id = Some(graft_root.clone());
        }
        present.insert(item.id.as_str().to_string());
        result.push(item);
        counters.added += 1;
    }

    // Structural re-check before handing the list back.
    if !result.iter().any(|it| it.is_equipment()) {
        return Err(Error::InvariantViolation(
            "equipment root missing from output".to_string(),
        ));
    }
    for item in profile_items {
        if item.in_protected_slot() && !present.contains(item.id.as_str()) {
            return Err(Error::InvariantViolation(format!(
                "protected item {} missing from output",
                item.id
            )));
        }
    }

    Ok(RestoreOutcome {
        items: result,
        counters,
    })
}

/// Lowercased labels of the top-level slots this snapshot manages
fn managed_slots(snapshot: &Snapshot) -> HashSet<String> {
    let mut managed: HashSet<String> = match snapshot.slot_policy() {
        SlotPolicy::Disabled => HashSet::new(),
        SlotPolicy::Exact(slots) => slots.iter().map(|s| s.to_ascii_lowercase()).collect(),
        SlotPolicy::SnapshotShape => {
            let equipment: HashSet<&str> = snapshot
                .equipment_ids()
                .iter()
                .map(|id| id.as_str())
                .collect();
            let mut slots: HashSet<String> = snapshot
                .items
                .iter()
                .filter(|it| {
                    it.parent_id
                        .as_ref()
                        .map_or(false, |p| equipment.contains(p.as_str()))
                })
                .filter_map(|it| it.slot_id.as_ref())
                .map(|s| s.to_ascii_lowercase())
                .collect();
            slots.extend(snapshot.empty_slots.iter().map(|s| s.to_ascii_lowercase()));
            slots
        }
    };
    managed.remove(&SLOT_SECURED_CONTAINER.to_ascii_lowercase());
    managed.remove(&SLOT_POCKETS.to_ascii_lowercase());
    managed
}
