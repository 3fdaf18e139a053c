//! Parent-chain walks over a flat item forest
//!
//! Containment is implicit in `parent_id` references, so every traversal is
//! a chain walk over untrusted data. Malformed snapshots can contain cycles
//! or absurdly deep chains; every walk here tracks visited ids and gives up
//! at [`MAX_DEPTH`] instead of hanging.

use crate::error::{Error, Result};
use crate::item::{Item, ItemId};
use indexmap::IndexMap;

/// Depth bound shared by every parent-chain walk
pub const MAX_DEPTH: usize = 20;

/// Borrowed id lookup over an item slice
///
/// On duplicate ids the first occurrence wins, matching write-side
/// deduplication. Lookups are exact, not case-folded.
pub struct ItemIndex<'a> {
    by_id: IndexMap<&'a str, &'a Item>,
}

impl<'a> ItemIndex<'a> {
    /// Index a slice of items by id
    pub fn new(items: &'a [Item]) -> Self {
        let mut by_id = IndexMap::with_capacity(items.len());
        for item in items {
            by_id.entry(item.id.as_str()).or_insert(item);
        }
        Self { by_id }
    }

    /// Look up an item by id
    pub fn get(&self, id: &ItemId) -> Option<&'a Item> {
        self.by_id.get(id.as_str()).copied()
    }

    /// Whether an item with this id exists
    pub fn contains(&self, id: &ItemId) -> bool {
        self.by_id.contains_key(id.as_str())
    }
}

/// Find the slot that attaches an item's subtree to the equipment root
///
/// Walks `parent_id` edges upward from `item` until it reaches a direct
/// child of `equipment_id`, whose slot label is the answer. Returns
/// `Ok(None)` when the chain ends without reaching the root (detached or
/// dangling parents). Fails when the walk revisits an id or runs past
/// [`MAX_DEPTH`].
pub fn root_slot<'a>(
    index: &ItemIndex<'a>,
    item: &'a Item,
    equipment_id: &ItemId,
) -> Result<Option<&'a str>> {
    let mut visited: Vec<&str> = Vec::new();
    let mut current = item;
    loop {
        if visited.contains(&current.id.as_str()) || visited.len() >= MAX_DEPTH {
            return Err(Error::CyclicOrDeepRemoval { max: MAX_DEPTH });
        }
        visited.push(current.id.as_str());

        match &current.parent_id {
            Some(parent) if parent == equipment_id => return Ok(current.slot_id.as_deref()),
            Some(parent) => match index.get(parent) {
                Some(next) => current = next,
                None => return Ok(None),
            },
            None => return Ok(None),
        }
    }
}
