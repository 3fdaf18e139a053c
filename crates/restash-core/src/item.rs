//! Inventory item model
//!
//! Items form a forest: every record carries its own id and an optional
//! reference to a parent id, with a slot label naming the attachment point.
//! There is no nesting in the data itself; containment is reconstructed by
//! following `parent_id` edges. Positions inside a container are polymorphic:
//! a 2-D grid placement or a cartridge index inside a magazine stack.

use crate::upd::Upd;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Template id of the equipment root item
pub const EQUIPMENT_TPL: &str = "55d7217a4bdc2d86028b456d";

/// Slot label of the secured container, which restoration never touches
pub const SLOT_SECURED_CONTAINER: &str = "SecuredContainer";

/// Slot label of the pockets fixture, which restoration never touches
pub const SLOT_POCKETS: &str = "Pockets";

/// Unique identifier of an inventory item instance
///
/// Ids are opaque strings and are never parsed. Comparisons are exact,
/// except for write-side duplicate detection which folds ASCII case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    /// Create a new item ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of an item template (the catalogue entry an item instantiates)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub String);

impl TemplateId {
    /// Create a new template ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the equipment root template
    pub fn is_equipment(&self) -> bool {
        self.0 == EQUIPMENT_TPL
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TemplateId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Placement of an item on a container grid
///
/// `r` encodes rotation (0 horizontal, 1 vertical) and defaults to 0 when
/// absent on the wire; `is_searched` defaults to false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub r: i32,
    #[serde(rename = "isSearched", default)]
    pub is_searched: bool,
}

impl GridPosition {
    /// Create a grid placement with no rotation, unsearched
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            r: 0,
            is_searched: false,
        }
    }
}

/// Position of an item inside its parent container
///
/// The wire form is polymorphic: a bare integer means a cartridge index
/// inside a magazine, an object means a grid placement. Absent or null means
/// the item sits in a named slot with no positional data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// 2-D placement on a container grid
    Grid(GridPosition),
    /// Stack order inside a magazine
    Cartridge(i32),
}

/// A single inventory item record
///
/// `parent_id` and `slot_id` attach the item to its parent; both are absent
/// on forest roots. `location_index` is an informational ordinal carried
/// through unchanged, never interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub tpl: TemplateId,
    pub parent_id: Option<ItemId>,
    pub slot_id: Option<String>,
    pub location: Option<Location>,
    pub location_index: Option<i32>,
    pub upd: Option<Upd>,
}

impl Item {
    /// Create a detached item with no parent, position, or attributes
    pub fn new(id: impl Into<ItemId>, tpl: impl Into<TemplateId>) -> Self {
        Self {
            id: id.into(),
            tpl: tpl.into(),
            parent_id: None,
            slot_id: None,
            location: None,
            location_index: None,
            upd: None,
        }
    }

    /// Attach the item to a parent under the given slot label
    pub fn with_parent(mut self, parent: impl Into<ItemId>, slot: impl Into<String>) -> Self {
        self.parent_id = Some(parent.into());
        self.slot_id = Some(slot.into());
        self
    }

    /// Set the in-container position
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the dynamic attributes
    pub fn with_upd(mut self, upd: Upd) -> Self {
        self.upd = Some(upd);
        self
    }

    /// Whether this item instantiates the equipment root template
    pub fn is_equipment(&self) -> bool {
        self.tpl.is_equipment()
    }

    /// Case-insensitive slot label comparison
    pub fn slot_is(&self, name: &str) -> bool {
        matches!(&self.slot_id, Some(slot) if slot.eq_ignore_ascii_case(name))
    }

    /// Whether the item occupies a slot restoration must never remove
    pub fn in_protected_slot(&self) -> bool {
        self.slot_is(SLOT_SECURED_CONTAINER) || self.slot_is(SLOT_POCKETS)
    }
}

/// Case-insensitive slot label equality
pub fn slot_eq(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
