//! Capture adapter seam
//!
//! The engine never reflects over live game objects. A host integration
//! implements [`CaptureSource`] as a plain read-only view of one inventory,
//! and [`capture`] assembles the neutral snapshot from it: the equipment
//! root, every selected top-level slot, and each occupant's subtree walked
//! breadth-first with the usual depth bound.

use crate::item::{slot_eq, Item, ItemId, Location, TemplateId};
use crate::session::SessionId;
use crate::snapshot::Snapshot;
use crate::tree::MAX_DEPTH;
use crate::upd::Upd;
use std::collections::VecDeque;
use tracing::warn;

/// Template id of the ammunition base class
///
/// Sources that classify by template ancestry can answer
/// [`CaptureSource::is_ammo`] by checking descent from this template.
pub const AMMO_BASE_TPL: &str = "5485a8684bdc2da71d8b4567";

/// Canonical slot label for rounds loaded into a magazine
pub const CARTRIDGES_SLOT: &str = "cartridges";

/// One inventory node as reported by a capture source
///
/// Parent links are not part of the record; containment is implied by the
/// traversal and reassembled by [`capture`].
#[derive(Debug, Clone)]
pub struct CapturedNode {
    pub id: ItemId,
    pub tpl: TemplateId,
    /// Slot label inside the parent, as the host names it
    pub slot_id: Option<String>,
    pub location: Option<Location>,
    pub location_index: Option<i32>,
    /// Whether the host reports an active insurance policy on the item
    pub insured: bool,
}

impl CapturedNode {
    /// Create a bare node with no slot, position, or insurance
    pub fn new(id: impl Into<ItemId>, tpl: impl Into<TemplateId>) -> Self {
        Self {
            id: id.into(),
            tpl: tpl.into(),
            slot_id: None,
            location: None,
            location_index: None,
            insured: false,
        }
    }

    /// Set the slot label inside the parent
    pub fn in_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot_id = Some(slot.into());
        self
    }

    /// Set the in-container position
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Mark the node as insured
    pub fn insured(mut self) -> Self {
        self.insured = true;
        self
    }
}

/// A top-level equipment slot as reported by a capture source
#[derive(Debug, Clone)]
pub struct TopLevelSlot {
    pub name: String,
    /// The item occupying the slot, or `None` when the slot is empty
    pub occupant: Option<CapturedNode>,
}

/// Read-only view of a live inventory
///
/// Implementations adapt whatever object model the host runtime uses. They
/// are queried once per capture and never asked to mutate anything.
pub trait CaptureSource {
    /// The equipment root item
    fn equipment(&self) -> CapturedNode;

    /// Every top-level slot of the equipment root, occupied or not
    fn top_level_slots(&self) -> Vec<TopLevelSlot>;

    /// Direct children of an item
    fn children(&self, parent: &ItemId) -> Vec<CapturedNode>;

    /// Dynamic attributes of an item, if it has any
    fn read_upd(&self, id: &ItemId) -> Option<Upd>;

    /// Whether an item is ammunition
    fn is_ammo(&self, id: &ItemId) -> bool;
}

/// Capture-time filtering switches
#[derive(Debug, Clone, Default)]
pub struct CaptureOptions {
    /// Slot selection recorded into the snapshot; `None` captures everything
    pub included_slots: Option<Vec<String>>,
    /// Drop items flagged found in raid, leaving them out of management
    pub protect_found_in_raid: bool,
    /// Drop items with an active insurance policy
    pub exclude_insured: bool,
}

/// Assemble a snapshot from a live inventory view
pub fn capture(
    source: &impl CaptureSource,
    session_id: SessionId,
    location_name: impl Into<String>,
    taken_in_raid: bool,
    options: &CaptureOptions,
) -> Snapshot {
    let mut snapshot = Snapshot::new(session_id, location_name);
    snapshot.taken_in_raid = taken_in_raid;
    snapshot.included_slots = options.included_slots.clone();

    let equipment = source.equipment();
    let equipment_id = equipment.id.clone();
    let equipment_upd = source.read_upd(&equipment.id).filter(|u| !u.is_empty());
    snapshot.items.push(Item {
        id: equipment.id,
        tpl: equipment.tpl,
        parent_id: None,
        slot_id: None,
        location: None,
        location_index: None,
        upd: equipment_upd,
    });

    for slot in source.top_level_slots() {
        if !slot_selected(&slot.name, options) {
            continue;
        }
        match slot.occupant {
            None => snapshot.empty_slots.push(slot.name),
            Some(occupant) => collect_subtree(
                source,
                occupant,
                equipment_id.clone(),
                Some(slot.name),
                options,
                &mut snapshot.items,
            ),
        }
    }

    snapshot
}

fn slot_selected(name: &str, options: &CaptureOptions) -> bool {
    match &options.included_slots {
        None => true,
        Some(selected) => selected.iter().any(|s| slot_eq(s, name)),
    }
}

fn collect_subtree(
    source: &impl CaptureSource,
    root: CapturedNode,
    parent: ItemId,
    slot_override: Option<String>,
    options: &CaptureOptions,
    out: &mut Vec<Item>,
) {
    let mut queue: VecDeque<(CapturedNode, ItemId, Option<String>, usize)> = VecDeque::new();
    queue.push_back((root, parent, slot_override, 1));

    while let Some((node, parent_id, slot_override, depth)) = queue.pop_front() {
        let upd = source.read_upd(&node.id);
        if options.protect_found_in_raid && upd.as_ref().map_or(false, |u| u.is_found_in_raid()) {
            continue;
        }
        if options.exclude_insured && node.insured {
            continue;
        }

        let mut slot_id = slot_override.or(node.slot_id);
        if source.is_ammo(&node.id) && matches!(node.location, Some(Location::Cartridge(_))) {
            slot_id = Some(CARTRIDGES_SLOT.to_string());
        }

        if depth < MAX_DEPTH {
            for child in source.children(&node.id) {
                queue.push_back((child, node.id.clone(), None, depth + 1));
            }
        } else if !source.children(&node.id).is_empty() {
            warn!(item = %node.id, depth, "capture stopped at depth bound, children dropped");
        }

        out.push(Item {
            id: node.id,
            tpl: node.tpl,
            parent_id: Some(parent_id),
            slot_id,
            location: node.location,
            location_index: node.location_index,
            upd: upd.filter(|u| !u.is_empty()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{EQUIPMENT_TPL, GridPosition};
    use std::collections::{HashMap, HashSet};

    #[derive(Default)]
    struct FakeInventory {
        slots: Vec<TopLevelSlot>,
        children: HashMap<String, Vec<CapturedNode>>,
        upds: HashMap<String, Upd>,
        ammo: HashSet<String>,
    }

    impl FakeInventory {
        fn with_child(mut self, parent: &str, child: CapturedNode) -> Self {
            self.children
                .entry(parent.to_string())
                .or_default()
                .push(child);
            self
        }

        fn with_upd(mut self, id: &str, upd: Upd) -> Self {
            self.upds.insert(id.to_string(), upd);
            self
        }

        fn with_ammo(mut self, id: &str) -> Self {
            self.ammo.insert(id.to_string());
            self
        }
    }

    impl CaptureSource for FakeInventory {
        fn equipment(&self) -> CapturedNode {
            CapturedNode::new("equipment", EQUIPMENT_TPL)
        }

        fn top_level_slots(&self) -> Vec<TopLevelSlot> {
            self.slots.clone()
        }

        fn children(&self, parent: &ItemId) -> Vec<CapturedNode> {
            self.children.get(parent.as_str()).cloned().unwrap_or_default()
        }

        fn read_upd(&self, id: &ItemId) -> Option<Upd> {
            self.upds.get(id.as_str()).cloned()
        }

        fn is_ammo(&self, id: &ItemId) -> bool {
            self.ammo.contains(id.as_str())
        }
    }

    fn occupied(name: &str, node: CapturedNode) -> TopLevelSlot {
        TopLevelSlot {
            name: name.to_string(),
            occupant: Some(node),
        }
    }

    fn empty(name: &str) -> TopLevelSlot {
        TopLevelSlot {
            name: name.to_string(),
            occupant: None,
        }
    }

    fn session() -> SessionId {
        SessionId::parse("raid-1").unwrap()
    }

    #[test]
    fn test_capture_assembles_the_forest() {
        let source = FakeInventory {
            slots: vec![
                occupied("TacticalVest", CapturedNode::new("vest", "vest-tpl")),
                empty("Headwear"),
            ],
            ..Default::default()
        }
        .with_child("vest", CapturedNode::new("mag", "mag-tpl").in_slot("1"))
        .with_child(
            "mag",
            CapturedNode::new("round", "ammo-tpl").at(Location::Cartridge(0)),
        )
        .with_ammo("round");

        let snap = capture(&source, session(), "bigmap", true, &CaptureOptions::default());

        assert!(snap.taken_in_raid);
        assert_eq!(snap.location_name, "bigmap");
        assert_eq!(snap.empty_slots, ["Headwear".to_string()]);

        let by_id: HashMap<&str, &Item> =
            snap.items.iter().map(|it| (it.id.as_str(), it)).collect();
        assert_eq!(by_id["equipment"].parent_id, None);
        assert_eq!(by_id["vest"].parent_id.as_ref().unwrap().as_str(), "equipment");
        assert_eq!(by_id["vest"].slot_id.as_deref(), Some("TacticalVest"));
        assert_eq!(by_id["mag"].parent_id.as_ref().unwrap().as_str(), "vest");
        assert_eq!(by_id["mag"].slot_id.as_deref(), Some("1"));
        assert_eq!(by_id["round"].slot_id.as_deref(), Some(CARTRIDGES_SLOT));
    }

    #[test]
    fn test_slot_selection_filters_capture() {
        let source = FakeInventory {
            slots: vec![
                occupied("TacticalVest", CapturedNode::new("vest", "vest-tpl")),
                empty("Headwear"),
                empty("FaceCover"),
            ],
            ..Default::default()
        };
        let options = CaptureOptions {
            included_slots: Some(vec!["headwear".to_string()]),
            ..Default::default()
        };

        let snap = capture(&source, session(), "bigmap", false, &options);

        assert_eq!(snap.items.len(), 1);
        assert_eq!(snap.empty_slots, ["Headwear".to_string()]);
        assert_eq!(snap.included_slots, Some(vec!["headwear".to_string()]));
    }

    #[test]
    fn test_found_in_raid_items_can_be_left_out() {
        let source = FakeInventory {
            slots: vec![occupied(
                "Backpack",
                CapturedNode::new("pack", "pack-tpl"),
            )],
            ..Default::default()
        }
        .with_upd(
            "pack",
            Upd {
                spawned_in_raid: Some(true),
                ..Default::default()
            },
        );
        let options = CaptureOptions {
            protect_found_in_raid: true,
            ..Default::default()
        };

        let snap = capture(&source, session(), "bigmap", false, &options);

        assert_eq!(snap.items.len(), 1);
        // The slot was not empty, so it must not be recorded as such.
        assert!(snap.empty_slots.is_empty());
    }

    #[test]
    fn test_insured_subtree_can_be_left_out() {
        let source = FakeInventory {
            slots: vec![occupied(
                "Backpack",
                CapturedNode::new("pack", "pack-tpl"),
            )],
            ..Default::default()
        }
        .with_child("pack", CapturedNode::new("rifle", "rifle-tpl").insured())
        .with_child("rifle", CapturedNode::new("scope", "scope-tpl"));

        let options = CaptureOptions {
            exclude_insured: true,
            ..Default::default()
        };
        let snap = capture(&source, session(), "bigmap", false, &options);

        let ids: Vec<&str> = snap.items.iter().map(|it| it.id.as_str()).collect();
        assert_eq!(ids, ["equipment", "pack"]);
    }

    #[test]
    fn test_ammo_relabel_requires_cartridge_position() {
        let source = FakeInventory {
            slots: vec![occupied("Backpack", CapturedNode::new("pack", "pack-tpl"))],
            ..Default::default()
        }
        .with_child(
            "pack",
            CapturedNode::new("loose", "ammo-tpl")
                .in_slot("main")
                .at(Location::Grid(GridPosition::new(0, 0))),
        )
        .with_ammo("loose");

        let snap = capture(&source, session(), "bigmap", false, &CaptureOptions::default());

        let loose = snap.items.iter().find(|it| it.id.as_str() == "loose").unwrap();
        assert_eq!(loose.slot_id.as_deref(), Some("main"));
    }

    #[test]
    fn test_empty_upd_is_dropped() {
        let source = FakeInventory {
            slots: vec![occupied("Holster", CapturedNode::new("pistol", "pistol-tpl"))],
            ..Default::default()
        }
        .with_upd("pistol", Upd::default());

        let snap = capture(&source, session(), "bigmap", false, &CaptureOptions::default());

        let pistol = snap.items.iter().find(|it| it.id.as_str() == "pistol").unwrap();
        assert_eq!(pistol.upd, None);
    }

    #[test]
    fn test_capture_stops_at_depth_bound() {
        let mut source = FakeInventory {
            slots: vec![occupied("Backpack", CapturedNode::new("n1", "t"))],
            ..Default::default()
        };
        for i in 1..MAX_DEPTH + 3 {
            source = source.with_child(
                &format!("n{}", i),
                CapturedNode::new(format!("n{}", i + 1), "t"),
            );
        }

        let snap = capture(&source, session(), "bigmap", false, &CaptureOptions::default());

        // Equipment plus the bounded chain.
        assert_eq!(snap.items.len(), 1 + MAX_DEPTH);
    }
}
