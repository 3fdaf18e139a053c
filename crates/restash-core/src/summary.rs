//! Post-restore summary
//!
//! A pure diff between a snapshot and the profile as it stood before the
//! restoration ran: consolidated lines of what came back and what is gone
//! for good. Lines are grouped by template, stack-aware, and carry a
//! found-in-raid marker so a UI can highlight the painful losses.

use crate::item::{Item, TemplateId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One consolidated item line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SummaryLine {
    pub tpl: TemplateId,
    /// Total units across all stacks of this template
    pub count: i64,
    /// True when any contributing item was flagged found in raid
    pub found_in_raid: bool,
}

/// What a restoration brought back and what stayed lost
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RestorationSummary {
    pub restored: Vec<SummaryLine>,
    pub lost: Vec<SummaryLine>,
}

impl RestorationSummary {
    /// True when neither side has any line
    pub fn is_empty(&self) -> bool {
        self.restored.is_empty() && self.lost.is_empty()
    }
}

/// Diff a snapshot against the pre-restoration profile items
///
/// Restored lines cover the snapshot's items; lost lines cover profile
/// items whose id does not appear in the snapshot. Equipment roots are
/// bookkeeping, not loot, and appear on neither side.
pub fn build_summary(
    snapshot_items: &[Item],
    pre_restoration_items: &[Item],
) -> RestorationSummary {
    let snapshot_ids: HashSet<&str> = snapshot_items.iter().map(|it| it.id.as_str()).collect();
    let lost = pre_restoration_items
        .iter()
        .filter(|it| !snapshot_ids.contains(it.id.as_str()));

    RestorationSummary {
        restored: consolidate(snapshot_items.iter()),
        lost: consolidate(lost),
    }
}

fn consolidate<'a>(items: impl Iterator<Item = &'a Item>) -> Vec<SummaryLine> {
    let mut groups: IndexMap<&TemplateId, (i64, bool)> = IndexMap::new();
    for item in items {
        if item.is_equipment() {
            continue;
        }
        let count = item.upd.as_ref().map_or(1, |u| u.stack_count_or_one());
        let found = item.upd.as_ref().map_or(false, |u| u.is_found_in_raid());
        let entry = groups.entry(&item.tpl).or_insert((0, false));
        entry.0 += count;
        entry.1 |= found;
    }

    let mut lines: Vec<SummaryLine> = groups
        .into_iter()
        .map(|(tpl, (count, found_in_raid))| SummaryLine {
            tpl: tpl.clone(),
            count,
            found_in_raid,
        })
        .collect();
    lines.sort_by(|a, b| {
        b.found_in_raid
            .cmp(&a.found_in_raid)
            .then(b.count.cmp(&a.count))
    });
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::EQUIPMENT_TPL;
    use crate::upd::Upd;

    fn stacked(id: &str, tpl: &str, count: i64, found: bool) -> Item {
        Item::new(id, tpl).with_upd(Upd {
            stack_count: Some(count),
            spawned_in_raid: Some(found),
            ..Default::default()
        })
    }

    #[test]
    fn test_stacks_consolidate_by_template() {
        let snapshot = vec![
            stacked("a", "ammo", 30, false),
            stacked("b", "ammo", 25, false),
            Item::new("c", "knife"),
        ];
        let summary = build_summary(&snapshot, &[]);
        assert_eq!(summary.restored.len(), 2);
        assert_eq!(summary.restored[0].tpl.as_str(), "ammo");
        assert_eq!(summary.restored[0].count, 55);
        assert_eq!(summary.restored[1].count, 1);
        assert!(summary.lost.is_empty());
    }

    #[test]
    fn test_found_in_raid_lines_sort_first() {
        let snapshot = vec![
            stacked("a", "common", 99, false),
            stacked("b", "rare", 1, true),
        ];
        let summary = build_summary(&snapshot, &[]);
        assert_eq!(summary.restored[0].tpl.as_str(), "rare");
        assert!(summary.restored[0].found_in_raid);
        assert_eq!(summary.restored[1].tpl.as_str(), "common");
    }

    #[test]
    fn test_found_flag_is_sticky_across_stacks() {
        let snapshot = vec![
            stacked("a", "ammo", 30, false),
            stacked("b", "ammo", 30, true),
        ];
        let summary = build_summary(&snapshot, &[]);
        assert_eq!(summary.restored.len(), 1);
        assert!(summary.restored[0].found_in_raid);
    }

    #[test]
    fn test_lost_lines_use_id_membership() {
        let snapshot = vec![Item::new("kept", "helmet")];
        let pre = vec![
            Item::new("kept", "helmet"),
            Item::new("raid-loot", "gpu"),
        ];
        let summary = build_summary(&snapshot, &pre);
        assert_eq!(summary.lost.len(), 1);
        assert_eq!(summary.lost[0].tpl.as_str(), "gpu");
    }

    #[test]
    fn test_equipment_roots_are_not_loot() {
        let snapshot = vec![Item::new("snap-eq", EQUIPMENT_TPL)];
        let pre = vec![Item::new("eq", EQUIPMENT_TPL)];
        let summary = build_summary(&snapshot, &pre);
        assert!(summary.is_empty());
    }

    #[test]
    fn test_summary_serializes_pascal_case() {
        let summary = build_summary(&[stacked("a", "ammo", 30, true)], &[]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["Restored"][0]["Tpl"], "ammo");
        assert_eq!(json["Restored"][0]["Count"], 30);
        assert_eq!(json["Restored"][0]["FoundInRaid"], true);
        assert_eq!(json["Lost"], serde_json::json!([]));
    }

    #[test]
    fn test_absent_upd_counts_as_one() {
        let summary = build_summary(&[Item::new("a", "bandage")], &[]);
        assert_eq!(summary.restored[0].count, 1);
        assert!(!summary.restored[0].found_in_raid);
    }
}
