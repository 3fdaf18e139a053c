//! Typed dynamic item attributes
//!
//! The wire `Upd` object carries per-item state such as stack counts,
//! durability, and medical resources. Known families are modelled as typed
//! optional fields; anything else is preserved verbatim in `extra` so that
//! attributes this crate does not understand survive a round trip.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Dynamic attributes attached to an item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Upd {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_count: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawned_in_raid: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foldable: Option<Foldable>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub med_kit: Option<MedKit>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repairable: Option<Repairable>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_drink: Option<FoodDrink>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dogtag: Option<Dogtag>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Key>,

    /// Unrecognised attribute families, kept byte-faithful
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Upd {
    /// Stack size, treating an absent count as a single item
    pub fn stack_count_or_one(&self) -> i64 {
        self.stack_count.unwrap_or(1)
    }

    /// Whether the item is flagged as found in raid
    pub fn is_found_in_raid(&self) -> bool {
        self.spawned_in_raid == Some(true)
    }

    /// True when no attribute family is present at all
    pub fn is_empty(&self) -> bool {
        self.stack_count.is_none()
            && self.spawned_in_raid.is_none()
            && self.foldable.is_none()
            && self.med_kit.is_none()
            && self.repairable.is_none()
            && self.resource.is_none()
            && self.food_drink.is_none()
            && self.dogtag.is_none()
            && self.key.is_none()
            && self.extra.is_empty()
    }
}

/// Folding stock state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Foldable {
    pub folded: bool,
}

/// Remaining healing points of a medical kit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MedKit {
    pub hp: f64,
}

/// Wear state of a repairable item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Repairable {
    pub durability: f64,
    pub max: f64,
}

/// Remaining units of a consumable resource
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    pub value: f64,
}

/// Remaining portion of food or drink
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FoodDrink {
    pub hp_percent: f64,
}

/// Remaining uses of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Key {
    pub uses_remaining: i32,
}

/// Provenance record carried by a dog tag
///
/// Every field is optional on the wire; absent fields are omitted on write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Dogtag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub killer_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub killer_profile_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub killer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weapon_name: Option<String>,
}
