//! Item definitions.
//!
//! # Design: Base + Optional Shapes
//!
//! Every item is a plain inventory entry. An item may additionally be
//! openable (`chest`), wearable (`equipment`) or usable in a consumable slot
//! (`consumable`). Materials and products carry no shape at all.

use crate::fixed::FixedPoint;
use crate::ids::{ItemId, SkillId};
use crate::stats::Effect;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ItemConfig {
    pub id: ItemId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub chest: Option<ChestConfig>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: Option<EquipmentConfig>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub consumable: Option<ConsumableConfig>,
}

impl ItemConfig {
    /// Plain material with no shape.
    pub fn material(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            chest: None,
            equipment: None,
            consumable: None,
        }
    }

    pub fn chest(id: impl Into<ItemId>, chest: ChestConfig) -> Self {
        Self {
            chest: Some(chest),
            ..Self::material(id)
        }
    }

    pub fn equipment(id: impl Into<ItemId>, equipment: EquipmentConfig) -> Self {
        Self {
            equipment: Some(equipment),
            ..Self::material(id)
        }
    }

    pub fn consumable(id: impl Into<ItemId>, consumable: ConsumableConfig) -> Self {
        Self {
            consumable: Some(consumable),
            ..Self::material(id)
        }
    }
}

/// Chest shape: filled by chest points, opened into loot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ChestConfig {
    /// Points needed to earn one chest.
    pub max_points: FixedPoint,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loot: Vec<LootEntry>,
}

/// A possible drop: `min..=max` units with probability `chance` (0..=1).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LootEntry {
    pub item_id: ItemId,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub min: u64,
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub max: u64,
    #[cfg_attr(feature = "serde", serde(default = "certain"))]
    pub chance: FixedPoint,
}

#[cfg(feature = "serde")]
fn one() -> u64 {
    1
}

#[cfg(feature = "serde")]
fn certain() -> FixedPoint {
    FixedPoint::ONE
}

impl LootEntry {
    pub fn new(item_id: impl Into<ItemId>, min: u64, max: u64, chance: FixedPoint) -> Self {
        Self {
            item_id: item_id.into(),
            min,
            max,
            chance,
        }
    }

    /// Always drops exactly `count`.
    pub fn guaranteed(item_id: impl Into<ItemId>, count: u64) -> Self {
        Self::new(item_id, count, count, FixedPoint::ONE)
    }
}

/// Equipment shape: occupies `slot` and registers `effects` while worn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EquipmentConfig {
    pub slot: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<Effect>,
}

/// Consumable shape: one unit keeps `effects` active for `duration_seconds`
/// of `skill_id` actions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ConsumableConfig {
    pub skill_id: SkillId,
    pub duration_seconds: FixedPoint,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<Effect>,
}
