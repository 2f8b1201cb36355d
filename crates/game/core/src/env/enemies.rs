//! Enemy definitions for combat actions.

use crate::fixed::FixedPoint;
use crate::ids::{EnemyId, ItemId};

use super::items::LootEntry;

/// Static definition of an enemy.
///
/// `damage_taken` multiplies incoming damage (1 = full damage). `xp` is the
/// total XP per defeat, split across combat skills by their ratios.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EnemyConfig {
    pub id: EnemyId,
    pub max_hp: FixedPoint,
    pub damage: FixedPoint,
    pub attack_interval_seconds: FixedPoint,
    #[cfg_attr(feature = "serde", serde(default = "full_damage"))]
    pub damage_taken: FixedPoint,
    #[cfg_attr(feature = "serde", serde(default))]
    pub xp: FixedPoint,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loot: Vec<LootEntry>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub chest_points: FixedPoint,
    #[cfg_attr(feature = "serde", serde(default))]
    pub chest_id: Option<ItemId>,
}

#[cfg(feature = "serde")]
fn full_damage() -> FixedPoint {
    FixedPoint::ONE
}

impl EnemyConfig {
    pub fn new(
        id: impl Into<EnemyId>,
        max_hp: FixedPoint,
        damage: FixedPoint,
        attack_interval_seconds: FixedPoint,
    ) -> Self {
        Self {
            id: id.into(),
            max_hp,
            damage,
            attack_interval_seconds,
            damage_taken: FixedPoint::ONE,
            xp: FixedPoint::ZERO,
            loot: Vec::new(),
            chest_points: FixedPoint::ZERO,
            chest_id: None,
        }
    }

    pub fn with_xp(mut self, xp: FixedPoint) -> Self {
        self.xp = xp;
        self
    }

    pub fn with_loot(mut self, entry: LootEntry) -> Self {
        self.loot.push(entry);
        self
    }

    pub fn with_chest(mut self, chest_id: impl Into<ItemId>, points: FixedPoint) -> Self {
        self.chest_id = Some(chest_id.into());
        self.chest_points = points;
        self
    }
}
