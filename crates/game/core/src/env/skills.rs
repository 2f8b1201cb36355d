//! Skill and stat definitions.

use crate::fixed::FixedPoint;
use crate::ids::{SkillId, StatId};
use crate::stats::Effect;

/// Static definition of a skill.
///
/// Skills with a `combat_xp_ratio` receive that share of every defeated
/// enemy's XP; the set of combat skills is whatever the catalog declares.
/// `level_effects` are multiplied by the current level and registered under
/// the `skill:<id>` source.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SkillConfig {
    pub id: SkillId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub combat_xp_ratio: Option<FixedPoint>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level_effects: Vec<Effect>,
}

impl SkillConfig {
    pub fn new(id: impl Into<SkillId>) -> Self {
        Self {
            id: id.into(),
            combat_xp_ratio: None,
            level_effects: Vec::new(),
        }
    }

    pub fn combat(id: impl Into<SkillId>, xp_ratio: FixedPoint) -> Self {
        Self {
            combat_xp_ratio: Some(xp_ratio),
            ..Self::new(id)
        }
    }

    pub fn with_level_effect(mut self, effect: Effect) -> Self {
        self.level_effects.push(effect);
        self
    }

    pub fn is_combat(&self) -> bool {
        self.combat_xp_ratio.is_some_and(FixedPoint::is_positive)
    }
}

/// Static definition of a stat and its base value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StatConfig {
    pub id: StatId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base: FixedPoint,
}

impl StatConfig {
    pub fn new(id: impl Into<StatId>, base: FixedPoint) -> Self {
        Self {
            id: id.into(),
            base,
        }
    }
}
