//! Production action definitions.

use crate::fixed::FixedPoint;
use crate::ids::{ActionId, ItemId, SkillId};
use crate::stats::DerivedValueConfig;

/// An item and a count, used for ingredients, products and drops.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ItemStack {
    pub item_id: ItemId,
    pub count: u64,
}

impl ItemStack {
    pub fn new(item_id: impl Into<ItemId>, count: u64) -> Self {
        Self {
            item_id: item_id.into(),
            count,
        }
    }
}

/// Static definition of a production action.
///
/// `duration` is in seconds. `chest_points` feed the chest identified by
/// `chest_id`; without a chest they are ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ActionConfig {
    pub id: ActionId,
    pub skill_id: SkillId,
    #[cfg_attr(feature = "serde", serde(default = "default_min_level"))]
    pub min_level: u32,
    pub duration: DerivedValueConfig,
    pub xp: DerivedValueConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub chest_points: DerivedValueConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ingredients: Vec<ItemStack>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub products: Vec<ItemStack>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub chest_id: Option<ItemId>,
}

#[cfg(feature = "serde")]
fn default_min_level() -> u32 {
    1
}

impl ActionConfig {
    /// Minimal action with constant duration and XP; builder-style setters
    /// fill in the rest.
    pub fn new(
        id: impl Into<ActionId>,
        skill_id: impl Into<SkillId>,
        duration_seconds: FixedPoint,
        xp: FixedPoint,
    ) -> Self {
        Self {
            id: id.into(),
            skill_id: skill_id.into(),
            min_level: 1,
            duration: DerivedValueConfig::constant(duration_seconds),
            xp: DerivedValueConfig::constant(xp),
            chest_points: DerivedValueConfig::default(),
            ingredients: Vec::new(),
            products: Vec::new(),
            chest_id: None,
        }
    }

    pub fn with_min_level(mut self, min_level: u32) -> Self {
        self.min_level = min_level;
        self
    }

    pub fn with_duration(mut self, duration: DerivedValueConfig) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_xp(mut self, xp: DerivedValueConfig) -> Self {
        self.xp = xp;
        self
    }

    pub fn with_ingredient(mut self, item_id: impl Into<ItemId>, count: u64) -> Self {
        self.ingredients.push(ItemStack::new(item_id, count));
        self
    }

    pub fn with_product(mut self, item_id: impl Into<ItemId>, count: u64) -> Self {
        self.products.push(ItemStack::new(item_id, count));
        self
    }

    pub fn with_chest(mut self, chest_id: impl Into<ItemId>, points: DerivedValueConfig) -> Self {
        self.chest_id = Some(chest_id.into());
        self.chest_points = points;
        self
    }
}
