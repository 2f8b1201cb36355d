//! Consumable slots per skill.
//!
//! A slot holds a consumable item and the seconds left on the unit currently
//! in use. Its *availability* is that remaining time plus every unit of the
//! item still in the inventory:
//!
//! ```text
//! availability = remaining + inventory_count × unit_duration
//! ```
//!
//! Effects of a slot only apply to actions the availability fully covers.
//! Draining is planned first ([`ConsumableSlots::plan_drain`]) so the caller
//! can remove the converted units together with the action's ingredients,
//! then applied ([`ConsumableSlots::apply_drain`]).

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::env::{GameCatalog, ItemStack};
use crate::error::CommandError;
use crate::fixed::FixedPoint;
use crate::ids::{ItemId, SkillId};
use crate::stats::{Availability, EffectAvailability, EffectSource};

use super::inventory::Inventory;

/// Hard cap on slots per skill; the configured count is clamped to it.
pub const MAX_CONSUMABLE_SLOTS: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ConsumableSlot {
    pub item_id: ItemId,
    /// Seconds left on the unit in use.
    pub remaining: FixedPoint,
}

type SkillSlots = ArrayVec<Option<ConsumableSlot>, MAX_CONSUMABLE_SLOTS>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsumableSlots {
    slots_per_skill: usize,
    skills: BTreeMap<SkillId, SkillSlots>,
}

/// Result of planning a drain for one batch of actions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConsumableDrain {
    pub skill_id: SkillId,
    /// New remaining time per slot.
    pub remaining: Vec<(usize, FixedPoint)>,
    /// Units converted from the inventory.
    pub consumed: Vec<ItemStack>,
    /// Slots left with no time and no inventory; the caller drops their effects.
    pub cleared: Vec<usize>,
}

impl ConsumableSlots {
    pub fn new(slots_per_skill: usize) -> Self {
        Self {
            slots_per_skill: slots_per_skill.min(MAX_CONSUMABLE_SLOTS),
            skills: BTreeMap::new(),
        }
    }

    pub fn slots_per_skill(&self) -> usize {
        self.slots_per_skill
    }

    pub fn get(&self, skill_id: &SkillId, slot: usize) -> Option<&ConsumableSlot> {
        self.skills.get(skill_id)?.get(slot)?.as_ref()
    }

    /// Occupied slots of a skill, in slot order.
    pub fn slots(&self, skill_id: &SkillId) -> impl Iterator<Item = (usize, &ConsumableSlot)> {
        self.skills
            .get(skill_id)
            .into_iter()
            .flat_map(|slots| slots.iter().enumerate())
            .filter_map(|(index, slot)| slot.as_ref().map(|slot| (index, slot)))
    }

    /// Puts `item_id` in a slot with no time on it; returns the previous
    /// occupant.
    pub fn assign(
        &mut self,
        skill_id: &SkillId,
        slot: usize,
        item_id: ItemId,
    ) -> Result<Option<ConsumableSlot>, CommandError> {
        self.check_slot(skill_id, slot)?;
        let slots = self.slots_mut(skill_id);
        let previous = slots[slot].replace(ConsumableSlot {
            item_id,
            remaining: FixedPoint::ZERO,
        });
        Ok(previous)
    }

    pub fn clear(
        &mut self,
        skill_id: &SkillId,
        slot: usize,
    ) -> Result<Option<ConsumableSlot>, CommandError> {
        self.check_slot(skill_id, slot)?;
        Ok(self
            .skills
            .get_mut(skill_id)
            .and_then(|slots| slots.get_mut(slot))
            .and_then(Option::take))
    }

    /// Seconds the slot can still sustain, counting inventory units.
    pub fn availability(
        &self,
        skill_id: &SkillId,
        slot: usize,
        inventory: &Inventory,
        catalog: &GameCatalog,
    ) -> FixedPoint {
        match self.get(skill_id, slot) {
            Some(slot) => {
                let unit = unit_duration(catalog, &slot.item_id);
                let count = inventory.count(&slot.item_id).min(i64::MAX as u64) as i64;
                slot.remaining.saturating_add(unit.mul_int(count))
            }
            None => FixedPoint::ZERO,
        }
    }

    /// How many actions of `duration` the covering slots sustain together.
    ///
    /// Slots that cannot cover a single action contribute no effects and so
    /// impose no limit. `None` means no covering slot.
    pub fn max_actions(
        &self,
        skill_id: &SkillId,
        duration: FixedPoint,
        inventory: &Inventory,
        catalog: &GameCatalog,
    ) -> Option<u64> {
        if !duration.is_positive() {
            return None;
        }
        self.slots(skill_id)
            .filter_map(|(index, _)| {
                let available = self.availability(skill_id, index, inventory, catalog);
                if available >= duration {
                    available.whole_times(duration).map(|n| n.max(0) as u64)
                } else {
                    None
                }
            })
            .min()
    }

    /// Plans draining `consumed` seconds from every slot of a skill.
    ///
    /// Covering slots convert whole inventory units when their remaining
    /// time runs out; slots that cannot cover `per_action` are drained
    /// toward zero without conversion.
    pub fn plan_drain(
        &self,
        skill_id: &SkillId,
        per_action: FixedPoint,
        consumed: FixedPoint,
        inventory: &Inventory,
        catalog: &GameCatalog,
    ) -> ConsumableDrain {
        let mut drain = ConsumableDrain {
            skill_id: skill_id.clone(),
            ..ConsumableDrain::default()
        };

        for (index, slot) in self.slots(skill_id) {
            let available = self.availability(skill_id, index, inventory, catalog);
            let held = inventory.count(&slot.item_id);
            let unit = unit_duration(catalog, &slot.item_id);

            let (remaining, units) = if available >= per_action && consumed > slot.remaining {
                let missing = consumed - slot.remaining;
                let units = missing.whole_times_ceil(unit).unwrap_or(0).max(0) as u64;
                let units = units.min(held);
                let converted = unit.mul_int(units as i64);
                let remaining = (slot.remaining + converted - consumed).max(FixedPoint::ZERO);
                (remaining, units)
            } else {
                ((slot.remaining - consumed).max(FixedPoint::ZERO), 0)
            };

            if units > 0 {
                drain
                    .consumed
                    .push(ItemStack::new(slot.item_id.clone(), units));
            }
            if remaining.is_zero() && held - units == 0 {
                drain.cleared.push(index);
            }
            drain.remaining.push((index, remaining));
        }
        drain
    }

    pub fn apply_drain(&mut self, drain: &ConsumableDrain) {
        let Some(slots) = self.skills.get_mut(&drain.skill_id) else {
            return;
        };
        for &(index, remaining) in &drain.remaining {
            if let Some(Some(slot)) = slots.get_mut(index) {
                slot.remaining = remaining;
            }
        }
        for &index in &drain.cleared {
            if let Some(slot) = slots.get_mut(index) {
                if let Some(cleared) = slot.take() {
                    tracing::debug!(
                        skill_id = %drain.skill_id,
                        slot = index,
                        item_id = %cleared.item_id,
                        "consumable slot ran out"
                    );
                }
            }
        }
    }

    /// Restores a slot's remaining time; used when loading a snapshot.
    pub fn set_remaining(&mut self, skill_id: &SkillId, slot: usize, remaining: FixedPoint) {
        if let Some(Some(entry)) = self.skills.get_mut(skill_id).and_then(|s| s.get_mut(slot)) {
            entry.remaining = remaining.max(FixedPoint::ZERO);
        }
    }

    fn check_slot(&self, skill_id: &SkillId, slot: usize) -> Result<(), CommandError> {
        if slot >= self.slots_per_skill {
            return Err(CommandError::SlotOutOfRange {
                skill: skill_id.clone(),
                slot,
                available: self.slots_per_skill,
            });
        }
        Ok(())
    }

    fn slots_mut(&mut self, skill_id: &SkillId) -> &mut SkillSlots {
        let count = self.slots_per_skill;
        self.skills.entry(skill_id.clone()).or_insert_with(|| {
            let mut slots = SkillSlots::new();
            for _ in 0..count {
                slots.push(None);
            }
            slots
        })
    }
}

impl Default for ConsumableSlots {
    fn default() -> Self {
        Self::new(crate::config::GameConfig::DEFAULT_CONSUMABLE_SLOTS)
    }
}

fn unit_duration(catalog: &GameCatalog, item_id: &ItemId) -> FixedPoint {
    catalog
        .consumable(item_id)
        .map(|c| c.duration_seconds.max(FixedPoint::ZERO))
        .unwrap_or(FixedPoint::ZERO)
}

/// Availability oracle for the stat engine: consumable sources are limited
/// by their slot's availability, every other source is unbounded.
#[derive(Clone, Copy)]
pub struct ConsumableAvailability<'a> {
    pub slots: &'a ConsumableSlots,
    pub inventory: &'a Inventory,
    pub catalog: &'a GameCatalog,
}

impl EffectAvailability for ConsumableAvailability<'_> {
    fn availability(&self, source: &EffectSource) -> Availability {
        match source {
            EffectSource::Consumable { skill_id, slot } => Availability::Limited(
                self.slots
                    .availability(skill_id, *slot, self.inventory, self.catalog),
            ),
            _ => Availability::Unbounded,
        }
    }
}
