//! Worn equipment, one item per named slot.
//!
//! This ledger only tracks which item sits in which slot. Moving items in
//! and out of the inventory and registering `equipment:<slot>` effects is
//! the job of [`crate::Game::equip`].

use std::collections::BTreeMap;

use crate::ids::ItemId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Equipment {
    slots: BTreeMap<String, ItemId>,
}

impl Equipment {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Puts `item_id` in `slot`, returning the previously worn item.
    pub fn equip(&mut self, slot: &str, item_id: ItemId) -> Option<ItemId> {
        self.slots.insert(slot.to_owned(), item_id)
    }

    pub fn unequip(&mut self, slot: &str) -> Option<ItemId> {
        self.slots.remove(slot)
    }

    pub fn get(&self, slot: &str) -> Option<&ItemId> {
        self.slots.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ItemId)> {
        self.slots.iter().map(|(slot, item)| (slot.as_str(), item))
    }
}
