//! Item ledger.
//!
//! Counts never go negative and an item whose count reaches zero is removed
//! rather than kept at 0.

use std::collections::BTreeMap;

use crate::env::ItemStack;
use crate::error::InventoryError;
use crate::ids::ItemId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Inventory {
    items: BTreeMap<ItemId, u64>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count held, 0 when absent.
    pub fn count(&self, item_id: &ItemId) -> u64 {
        self.items.get(item_id).copied().unwrap_or(0)
    }

    pub fn has_item(&self, item_id: &ItemId, count: u64) -> bool {
        self.count(item_id) >= count
    }

    pub fn add_item(&mut self, item_id: &ItemId, count: u64) {
        if count == 0 {
            return;
        }
        let entry = self.items.entry(item_id.clone()).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    pub fn add_many_items(&mut self, stacks: &[ItemStack]) {
        for stack in stacks {
            self.add_item(&stack.item_id, stack.count);
        }
    }

    pub fn remove_item(&mut self, item_id: &ItemId, count: u64) -> Result<(), InventoryError> {
        self.remove_many_items(&[ItemStack::new(item_id.clone(), count)])
    }

    /// Removes every stack or none of them.
    ///
    /// Repeated ids are summed before checking, so `[wood:2, wood:2]` needs
    /// four wood.
    /// Whether every stack can be removed at once; repeated items add up.
    pub fn has_items(&self, stacks: &[ItemStack]) -> bool {
        wanted(stacks)
            .into_iter()
            .all(|(item_id, requested)| self.count(item_id) >= requested)
    }

    pub fn remove_many_items(&mut self, stacks: &[ItemStack]) -> Result<(), InventoryError> {
        let wanted = wanted(stacks);

        for (&item_id, &requested) in &wanted {
            let available = self.count(item_id);
            if available < requested {
                return Err(InventoryError::Insufficient {
                    item: item_id.clone(),
                    requested,
                    available,
                });
            }
        }

        for (item_id, requested) in wanted {
            if let Some(held) = self.items.get_mut(item_id) {
                *held -= requested;
                if *held == 0 {
                    self.items.remove(item_id);
                }
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, u64)> {
        self.items.iter().map(|(id, count)| (id, *count))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn wanted(stacks: &[ItemStack]) -> BTreeMap<&ItemId, u64> {
    let mut wanted: BTreeMap<&ItemId, u64> = BTreeMap::new();
    for stack in stacks.iter().filter(|s| s.count > 0) {
        let total = wanted.entry(&stack.item_id).or_insert(0);
        *total = total.saturating_add(stack.count);
    }
    wanted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ItemId {
        ItemId::new(s)
    }

    #[test]
    fn zero_counts_are_removed() {
        let mut inv = Inventory::new();
        inv.add_item(&id("wood"), 3);
        inv.remove_item(&id("wood"), 3).unwrap();
        assert!(inv.is_empty());
        assert_eq!(inv.count(&id("wood")), 0);
    }

    #[test]
    fn has_items_sums_repeated_stacks() {
        let mut inv = Inventory::new();
        inv.add_item(&id("coffee"), 3);
        let split = [ItemStack::new("coffee", 2), ItemStack::new("coffee", 1)];
        assert!(inv.has_items(&split));
        let over = [ItemStack::new("coffee", 2), ItemStack::new("coffee", 2)];
        assert!(!inv.has_items(&over));
        assert!(inv.remove_many_items(&over).is_err());
        assert_eq!(inv.count(&id("coffee")), 3);
    }

    #[test]
    fn adding_zero_creates_nothing() {
        let mut inv = Inventory::new();
        inv.add_item(&id("wood"), 0);
        assert!(inv.is_empty());
    }

    #[test]
    fn remove_many_is_atomic() {
        let mut inv = Inventory::new();
        inv.add_many_items(&[ItemStack::new("wood", 5), ItemStack::new("ore", 1)]);

        let err = inv
            .remove_many_items(&[ItemStack::new("wood", 2), ItemStack::new("ore", 2)])
            .unwrap_err();
        assert_eq!(
            err,
            InventoryError::Insufficient {
                item: id("ore"),
                requested: 2,
                available: 1
            }
        );
        assert_eq!(inv.count(&id("wood")), 5);
        assert_eq!(inv.count(&id("ore")), 1);
    }

    #[test]
    fn duplicate_stacks_are_summed() {
        let mut inv = Inventory::new();
        inv.add_item(&id("wood"), 3);
        assert!(
            inv.remove_many_items(&[ItemStack::new("wood", 2), ItemStack::new("wood", 2)])
                .is_err()
        );
        inv.remove_many_items(&[ItemStack::new("wood", 1), ItemStack::new("wood", 2)])
            .unwrap();
        assert!(inv.is_empty());
    }
}
