//! Mutable player state.
//!
//! Plain ledgers with no knowledge of each other. Cross-ledger rules (equip
//! moves an item out of the inventory and registers effects, a level-up
//! refreshes skill effects) live in [`crate::Game`].
pub mod chests;
pub mod consumables;
pub mod equipment;
pub mod inventory;
pub mod notifications;
pub mod skills;

pub use chests::ChestPoints;
pub use consumables::{
    ConsumableAvailability, ConsumableDrain, ConsumableSlot, ConsumableSlots, MAX_CONSUMABLE_SLOTS,
};
pub use equipment::Equipment;
pub use inventory::Inventory;
pub use notifications::{Notification, NotificationKey, NotificationLevel, Notifications, params};
pub use skills::{SkillBook, SkillProgress, SkillSnapshot, XpTable};
