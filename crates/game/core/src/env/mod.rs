//! Read-only game content.
//!
//! Definitions of actions, items, skills, stats and enemies, plus the
//! deterministic RNG used for loot. The [`GameCatalog`] bundles the
//! definitions so the rest of the core can look them up by id without
//! knowing where they were loaded from.
mod actions;
mod catalog;
mod enemies;
mod items;
mod rng;
mod skills;

pub use actions::{ActionConfig, ItemStack};
pub use catalog::{GameCatalog, GameCatalogBuilder};
pub use enemies::EnemyConfig;
pub use items::{ChestConfig, ConsumableConfig, EquipmentConfig, ItemConfig, LootEntry};
pub use rng::{LootRoller, PcgRng, RngOracle, compute_seed, roll_table};
pub use skills::{SkillConfig, StatConfig};
