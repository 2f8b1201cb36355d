//! Deterministic simulation layer of an idle game.
//!
//! `idle-core` defines the canonical rules (stat engine, combat simulator,
//! action queue, batch executors) and exposes pure, synchronous APIs that the
//! runtime and offline tools share. All state mutation flows through
//! [`Game`]; callers pass the current time explicitly, so the same inputs
//! always produce the same state.
pub mod action;
pub mod amount;
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod fixed;
pub mod game;
pub mod ids;
pub mod runner;
pub mod state;
pub mod stats;

pub use action::{
    Action, ActionQueue, ActionQueueItem, ActionResolver, QueueItemKind, QueuedAction, Timestamp,
};
pub use amount::{Amount, INFINITE_AMOUNT};
pub use combat::{
    BatchBattleResult, BattleFrame, BattlePhase, BattleResult, BattleSummary, CombatEvent,
    CombatSide, CombatantStats, CurrentBattle, replay, simulate_battle, simulate_battles,
};
pub use config::GameConfig;
pub use env::{
    ActionConfig, ChestConfig, ConsumableConfig, EnemyConfig, EquipmentConfig, GameCatalog,
    GameCatalogBuilder, ItemConfig, ItemStack, LootEntry, SkillConfig, StatConfig,
};
pub use error::{
    CommandError, ConfigError, ConvergenceError, ErrorSeverity, GameError, InventoryError,
    QueueIndexError,
};
pub use fixed::FixedPoint;
pub use game::{BattleSnapshot, Game, GameSnapshot};
pub use ids::{ActionId, EnemyId, ItemId, SkillId, StatId};
pub use runner::{
    ActionExecutor, BatchLimits, CombatExecutor, FrameOutcome, ProductionExecutor,
    ProgressCalculator, RunReport, TimeManager,
};
pub use state::{
    ChestPoints, ConsumableSlot, ConsumableSlots, Equipment, Inventory, Notification,
    NotificationKey, NotificationLevel, Notifications, SkillBook, SkillSnapshot, XpTable,
};
pub use stats::{
    DerivedModifier, DerivedValueConfig, Effect, EffectKind, EffectSource, ModifierStack,
    SelfSolve, SolveStatus, StatEngine,
};
