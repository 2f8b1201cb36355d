//! Combat simulation.
//!
//! Pure, deterministic battle prediction plus the state of the battle
//! currently shown to the player.
//!
//! # Architecture
//!
//! - **Simulator**: stat blocks in, event log and outcome out, no randomness
//! - **Replay**: event log and elapsed time in, display frame out
//! - **Battle**: the live battle of the front queue item (fighting or cooldown)
//!
//! Loot is rolled after the fact by the combat executor, never here.

pub mod battle;
pub mod replay;
pub mod simulator;
pub mod stats;

pub use battle::{BattlePhase, CurrentBattle};
pub use replay::{BattleFrame, replay};
pub use simulator::{
    BatchBattleResult, BattleResult, BattleSummary, CombatEvent, CombatSide, MAX_BATTLE_EVENTS,
    simulate_battle, simulate_battles,
};
pub use stats::{
    CombatantStats, STAT_ATTACK_DAMAGE, STAT_ATTACK_INTERVAL, STAT_DAMAGE_TAKEN, STAT_MAX_HP,
    default_player_bases,
};
