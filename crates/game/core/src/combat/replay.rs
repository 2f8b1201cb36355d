//! Battle log replay for live display.
//!
//! A pure function from `(log, elapsed)` to what the battle looks like at
//! that instant; the executor never needs to step the battle itself.

use crate::fixed::FixedPoint;

use super::simulator::{CombatEvent, CombatSide};
use super::stats::CombatantStats;

/// Display state of a battle at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BattleFrame {
    pub player_hp: FixedPoint,
    pub enemy_hp: FixedPoint,
    /// Fraction of the player's attack interval elapsed, in `[0, 1]`.
    pub player_attack_progress: FixedPoint,
    pub enemy_attack_progress: FixedPoint,
    /// Number of log events at or before the instant.
    pub events_applied: usize,
}

impl BattleFrame {
    /// Frame at the start of a battle.
    pub fn initial(player: &CombatantStats, enemy: &CombatantStats) -> Self {
        Self {
            player_hp: player.max_hp,
            enemy_hp: enemy.max_hp,
            player_attack_progress: FixedPoint::ZERO,
            enemy_attack_progress: FixedPoint::ZERO,
            events_applied: 0,
        }
    }

    /// Frame shown while waiting for the next enemy: player healed, enemy
    /// down, no attack progress.
    pub fn cooldown(player: &CombatantStats) -> Self {
        Self {
            player_hp: player.max_hp,
            enemy_hp: FixedPoint::ZERO,
            player_attack_progress: FixedPoint::ZERO,
            enemy_attack_progress: FixedPoint::ZERO,
            events_applied: 0,
        }
    }
}

/// Replays `log` up to `elapsed` seconds.
///
/// Events are ordered by time, so the applied prefix is found by binary
/// search. Events exactly at `elapsed` count as applied.
pub fn replay(
    log: &[CombatEvent],
    player: &CombatantStats,
    enemy: &CombatantStats,
    elapsed: FixedPoint,
) -> BattleFrame {
    let applied = log.partition_point(|event| event.time <= elapsed);
    let past = &log[..applied];

    let last_of = |side: CombatSide| past.iter().rev().find(|event| event.actor == side);

    let enemy_hp = last_of(CombatSide::Player)
        .map(|event| event.target_hp_after)
        .unwrap_or(enemy.max_hp);
    let player_hp = last_of(CombatSide::Enemy)
        .map(|event| event.target_hp_after)
        .unwrap_or(player.max_hp);

    let finished = applied == log.len() && !log.is_empty();
    let progress = |side: CombatSide, interval: FixedPoint| {
        if finished {
            return FixedPoint::ZERO;
        }
        let since = last_of(side).map(|event| event.time).unwrap_or_default();
        (elapsed - since).ratio_of(interval)
    };

    BattleFrame {
        player_hp,
        enemy_hp,
        player_attack_progress: progress(CombatSide::Player, player.attack_interval),
        enemy_attack_progress: progress(CombatSide::Enemy, enemy.attack_interval),
        events_applied: applied,
    }
}
