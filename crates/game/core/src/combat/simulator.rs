//! Event-driven battle simulation.
//!
//! Each combatant attacks on a fixed interval. The simulation jumps from one
//! attack to the next soonest one instead of stepping frames, so a battle's
//! outcome and timing depend only on the two stat blocks.
//!
//! # Tie-break
//!
//! When both sides are due at the same instant the player attacks first. If
//! that attack kills the enemy the enemy's attack never happens.

use crate::env::SkillConfig;
use crate::fixed::FixedPoint;
use crate::ids::SkillId;

use super::stats::CombatantStats;

/// Event cap per battle, on top of the configured time limit.
pub const MAX_BATTLE_EVENTS: usize = 100_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum CombatSide {
    Player,
    Enemy,
}

impl CombatSide {
    pub fn opponent(self) -> Self {
        match self {
            CombatSide::Player => CombatSide::Enemy,
            CombatSide::Enemy => CombatSide::Player,
        }
    }
}

/// One attack in a battle log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CombatEvent {
    pub actor: CombatSide,
    /// Seconds since the battle started.
    pub time: FixedPoint,
    pub damage: FixedPoint,
    pub target_hp_after: FixedPoint,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleResult {
    pub player_won: bool,
    /// Time of the last event; zero for a battle where nothing happened.
    pub duration: FixedPoint,
    pub events: Vec<CombatEvent>,
}

/// Rewards and timing of one battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BattleSummary {
    pub duration: FixedPoint,
    /// XP per combat skill, in skill id order.
    pub xp: Vec<(SkillId, FixedPoint)>,
}

/// Prediction for `repeat_count` identical battles.
///
/// One battle is simulated and stands in for every repetition: stats do not
/// change within a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BatchBattleResult {
    pub can_win: bool,
    pub repeat_count: u64,
    pub per_battle_summary: Vec<BattleSummary>,
    pub representative_battle_log: Vec<CombatEvent>,
}

impl BatchBattleResult {
    pub fn battle_duration(&self) -> FixedPoint {
        self.per_battle_summary
            .first()
            .map(|summary| summary.duration)
            .unwrap_or_default()
    }

    pub fn xp_per_battle(&self) -> &[(SkillId, FixedPoint)] {
        self.per_battle_summary
            .first()
            .map(|summary| summary.xp.as_slice())
            .unwrap_or(&[])
    }
}

/// Simulates one battle.
///
/// The player loses if it cannot hurt the enemy, if it dies first, or if the
/// battle is still running after `max_seconds`.
pub fn simulate_battle(
    player: &CombatantStats,
    enemy: &CombatantStats,
    max_seconds: FixedPoint,
) -> BattleResult {
    let mut player_hp = player.max_hp;
    let mut enemy_hp = enemy.max_hp;
    let mut events = Vec::new();

    if !enemy_hp.is_positive() {
        return BattleResult {
            player_won: true,
            duration: FixedPoint::ZERO,
            events,
        };
    }

    let player_hit = player.hit_damage(enemy);
    let enemy_hit = enemy.hit_damage(player);
    let mut player_next = player.can_hurt(enemy).then_some(player.attack_interval);
    let mut enemy_next = enemy.can_hurt(player).then_some(enemy.attack_interval);

    let player_won = loop {
        let actor = match (player_next, enemy_next) {
            (None, None) => break false,
            (Some(_), None) => CombatSide::Player,
            (None, Some(_)) => CombatSide::Enemy,
            (Some(p), Some(e)) if p <= e => CombatSide::Player,
            (Some(_), Some(_)) => CombatSide::Enemy,
        };
        let (time, damage, target_hp, next, interval) = match actor {
            CombatSide::Player => (
                player_next.unwrap_or_default(),
                player_hit,
                &mut enemy_hp,
                &mut player_next,
                player.attack_interval,
            ),
            CombatSide::Enemy => (
                enemy_next.unwrap_or_default(),
                enemy_hit,
                &mut player_hp,
                &mut enemy_next,
                enemy.attack_interval,
            ),
        };

        if time > max_seconds || events.len() >= MAX_BATTLE_EVENTS {
            tracing::debug!(time = %time, events = events.len(), "battle hit its limit");
            break false;
        }

        *target_hp = (*target_hp - damage).max(FixedPoint::ZERO);
        *next = Some(time.saturating_add(interval));
        events.push(CombatEvent {
            actor,
            time,
            damage,
            target_hp_after: *target_hp,
        });

        if target_hp.is_zero() {
            break actor == CombatSide::Player;
        }
    };

    let duration = events.last().map(|e| e.time).unwrap_or_default();
    BattleResult {
        player_won,
        duration,
        events,
    }
}

/// Predicts `repeat_count` battles against `enemy`.
///
/// XP per battle is `enemy_xp × combat_xp_ratio` for every combat skill.
pub fn simulate_battles<'a>(
    player: &CombatantStats,
    enemy: &CombatantStats,
    enemy_xp: FixedPoint,
    combat_skills: impl IntoIterator<Item = &'a SkillConfig>,
    repeat_count: u64,
    max_seconds: FixedPoint,
) -> BatchBattleResult {
    let battle = simulate_battle(player, enemy, max_seconds);
    let xp = combat_skills
        .into_iter()
        .filter_map(|skill| {
            let ratio = skill.combat_xp_ratio?;
            ratio
                .is_positive()
                .then(|| (skill.id.clone(), enemy_xp.mul(ratio)))
        })
        .collect();

    BatchBattleResult {
        can_win: battle.player_won,
        repeat_count,
        per_battle_summary: vec![BattleSummary {
            duration: battle.duration,
            xp,
        }],
        representative_battle_log: battle.events,
    }
}
