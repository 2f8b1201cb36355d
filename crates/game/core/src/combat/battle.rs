use crate::amount::Amount;
use crate::fixed::FixedPoint;
use crate::ids::EnemyId;

use super::replay::{BattleFrame, replay};
use super::simulator::BatchBattleResult;
use super::stats::CombatantStats;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum BattlePhase {
    Fighting,
    /// Waiting for the next enemy to spawn.
    Cooldown,
}

/// The battle behind the combat item at the front of the queue.
///
/// Holds one representative simulation; the live frame is derived from it
/// by replay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentBattle {
    /// Queue item this battle belongs to.
    pub queue_uid: u64,
    pub enemy_id: EnemyId,
    pub total: Amount,
    pub completed: u64,
    pub phase: BattlePhase,
    pub player: CombatantStats,
    pub enemy: CombatantStats,
    pub result: BatchBattleResult,
    pub frame: BattleFrame,
}

impl CurrentBattle {
    pub fn new(
        queue_uid: u64,
        enemy_id: EnemyId,
        total: Amount,
        player: CombatantStats,
        enemy: CombatantStats,
        result: BatchBattleResult,
    ) -> Self {
        Self {
            queue_uid,
            enemy_id,
            total,
            completed: 0,
            phase: BattlePhase::Fighting,
            frame: BattleFrame::initial(&player, &enemy),
            player,
            enemy,
            result,
        }
    }

    pub fn duration(&self) -> FixedPoint {
        self.result.battle_duration()
    }

    /// Refreshes the live frame for `elapsed` seconds into the current phase.
    pub fn update_frame(&mut self, elapsed: FixedPoint) {
        self.frame = match self.phase {
            BattlePhase::Fighting => replay(
                &self.result.representative_battle_log,
                &self.player,
                &self.enemy,
                elapsed,
            ),
            BattlePhase::Cooldown => BattleFrame::cooldown(&self.player),
        };
    }

    pub fn enter_cooldown(&mut self) {
        self.phase = BattlePhase::Cooldown;
        self.frame = BattleFrame::cooldown(&self.player);
    }

    /// Starts the next fight with a fresh simulation.
    pub fn resume(&mut self, player: CombatantStats, result: BatchBattleResult) {
        self.phase = BattlePhase::Fighting;
        self.player = player;
        self.result = result;
        self.frame = BattleFrame::initial(&self.player, &self.enemy);
    }
}
