//! Event types for different topics.

use idle_core::{
    ActionQueue, ActionQueueItem, Amount, BattleFrame, BattlePhase, CurrentBattle, EnemyId,
    FixedPoint, Timestamp,
};
use serde::{Deserialize, Serialize};

/// Queue contents after a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEvent {
    pub items: Vec<ActionQueueItem>,
    pub action_start_date: Option<Timestamp>,
}

impl QueueEvent {
    pub fn from_queue(queue: &ActionQueue) -> Self {
        Self {
            items: queue.items().to_vec(),
            action_start_date: queue.action_start_date(),
        }
    }
}

/// Lifecycle and live display of the current battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// A combat item reached the front of the queue and can be won.
    Started {
        enemy_id: EnemyId,
        total: Amount,
        duration_seconds: FixedPoint,
    },
    /// HP bars, attack progress or phase changed.
    Frame {
        enemy_id: EnemyId,
        phase: BattlePhase,
        completed: u64,
        frame: BattleFrame,
    },
    /// The battle was completed, stopped or cancelled.
    Ended { enemy_id: EnemyId },
}

/// Comparable summary of a battle; the worker publishes when it changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BattleView {
    pub queue_uid: u64,
    pub enemy_id: EnemyId,
    pub total: Amount,
    pub duration_seconds: FixedPoint,
    pub phase: BattlePhase,
    pub completed: u64,
    pub frame: BattleFrame,
}

impl From<&CurrentBattle> for BattleView {
    fn from(battle: &CurrentBattle) -> Self {
        Self {
            queue_uid: battle.queue_uid,
            enemy_id: battle.enemy_id.clone(),
            total: battle.total,
            duration_seconds: battle.duration(),
            phase: battle.phase,
            completed: battle.completed,
            frame: battle.frame,
        }
    }
}

impl BattleView {
    pub fn started(&self) -> BattleEvent {
        BattleEvent::Started {
            enemy_id: self.enemy_id.clone(),
            total: self.total,
            duration_seconds: self.duration_seconds,
        }
    }

    pub fn frame(&self) -> BattleEvent {
        BattleEvent::Frame {
            enemy_id: self.enemy_id.clone(),
            phase: self.phase,
            completed: self.completed,
            frame: self.frame,
        }
    }

    pub fn ended(&self) -> BattleEvent {
        BattleEvent::Ended {
            enemy_id: self.enemy_id.clone(),
        }
    }
}
