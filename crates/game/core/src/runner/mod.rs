//! Action Runner.
//!
//! Turns elapsed wall-clock time into completed repetitions. Each executor
//! receives the time the front item has been running, completes as many
//! whole repetitions as every limit allows in one batch, advances the queue
//! by the time those took and hands back the rest. A long gap (a suspended
//! tab, a closed laptop) therefore resolves in a few batches rather than one
//! step per missed frame.
//!
//! # Flow
//!
//! ```text
//! run_actions(now)
//!   loop while progress and steps < max_runner_steps:
//!     elapsed = now - action_start_date
//!     front item ─► ProductionExecutor | CombatExecutor ─► remaining ms
//!     combat auto-start reaction
//! ```

mod combat;
mod production;
mod progress;
mod time;

pub use combat::CombatExecutor;
pub use production::ProductionExecutor;
pub use progress::ProgressCalculator;
pub use time::{FrameOutcome, TimeManager};

use crate::action::{QueueItemKind, Timestamp};
use crate::combat::BattlePhase;
use crate::error::ConfigError;
use crate::game::Game;

/// One kind of queue item's time-stepped execution.
pub trait ActionExecutor {
    /// Completes what `elapsed_ms` of running the front item allows and
    /// returns the unused milliseconds.
    fn update(&self, game: &mut Game, elapsed_ms: u64) -> Result<u64, ConfigError>;
}

/// The independent caps on one batch; `None` means unconstrained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchLimits {
    pub time: u64,
    pub materials: Option<u64>,
    pub xp: Option<u64>,
    pub consumables: Option<u64>,
    pub amount: Option<u64>,
}

impl BatchLimits {
    pub fn batch_size(&self) -> u64 {
        [self.materials, self.xp, self.consumables, self.amount]
            .into_iter()
            .flatten()
            .fold(self.time, u64::min)
    }
}

/// Outcome of one [`Game::run_actions`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Executor calls made.
    pub steps: u32,
    /// True if the pass stopped at `max_runner_steps` while still making
    /// progress.
    pub step_limit_hit: bool,
}

#[derive(PartialEq, Eq)]
struct Progress {
    len: usize,
    start: Option<Timestamp>,
    front: Option<(u64, crate::amount::Amount)>,
    phase: Option<BattlePhase>,
}

impl Game {
    /// Runs the queue up to `now`.
    ///
    /// A configuration error removes the offending front item (so the queue
    /// cannot wedge on it) and is returned.
    pub fn run_actions(&mut self, now: Timestamp) -> Result<RunReport, ConfigError> {
        let mut report = RunReport::default();
        self.sync_battle(now);

        while let Some(kind) = self.front_kind() {
            if report.steps >= self.config.max_runner_steps {
                tracing::warn!(steps = report.steps, "runner step limit reached");
                report.step_limit_hit = true;
                break;
            }
            let before = self.progress();
            let elapsed = self.queue.elapsed(now);

            let result = match kind {
                QueueItemKind::Production => ProductionExecutor.update(self, elapsed),
                QueueItemKind::Combat => CombatExecutor.update(self, elapsed),
            };
            report.steps += 1;

            if let Err(err) = result {
                tracing::error!(error = %err, "executor failed, dropping front item");
                if !self.queue.is_empty() {
                    let _ = self.queue.remove_action(0, now);
                }
                self.sync_battle(now);
                return Err(err);
            }

            self.sync_battle(now);
            if self.progress() == before {
                break;
            }
        }
        Ok(report)
    }

    /// Progress of the front item at `now`, in percent.
    pub fn current_progress(&self, now: Timestamp) -> Option<crate::fixed::FixedPoint> {
        let item = self.queue.current()?;
        let elapsed = self.queue.elapsed(now);
        match item.kind() {
            QueueItemKind::Production => {
                let crate::action::QueuedAction::Production(action_id) = &item.action else {
                    return None;
                };
                let action = self.get_action_by_id(action_id).ok()?;
                Some(ProgressCalculator::production(elapsed, &action))
            }
            QueueItemKind::Combat => Some(ProgressCalculator::combat(elapsed, item)),
        }
    }

    fn progress(&self) -> Progress {
        Progress {
            len: self.queue.len(),
            start: self.queue.action_start_date(),
            front: self.queue.current().map(|item| (item.uid, item.amount)),
            phase: self.battle.as_ref().map(|battle| battle.phase),
        }
    }
}
