//! Simulation worker.
//!
//! Owns the authoritative [`Game`] and processes commands from clients.
//! Between commands a frame timer drives the action runner while the
//! queue is non-empty; every change is published on the event bus.

use std::time::Duration;

use idle_core::{
    Amount, BatchBattleResult, ConsumableSlot, EnemyId, FrameOutcome, Game, GameSnapshot, ItemId,
    ItemStack, QueuedAction, RunReport, SkillId, TimeManager,
};
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::api::{Result, RuntimeError};
use crate::clock::GameClock;
use crate::events::{BattleView, Event, EventBus, QueueEvent};

/// Queue mutations.
#[derive(Debug)]
pub enum QueueCommand {
    Add { action: QueuedAction, amount: Amount },
    StartImmediately { action: QueuedAction, amount: Amount },
    Remove { index: usize },
    Move { from: usize, to: usize },
    Clear,
}

/// Commands that can be sent to the simulation worker.
pub enum Command {
    /// Mutate the queue; replies with the uid of the added or removed item.
    Queue {
        command: QueueCommand,
        reply: oneshot::Sender<Result<Option<u64>>>,
    },

    Equip {
        item_id: ItemId,
        reply: oneshot::Sender<Result<Option<ItemId>>>,
    },

    Unequip {
        slot: String,
        reply: oneshot::Sender<Result<ItemId>>,
    },

    AssignConsumable {
        skill_id: SkillId,
        slot: usize,
        item_id: ItemId,
        reply: oneshot::Sender<Result<Option<ConsumableSlot>>>,
    },

    ClearConsumable {
        skill_id: SkillId,
        slot: usize,
        reply: oneshot::Sender<Result<Option<ConsumableSlot>>>,
    },

    OpenChests {
        chest_id: ItemId,
        count: u64,
        reply: oneshot::Sender<Result<Vec<ItemStack>>>,
    },

    GrantItems {
        items: Vec<ItemStack>,
        reply: oneshot::Sender<()>,
    },

    PreviewBattle {
        enemy_id: EnemyId,
        amount: Amount,
        reply: oneshot::Sender<Result<BatchBattleResult>>,
    },

    /// Skip the clock ahead and run the queue immediately.
    FastForward {
        duration_ms: u64,
        reply: oneshot::Sender<Result<RunReport>>,
    },

    Snapshot {
        reply: oneshot::Sender<GameSnapshot>,
    },
}

/// What subscribers were last told.
#[derive(Default)]
struct Published {
    queue: Option<QueueEvent>,
    battle: Option<BattleView>,
}

/// Background worker that owns the game and runs the queue.
pub struct SimulationWorker {
    game: Game,
    clock: GameClock,
    time: TimeManager,
    frame_interval: Duration,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    published: Published,
}

impl SimulationWorker {
    pub fn new(
        game: Game,
        clock: GameClock,
        frame_interval: Duration,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            game,
            clock,
            time: TimeManager::new(),
            frame_interval,
            command_rx,
            event_bus,
            published: Published::default(),
        }
    }

    /// Main worker loop.
    ///
    /// Ends when every command sender has been dropped.
    pub async fn run(mut self) {
        let mut frames = tokio::time::interval(self.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.sync_time();
        self.publish();

        loop {
            tokio::select! {
                command = self.command_rx.recv() => {
                    let Some(command) = command else {
                        break;
                    };
                    self.handle_command(command);
                    self.sync_time();
                    self.publish();
                }

                _ = frames.tick(), if self.time.is_running() => {
                    self.frame();
                }
            }
        }

        debug!("simulation worker stopped");
    }

    fn handle_command(&mut self, command: Command) {
        let now = self.clock.now();
        match command {
            Command::Queue { command, reply } => {
                let _ = reply.send(self.handle_queue(command));
            }
            Command::Equip { item_id, reply } => {
                let _ = reply.send(self.game.equip(&item_id).map_err(RuntimeError::from));
            }
            Command::Unequip { slot, reply } => {
                let _ = reply.send(self.game.unequip(&slot).map_err(RuntimeError::from));
            }
            Command::AssignConsumable {
                skill_id,
                slot,
                item_id,
                reply,
            } => {
                let result = self.game.assign_consumable(&skill_id, slot, &item_id);
                let _ = reply.send(result.map_err(RuntimeError::from));
            }
            Command::ClearConsumable {
                skill_id,
                slot,
                reply,
            } => {
                let result = self.game.clear_consumable(&skill_id, slot);
                let _ = reply.send(result.map_err(RuntimeError::from));
            }
            Command::OpenChests {
                chest_id,
                count,
                reply,
            } => {
                let result = self.game.open_chests(&chest_id, count);
                let _ = reply.send(result.map_err(RuntimeError::from));
            }
            Command::GrantItems { items, reply } => {
                self.game.inventory_mut().add_many_items(&items);
                let _ = reply.send(());
            }
            Command::PreviewBattle {
                enemy_id,
                amount,
                reply,
            } => {
                let result = self.game.preview_battle(&enemy_id, amount);
                let _ = reply.send(result.map_err(RuntimeError::from));
            }
            Command::FastForward { duration_ms, reply } => {
                self.clock.skip(duration_ms);
                let now = self.clock.now();
                debug!(duration_ms, now, "fast-forward");
                let result = self.game.run_actions(now);
                let _ = reply.send(result.map_err(RuntimeError::from));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.game.snapshot());
            }
        }
        debug!(now, queue_len = self.game.queue().len(), "command handled");
    }

    fn handle_queue(&mut self, command: QueueCommand) -> Result<Option<u64>> {
        let now = self.clock.now();
        let game = &mut self.game;
        let uid = match command {
            QueueCommand::Add {
                action: QueuedAction::Production(action_id),
                amount,
            } => game.add_action(action_id, amount, now)?,
            QueueCommand::Add {
                action: QueuedAction::Combat(enemy_id),
                amount,
            } => game.add_combat_action(enemy_id, amount, now)?,
            QueueCommand::StartImmediately {
                action: QueuedAction::Production(action_id),
                amount,
            } => game.start_immediately(action_id, amount, now)?,
            QueueCommand::StartImmediately {
                action: QueuedAction::Combat(enemy_id),
                amount,
            } => game.start_combat_immediately(enemy_id, amount, now)?,
            QueueCommand::Remove { index } => Some(game.remove_action(index, now)?.uid),
            QueueCommand::Move { from, to } => {
                game.move_action(from, to, now)?;
                None
            }
            QueueCommand::Clear => {
                game.clear_queue();
                None
            }
        };
        Ok(uid)
    }

    /// Runs the frame loop exactly while the queue has work.
    fn sync_time(&mut self) {
        if self.game.queue().is_empty() {
            self.time.stop();
        } else {
            self.time.start(self.clock.now());
        }
    }

    fn frame(&mut self) {
        let now = self.clock.now();
        let mut result = Ok(RunReport::default());
        let outcome = self.time.frame(
            now,
            &mut self.game,
            |game, now| result = game.run_actions(now),
            |game| game.queue().is_empty(),
        );

        match result {
            Ok(report) if report.step_limit_hit => {
                warn!(steps = report.steps, "frame hit the runner step limit");
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "dropped a queue item with broken content"),
        }
        if let FrameOutcome::Stopped { delta_ms } = outcome {
            debug!(delta_ms, "queue drained, frames paused");
        }

        self.publish();
    }

    fn publish(&mut self) {
        for notification in self.game.drain_notifications() {
            self.event_bus.publish(Event::Notification(notification));
        }

        let queue = QueueEvent::from_queue(self.game.queue());
        if self.published.queue.as_ref() != Some(&queue) {
            self.event_bus.publish(Event::Queue(queue.clone()));
            self.published.queue = Some(queue);
        }

        self.publish_battle();
    }

    fn publish_battle(&mut self) {
        let current = self.game.battle().map(BattleView::from);
        match (&self.published.battle, &current) {
            (Some(previous), Some(current)) if previous.queue_uid == current.queue_uid => {
                if previous != current {
                    self.event_bus.publish(Event::Combat(current.frame()));
                }
            }
            (previous, current) => {
                if let Some(previous) = previous {
                    self.event_bus.publish(Event::Combat(previous.ended()));
                }
                if let Some(current) = current {
                    self.event_bus.publish(Event::Combat(current.started()));
                }
            }
        }
        self.published.battle = current;
    }
}
