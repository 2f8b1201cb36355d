use std::time::Duration;

use idle_core::{
    ActionId, Amount, BatchBattleResult, ConsumableSlot, EnemyId, GameSnapshot, ItemId,
    ItemStack, QueuedAction, RunReport, SkillId,
};
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::events::{Event, EventBus, Topic};
use crate::workers::{Command, QueueCommand};

use super::{Result, RuntimeError};

/// Client-facing handle to interact with the runtime.
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get access to the event bus for advanced subscription patterns
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    // ========================================================================
    // Queue
    // ========================================================================

    /// Appends a production action. Returns the new item's uid, or `None`
    /// if the queue was full.
    pub async fn add_action(&self, action_id: ActionId, amount: Amount) -> Result<Option<u64>> {
        self.queue(QueueCommand::Add {
            action: QueuedAction::Production(action_id),
            amount,
        })
        .await
    }

    pub async fn add_combat_action(
        &self,
        enemy_id: EnemyId,
        amount: Amount,
    ) -> Result<Option<u64>> {
        self.queue(QueueCommand::Add {
            action: QueuedAction::Combat(enemy_id),
            amount,
        })
        .await
    }

    /// Puts a production action at the front, restarting the clock.
    pub async fn start_immediately(
        &self,
        action_id: ActionId,
        amount: Amount,
    ) -> Result<Option<u64>> {
        self.queue(QueueCommand::StartImmediately {
            action: QueuedAction::Production(action_id),
            amount,
        })
        .await
    }

    pub async fn start_combat_immediately(
        &self,
        enemy_id: EnemyId,
        amount: Amount,
    ) -> Result<Option<u64>> {
        self.queue(QueueCommand::StartImmediately {
            action: QueuedAction::Combat(enemy_id),
            amount,
        })
        .await
    }

    /// Removes the item at `index`; returns its uid.
    pub async fn remove_action(&self, index: usize) -> Result<u64> {
        let uid = self.queue(QueueCommand::Remove { index }).await?;
        Ok(uid.unwrap_or_default())
    }

    pub async fn move_action(&self, from: usize, to: usize) -> Result<()> {
        self.queue(QueueCommand::Move { from, to }).await?;
        Ok(())
    }

    pub async fn clear_queue(&self) -> Result<()> {
        self.queue(QueueCommand::Clear).await?;
        Ok(())
    }

    async fn queue(&self, command: QueueCommand) -> Result<Option<u64>> {
        self.request(|reply| Command::Queue { command, reply })
            .await?
    }

    // ========================================================================
    // Loadout, chests and inventory
    // ========================================================================

    pub async fn equip(&self, item_id: ItemId) -> Result<Option<ItemId>> {
        self.request(|reply| Command::Equip { item_id, reply })
            .await?
    }

    pub async fn unequip(&self, slot: impl Into<String>) -> Result<ItemId> {
        let slot = slot.into();
        self.request(|reply| Command::Unequip { slot, reply })
            .await?
    }

    pub async fn assign_consumable(
        &self,
        skill_id: SkillId,
        slot: usize,
        item_id: ItemId,
    ) -> Result<Option<ConsumableSlot>> {
        self.request(|reply| Command::AssignConsumable {
            skill_id,
            slot,
            item_id,
            reply,
        })
        .await?
    }

    pub async fn clear_consumable(
        &self,
        skill_id: SkillId,
        slot: usize,
    ) -> Result<Option<ConsumableSlot>> {
        self.request(|reply| Command::ClearConsumable {
            skill_id,
            slot,
            reply,
        })
        .await?
    }

    pub async fn open_chests(&self, chest_id: ItemId, count: u64) -> Result<Vec<ItemStack>> {
        self.request(|reply| Command::OpenChests {
            chest_id,
            count,
            reply,
        })
        .await?
    }

    pub async fn grant_items(&self, items: Vec<ItemStack>) -> Result<()> {
        self.request(|reply| Command::GrantItems { items, reply })
            .await
    }

    // ========================================================================
    // Queries and time
    // ========================================================================

    pub async fn preview_battle(
        &self,
        enemy_id: EnemyId,
        amount: Amount,
    ) -> Result<BatchBattleResult> {
        self.request(|reply| Command::PreviewBattle {
            enemy_id,
            amount,
            reply,
        })
        .await?
    }

    /// Moves the game clock forward by `duration` and runs the queue at once.
    pub async fn fast_forward(&self, duration: Duration) -> Result<RunReport> {
        let duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.request(|reply| Command::FastForward { duration_ms, reply })
            .await?
    }

    pub async fn snapshot(&self) -> Result<GameSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }
}
