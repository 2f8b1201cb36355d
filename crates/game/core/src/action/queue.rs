//! Ordered queue of pending actions.
//!
//! Index 0 is the running item. `action_start_date` is `Some` exactly when
//! the queue is non-empty. It is reset to `now` whenever a different item
//! becomes the front one, and advanced (never reset) when the front item
//! completes repetitions, so consecutive batches schedule without drift.

use crate::amount::Amount;
use crate::error::QueueIndexError;
use crate::fixed::FixedPoint;
use crate::ids::{ActionId, EnemyId};

/// Wall-clock milliseconds.
pub type Timestamp = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum QueueItemKind {
    Production,
    Combat,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "id", rename_all = "lowercase"))]
pub enum QueuedAction {
    Production(ActionId),
    Combat(EnemyId),
}

impl QueuedAction {
    pub fn kind(&self) -> QueueItemKind {
        match self {
            QueuedAction::Production(_) => QueueItemKind::Production,
            QueuedAction::Combat(_) => QueueItemKind::Combat,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            QueuedAction::Production(id) => id.as_str(),
            QueuedAction::Combat(id) => id.as_str(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ActionQueueItem {
    /// Unique per queue; identifies the item across reorders.
    pub uid: u64,
    pub action: QueuedAction,
    pub amount: Amount,
    /// Length of one battle, set once the battle has been simulated.
    pub combat_duration_seconds: Option<FixedPoint>,
}

impl ActionQueueItem {
    pub fn kind(&self) -> QueueItemKind {
        self.action.kind()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionQueue {
    items: Vec<ActionQueueItem>,
    action_start_date: Option<Timestamp>,
    next_uid: u64,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ActionQueueItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&ActionQueueItem> {
        self.items.get(index)
    }

    pub fn current(&self) -> Option<&ActionQueueItem> {
        self.items.first()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn action_start_date(&self) -> Option<Timestamp> {
        self.action_start_date
    }

    /// Milliseconds the front item has been running at `now`.
    pub fn elapsed(&self, now: Timestamp) -> u64 {
        self.action_start_date
            .map(|start| now.saturating_sub(start))
            .unwrap_or(0)
    }

    // ------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------

    /// Appends a production action. Returns the new item's uid, or `None`
    /// for a zero amount.
    pub fn add_action(&mut self, action_id: ActionId, amount: Amount, now: Timestamp) -> Option<u64> {
        self.push(QueuedAction::Production(action_id), amount, now, false)
    }

    pub fn add_combat_action(
        &mut self,
        enemy_id: EnemyId,
        amount: Amount,
        now: Timestamp,
    ) -> Option<u64> {
        self.push(QueuedAction::Combat(enemy_id), amount, now, false)
    }

    /// Inserts a production action at the front and restarts the clock.
    pub fn start_immediately(
        &mut self,
        action_id: ActionId,
        amount: Amount,
        now: Timestamp,
    ) -> Option<u64> {
        self.push(QueuedAction::Production(action_id), amount, now, true)
    }

    pub fn start_combat_immediately(
        &mut self,
        enemy_id: EnemyId,
        amount: Amount,
        now: Timestamp,
    ) -> Option<u64> {
        self.push(QueuedAction::Combat(enemy_id), amount, now, true)
    }

    fn push(
        &mut self,
        action: QueuedAction,
        amount: Amount,
        now: Timestamp,
        front: bool,
    ) -> Option<u64> {
        if amount.is_depleted() {
            return None;
        }
        let uid = self.next_uid;
        self.next_uid += 1;
        let item = ActionQueueItem {
            uid,
            action,
            amount,
            combat_duration_seconds: None,
        };
        self.update(now, |items| {
            if front {
                items.insert(0, item);
            } else {
                items.push(item);
            }
        });
        Some(uid)
    }

    // ------------------------------------------------------------------
    // Removal and reordering
    // ------------------------------------------------------------------

    pub fn remove_action(
        &mut self,
        index: usize,
        now: Timestamp,
    ) -> Result<ActionQueueItem, QueueIndexError> {
        self.check_index(index)?;
        let mut removed = None;
        self.update(now, |items| removed = Some(items.remove(index)));
        removed.ok_or(QueueIndexError {
            index,
            len: self.items.len(),
        })
    }

    /// Removes the item with `uid`, wherever it is.
    pub fn remove_by_uid(&mut self, uid: u64, now: Timestamp) -> Option<ActionQueueItem> {
        let index = self.items.iter().position(|item| item.uid == uid)?;
        self.remove_action(index, now).ok()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.action_start_date = None;
    }

    /// Moves the item at `from` so it ends up at `to`.
    pub fn move_action(
        &mut self,
        from: usize,
        to: usize,
        now: Timestamp,
    ) -> Result<(), QueueIndexError> {
        self.check_index(from)?;
        self.check_index(to)?;
        self.update(now, |items| {
            let item = items.remove(from);
            items.insert(to, item);
        });
        Ok(())
    }

    pub fn move_up(&mut self, index: usize, now: Timestamp) -> Result<(), QueueIndexError> {
        self.check_index(index)?;
        self.move_action(index, index.saturating_sub(1), now)
    }

    pub fn move_down(&mut self, index: usize, now: Timestamp) -> Result<(), QueueIndexError> {
        self.check_index(index)?;
        let to = (index + 1).min(self.items.len() - 1);
        self.move_action(index, to, now)
    }

    pub fn move_top(&mut self, index: usize, now: Timestamp) -> Result<(), QueueIndexError> {
        self.move_action(index, 0, now)
    }

    pub fn move_bottom(&mut self, index: usize, now: Timestamp) -> Result<(), QueueIndexError> {
        self.check_index(index)?;
        let last = self.items.len() - 1;
        self.move_action(index, last, now)
    }

    // ------------------------------------------------------------------
    // Progress
    // ------------------------------------------------------------------

    /// Records `count` finished repetitions of the front item that took
    /// `elapsed_ms`.
    ///
    /// The start date moves forward by `elapsed_ms`; a depleted front item is
    /// removed and the next one inherits the advanced start date.
    pub fn complete_current_action(&mut self, elapsed_ms: u64, count: u64) {
        let Some(front) = self.items.first_mut() else {
            return;
        };
        front.amount = front.amount.saturating_sub(count);
        if front.amount.is_depleted() {
            self.items.remove(0);
        }
        self.action_start_date = if self.items.is_empty() {
            None
        } else {
            self.action_start_date
                .map(|start| start.saturating_add(elapsed_ms))
        };
    }

    pub fn set_combat_duration(&mut self, uid: u64, seconds: FixedPoint) {
        if let Some(item) = self.items.iter_mut().find(|item| item.uid == uid) {
            item.combat_duration_seconds = Some(seconds);
        }
    }

    fn check_index(&self, index: usize) -> Result<(), QueueIndexError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(QueueIndexError {
                index,
                len: self.items.len(),
            })
        }
    }

    /// Applies a mutation and re-establishes the start-date invariant.
    fn update(&mut self, now: Timestamp, mutate: impl FnOnce(&mut Vec<ActionQueueItem>)) {
        let before = self.current().map(|item| item.uid);
        mutate(&mut self.items);
        let after = self.current().map(|item| item.uid);

        self.action_start_date = match after {
            None => None,
            Some(_) if after != before => Some(now),
            Some(_) => self.action_start_date.or(Some(now)),
        };
    }
}
