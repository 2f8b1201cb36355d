//! Application context.
//!
//! [`Game`] owns every ledger, the catalog and the stat engine, and is the
//! only place where rules spanning several of them live: equipping moves an
//! item out of the inventory and registers its effects, a level-up refreshes
//! the skill's effects, the front combat item of the queue always has a
//! battle. Everything is synchronous; callers pass the current time.

use crate::action::{
    Action, ActionQueue, ActionQueueItem, ActionResolver, QueueItemKind, QueuedAction, Timestamp,
};
use crate::amount::Amount;
use crate::combat::{
    BatchBattleResult, BattleFrame, BattlePhase, CombatantStats, CurrentBattle,
    default_player_bases, simulate_battles,
};
use crate::config::GameConfig;
use crate::env::{GameCatalog, ItemStack, LootRoller};
use crate::error::{CommandError, ConfigError, QueueIndexError};
use crate::fixed::FixedPoint;
use crate::ids::{ActionId, EnemyId, ItemId, SkillId};
use crate::state::{
    ChestPoints, ConsumableAvailability, ConsumableSlot, ConsumableSlots, Equipment, Inventory,
    Notification, NotificationKey, Notifications, SkillBook, SkillSnapshot, XpTable, params,
};
use crate::stats::{EffectSource, StatEngine};

#[derive(Clone, Debug)]
pub struct Game {
    pub(crate) catalog: GameCatalog,
    pub(crate) config: GameConfig,
    pub(crate) stats: StatEngine,
    pub(crate) queue: ActionQueue,
    pub(crate) battle: Option<CurrentBattle>,
    pub(crate) inventory: Inventory,
    pub(crate) skills: SkillBook,
    pub(crate) chest_points: ChestPoints,
    pub(crate) equipment: Equipment,
    pub(crate) consumables: ConsumableSlots,
    pub(crate) notifications: Notifications,
    pub(crate) loot: LootRoller,
}

impl Game {
    pub fn new(catalog: GameCatalog, config: GameConfig) -> Self {
        let mut stats = StatEngine::with_base(default_player_bases());
        for stat in catalog.stats() {
            stats.set_base(stat.id.clone(), stat.base);
        }

        let mut game = Self {
            stats,
            queue: ActionQueue::new(),
            battle: None,
            inventory: Inventory::new(),
            skills: SkillBook::new(XpTable::from_config(&config)),
            chest_points: ChestPoints::new(),
            equipment: Equipment::empty(),
            consumables: ConsumableSlots::new(config.consumable_slots_per_skill),
            notifications: Notifications::new(),
            loot: LootRoller::new(config.seed),
            catalog,
            config,
        };
        let skill_ids: Vec<SkillId> = game.catalog.skills().map(|s| s.id.clone()).collect();
        for skill_id in &skill_ids {
            game.refresh_skill_effects(skill_id);
        }
        game
    }

    // ========================================================================
    // Read access
    // ========================================================================

    pub fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn stats(&self) -> &StatEngine {
        &self.stats
    }

    pub fn queue(&self) -> &ActionQueue {
        &self.queue
    }

    pub fn battle(&self) -> Option<&CurrentBattle> {
        self.battle.as_ref()
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Direct inventory access for granting starting items and tests.
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn skills(&self) -> &SkillBook {
        &self.skills
    }

    pub fn chest_points(&self) -> &ChestPoints {
        &self.chest_points
    }

    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    pub fn consumables(&self) -> &ConsumableSlots {
        &self.consumables
    }

    pub fn pending_notifications(&self) -> &[Notification] {
        self.notifications.pending()
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    /// Availability oracle backed by the current consumable slots.
    pub fn availability(&self) -> ConsumableAvailability<'_> {
        ConsumableAvailability {
            slots: &self.consumables,
            inventory: &self.inventory,
            catalog: &self.catalog,
        }
    }

    /// Resolves an action against the current levels and effects.
    pub fn get_action_by_id(&self, action_id: &ActionId) -> Result<Action, ConfigError> {
        let availability = self.availability();
        ActionResolver::new(&self.catalog, &self.stats, &availability, &self.skills)
            .get_action_by_id(action_id)
    }

    pub fn player_combat_stats(&self) -> CombatantStats {
        CombatantStats::player(&self.stats, &self.availability())
    }

    // ========================================================================
    // Queue
    // ========================================================================

    pub fn add_action(
        &mut self,
        action_id: ActionId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Option<u64>, ConfigError> {
        self.catalog.action(&action_id)?;
        let uid = self.queue.add_action(action_id, amount, now);
        self.sync_battle(now);
        Ok(uid)
    }

    pub fn add_combat_action(
        &mut self,
        enemy_id: EnemyId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Option<u64>, ConfigError> {
        self.catalog.enemy(&enemy_id)?;
        let uid = self.queue.add_combat_action(enemy_id, amount, now);
        self.sync_battle(now);
        Ok(uid)
    }

    pub fn start_immediately(
        &mut self,
        action_id: ActionId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Option<u64>, ConfigError> {
        self.catalog.action(&action_id)?;
        let uid = self.queue.start_immediately(action_id, amount, now);
        self.sync_battle(now);
        Ok(uid)
    }

    pub fn start_combat_immediately(
        &mut self,
        enemy_id: EnemyId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Option<u64>, ConfigError> {
        self.catalog.enemy(&enemy_id)?;
        let uid = self.queue.start_combat_immediately(enemy_id, amount, now);
        self.sync_battle(now);
        Ok(uid)
    }

    /// Removes a queue item; removing the front combat item cancels its
    /// battle.
    pub fn remove_action(
        &mut self,
        index: usize,
        now: Timestamp,
    ) -> Result<ActionQueueItem, QueueIndexError> {
        let removed = self.queue.remove_action(index, now)?;
        self.sync_battle(now);
        Ok(removed)
    }

    pub fn move_action(
        &mut self,
        from: usize,
        to: usize,
        now: Timestamp,
    ) -> Result<(), QueueIndexError> {
        self.queue.move_action(from, to, now)?;
        self.sync_battle(now);
        Ok(())
    }

    pub fn move_up(&mut self, index: usize, now: Timestamp) -> Result<(), QueueIndexError> {
        self.queue.move_up(index, now)?;
        self.sync_battle(now);
        Ok(())
    }

    pub fn move_down(&mut self, index: usize, now: Timestamp) -> Result<(), QueueIndexError> {
        self.queue.move_down(index, now)?;
        self.sync_battle(now);
        Ok(())
    }

    pub fn move_top(&mut self, index: usize, now: Timestamp) -> Result<(), QueueIndexError> {
        self.queue.move_top(index, now)?;
        self.sync_battle(now);
        Ok(())
    }

    pub fn move_bottom(&mut self, index: usize, now: Timestamp) -> Result<(), QueueIndexError> {
        self.queue.move_bottom(index, now)?;
        self.sync_battle(now);
        Ok(())
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
        self.cancel_battle();
    }

    // ========================================================================
    // Combat
    // ========================================================================

    /// Predicts `amount` battles against `enemy_id` without touching any
    /// state.
    pub fn preview_battle(
        &self,
        enemy_id: &EnemyId,
        amount: Amount,
    ) -> Result<BatchBattleResult, ConfigError> {
        let enemy = self.catalog.enemy(enemy_id)?;
        Ok(simulate_battles(
            &self.player_combat_stats(),
            &CombatantStats::enemy(enemy),
            enemy.xp,
            self.catalog.combat_skills(),
            amount.remaining().unwrap_or(1),
            self.config.max_battle_seconds,
        ))
    }

    pub fn cancel_battle(&mut self) {
        if let Some(battle) = self.battle.take() {
            tracing::debug!(enemy_id = %battle.enemy_id, completed = battle.completed, "battle cancelled");
        }
    }

    /// Keeps the battle in step with the front of the queue.
    ///
    /// A front combat item without a battle gets one; if that battle cannot
    /// be won the item is removed with an `insufficientPower` warning and the
    /// next front item is considered. A non-combat front drops any battle.
    pub(crate) fn sync_battle(&mut self, now: Timestamp) {
        loop {
            let Some(front) = self.queue.current() else {
                self.cancel_battle();
                return;
            };
            let QueuedAction::Combat(enemy_id) = &front.action else {
                self.cancel_battle();
                return;
            };
            if self.battle.as_ref().map(|b| b.queue_uid) == Some(front.uid) {
                return;
            }

            let (uid, enemy_id, amount) = (front.uid, enemy_id.clone(), front.amount);
            self.cancel_battle();
            match self.start_battle(uid, &enemy_id, amount) {
                Ok(true) => return,
                Ok(false) => {}
                Err(err) => tracing::error!(enemy_id = %enemy_id, error = %err, "cannot start battle"),
            }
            self.queue.remove_by_uid(uid, now);
        }
    }

    /// Simulates and, if winnable, installs the battle for queue item `uid`.
    fn start_battle(
        &mut self,
        uid: u64,
        enemy_id: &EnemyId,
        amount: Amount,
    ) -> Result<bool, ConfigError> {
        let result = self.preview_battle(enemy_id, amount)?;
        if !result.can_win {
            self.notifications.warning(
                NotificationKey::InsufficientPower,
                params([("enemyId", enemy_id.to_string())]),
            );
            return Ok(false);
        }

        let enemy = CombatantStats::enemy(self.catalog.enemy(enemy_id)?);
        let duration = result.battle_duration();
        tracing::debug!(enemy_id = %enemy_id, duration = %duration, "battle started");
        self.queue.set_combat_duration(uid, duration);
        self.battle = Some(CurrentBattle::new(
            uid,
            enemy_id.clone(),
            amount,
            self.player_combat_stats(),
            enemy,
            result,
        ));
        Ok(true)
    }

    // ========================================================================
    // Rewards
    // ========================================================================

    /// Adds XP, notifying and refreshing skill effects on level-up.
    pub fn add_skill_xp(&mut self, skill_id: &SkillId, xp: FixedPoint) -> u32 {
        let gained = self.skills.add_skill_xp(skill_id, xp);
        if gained > 0 {
            let level = self.skills.get_skill_level(skill_id);
            tracing::info!(skill_id = %skill_id, level, "level up");
            self.notifications.info(
                NotificationKey::LevelUp,
                params([("skillId", skill_id.to_string()), ("level", level.to_string())]),
            );
            self.refresh_skill_effects(skill_id);
        }
        gained
    }

    /// Adds chest points; earned chests go to the inventory.
    pub fn add_chest_points(
        &mut self,
        chest_id: &ItemId,
        points: FixedPoint,
    ) -> Result<u64, ConfigError> {
        let max_points = self.catalog.chest(chest_id)?.max_points;
        let earned = self
            .chest_points
            .add_chest_points(chest_id, points, max_points);
        if earned > 0 {
            self.inventory.add_item(chest_id, earned);
            self.notifications.info(
                NotificationKey::ChestEarned,
                params([("chestId", chest_id.to_string()), ("count", earned.to_string())]),
            );
        }
        Ok(earned)
    }

    /// Opens `count` chests and returns the merged loot.
    pub fn open_chests(
        &mut self,
        chest_id: &ItemId,
        count: u64,
    ) -> Result<Vec<ItemStack>, CommandError> {
        let chest = self.catalog.chest(chest_id)?;
        self.inventory.remove_item(chest_id, count)?;
        let drops = self.loot.roll(&chest.loot, count);
        self.inventory.add_many_items(&drops);
        self.notifications.info(
            NotificationKey::ChestOpened,
            params([
                ("chestId", chest_id.to_string()),
                ("count", count.to_string()),
                ("items", describe_stacks(&drops)),
            ]),
        );
        Ok(drops)
    }

    /// Re-registers `skill:<id>` effects scaled by the current level.
    fn refresh_skill_effects(&mut self, skill_id: &SkillId) {
        let Ok(skill) = self.catalog.skill(skill_id) else {
            return;
        };
        if skill.level_effects.is_empty() {
            return;
        }
        let level = self.skills.get_skill_level(skill_id) as i64;
        let effects = skill
            .level_effects
            .iter()
            .map(|effect| effect.scaled(level))
            .collect();
        self.stats
            .add_effects_from_source(EffectSource::skill(skill_id), effects);
    }

    // ========================================================================
    // Equipment and consumables
    // ========================================================================

    /// Equips an item from the inventory; returns the item it replaced.
    pub fn equip(&mut self, item_id: &ItemId) -> Result<Option<ItemId>, CommandError> {
        let config = self.catalog.equipment(item_id)?;
        self.inventory.remove_item(item_id, 1)?;
        let previous = self.equipment.equip(&config.slot, item_id.clone());
        if let Some(previous) = &previous {
            self.inventory.add_item(previous, 1);
        }
        self.stats
            .add_effects_from_source(EffectSource::equipment(&config.slot), config.effects.clone());
        tracing::debug!(item_id = %item_id, slot = %config.slot, "equipped");
        Ok(previous)
    }

    pub fn unequip(&mut self, slot: &str) -> Result<ItemId, CommandError> {
        let item_id = self
            .equipment
            .unequip(slot)
            .ok_or_else(|| CommandError::SlotEmpty(slot.to_owned()))?;
        self.inventory.add_item(&item_id, 1);
        self.stats
            .remove_effects_from_source(&EffectSource::equipment(slot));
        Ok(item_id)
    }

    /// Puts a consumable in one of a skill's slots and registers its effects.
    pub fn assign_consumable(
        &mut self,
        skill_id: &SkillId,
        slot: usize,
        item_id: &ItemId,
    ) -> Result<Option<ConsumableSlot>, CommandError> {
        let config = self.catalog.consumable(item_id)?;
        if &config.skill_id != skill_id {
            return Err(CommandError::WrongSkill {
                item: item_id.clone(),
                expected: config.skill_id.clone(),
                skill: skill_id.clone(),
            });
        }
        let previous = self.consumables.assign(skill_id, slot, item_id.clone())?;
        self.stats.add_effects_from_source(
            EffectSource::consumable(skill_id, slot),
            config.effects.clone(),
        );
        Ok(previous)
    }

    pub fn clear_consumable(
        &mut self,
        skill_id: &SkillId,
        slot: usize,
    ) -> Result<Option<ConsumableSlot>, CommandError> {
        let previous = self.consumables.clear(skill_id, slot)?;
        self.stats
            .remove_effects_from_source(&EffectSource::consumable(skill_id, slot));
        Ok(previous)
    }

    // ========================================================================
    // Snapshot
    // ========================================================================

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            queue: self.queue.items().to_vec(),
            action_start_date: self.queue.action_start_date(),
            inventory: self
                .inventory
                .iter()
                .map(|(id, count)| ItemStack::new(id.clone(), count))
                .collect(),
            skills: self
                .skills
                .iter()
                .map(|(id, snapshot)| (id.clone(), snapshot))
                .collect(),
            chest_points: self
                .chest_points
                .iter()
                .map(|(id, points)| (id.clone(), points))
                .collect(),
            equipment: self
                .equipment
                .iter()
                .map(|(slot, item)| (slot.to_owned(), item.clone()))
                .collect(),
            battle: self.battle.as_ref().map(|battle| BattleSnapshot {
                enemy_id: battle.enemy_id.clone(),
                phase: battle.phase,
                completed: battle.completed,
                total: battle.total,
                frame: battle.frame,
            }),
        }
    }

    pub(crate) fn front_kind(&self) -> Option<QueueItemKind> {
        self.queue.current().map(ActionQueueItem::kind)
    }
}

/// `"wood x3, ore x1"` for notification params.
pub(crate) fn describe_stacks(stacks: &[ItemStack]) -> String {
    stacks
        .iter()
        .map(|stack| format!("{} x{}", stack.item_id, stack.count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Serializable view of the game for UIs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GameSnapshot {
    pub queue: Vec<ActionQueueItem>,
    pub action_start_date: Option<Timestamp>,
    pub inventory: Vec<ItemStack>,
    pub skills: Vec<(SkillId, SkillSnapshot)>,
    pub chest_points: Vec<(ItemId, FixedPoint)>,
    pub equipment: Vec<(String, ItemId)>,
    pub battle: Option<BattleSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BattleSnapshot {
    pub enemy_id: EnemyId,
    pub phase: BattlePhase,
    pub completed: u64,
    pub total: Amount,
    pub frame: BattleFrame,
}
