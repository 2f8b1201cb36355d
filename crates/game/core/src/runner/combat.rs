use std::collections::BTreeMap;

use crate::action::QueuedAction;
use crate::amount::Amount;
use crate::combat::{BattlePhase, CombatantStats, CurrentBattle, simulate_battles};
use crate::env::ItemStack;
use crate::error::ConfigError;
use crate::fixed::FixedPoint;
use crate::game::{Game, describe_stacks};
use crate::ids::{EnemyId, ItemId, SkillId};
use crate::state::{NotificationKey, params};

use super::{ActionExecutor, BatchLimits};

/// Runs combat items: batches of battles separated by respawn cooldowns.
///
/// The battle itself is started by the queue reaction in [`Game`]; this
/// executor only advances it.
#[derive(Clone, Copy, Debug, Default)]
pub struct CombatExecutor;

impl ActionExecutor for CombatExecutor {
    fn update(&self, game: &mut Game, elapsed_ms: u64) -> Result<u64, ConfigError> {
        let Some(item) = game.queue.current() else {
            return Ok(elapsed_ms);
        };
        let QueuedAction::Combat(_) = &item.action else {
            return Ok(elapsed_ms);
        };
        let (uid, amount) = (item.uid, item.amount);
        if game.battle.as_ref().map(|b| b.queue_uid) != Some(uid) {
            return Ok(elapsed_ms);
        }
        let Some(mut battle) = game.battle.take() else {
            return Ok(elapsed_ms);
        };

        let remaining = match battle.phase {
            BattlePhase::Fighting => fight(game, &mut battle, uid, amount, elapsed_ms),
            BattlePhase::Cooldown => cooldown(game, &mut battle, uid, amount, elapsed_ms),
        };

        // The item may be gone: depleted or stopped. `sync_battle` drops a
        // stale battle either way.
        if game.queue.current().map(|item| item.uid) == Some(uid) {
            game.battle = Some(battle);
        }
        remaining
    }
}

fn fight(
    game: &mut Game,
    battle: &mut CurrentBattle,
    uid: u64,
    amount: Amount,
    elapsed_ms: u64,
) -> Result<u64, ConfigError> {
    let battle_ms = battle.duration().raw().max(1) as u64;
    if elapsed_ms < battle_ms {
        battle.update_frame(FixedPoint::from_millis(elapsed_ms));
        return Ok(elapsed_ms);
    }

    // Fights inside one batch are separated by respawns; the last one is
    // followed by the cooldown phase.
    let respawn_ms = game.config.combat_respawn_ms;
    let xp_per_battle: Vec<(SkillId, FixedPoint)> = battle.result.xp_per_battle().to_vec();
    let limits = BatchLimits {
        time: elapsed_ms.saturating_add(respawn_ms) / battle_ms.saturating_add(respawn_ms),
        xp: xp_per_battle
            .iter()
            .filter(|(_, xp)| xp.is_positive())
            .filter_map(|(skill_id, xp)| {
                let remaining = game.skills.get_skill(skill_id).remaining_xp_for_upgrade?;
                remaining.whole_times_ceil(*xp).map(|n| n.max(1) as u64)
            })
            .min(),
        amount: amount.remaining(),
        ..BatchLimits::default()
    };
    let batch = limits.batch_size().max(1);
    tracing::debug!(enemy_id = %battle.enemy_id, batch, ?limits, "combat batch");

    grant_rewards(game, &battle.enemy_id, &xp_per_battle, batch)?;

    battle.completed += batch;
    let consumed_ms = batch * battle_ms + (batch - 1) * respawn_ms;
    game.queue.complete_current_action(consumed_ms, batch);
    if game.queue.current().map(|item| item.uid) == Some(uid) {
        battle.enter_cooldown();
    }
    Ok(elapsed_ms - consumed_ms)
}

fn cooldown(
    game: &mut Game,
    battle: &mut CurrentBattle,
    uid: u64,
    amount: Amount,
    elapsed_ms: u64,
) -> Result<u64, ConfigError> {
    let respawn_ms = game.config.combat_respawn_ms;
    if elapsed_ms < respawn_ms {
        battle.update_frame(FixedPoint::from_millis(elapsed_ms));
        return Ok(elapsed_ms);
    }

    // Stats may have changed since the last fight (level-ups, buffs).
    let enemy = game.catalog.enemy(&battle.enemy_id)?;
    let player = game.player_combat_stats();
    let result = simulate_battles(
        &player,
        &CombatantStats::enemy(enemy),
        enemy.xp,
        game.catalog.combat_skills(),
        amount.remaining().unwrap_or(1),
        game.config.max_battle_seconds,
    );

    if !result.can_win {
        game.notifications.warning(
            NotificationKey::CombatStopped,
            params([
                ("enemyId", battle.enemy_id.to_string()),
                ("completed", battle.completed.to_string()),
            ]),
        );
        let now = game.queue.action_start_date().unwrap_or(0) + elapsed_ms;
        game.queue.remove_by_uid(uid, now);
        return Ok(elapsed_ms);
    }

    let duration = result.battle_duration();
    battle.resume(player, result);
    game.queue.set_combat_duration(uid, duration);
    game.queue.complete_current_action(respawn_ms, 0);
    Ok(elapsed_ms - respawn_ms)
}

/// Grants `batch` battles' worth of XP, loot and chest points, merged so
/// each reward kind touches the ledgers once.
fn grant_rewards(
    game: &mut Game,
    enemy_id: &EnemyId,
    xp_per_battle: &[(SkillId, FixedPoint)],
    batch: u64,
) -> Result<(), ConfigError> {
    let enemy = game.catalog.enemy(enemy_id)?;
    let chest = enemy
        .chest_id
        .clone()
        .filter(|_| enemy.chest_points.is_positive())
        .map(|chest_id| (chest_id, enemy.chest_points.mul_int(batch as i64)));
    // Nothing is granted unless every config the batch touches resolves.
    if let Some((chest_id, _)) = &chest {
        game.catalog.chest(chest_id)?;
    }
    let drops = game.loot.roll(&enemy.loot, batch);

    for (skill_id, xp) in xp_per_battle {
        game.add_skill_xp(skill_id, xp.mul_int(batch as i64));
    }

    let mut merged: BTreeMap<ItemId, u64> = BTreeMap::new();
    for stack in drops {
        *merged.entry(stack.item_id).or_insert(0) += stack.count;
    }
    let loot: Vec<ItemStack> = merged
        .into_iter()
        .map(|(item_id, count)| ItemStack::new(item_id, count))
        .collect();

    if let Some((chest_id, points)) = chest {
        game.add_chest_points(&chest_id, points)?;
    }
    if !loot.is_empty() {
        game.inventory.add_many_items(&loot);
        game.notifications.info(
            NotificationKey::Loot,
            params([
                ("enemyId", enemy_id.to_string()),
                ("battles", batch.to_string()),
                ("items", describe_stacks(&loot)),
            ]),
        );
    }
    Ok(())
}
