use crate::action::{Action, QueuedAction};
use crate::env::ItemStack;
use crate::error::ConfigError;
use crate::fixed::FixedPoint;
use crate::game::{Game, describe_stacks};
use crate::state::{ConsumableDrain, NotificationKey, params};
use crate::stats::EffectSource;

use super::{ActionExecutor, BatchLimits};

/// Runs production actions in batches.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProductionExecutor;

impl ActionExecutor for ProductionExecutor {
    fn update(&self, game: &mut Game, elapsed_ms: u64) -> Result<u64, ConfigError> {
        let Some(item) = game.queue.current() else {
            return Ok(elapsed_ms);
        };
        let QueuedAction::Production(action_id) = &item.action else {
            return Ok(elapsed_ms);
        };
        let (uid, amount) = (item.uid, item.amount);
        let action = game.get_action_by_id(&action_id.clone())?;
        let now = game.queue.action_start_date().unwrap_or(0) + elapsed_ms;

        let level = game.skills.get_skill_level(&action.skill_id);
        if level < action.min_level {
            game.notifications.warning(
                NotificationKey::LevelTooLow,
                params([
                    ("actionId", action.id.to_string()),
                    ("skillId", action.skill_id.to_string()),
                    ("minLevel", action.min_level.to_string()),
                ]),
            );
            game.queue.remove_by_uid(uid, now);
            return Ok(elapsed_ms);
        }

        // Nothing is spent unless every config the batch touches resolves.
        let chest = action
            .chest_id
            .as_ref()
            .filter(|_| action.chest_points.is_positive());
        if let Some(chest_id) = chest {
            game.catalog.chest(chest_id)?;
        }

        let duration_ms = action.duration_ms();
        let limits = BatchLimits {
            time: elapsed_ms / duration_ms,
            materials: material_limit(game, &action),
            xp: xp_limit(game, &action),
            consumables: game.consumables.max_actions(
                &action.skill_id,
                action.duration_seconds,
                &game.inventory,
                &game.catalog,
            ),
            amount: amount.remaining(),
        };

        if limits.materials == Some(0) {
            stop_for_materials(game, &action, uid, now);
            return Ok(elapsed_ms);
        }

        let batch = limits.batch_size();
        if batch == 0 {
            return Ok(elapsed_ms);
        }

        let Some((batch, removal, drain)) = fit_batch(game, &action, batch) else {
            stop_for_materials(game, &action, uid, now);
            return Ok(elapsed_ms);
        };
        tracing::debug!(action_id = %action.id, batch, ?limits, "production batch");

        let consumed_ms = batch * duration_ms;
        if let Err(err) = game.inventory.remove_many_items(&removal) {
            tracing::warn!(action_id = %action.id, error = %err, "batch removal failed");
            stop_for_materials(game, &action, uid, now);
            return Ok(elapsed_ms);
        }

        game.consumables.apply_drain(&drain);
        for &slot in &drain.cleared {
            game.stats
                .remove_effects_from_source(&EffectSource::consumable(&action.skill_id, slot));
        }

        game.add_skill_xp(&action.skill_id, action.xp.mul_int(batch as i64));

        if let Some(chest_id) = chest {
            game.add_chest_points(chest_id, action.chest_points.mul_int(batch as i64))?;
        }

        let products = scaled(&action.products, batch);
        if !products.is_empty() {
            game.inventory.add_many_items(&products);
            game.notifications.info(
                NotificationKey::Loot,
                params([
                    ("actionId", action.id.to_string()),
                    ("items", describe_stacks(&products)),
                ]),
            );
        }

        game.queue.complete_current_action(consumed_ms, batch);
        Ok(elapsed_ms - consumed_ms)
    }
}

/// Whole repetitions the inventory can feed; `None` without ingredients.
fn material_limit(game: &Game, action: &Action) -> Option<u64> {
    action
        .ingredients
        .iter()
        .filter(|stack| stack.count > 0)
        .map(|stack| game.inventory.count(&stack.item_id) / stack.count)
        .min()
}

/// Largest batch up to `upper` whose ingredients and consumable conversions
/// the inventory covers together. An item may be both, so the per-item
/// limit alone can overshoot. `None` when not even one action fits.
fn fit_batch(
    game: &Game,
    action: &Action,
    upper: u64,
) -> Option<(u64, Vec<ItemStack>, ConsumableDrain)> {
    let plan = |batch: u64| {
        let drain = game.consumables.plan_drain(
            &action.skill_id,
            action.duration_seconds,
            FixedPoint::from_millis(batch.saturating_mul(action.duration_ms())),
            &game.inventory,
            &game.catalog,
        );
        let mut removal = scaled(&action.ingredients, batch);
        removal.extend(drain.consumed.iter().cloned());
        (removal, drain)
    };

    let (removal, drain) = plan(upper);
    if game.inventory.has_items(&removal) {
        return Some((upper, removal, drain));
    }

    // Needs grow with the batch, so bisect for the last one that fits.
    let (mut fits, mut fails) = (0, upper);
    while fails - fits > 1 {
        let mid = fits + (fails - fits) / 2;
        if game.inventory.has_items(&plan(mid).0) {
            fits = mid;
        } else {
            fails = mid;
        }
    }
    if fits == 0 {
        return None;
    }
    let (removal, drain) = plan(fits);
    Some((fits, removal, drain))
}

/// Repetitions needed to reach the next level, rounded up.
fn xp_limit(game: &Game, action: &Action) -> Option<u64> {
    if !action.xp.is_positive() {
        return None;
    }
    let remaining = game
        .skills
        .get_skill(&action.skill_id)
        .remaining_xp_for_upgrade?;
    remaining
        .whole_times_ceil(action.xp)
        .map(|n| n.max(1) as u64)
}

fn scaled(stacks: &[ItemStack], times: u64) -> Vec<ItemStack> {
    stacks
        .iter()
        .filter(|stack| stack.count > 0)
        .map(|stack| ItemStack::new(stack.item_id.clone(), stack.count.saturating_mul(times)))
        .collect()
}

fn stop_for_materials(game: &mut Game, action: &Action, uid: u64, now: u64) {
    game.notifications.warning(
        NotificationKey::NotEnoughMaterials,
        params([("actionId", action.id.to_string())]),
    );
    game.queue.remove_by_uid(uid, now);
}
