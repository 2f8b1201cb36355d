//! End-to-end runner scenarios: queue in, elapsed time in, ledgers out.

use idle_core::{
    ActionConfig, ActionId, Amount, BattlePhase, ChestConfig, ConsumableConfig,
    DerivedValueConfig, Effect, EnemyConfig, EnemyId, EquipmentConfig, FixedPoint, Game,
    GameCatalog, GameConfig, ItemConfig, ItemId, LootEntry, NotificationKey, SkillConfig,
    SkillId,
};

fn fp(x: i64) -> FixedPoint {
    FixedPoint::from_int(x)
}

fn catalog() -> GameCatalog {
    GameCatalog::builder()
        .action(ActionConfig::new("chop", "woodcutting", fp(5), fp(10)).with_product("wood", 1))
        .action(
            ActionConfig::new("planks", "carpentry", fp(5), fp(10)).with_ingredient("wood", 1),
        )
        .action(
            ActionConfig::new("dig", "mining", fp(2), fp(1))
                .with_chest("mining_chest", DerivedValueConfig::constant(fp(1100))),
        )
        .action(
            ActionConfig::new("smelt", "mining", fp(3), fp(5))
                .with_min_level(5)
                .with_product("ore", 1),
        )
        .action(
            ActionConfig::new("sift", "mining", fp(2), fp(1))
                .with_ingredient("wood", 1)
                .with_chest("lost_chest", DerivedValueConfig::constant(fp(100))),
        )
        .action(
            ActionConfig::new("brew", "carpentry", fp(5), fp(1))
                .with_ingredient("sap", 1)
                .with_product("wood", 1),
        )
        .item(ItemConfig::material("wood"))
        .item(ItemConfig::material("rat_tail"))
        .item(ItemConfig::material("ore"))
        .item(ItemConfig::consumable(
            "coffee",
            ConsumableConfig {
                skill_id: "woodcutting".into(),
                duration_seconds: fp(20),
                effects: vec![Effect::flat("woodcuttingSpeed", fp(1))],
            },
        ))
        .item(ItemConfig::consumable(
            "sap",
            ConsumableConfig {
                skill_id: "carpentry".into(),
                duration_seconds: fp(5),
                effects: vec![Effect::flat("carpentrySpeed", fp(1))],
            },
        ))
        .item(ItemConfig::equipment(
            "sword",
            EquipmentConfig {
                slot: "weapon".into(),
                effects: vec![Effect::flat("attackDamage", fp(5))],
            },
        ))
        .item(ItemConfig::chest(
            "mining_chest",
            ChestConfig {
                max_points: fp(1000),
                loot: vec![LootEntry::guaranteed("ore", 2)],
            },
        ))
        .skill(SkillConfig::new("woodcutting"))
        .skill(SkillConfig::new("carpentry"))
        .skill(SkillConfig::new("mining"))
        .skill(SkillConfig::combat("attack", FixedPoint::ONE))
        .enemy(
            EnemyConfig::new("rat", fp(3), fp(1), fp(2))
                .with_xp(fp(5))
                .with_loot(LootEntry::guaranteed("rat_tail", 1)),
        )
        .enemy(EnemyConfig::new("dragon", fp(1000), fp(100), fp(1)))
        // Beatable only with the sword: one 6-damage hit before it lands 10.
        .enemy(EnemyConfig::new("wolf", fp(6), fp(2), fp(2)))
        .enemy(
            EnemyConfig::new("ghost", fp(3), fp(1), fp(2))
                .with_xp(fp(5))
                .with_chest("lost_chest", fp(10)),
        )
        .build()
}

fn game() -> Game {
    Game::new(catalog(), GameConfig::default())
}

fn keys(game: &mut Game) -> Vec<NotificationKey> {
    game.drain_notifications()
        .into_iter()
        .map(|notification| notification.key)
        .collect()
}

#[test]
fn three_wood_make_three_planks_then_stop() {
    let mut game = game();
    game.inventory_mut().add_item(&ItemId::new("wood"), 3);
    game.add_action(ActionId::new("planks"), Amount::Infinite, 0)
        .unwrap();

    game.run_actions(20_000).unwrap();

    assert_eq!(game.inventory().count(&ItemId::new("wood")), 0);
    assert_eq!(game.skills().get_skill(&SkillId::new("carpentry")).xp, fp(30));
    assert!(game.queue().is_empty());
    assert_eq!(game.queue().action_start_date(), None);
    assert_eq!(keys(&mut game), vec![NotificationKey::NotEnoughMaterials]);
}

#[test]
fn one_large_step_equals_many_small_steps() {
    let mut batched = game();
    let mut stepped = game();
    for game in [&mut batched, &mut stepped] {
        game.add_action(ActionId::new("chop"), Amount::Infinite, 0)
            .unwrap();
    }

    // Crosses the first level-up, so the XP limit splits the batch.
    batched.run_actions(60_000).unwrap();
    for now in (250..=60_000).step_by(250) {
        stepped.run_actions(now).unwrap();
    }

    assert_eq!(batched.inventory().count(&ItemId::new("wood")), 12);
    assert_eq!(batched.snapshot(), stepped.snapshot());
    assert_eq!(
        batched.skills().get_skill(&SkillId::new("woodcutting")).level,
        2
    );
}

#[test]
fn finite_amount_leaves_remainder_for_next_item() {
    let mut game = game();
    game.add_action(ActionId::new("chop"), Amount::Finite(2), 0)
        .unwrap();
    game.add_action(ActionId::new("dig"), Amount::Finite(1), 0)
        .unwrap();

    // 2 chops (10s) then one dig (2s); 1s left over on nothing.
    game.run_actions(13_000).unwrap();

    assert_eq!(game.inventory().count(&ItemId::new("wood")), 2);
    assert_eq!(game.skills().get_skill(&SkillId::new("mining")).xp, fp(1));
    assert!(game.queue().is_empty());
}

#[test]
fn chest_points_overflow_carries_over() {
    let mut game = game();
    game.add_action(ActionId::new("dig"), Amount::Finite(1), 0)
        .unwrap();
    game.run_actions(2_000).unwrap();

    let chest = ItemId::new("mining_chest");
    assert_eq!(game.inventory().count(&chest), 1);
    assert_eq!(game.chest_points().points(&chest), fp(100));
    assert!(keys(&mut game).contains(&NotificationKey::ChestEarned));

    let loot = game.open_chests(&chest, 1).unwrap();
    assert_eq!(loot.len(), 1);
    assert_eq!(game.inventory().count(&ItemId::new("ore")), 2);
    assert_eq!(game.inventory().count(&chest), 0);
}

#[test]
fn combat_batches_then_cools_down() {
    let mut game = game();
    game.add_combat_action(EnemyId::new("rat"), Amount::Finite(3), 0)
        .unwrap();
    let battle_ms = game.battle().expect("battle started").duration().to_millis();
    assert!(battle_ms > 0);

    game.run_actions(battle_ms).unwrap();
    let battle = game.battle().expect("battle kept for remaining fights");
    assert_eq!(battle.phase, BattlePhase::Cooldown);
    assert_eq!(battle.completed, 1);
    assert_eq!(game.inventory().count(&ItemId::new("rat_tail")), 1);
    assert_eq!(game.skills().get_skill(&SkillId::new("attack")).xp, fp(5));

    // Still respawning.
    game.run_actions(battle_ms + 1_000).unwrap();
    assert_eq!(game.battle().map(|b| b.phase), Some(BattlePhase::Cooldown));

    let respawn = game.config().combat_respawn_ms;
    game.run_actions(battle_ms + respawn + battle_ms).unwrap();
    let battle = game.battle().expect("one fight left");
    assert_eq!(battle.completed, 2);
    assert_eq!(game.queue().current().map(|item| item.amount), Some(Amount::Finite(1)));

    game.run_actions(1_000_000).unwrap();
    assert!(game.queue().is_empty());
    assert!(game.battle().is_none());
    assert_eq!(game.inventory().count(&ItemId::new("rat_tail")), 3);
    assert_eq!(game.skills().get_skill(&SkillId::new("attack")).xp, fp(15));
}

#[test]
fn combat_is_deterministic() {
    let mut first = game();
    let mut second = game();
    for game in [&mut first, &mut second] {
        game.add_combat_action(EnemyId::new("rat"), Amount::Finite(5), 0)
            .unwrap();
        game.run_actions(123_456).unwrap();
    }
    assert_eq!(first.snapshot(), second.snapshot());

    let preview = first
        .preview_battle(&EnemyId::new("rat"), Amount::Finite(1))
        .unwrap();
    let again = first
        .preview_battle(&EnemyId::new("rat"), Amount::Finite(1))
        .unwrap();
    assert_eq!(preview, again);
}

#[test]
fn unwinnable_fight_reached_through_the_queue_is_dropped() {
    let mut game = game();
    game.add_action(ActionId::new("chop"), Amount::Finite(1), 0)
        .unwrap();
    game.add_combat_action(EnemyId::new("dragon"), Amount::Finite(1), 0)
        .unwrap();
    assert_eq!(game.queue().len(), 2);

    game.run_actions(5_000).unwrap();

    assert!(game.queue().is_empty());
    assert!(game.battle().is_none());
    let keys = keys(&mut game);
    assert!(keys.contains(&NotificationKey::InsufficientPower));
}

#[test]
fn start_date_tracks_queue_emptiness() {
    let mut game = game();
    let check = |game: &Game| {
        assert_eq!(
            game.queue().action_start_date().is_some(),
            !game.queue().is_empty()
        );
    };

    check(&game);
    game.add_action(ActionId::new("chop"), Amount::Finite(1), 10)
        .unwrap();
    check(&game);
    assert_eq!(game.queue().action_start_date(), Some(10));

    game.add_action(ActionId::new("dig"), Amount::Finite(1), 20)
        .unwrap();
    assert_eq!(game.queue().action_start_date(), Some(10));

    game.move_top(1, 30).unwrap();
    assert_eq!(game.queue().action_start_date(), Some(30));
    check(&game);

    game.move_bottom(1, 40).unwrap();
    assert_eq!(game.queue().action_start_date(), Some(30));

    game.remove_action(0, 50).unwrap();
    assert_eq!(game.queue().action_start_date(), Some(50));
    game.remove_action(0, 60).unwrap();
    check(&game);

    game.start_immediately(ActionId::new("chop"), Amount::Infinite, 70)
        .unwrap();
    check(&game);
    game.clear_queue();
    check(&game);
}

#[test]
fn combat_batch_matches_frame_stepping() {
    let mut batched = game();
    let mut stepped = game();
    for game in [&mut batched, &mut stepped] {
        game.add_combat_action(EnemyId::new("rat"), Amount::Infinite, 0)
            .unwrap();
    }
    let battle_ms = batched.battle().expect("battle started").duration().to_millis();
    assert_eq!(battle_ms, 9_000);

    // Fights end at 9s, 21s, 33s, 45s and 57s; the next one starts at 60s.
    batched.run_actions(60_000).unwrap();
    for now in (16..=60_000).step_by(16) {
        stepped.run_actions(now).unwrap();
    }

    let attack = SkillId::new("attack");
    let rat_tail = ItemId::new("rat_tail");
    assert_eq!(batched.inventory().count(&rat_tail), 5);
    assert_eq!(
        batched.inventory().count(&rat_tail),
        stepped.inventory().count(&rat_tail)
    );
    assert_eq!(
        batched.skills().get_skill(&attack).xp,
        stepped.skills().get_skill(&attack).xp
    );
    let (batched_battle, stepped_battle) = (batched.battle().unwrap(), stepped.battle().unwrap());
    assert_eq!(batched_battle.completed, 5);
    assert_eq!(batched_battle.completed, stepped_battle.completed);
    assert_eq!(batched_battle.phase, BattlePhase::Fighting);
    assert_eq!(batched_battle.phase, stepped_battle.phase);
    assert_eq!(batched.queue().action_start_date(), Some(60_000));
    assert_eq!(
        batched.queue().action_start_date(),
        stepped.queue().action_start_date()
    );
}

#[test]
fn consumable_capped_batch_matches_frame_stepping() {
    let woodcutting = SkillId::new("woodcutting");
    let coffee = ItemId::new("coffee");
    let mut batched = game();
    let mut stepped = game();
    for game in [&mut batched, &mut stepped] {
        game.inventory_mut().add_item(&coffee, 4);
        game.assign_consumable(&woodcutting, 0, &coffee).unwrap();
        game.add_action(ActionId::new("chop"), Amount::Infinite, 0)
            .unwrap();
    }

    // Four 20s coffees cover sixteen 5s chops.
    batched.run_actions(80_000).unwrap();
    for now in (16..=80_000).step_by(16) {
        stepped.run_actions(now).unwrap();
    }

    for game in [&batched, &stepped] {
        assert_eq!(game.inventory().count(&ItemId::new("wood")), 16);
        assert_eq!(game.inventory().count(&coffee), 0);
        assert!(game.consumables().get(&woodcutting, 0).is_none());
        assert!(
            game.stats()
                .effects_from_source("consumable:woodcutting:0")
                .is_none()
        );
    }
    assert_eq!(
        batched.skills().get_skill(&woodcutting).xp,
        stepped.skills().get_skill(&woodcutting).xp
    );
    assert_eq!(
        batched.queue().action_start_date(),
        stepped.queue().action_start_date()
    );
}

#[test]
fn shared_ingredient_and_consumable_shrinks_the_batch() {
    let carpentry = SkillId::new("carpentry");
    let sap = ItemId::new("sap");
    let mut game = game();
    game.inventory_mut().add_item(&sap, 4);
    game.assign_consumable(&carpentry, 0, &sap).unwrap();
    game.add_action(ActionId::new("brew"), Amount::Infinite, 0)
        .unwrap();

    // Time, sap count and slot coverage each allow four brews, but each brew
    // eats one sap as ingredient and one to keep the slot going.
    game.run_actions(20_000).unwrap();

    assert_eq!(game.inventory().count(&ItemId::new("wood")), 2);
    assert_eq!(game.inventory().count(&sap), 0);
    assert_eq!(game.skills().get_skill(&carpentry).xp, fp(2));
    assert_eq!(
        keys(&mut game),
        vec![NotificationKey::Loot, NotificationKey::NotEnoughMaterials]
    );
    assert!(game.queue().is_empty());
}

#[test]
fn action_above_skill_level_is_dropped() {
    let mut game = game();
    game.add_action(ActionId::new("smelt"), Amount::Finite(1), 0)
        .unwrap();
    game.add_action(ActionId::new("chop"), Amount::Finite(1), 0)
        .unwrap();

    game.run_actions(5_000).unwrap();
    assert_eq!(keys(&mut game), vec![NotificationKey::LevelTooLow]);
    assert_eq!(game.inventory().count(&ItemId::new("ore")), 0);
    assert_eq!(game.queue().len(), 1);
    assert_eq!(game.queue().action_start_date(), Some(5_000));

    game.run_actions(10_000).unwrap();
    assert_eq!(game.inventory().count(&ItemId::new("wood")), 1);
}

#[test]
fn combat_stops_when_player_weakens_during_cooldown() {
    let mut game = game();
    game.inventory_mut().add_item(&ItemId::new("sword"), 1);
    game.equip(&ItemId::new("sword")).unwrap();
    game.add_combat_action(EnemyId::new("wolf"), Amount::Infinite, 0)
        .unwrap();
    let battle_ms = game.battle().expect("winnable with the sword").duration().to_millis();

    game.run_actions(battle_ms).unwrap();
    assert_eq!(game.battle().map(|b| b.phase), Some(BattlePhase::Cooldown));
    keys(&mut game);

    game.unequip("weapon").unwrap();
    let respawn = game.config().combat_respawn_ms;
    game.run_actions(battle_ms + respawn).unwrap();

    assert_eq!(keys(&mut game), vec![NotificationKey::CombatStopped]);
    assert!(game.queue().is_empty());
    assert!(game.battle().is_none());
}

#[test]
fn unknown_chest_fails_before_spending_anything() {
    let mut game = game();
    game.inventory_mut().add_item(&ItemId::new("wood"), 3);
    game.add_action(ActionId::new("sift"), Amount::Infinite, 0)
        .unwrap();

    assert!(game.run_actions(10_000).is_err());
    assert_eq!(game.inventory().count(&ItemId::new("wood")), 3);
    assert_eq!(game.skills().get_skill(&SkillId::new("mining")).xp, FixedPoint::ZERO);
    assert!(game.queue().is_empty());
    // Nothing half-applied is left to repeat.
    game.run_actions(20_000).unwrap();
    assert_eq!(game.inventory().count(&ItemId::new("wood")), 3);
}

#[test]
fn unknown_enemy_chest_fails_before_rewards() {
    let mut game = game();
    game.add_combat_action(EnemyId::new("ghost"), Amount::Finite(2), 0)
        .unwrap();
    let battle_ms = game.battle().expect("battle started").duration().to_millis();

    assert!(game.run_actions(battle_ms).is_err());
    assert_eq!(game.skills().get_skill(&SkillId::new("attack")).xp, FixedPoint::ZERO);
    assert!(game.queue().is_empty());
    assert!(game.battle().is_none());
}

#[test]
fn respawned_battle_predicts_what_is_left_in_the_queue() {
    let mut game = game();
    game.add_combat_action(EnemyId::new("rat"), Amount::Finite(3), 0)
        .unwrap();
    let respawn = game.config().combat_respawn_ms;

    game.run_actions(9_000 + respawn).unwrap();

    let battle = game.battle().expect("two fights left");
    assert_eq!(battle.phase, BattlePhase::Fighting);
    assert_eq!(battle.completed, 1);
    assert_eq!(battle.result.repeat_count, 2);
}
