//! Runtime scenarios driven through the public handle.

use std::time::Duration;

use idle_core::{
    ActionConfig, ActionId, Amount, EnemyConfig, EnemyId, FixedPoint, GameCatalog, ItemConfig,
    ItemId, ItemStack, LootEntry, NotificationKey, SkillConfig,
};
use idle_runtime::{
    BattleEvent, Event, Runtime, RuntimeConfig, RuntimeError, RuntimeHandle, Topic,
};
use tokio::sync::broadcast;

fn fp(x: i64) -> FixedPoint {
    FixedPoint::from_int(x)
}

fn catalog() -> GameCatalog {
    GameCatalog::builder()
        .action(ActionConfig::new("chop", "woodcutting", fp(5), fp(10)).with_product("wood", 1))
        .action(
            ActionConfig::new("planks", "carpentry", fp(5), fp(10)).with_ingredient("wood", 1),
        )
        .item(ItemConfig::material("wood"))
        .item(ItemConfig::material("rat_tail"))
        .skill(SkillConfig::new("woodcutting"))
        .skill(SkillConfig::new("carpentry"))
        .skill(SkillConfig::combat("attack", FixedPoint::ONE))
        .enemy(
            EnemyConfig::new("rat", fp(3), fp(1), fp(2))
                .with_xp(fp(5))
                .with_loot(LootEntry::guaranteed("rat_tail", 1)),
        )
        .enemy(EnemyConfig::new("dragon", fp(1000), fp(100), fp(1)))
        .build()
}

async fn start() -> (Runtime, RuntimeHandle) {
    let config = RuntimeConfig {
        start_time_ms: Some(1_000_000),
        ..RuntimeConfig::default()
    };
    let runtime = Runtime::builder()
        .config(config)
        .catalog(catalog())
        .build()
        .await
        .expect("runtime should start");
    let handle = runtime.handle();
    (runtime, handle)
}

async fn count(handle: &RuntimeHandle, item: &str) -> u64 {
    let snapshot = handle.snapshot().await.expect("snapshot");
    snapshot
        .inventory
        .iter()
        .find(|stack| stack.item_id == ItemId::new(item))
        .map_or(0, |stack| stack.count)
}

/// Receives until `pred` matches, failing after a generous timeout.
async fn wait_for(rx: &mut broadcast::Receiver<Event>, pred: impl Fn(&Event) -> bool) -> Event {
    tokio::time::timeout(Duration::from_secs(600), async {
        loop {
            let event = rx.recv().await.expect("event bus open");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("event should arrive")
}

fn is_notification(event: &Event, key: NotificationKey) -> bool {
    matches!(event, Event::Notification(notification) if notification.key == key)
}

#[tokio::test(start_paused = true)]
async fn fast_forward_completes_actions_and_notifies() {
    let (runtime, handle) = start().await;
    let mut notifications = handle.subscribe(Topic::Notifications);

    handle
        .add_action(ActionId::new("chop"), Amount::Finite(3))
        .await
        .expect("chop is in the catalog");
    handle
        .fast_forward(Duration::from_secs(15))
        .await
        .expect("fast-forward");

    assert_eq!(count(&handle, "wood").await, 3);
    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.queue.is_empty());
    assert_eq!(snapshot.action_start_date, None);

    wait_for(&mut notifications, |event| {
        is_notification(event, NotificationKey::Loot)
    })
    .await;

    drop(handle);
    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test(start_paused = true)]
async fn frames_drive_the_queue_in_real_time() {
    let (runtime, handle) = start().await;

    handle
        .add_action(ActionId::new("chop"), Amount::Finite(1))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(count(&handle, "wood").await, 0);

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(count(&handle, "wood").await, 1);
    assert!(handle.snapshot().await.unwrap().queue.is_empty());

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn queue_changes_are_published() {
    let (runtime, handle) = start().await;
    let mut queue = handle.subscribe(Topic::Queue);

    handle
        .add_action(ActionId::new("chop"), Amount::Infinite)
        .await
        .unwrap();
    let event = wait_for(&mut queue, |event| {
        matches!(event, Event::Queue(queue) if queue.items.len() == 1)
    })
    .await;
    let Event::Queue(added) = event else {
        unreachable!()
    };
    assert!(added.action_start_date.is_some());

    handle.clear_queue().await.unwrap();
    wait_for(&mut queue, |event| {
        matches!(event, Event::Queue(queue) if queue.items.is_empty() && queue.action_start_date.is_none())
    })
    .await;

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn battle_lifecycle_is_published() {
    let (runtime, handle) = start().await;
    let mut combat = handle.subscribe(Topic::Combat);

    handle
        .add_combat_action(EnemyId::new("rat"), Amount::Finite(1))
        .await
        .unwrap();
    wait_for(&mut combat, |event| {
        matches!(event, Event::Combat(BattleEvent::Started { enemy_id, .. }) if enemy_id.as_str() == "rat")
    })
    .await;

    handle.fast_forward(Duration::from_secs(60)).await.unwrap();
    wait_for(&mut combat, |event| {
        matches!(event, Event::Combat(BattleEvent::Ended { .. }))
    })
    .await;
    assert_eq!(count(&handle, "rat_tail").await, 1);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn unwinnable_fight_is_refused_with_a_warning() {
    let (runtime, handle) = start().await;
    let mut notifications = handle.subscribe(Topic::Notifications);

    let preview = handle
        .preview_battle(EnemyId::new("dragon"), Amount::Finite(1))
        .await
        .unwrap();
    assert!(!preview.can_win);

    handle
        .add_combat_action(EnemyId::new("dragon"), Amount::Finite(1))
        .await
        .unwrap();
    wait_for(&mut notifications, |event| {
        is_notification(event, NotificationKey::InsufficientPower)
    })
    .await;
    assert!(handle.snapshot().await.unwrap().queue.is_empty());

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn errors_come_back_through_the_handle() {
    let (runtime, handle) = start().await;

    let err = handle
        .add_action(ActionId::new("fly"), Amount::Infinite)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Config(_)));

    let err = handle.remove_action(3).await.unwrap_err();
    assert!(matches!(err, RuntimeError::QueueIndex(_)));

    let err = handle.unequip("weapon").await.unwrap_err();
    assert!(matches!(err, RuntimeError::Command(_)));

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn granted_items_feed_production() {
    let (runtime, handle) = start().await;

    handle
        .grant_items(vec![ItemStack::new("wood", 2)])
        .await
        .unwrap();
    handle
        .add_action(ActionId::new("planks"), Amount::Infinite)
        .await
        .unwrap();
    handle.fast_forward(Duration::from_secs(60)).await.unwrap();

    assert_eq!(count(&handle, "wood").await, 0);
    assert!(handle.snapshot().await.unwrap().queue.is_empty());

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn builder_requires_a_game_source() {
    let err = Runtime::builder().build().await.err().expect("no game");
    assert!(matches!(err, RuntimeError::MissingGame));
}

#[tokio::test]
async fn runs_the_sample_content_pack() {
    let runtime = Runtime::builder()
        .content_dir(idle_content::SAMPLE_DATA_DIR)
        .build()
        .await
        .expect("sample content loads");
    let handle = runtime.handle();

    handle
        .add_action(ActionId::new("chop_oak"), Amount::Finite(4))
        .await
        .unwrap();
    handle.fast_forward(Duration::from_secs(12)).await.unwrap();
    assert_eq!(count(&handle, "oak_log").await, 4);

    drop(handle);
    runtime.shutdown().await.unwrap();
}
