//! Plain-text output.

use idle_core::{GameSnapshot, Notification, NotificationLevel};

pub fn notification_line(notification: &Notification) -> String {
    let level = match notification.level {
        NotificationLevel::Info => "info",
        NotificationLevel::Warning => "warn",
        NotificationLevel::Error => "error",
    };
    let params = notification
        .params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("[{level}] {} {params}", notification.key)
        .trim_end()
        .to_owned()
}

pub fn print_summary(snapshot: &GameSnapshot) {
    println!("queue:");
    if snapshot.queue.is_empty() {
        println!("  (empty)");
    }
    for item in &snapshot.queue {
        println!("  #{} {} x{}", item.uid, item.action.id(), item.amount);
    }

    println!("inventory:");
    for stack in &snapshot.inventory {
        println!("  {} {}", stack.item_id, stack.count);
    }

    println!("skills:");
    for (skill_id, skill) in &snapshot.skills {
        println!("  {skill_id} level {} ({} xp)", skill.level, skill.xp);
    }

    if !snapshot.equipment.is_empty() {
        println!("equipment:");
        for (slot, item_id) in &snapshot.equipment {
            println!("  {slot}: {item_id}");
        }
    }

    if let Some(battle) = &snapshot.battle {
        println!(
            "battle: {} {} ({} of {} done)",
            battle.enemy_id, battle.phase, battle.completed, battle.total
        );
    }
}
