//! Player-facing notifications.
//!
//! The core never waits on notifications: it pushes them here and a UI (or
//! the runtime's event bus) drains them later. Every push is also logged.

use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[strum(serialize_all = "camelCase")]
pub enum NotificationKey {
    NotEnoughMaterials,
    InsufficientPower,
    LevelTooLow,
    LevelUp,
    Loot,
    ChestEarned,
    ChestOpened,
    CombatStopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Notification {
    pub level: NotificationLevel,
    pub key: NotificationKey,
    pub params: BTreeMap<String, String>,
    pub duration_ms: Option<u64>,
}

/// Builds notification params from `(name, value)` pairs.
pub fn params<const N: usize>(pairs: [(&str, String); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_owned(), value))
        .collect()
}

#[derive(Clone, Debug, Default)]
pub struct Notifications {
    pending: Vec<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, key: NotificationKey, params: BTreeMap<String, String>) {
        tracing::debug!(key = %key, ?params, "notification");
        self.push(NotificationLevel::Info, key, params, None);
    }

    pub fn warning(&mut self, key: NotificationKey, params: BTreeMap<String, String>) {
        tracing::warn!(key = %key, ?params, "notification");
        self.push(NotificationLevel::Warning, key, params, None);
    }

    pub fn error(&mut self, key: NotificationKey, params: BTreeMap<String, String>) {
        tracing::error!(key = %key, ?params, "notification");
        self.push(NotificationLevel::Error, key, params, None);
    }

    /// Sets how long the most recent notification should stay visible.
    pub fn with_duration(&mut self, duration_ms: u64) -> &mut Self {
        if let Some(last) = self.pending.last_mut() {
            last.duration_ms = Some(duration_ms);
        }
        self
    }

    pub fn pending(&self) -> &[Notification] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    fn push(
        &mut self,
        level: NotificationLevel,
        key: NotificationKey,
        params: BTreeMap<String, String>,
        duration_ms: Option<u64>,
    ) {
        self.pending.push(Notification {
            level,
            key,
            params,
            duration_ms,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_render_camel_case() {
        assert_eq!(NotificationKey::NotEnoughMaterials.to_string(), "notEnoughMaterials");
        assert_eq!(NotificationKey::InsufficientPower.as_ref(), "insufficientPower");
    }

    #[test]
    fn drain_empties_the_queue() {
        let mut notifications = Notifications::new();
        notifications.warning(
            NotificationKey::NotEnoughMaterials,
            params([("actionId", "chop".to_owned())]),
        );
        notifications.with_duration(5000);
        let drained = notifications.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].level, NotificationLevel::Warning);
        assert_eq!(drained[0].duration_ms, Some(5000));
        assert!(notifications.pending().is_empty());
    }
}
