//! Topic-based event bus implementation.

use std::sync::Arc;

use idle_core::Notification;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{BattleEvent, QueueEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Player-facing notifications (loot, level-ups, stopped actions)
    Notifications,
    /// Queue contents and start date
    Queue,
    /// Battle lifecycle and live frames
    Combat,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Notification(Notification),
    Queue(QueueEvent),
    Combat(BattleEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Notification(_) => Topic::Notifications,
            Event::Queue(_) => Topic::Queue,
            Event::Combat(_) => Topic::Combat,
        }
    }
}

struct Channels {
    notifications: broadcast::Sender<Event>,
    queue: broadcast::Sender<Event>,
    combat: broadcast::Sender<Event>,
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Events are best-effort: a lagging subscriber
/// loses the oldest ones.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                notifications: broadcast::channel(capacity).0,
                queue: broadcast::channel(capacity).0,
                combat: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Notifications => &self.channels.notifications,
            Topic::Queue => &self.channels.queue,
            Topic::Combat => &self.channels.combat,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idle_core::ActionQueue;

    #[test]
    fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(4);
        let mut queue_rx = bus.subscribe(Topic::Queue);
        let mut combat_rx = bus.subscribe(Topic::Combat);

        let event = Event::Queue(QueueEvent::from_queue(&ActionQueue::new()));
        bus.publish(event.clone());

        assert_eq!(queue_rx.try_recv().unwrap(), event);
        assert!(combat_rx.try_recv().is_err());
    }
}
