//! Actions: resolving catalog entries and queueing them.
pub mod queue;
pub mod resolver;

pub use queue::{ActionQueue, ActionQueueItem, QueueItemKind, QueuedAction, Timestamp};
pub use resolver::{Action, ActionResolver};
