use idle_core::{CommandError, ConfigError, QueueIndexError};
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinError;

/// Errors surfaced by the runtime orchestrator and its public API.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("command channel closed")]
    CommandChannelClosed,

    #[error("reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] JoinError),

    #[error("no game, catalog or content directory configured")]
    MissingGame,

    #[error("failed to load content")]
    Content(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    QueueIndex(#[from] QueueIndexError),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
