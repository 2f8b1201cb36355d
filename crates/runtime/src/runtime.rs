//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the game.

use std::path::PathBuf;
use std::time::Duration;

use idle_content::ContentFactory;
use idle_core::{Game, GameCatalog, GameConfig, Timestamp};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::clock::GameClock;
use crate::events::{Event, EventBus, Topic};
use crate::workers::SimulationWorker;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Period of the frame timer that drives the runner.
    pub frame_interval: Duration,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Epoch milliseconds the game clock starts at; the wall clock if unset.
    pub start_time_ms: Option<Timestamp>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            frame_interval: Duration::from_millis(16),
            event_buffer_size: 100,
            command_buffer_size: 32,
            start_time_ms: None,
        }
    }
}

/// Main runtime that owns the simulation worker.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker exits once every handle, including clones given out by
    /// [`Runtime::handle`], has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
///
/// The game comes from, in order of precedence: [`game`](Self::game),
/// [`content_dir`](Self::content_dir), [`catalog`](Self::catalog).
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    game: Option<Game>,
    catalog: Option<GameCatalog>,
    content_dir: Option<PathBuf>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            game: None,
            catalog: None,
            content_dir: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Run an existing game.
    pub fn game(mut self, game: Game) -> Self {
        self.game = Some(game);
        self
    }

    /// Start a fresh game on `catalog` with the configured [`GameConfig`].
    pub fn catalog(mut self, catalog: GameCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Load `game.toml` and the catalog from a content directory.
    pub fn content_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.content_dir = Some(dir.into());
        self
    }

    /// Build the runtime and spawn the simulation worker.
    pub async fn build(self) -> Result<Runtime> {
        let RuntimeBuilder {
            config,
            game,
            catalog,
            content_dir,
        } = self;

        let game = match (game, content_dir, catalog) {
            (Some(game), _, _) => game,
            (None, Some(dir), _) => ContentFactory::new(dir)
                .load_game()
                .map_err(|err| RuntimeError::Content(err.into()))?,
            (None, None, Some(catalog)) => Game::new(catalog, config.game_config.clone()),
            (None, None, None) => return Err(RuntimeError::MissingGame),
        };

        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let clock = config
            .start_time_ms
            .map_or_else(GameClock::start, GameClock::starting_at);

        let worker = SimulationWorker::new(
            game,
            clock,
            config.frame_interval,
            command_rx,
            event_bus.clone(),
        );
        let sim_worker_handle = tokio::spawn(worker.run());
        tracing::debug!(frame_interval = ?config.frame_interval, "simulation worker spawned");

        Ok(Runtime {
            handle: RuntimeHandle::new(command_tx, event_bus),
            sim_worker_handle,
        })
    }
}
