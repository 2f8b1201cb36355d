//! Async runtime for the idle simulation.
//!
//! A single worker task owns the [`idle_core::Game`], applies client commands
//! and drives the action runner from a frame timer while the queue has work.
//! Consumers embed [`Runtime`] and talk to it through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`clock`] maps tokio time onto epoch milliseconds
pub mod api;
pub mod clock;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use clock::GameClock;
pub use events::{BattleEvent, Event, EventBus, QueueEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
