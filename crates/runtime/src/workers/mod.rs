//! Background workers that own game state.

mod simulation;

pub use simulation::{Command, QueueCommand, SimulationWorker};
