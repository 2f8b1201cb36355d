//! Stat System
//!
//! Stats are named numeric values built from a base and the effects that
//! sources (equipment, consumables, skill levels) register against them.
//!
//! # Architecture
//!
//! ```text
//! [ Effects by source ]  ──►  [ StatEngine ]  ──►  stat value (duration window)
//!                                  │
//!                                  ▼
//!                        [ DerivedResolver ]  ──►  action duration / xp / chest points
//! ```
//!
//! ## Principles
//!
//! 1. **Recompute on read**: nothing is cached, inputs change continuously
//! 2. **Wholesale replacement**: a source's effect set is replaced, never merged
//! 3. **Duration windows**: time-limited sources only count if they cover the window
//! 4. **Deterministic**: FixedPoint arithmetic, ordered source iteration

pub mod derived;
pub mod engine;
pub mod modifier;

pub use derived::{
    CONVERGENCE_TOLERANCE, DerivedModifier, DerivedResolver, DerivedValueConfig, DurationWindow,
    MAX_SELF_ITERATIONS, ModifierOverride, SelfSolve, SolveStatus,
};
pub use engine::{AlwaysAvailable, EffectAvailability, StatEngine, StatRef};
pub use modifier::{Availability, Effect, EffectKind, EffectSource, Modifier, ModifierStack};
