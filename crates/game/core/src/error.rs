//! Common error infrastructure for idle-core.
//!
//! Configuration lookups are the only failures that surface as `Err` from the
//! simulation: they indicate an unknown id and are a programmer error at the
//! call site. Running out of materials, a level that is too low or a fight
//! that cannot be won are never errors; the runner stops the queue item and
//! emits a notification instead.

use crate::fixed::FixedPoint;
use crate::ids::{ActionId, EnemyId, ItemId, SkillId};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller can retry with different input or after state changes
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: unrecoverable errors indicating corrupted state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all idle-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Unknown ids or ids of the wrong shape in the static catalog.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("action `{0}` not found")]
    ActionNotFound(ActionId),

    #[error("item `{0}` not found")]
    ItemNotFound(ItemId),

    #[error("skill `{0}` not found")]
    SkillNotFound(SkillId),

    #[error("enemy `{0}` not found")]
    EnemyNotFound(EnemyId),

    #[error("item `{0}` is not a chest")]
    NotAChest(ItemId),

    #[error("item `{0}` is not equipment")]
    NotEquipment(ItemId),

    #[error("item `{0}` is not a consumable")]
    NotConsumable(ItemId),
}

impl GameError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ActionNotFound(_) => "ACTION_NOT_FOUND",
            Self::ItemNotFound(_) => "ITEM_NOT_FOUND",
            Self::SkillNotFound(_) => "SKILL_NOT_FOUND",
            Self::EnemyNotFound(_) => "ENEMY_NOT_FOUND",
            Self::NotAChest(_) => "NOT_A_CHEST",
            Self::NotEquipment(_) => "NOT_EQUIPMENT",
            Self::NotConsumable(_) => "NOT_CONSUMABLE",
        }
    }
}

/// Inventory ledger failures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("not enough `{item}`: requested {requested}, available {available}")]
    Insufficient {
        item: ItemId,
        requested: u64,
        available: u64,
    },
}

impl GameError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Insufficient { .. } => "INVENTORY_INSUFFICIENT",
        }
    }
}

/// Failures of player commands (equip, consumable slots, opening chests).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("nothing equipped in slot `{0}`")]
    SlotEmpty(String),

    #[error("consumable slot {slot} out of range for skill `{skill}` ({available} slots)")]
    SlotOutOfRange {
        skill: SkillId,
        slot: usize,
        available: usize,
    },

    #[error("consumable `{item}` belongs to skill `{expected}`, not `{skill}`")]
    WrongSkill {
        item: ItemId,
        expected: SkillId,
        skill: SkillId,
    },
}

impl GameError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Config(e) => e.severity(),
            Self::Inventory(e) => e.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Inventory(e) => e.error_code(),
            Self::SlotEmpty(_) => "SLOT_EMPTY",
            Self::SlotOutOfRange { .. } => "SLOT_OUT_OF_RANGE",
            Self::WrongSkill { .. } => "WRONG_SKILL",
        }
    }
}

/// Queue index outside the current queue length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("queue index {index} out of range (len {len})")]
pub struct QueueIndexError {
    pub index: usize,
    pub len: usize,
}

impl GameError for QueueIndexError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "QUEUE_INDEX_OUT_OF_RANGE"
    }
}

/// Returned by [`crate::stats::SelfSolve::into_result`] when a
/// caller asks for a strict solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("self-referential value did not converge after {iterations} iterations (last {last})")]
pub struct ConvergenceError {
    pub iterations: u32,
    pub last: FixedPoint,
}

impl GameError for ConvergenceError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        "NOT_CONVERGED"
    }
}
