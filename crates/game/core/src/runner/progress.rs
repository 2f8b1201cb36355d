use crate::action::{Action, ActionQueueItem};
use crate::fixed::FixedPoint;

/// Progress-bar percentages for the front queue item.
///
/// Pure reads: elapsed over duration, clamped to `[0, 1]` and scaled to
/// `[0, 100]`.
pub struct ProgressCalculator;

impl ProgressCalculator {
    const HUNDRED: FixedPoint = FixedPoint::from_int(100);

    pub fn production(elapsed_ms: u64, action: &Action) -> FixedPoint {
        Self::percent(elapsed_ms, action.duration_seconds)
    }

    /// Combat progress uses the battle duration recorded on the queue item;
    /// an item whose battle has not started yet reads 0.
    pub fn combat(elapsed_ms: u64, item: &ActionQueueItem) -> FixedPoint {
        item.combat_duration_seconds
            .map(|duration| Self::percent(elapsed_ms, duration))
            .unwrap_or(FixedPoint::ZERO)
    }

    pub fn percent(elapsed_ms: u64, duration: FixedPoint) -> FixedPoint {
        FixedPoint::from_millis(elapsed_ms)
            .ratio_of(duration)
            .mul(Self::HUNDRED)
    }
}
