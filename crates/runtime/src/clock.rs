//! Wall clock for the simulation worker.

use idle_core::Timestamp;
use tokio::time::Instant;

/// Epoch-millisecond clock anchored at worker start.
///
/// Elapsed time comes from the monotonic tokio clock, so a paused test
/// runtime controls it. `skip` adds a permanent offset for fast-forwards.
#[derive(Clone, Copy, Debug)]
pub struct GameClock {
    origin: Instant,
    origin_ms: Timestamp,
    skipped_ms: u64,
}

impl GameClock {
    pub fn start() -> Self {
        Self::starting_at(wall_clock_ms())
    }

    pub fn starting_at(origin_ms: Timestamp) -> Self {
        Self {
            origin: Instant::now(),
            origin_ms,
            skipped_ms: 0,
        }
    }

    pub fn now(&self) -> Timestamp {
        let elapsed = u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.origin_ms
            .saturating_add(elapsed)
            .saturating_add(self.skipped_ms)
    }

    pub fn skip(&mut self, duration_ms: u64) {
        self.skipped_ms = self.skipped_ms.saturating_add(duration_ms);
    }
}

fn wall_clock_ms() -> Timestamp {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}
