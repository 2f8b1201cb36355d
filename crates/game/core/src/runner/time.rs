use crate::action::Timestamp;

/// Result of one [`TimeManager::frame`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Not running; the update was skipped.
    Idle,
    /// The update ran and the loop keeps going.
    Ran { delta_ms: u64 },
    /// The update ran and the stop predicate ended the loop.
    Stopped { delta_ms: u64 },
}

/// Start/stop state of the frame loop that drives the runner.
///
/// The frame source itself (a display callback, a timer) belongs to the
/// caller; this only decides whether a frame does work.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeManager {
    running: bool,
    last_frame: Option<Timestamp>,
}

impl TimeManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Starts the loop. Returns false if it was already running.
    pub fn start(&mut self, now: Timestamp) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.last_frame = Some(now);
        tracing::debug!(now, "time manager started");
        true
    }

    /// Stops the loop. Returns false if it was already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.last_frame = None;
        tracing::debug!("time manager stopped");
        true
    }

    /// Runs `update(ctx, now)` if running, then stops if `should_stop(ctx)`
    /// holds.
    pub fn frame<C, U, S>(
        &mut self,
        now: Timestamp,
        ctx: &mut C,
        update: U,
        should_stop: S,
    ) -> FrameOutcome
    where
        U: FnOnce(&mut C, Timestamp),
        S: FnOnce(&C) -> bool,
    {
        if !self.running {
            return FrameOutcome::Idle;
        }
        let delta_ms = self
            .last_frame
            .map_or(0, |last| now.saturating_sub(last));
        self.last_frame = Some(now);

        update(ctx, now);

        if should_stop(ctx) {
            self.stop();
            FrameOutcome::Stopped { delta_ms }
        } else {
            FrameOutcome::Ran { delta_ms }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut time = TimeManager::new();
        assert!(time.start(0));
        assert!(!time.start(10));
        assert!(time.is_running());
        assert!(time.stop());
        assert!(!time.stop());
        assert!(!time.is_running());
    }

    #[test]
    fn idle_frames_skip_the_update() {
        let mut time = TimeManager::new();
        let mut calls = 0;
        let outcome = time.frame(5, &mut calls, |calls, _| *calls += 1, |_| false);
        assert_eq!(outcome, FrameOutcome::Idle);
        assert_eq!(calls, 0);
    }

    #[test]
    fn stops_after_predicate_holds() {
        let mut time = TimeManager::new();
        time.start(100);

        let mut seen: Vec<Timestamp> = Vec::new();
        let record = |seen: &mut Vec<Timestamp>, now| seen.push(now);
        assert_eq!(
            time.frame(116, &mut seen, record, |seen| seen.len() >= 2),
            FrameOutcome::Ran { delta_ms: 16 }
        );
        assert_eq!(
            time.frame(150, &mut seen, record, |seen| seen.len() >= 2),
            FrameOutcome::Stopped { delta_ms: 34 }
        );
        assert!(!time.is_running());
        assert_eq!(seen, vec![116, 150]);
        assert_eq!(
            time.frame(200, &mut seen, record, |_| false),
            FrameOutcome::Idle
        );
        assert_eq!(seen.len(), 2);
    }
}
