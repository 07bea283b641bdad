//! Wall clock collaborator

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current wall-clock time for the "now" action.
pub trait WallClock {
    /// Milliseconds since the Unix epoch, negative before it.
    fn now_millis(&self) -> i64;
}

/// System wall clock backed by `std::time::SystemTime`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now_millis(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(since) => since.as_millis() as i64,
            // Clock set before 1970: count backwards from the epoch.
            Err(before) => -(before.duration().as_millis() as i64),
        }
    }
}

/// Frozen clock for tests and deterministic simulations.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedClock(pub i64);

impl WallClock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}
