//! Injectable time for the scheduler.
//!
//! Production uses the monotonic clock; tests drive a `ManualTime` so pacing
//! behavior is exact and instant.

use std::time::Instant;

/// Provider of "now" in milliseconds.  Only differences matter; the epoch is
/// arbitrary.
pub trait TimeSource {
    fn now_ms(&mut self) -> f64;
}

/// Wall-clock-independent monotonic time.
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now_ms(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1_000.0
    }
}

/// Hand-cranked time for deterministic tests.
pub struct ManualTime {
    now: f64,
}

impl ManualTime {
    pub fn new() -> Self {
        Self { now: 0.0 }
    }

    /// Move time forward by `ms`.
    pub fn advance(&mut self, ms: f64) {
        self.now += ms;
    }
}

impl Default for ManualTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualTime {
    fn now_ms(&mut self) -> f64 {
        self.now
    }
}
