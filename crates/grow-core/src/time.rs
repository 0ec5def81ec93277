//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter.  One tick
//! covers a fixed span of simulated time expressed by `TickLength` (minutes of
//! in-game time per tick).  The scheduler separately decides how many *real*
//! milliseconds one tick takes; that pacing never leaks into this module.
//!
//! Using an integer tick as the canonical time unit means all schedule
//! arithmetic is exact (no floating-point drift) and comparisons are O(1).
//! The default tick length is 60 simulated minutes (1 in-game hour).

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
///
/// Stored as `u64` to avoid overflow: at one tick per real second a u64 lasts
/// ~585 billion years, far beyond any conceivable session.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TickLength ────────────────────────────────────────────────────────────────

/// How much simulated time one tick covers, in in-game minutes.
///
/// Cheap to copy; carried in world metadata and threaded into every phase
/// handler so growth/degradation rates scale with the configured resolution.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TickLength(pub f64);

impl TickLength {
    /// One simulated hour per tick.
    pub const HOUR: TickLength = TickLength(60.0);

    /// Simulated hours covered by one tick.  Non-finite or non-positive
    /// lengths collapse to zero so downstream rates stall instead of
    /// exploding.
    #[inline]
    pub fn as_hours(self) -> f64 {
        if self.0.is_finite() && self.0 > 0.0 {
            self.0 / 60.0
        } else {
            0.0
        }
    }

    /// Real milliseconds one tick takes at speed 1.0 (one simulated minute is
    /// paced as one real second).
    #[inline]
    pub fn interval_ms(self) -> f64 {
        self.0 * 1_000.0
    }

    // ── Tick-count helpers ────────────────────────────────────────────────

    /// How many ticks span `hours` simulated hours? (rounds up)
    #[inline]
    pub fn ticks_for_hours(self, hours: u64) -> u64 {
        let minutes = hours * 60;
        (minutes as f64 / self.0).ceil() as u64
    }

    #[inline]
    pub fn ticks_for_days(self, days: u64) -> u64 {
        self.ticks_for_hours(days * 24)
    }
}

impl Default for TickLength {
    fn default() -> Self {
        TickLength::HOUR
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The simulation clock — the only piece of World State the scheduler mutates
/// directly.
///
/// The tick counter advances exactly once per processed tick (in the commit
/// phase); `is_paused` and `target_tick_rate` mirror the scheduler so state
/// snapshots are self-describing.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// The current tick — advanced by [`SimClock::advance`] each tick commit.
    pub tick: Tick,
    /// Whether automatic ticking is currently suspended.
    pub is_paused: bool,
    /// Current speed multiplier the scheduler is targeting.
    pub target_tick_rate: f64,
    /// Unix timestamp (milliseconds) when the session started.
    pub started_at_unix_ms: i64,
    /// Unix timestamp (milliseconds) of the last committed tick.
    pub last_updated_unix_ms: i64,
}

impl SimClock {
    /// Create a fresh, paused clock at tick zero.
    pub fn new(started_at_unix_ms: i64) -> Self {
        Self {
            tick: Tick::ZERO,
            is_paused: true,
            target_tick_rate: 1.0,
            started_at_unix_ms,
            last_updated_unix_ms: started_at_unix_ms,
        }
    }

    /// Advance the clock by one tick, stamping the commit time.
    #[inline]
    pub fn advance(&mut self, now_unix_ms: i64) {
        self.tick = Tick(self.tick.0 + 1);
        self.last_updated_unix_ms = now_unix_ms;
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, x{})",
            self.tick,
            if self.is_paused { "paused" } else { "running" },
            self.target_tick_rate,
        )
    }
}

/// Current wall-clock time as Unix milliseconds.
pub fn unix_ms_now() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
