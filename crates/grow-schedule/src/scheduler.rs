//! The `TickScheduler` pacing state machine.
//!
//! States: `stopped → running ⇄ paused → stopped`.  Pausing freezes further
//! automatic ticks without resetting the frame accumulator; starting resets
//! it.  Tick-callback failures are isolated per tick: the scheduler records
//! them in the pump report and keeps going, stopping itself only after
//! `max_consecutive_failures` back-to-back failures (a persistently failing
//! tick is a corruption signal, not a transient).

use std::fmt;

use crate::error::{ScheduleError, ScheduleResult};
use crate::time_source::{MonotonicTime, TimeSource};

/// Comparison tolerance for speed multipliers.
const SPEED_EPSILON: f64 = f64::EPSILON;

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Real milliseconds per tick at speed 1.0.
    pub tick_interval_ms: f64,
    /// Initial speed multiplier.
    pub speed: f64,
    /// Cap on catch-up ticks executed within one pump call.  Bounds
    /// worst-case latency after the host was suspended.
    pub max_ticks_per_frame: u32,
    /// Consecutive tick failures after which the scheduler stops itself.
    pub max_consecutive_failures: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1_000.0,
            speed: 1.0,
            max_ticks_per_frame: 5,
            max_consecutive_failures: 5,
        }
    }
}

// ── Reports ───────────────────────────────────────────────────────────────────

/// Outcome of one [`TickScheduler::pump`] call.
#[derive(Debug, Default)]
pub struct PumpReport {
    /// Ticks executed this frame (successful or not).
    pub executed: u32,
    /// Error messages from failed ticks, in execution order.
    pub failures: Vec<String>,
    /// `true` if the consecutive-failure bound stopped the scheduler.
    pub stopped: bool,
}

/// Outcome of one [`TickScheduler::step`] call.
#[derive(Debug)]
pub struct StepReport {
    pub requested: u32,
    pub executed: u32,
    /// Error from the first failed tick; stepping halts there.
    pub failure: Option<String>,
}

/// Outcome of [`TickScheduler::resume`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ResumeOutcome {
    /// Scheduler was paused; automatic ticking resumed.
    Resumed,
    /// Already running and unpaused — a no-op worth a warning, not an error.
    AlreadyRunning,
    /// Never started — also a no-op warning; `start()` is the only way in.
    Stopped,
}

/// Outcome of [`TickScheduler::set_speed`].
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpeedChange {
    pub speed: f64,
    /// `false` when the requested multiplier equalled the current one.
    pub changed: bool,
}

// ── TickScheduler ─────────────────────────────────────────────────────────────

pub struct TickScheduler<T: TimeSource = MonotonicTime> {
    config: SchedulerConfig,
    time: T,
    running: bool,
    paused: bool,
    speed: f64,
    accumulator: f64,
    last_timestamp: f64,
    consecutive_failures: u32,
}

impl TickScheduler<MonotonicTime> {
    pub fn new(config: SchedulerConfig) -> Self {
        Self::with_time_source(config, MonotonicTime::new())
    }
}

impl<T: TimeSource> TickScheduler<T> {
    pub fn with_time_source(config: SchedulerConfig, time: T) -> Self {
        let speed = config.speed;
        Self {
            config,
            time,
            running: false,
            paused: false,
            speed,
            accumulator: 0.0,
            last_timestamp: 0.0,
            consecutive_failures: 0,
        }
    }

    // ── State inspection ──────────────────────────────────────────────────

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.running && self.paused
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Effective real milliseconds between automatic ticks at the current
    /// speed.
    pub fn effective_interval_ms(&self) -> f64 {
        self.config.tick_interval_ms / self.speed
    }

    /// Mutable access to the injected time source (tests advance
    /// `ManualTime` through this).
    pub fn time_mut(&mut self) -> &mut T {
        &mut self.time
    }

    /// Re-bound the per-frame catch-up burst.  Takes effect on the next pump.
    pub fn set_max_ticks_per_frame(&mut self, cap: u32) {
        self.config.max_ticks_per_frame = cap.max(1);
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Begin automatic scheduling.  Resets the frame accumulator.
    pub fn start(&mut self) -> ScheduleResult<()> {
        if self.running {
            return Err(ScheduleError::AlreadyRunning);
        }
        self.running = true;
        self.paused = false;
        self.accumulator = 0.0;
        self.consecutive_failures = 0;
        self.last_timestamp = self.time.now_ms();
        Ok(())
    }

    /// Stop automatic scheduling and discard accumulated frame time.
    pub fn stop(&mut self) {
        self.running = false;
        self.paused = false;
        self.accumulator = 0.0;
    }

    /// Freeze automatic ticks.  The accumulator is preserved, so resuming
    /// continues exactly where pacing left off.
    pub fn pause(&mut self) -> ScheduleResult<()> {
        if !self.running {
            return Err(ScheduleError::NotRunning);
        }
        self.paused = true;
        Ok(())
    }

    /// Restart automatic ticking from a paused state.  Idempotent: resuming
    /// while stopped or while already-running-and-unpaused is a no-op outcome
    /// rather than an error.
    pub fn resume(&mut self) -> ResumeOutcome {
        if !self.running {
            return ResumeOutcome::Stopped;
        }
        if !self.paused {
            return ResumeOutcome::AlreadyRunning;
        }
        self.paused = false;
        self.last_timestamp = self.time.now_ms();
        ResumeOutcome::Resumed
    }

    /// Change cadence without stopping.  Rejects non-finite or non-positive
    /// multipliers; reports `changed: false` when the value is unchanged.
    pub fn set_speed(&mut self, multiplier: f64) -> ScheduleResult<SpeedChange> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(ScheduleError::InvalidSpeed(multiplier));
        }
        if (multiplier - self.speed).abs() < SPEED_EPSILON {
            return Ok(SpeedChange { speed: self.speed, changed: false });
        }
        self.speed = multiplier;
        Ok(SpeedChange { speed: multiplier, changed: true })
    }

    // ── Tick execution ────────────────────────────────────────────────────

    /// Execute all automatic ticks due for the current frame.
    ///
    /// Call this from the host loop.  Does nothing while stopped or paused
    /// (elapsed time is still observed so a paused frame never produces a
    /// catch-up burst on resume).
    pub fn pump<E: fmt::Display>(
        &mut self,
        mut tick: impl FnMut() -> Result<(), E>,
    ) -> PumpReport {
        let mut report = PumpReport::default();
        if !self.running {
            return report;
        }

        let now = self.time.now_ms();
        let delta = (now - self.last_timestamp).max(0.0);
        self.last_timestamp = now;

        if self.paused {
            return report;
        }
        self.accumulator += delta * self.speed;

        while self.running
            && self.accumulator >= self.config.tick_interval_ms
            && report.executed < self.config.max_ticks_per_frame
        {
            self.accumulator -= self.config.tick_interval_ms;
            report.executed += 1;

            match tick() {
                Ok(()) => self.consecutive_failures = 0,
                Err(error) => {
                    self.consecutive_failures += 1;
                    report.failures.push(error.to_string());
                    if self.consecutive_failures >= self.config.max_consecutive_failures {
                        self.stop();
                        report.stopped = true;
                    }
                }
            }
        }

        // Drop whatever catch-up debt exceeds one full burst; a host that was
        // suspended for minutes should not spin at max rate to replay it all.
        let burst = self.config.tick_interval_ms * self.config.max_ticks_per_frame as f64;
        if self.accumulator > burst {
            self.accumulator = burst;
        }

        report
    }

    /// Execute exactly `n` tick callbacks regardless of run state.
    ///
    /// Used for deterministic testing and fast-forwarding.  Pacing state is
    /// untouched; a failed tick halts the remaining steps and is reported.
    pub fn step<E: fmt::Display>(
        &mut self,
        n: u32,
        mut tick: impl FnMut() -> Result<(), E>,
    ) -> StepReport {
        let mut report = StepReport { requested: n, executed: 0, failure: None };
        for _ in 0..n {
            match tick() {
                Ok(()) => report.executed += 1,
                Err(error) => {
                    report.failure = Some(error.to_string());
                    break;
                }
            }
        }
        report
    }
}
