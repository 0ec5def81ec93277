//! `grow-schedule` — the cooperative tick scheduler.
//!
//! # Crate layout
//!
//! | Module          | Contents                                            |
//! |-----------------|-----------------------------------------------------|
//! | [`scheduler`]   | `TickScheduler` — pacing state machine              |
//! | [`time_source`] | `TimeSource` trait, `MonotonicTime`, `ManualTime`   |
//! | [`error`]       | `ScheduleError`, `ScheduleResult<T>`                |
//!
//! # Pacing model
//!
//! The scheduler never owns a thread.  The host calls
//! [`TickScheduler::pump`] from its own loop; the scheduler measures the
//! elapsed frame time, feeds a frame accumulator (`elapsed × speed`), and
//! executes the tick callback once per full tick interval accumulated —
//! capped at `max_ticks_per_frame` so a suspended host catches up with
//! bounded work instead of a runaway burst.
//!
//! Manual [`step`][TickScheduler::step] bypasses pacing entirely: it runs
//! exactly `n` callbacks regardless of run state and leaves the accumulator
//! untouched.

pub mod error;
pub mod scheduler;
pub mod time_source;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{ScheduleError, ScheduleResult};
pub use scheduler::{
    PumpReport, ResumeOutcome, SchedulerConfig, SpeedChange, StepReport, TickScheduler,
};
pub use time_source::{ManualTime, MonotonicTime, TimeSource};
