//! Unit tests for scheduler pacing.

use crate::error::ScheduleError;
use crate::scheduler::{ResumeOutcome, SchedulerConfig, TickScheduler};
use crate::time_source::ManualTime;

fn manual_scheduler(interval_ms: f64, max_per_frame: u32) -> TickScheduler<ManualTime> {
    TickScheduler::with_time_source(
        SchedulerConfig {
            tick_interval_ms: interval_ms,
            speed: 1.0,
            max_ticks_per_frame: max_per_frame,
            max_consecutive_failures: 5,
        },
        ManualTime::new(),
    )
}

/// A tick callback that always succeeds, counting invocations.
fn counting(counter: &mut u32) -> impl FnMut() -> Result<(), &'static str> + '_ {
    move || {
        *counter += 1;
        Ok(())
    }
}

#[cfg(test)]
mod state_machine {
    use super::*;

    #[test]
    fn start_twice_conflicts() {
        let mut scheduler = manual_scheduler(100.0, 5);
        scheduler.start().unwrap();
        assert_eq!(scheduler.start().unwrap_err(), ScheduleError::AlreadyRunning);
    }

    #[test]
    fn pause_before_start_is_invalid() {
        let mut scheduler = manual_scheduler(100.0, 5);
        assert_eq!(scheduler.pause().unwrap_err(), ScheduleError::NotRunning);
    }

    #[test]
    fn resume_outcomes() {
        let mut scheduler = manual_scheduler(100.0, 5);
        assert_eq!(scheduler.resume(), ResumeOutcome::Stopped);
        assert!(!scheduler.is_running(), "cold resume must not start");
        scheduler.start().unwrap();
        assert_eq!(scheduler.resume(), ResumeOutcome::AlreadyRunning);
        scheduler.pause().unwrap();
        assert_eq!(scheduler.resume(), ResumeOutcome::Resumed);
    }

    #[test]
    fn stop_resets_pacing() {
        let mut scheduler = manual_scheduler(100.0, 5);
        scheduler.start().unwrap();
        scheduler.time_mut().advance(250.0);
        let mut ticks = 0;
        scheduler.pump(counting(&mut ticks));
        scheduler.stop();
        assert!(!scheduler.is_running());
        assert!(!scheduler.is_paused());
    }
}

#[cfg(test)]
mod pacing {
    use super::*;

    #[test]
    fn accumulator_executes_one_tick_per_interval() {
        let mut scheduler = manual_scheduler(100.0, 10);
        scheduler.start().unwrap();

        let mut ticks = 0;
        scheduler.time_mut().advance(250.0);
        let report = scheduler.pump(counting(&mut ticks));
        assert_eq!(report.executed, 2);

        // 50 ms of debt remains: one more tick after another 50 ms.
        scheduler.time_mut().advance(50.0);
        let report = scheduler.pump(counting(&mut ticks));
        assert_eq!(report.executed, 1);
        assert_eq!(ticks, 3);
    }

    #[test]
    fn speed_multiplier_scales_cadence() {
        let mut scheduler = manual_scheduler(100.0, 10);
        scheduler.start().unwrap();
        scheduler.set_speed(2.0).unwrap();

        let mut ticks = 0;
        scheduler.time_mut().advance(100.0);
        let report = scheduler.pump(counting(&mut ticks));
        // 100 ms × 2.0 = two intervals.
        assert_eq!(report.executed, 2);
        assert_eq!(scheduler.effective_interval_ms(), 50.0);
    }

    #[test]
    fn set_speed_rejects_bad_multipliers_and_detects_no_change() {
        let mut scheduler = manual_scheduler(100.0, 5);
        assert!(matches!(
            scheduler.set_speed(0.0),
            Err(ScheduleError::InvalidSpeed(_))
        ));
        assert!(matches!(
            scheduler.set_speed(f64::NAN),
            Err(ScheduleError::InvalidSpeed(_))
        ));
        assert!(scheduler.set_speed(2.0).unwrap().changed);
        assert!(!scheduler.set_speed(2.0).unwrap().changed);
    }

    #[test]
    fn max_ticks_per_frame_caps_catch_up() {
        let mut scheduler = manual_scheduler(100.0, 3);
        scheduler.start().unwrap();

        let mut ticks = 0;
        scheduler.time_mut().advance(10_000.0); // 100 intervals of debt
        let report = scheduler.pump(counting(&mut ticks));
        assert_eq!(report.executed, 3);

        // Leftover debt is clamped to one burst, not the full backlog.
        scheduler.time_mut().advance(0.0);
        let report = scheduler.pump(counting(&mut ticks));
        assert_eq!(report.executed, 3);
        let report = scheduler.pump(counting(&mut ticks));
        assert_eq!(report.executed, 0);
    }

    #[test]
    fn paused_frames_accumulate_nothing() {
        let mut scheduler = manual_scheduler(100.0, 5);
        scheduler.start().unwrap();
        scheduler.pause().unwrap();

        let mut ticks = 0;
        scheduler.time_mut().advance(1_000.0);
        let report = scheduler.pump(counting(&mut ticks));
        assert_eq!(report.executed, 0);

        // Resume: the paused second must not replay as a burst.
        scheduler.resume();
        scheduler.time_mut().advance(100.0);
        let report = scheduler.pump(counting(&mut ticks));
        assert_eq!(report.executed, 1);
    }

    #[test]
    fn pause_preserves_partial_accumulator() {
        let mut scheduler = manual_scheduler(100.0, 5);
        scheduler.start().unwrap();

        let mut ticks = 0;
        scheduler.time_mut().advance(60.0);
        scheduler.pump(counting(&mut ticks)); // 60 ms banked, no tick yet
        scheduler.pause().unwrap();
        scheduler.resume();

        scheduler.time_mut().advance(40.0);
        let report = scheduler.pump(counting(&mut ticks));
        assert_eq!(report.executed, 1, "60 banked + 40 new = one interval");
    }

    #[test]
    fn pump_while_stopped_is_a_no_op() {
        let mut scheduler = manual_scheduler(100.0, 5);
        let mut ticks = 0;
        scheduler.time_mut().advance(1_000.0);
        let report = scheduler.pump(counting(&mut ticks));
        assert_eq!(report.executed, 0);
        assert_eq!(ticks, 0);
    }
}

#[cfg(test)]
mod stepping {
    use super::*;

    #[test]
    fn step_runs_exactly_n_in_any_state() {
        let mut scheduler = manual_scheduler(100.0, 5);

        let mut ticks = 0;
        // Stopped.
        assert_eq!(scheduler.step(3, counting(&mut ticks)).executed, 3);
        // Running.
        scheduler.start().unwrap();
        assert_eq!(scheduler.step(2, counting(&mut ticks)).executed, 2);
        // Paused.
        scheduler.pause().unwrap();
        assert_eq!(scheduler.step(1, counting(&mut ticks)).executed, 1);
        assert_eq!(ticks, 6);
    }

    #[test]
    fn step_does_not_disturb_the_accumulator() {
        let mut scheduler = manual_scheduler(100.0, 5);
        scheduler.start().unwrap();
        scheduler.time_mut().advance(50.0);
        let mut ticks = 0;
        scheduler.pump(counting(&mut ticks)); // banks 50 ms

        scheduler.step(4, counting(&mut ticks));

        scheduler.time_mut().advance(50.0);
        let report = scheduler.pump(counting(&mut ticks));
        assert_eq!(report.executed, 1, "banked 50 + 50 = one interval");
    }

    #[test]
    fn step_halts_on_first_failure() {
        let mut scheduler = manual_scheduler(100.0, 5);
        let mut calls = 0;
        let report = scheduler.step(5, || {
            calls += 1;
            if calls == 3 { Err("third tick failed") } else { Ok(()) }
        });
        assert_eq!(report.executed, 2);
        assert_eq!(report.failure.as_deref(), Some("third tick failed"));
    }
}

#[cfg(test)]
mod failure_isolation {
    use super::*;

    #[test]
    fn single_failure_does_not_stop_the_scheduler() {
        let mut scheduler = manual_scheduler(100.0, 10);
        scheduler.start().unwrap();
        scheduler.time_mut().advance(300.0);

        let mut calls = 0;
        let report = scheduler.pump(|| {
            calls += 1;
            if calls == 1 { Err("hiccup") } else { Ok::<(), &str>(()) }
        });
        assert_eq!(report.executed, 3);
        assert_eq!(report.failures.len(), 1);
        assert!(!report.stopped);
        assert!(scheduler.is_running());
    }

    #[test]
    fn consecutive_failures_stop_the_scheduler() {
        let mut scheduler = TickScheduler::with_time_source(
            SchedulerConfig {
                tick_interval_ms: 100.0,
                speed: 1.0,
                max_ticks_per_frame: 10,
                max_consecutive_failures: 3,
            },
            ManualTime::new(),
        );
        scheduler.start().unwrap();
        scheduler.time_mut().advance(1_000.0);

        let report = scheduler.pump(|| Err::<(), _>("corrupted"));
        assert_eq!(report.executed, 3, "stops at the failure bound");
        assert!(report.stopped);
        assert!(!scheduler.is_running());
    }

    #[test]
    fn success_resets_the_failure_streak() {
        let mut scheduler = TickScheduler::with_time_source(
            SchedulerConfig {
                tick_interval_ms: 100.0,
                speed: 1.0,
                max_ticks_per_frame: 10,
                max_consecutive_failures: 3,
            },
            ManualTime::new(),
        );
        scheduler.start().unwrap();
        scheduler.time_mut().advance(1_000.0);

        let mut calls = 0;
        // fail, fail, ok, fail, fail, ok … never 3 in a row.
        let report = scheduler.pump(|| {
            calls += 1;
            if calls % 3 == 0 { Ok(()) } else { Err("flaky") }
        });
        assert_eq!(report.executed, 10);
        assert!(!report.stopped);
        assert!(scheduler.is_running());
    }
}
