use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    /// `start()` while already running.
    #[error("scheduler is already running")]
    AlreadyRunning,

    /// `pause()` while not running.
    #[error("scheduler is not running")]
    NotRunning,

    /// Rejected speed multiplier (non-finite or non-positive).
    #[error("speed multiplier must be a finite number greater than zero (got {0})")]
    InvalidSpeed(f64),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
