//! The `EventWriter` trait implemented by all backend writers.

use crate::row::{EventRow, TickSummaryRow};
use crate::OutputResult;

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// Writers are infallible from the recorder's perspective — errors are
/// stored by [`EventRecorder`][crate::EventRecorder] and retrieved with
/// `take_error` after the run.
pub trait EventWriter: Send {
    /// Append one event row.
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()>;

    /// Append one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
