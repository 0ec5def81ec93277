//! `grow-output` — event log and tick summary writers.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend  | Files created                                   |
//! |-----------|----------|-------------------------------------------------|
//! | *(none)*  | CSV      | `events.csv`, `tick_summaries.csv`              |
//! | `sqlite`  | SQLite   | `telemetry.db`                                  |
//! | `parquet` | Parquet  | `events.parquet`, `tick_summaries.parquet`      |
//!
//! All backends implement [`EventWriter`] and are driven by
//! [`EventRecorder`], a bus subscriber that turns the live event stream into
//! rows.
//!
//! # Usage
//!
//! ```rust,ignore
//! use grow_output::{CsvWriter, EventRecorder};
//!
//! let writer = CsvWriter::new(Path::new("./telemetry"))?;
//! let recorder = EventRecorder::new(writer);
//! let _subscription = recorder.attach(facade.bus());
//! // … run the simulation …
//! recorder.finish();
//! if let Some(e) = recorder.take_error() { eprintln!("telemetry error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod recorder;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use recorder::EventRecorder;
pub use row::{EventRow, TickSummaryRow};
pub use writer::EventWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
