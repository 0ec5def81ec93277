//! SQLite output backend.
//!
//! Creates `telemetry.db` with two tables: `events` and `tick_summaries`.
//! Rows are written inside a long-lived transaction committed on `finish`
//! to amortise per-row fsync costs.

use std::path::Path;

use rusqlite::Connection;

use crate::row::{EventRow, TickSummaryRow};
use crate::writer::EventWriter;
use crate::OutputResult;

pub struct SqliteWriter {
    connection: Connection,
    finished: bool,
}

impl SqliteWriter {
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let connection = Connection::open(dir.join("telemetry.db"))?;
        connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS events (
                 tick        INTEGER NOT NULL,
                 ts_unix_ms  INTEGER NOT NULL,
                 type        TEXT    NOT NULL,
                 level       TEXT    NOT NULL,
                 payload     TEXT
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick        INTEGER NOT NULL,
                 ts_unix_ms  INTEGER NOT NULL,
                 duration_ms REAL    NOT NULL,
                 event_count INTEGER NOT NULL
             );
             BEGIN;",
        )?;
        Ok(Self { connection, finished: false })
    }
}

impl EventWriter for SqliteWriter {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        self.connection.execute(
            "INSERT INTO events (tick, ts_unix_ms, type, level, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                row.tick as i64,
                row.ts_unix_ms,
                row.kind,
                row.level,
                row.payload_json,
            ],
        )?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.connection.execute(
            "INSERT INTO tick_summaries (tick, ts_unix_ms, duration_ms, event_count)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                row.tick as i64,
                row.ts_unix_ms,
                row.duration_ms,
                row.event_count as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.connection.execute_batch("COMMIT;")?;
        Ok(())
    }
}
