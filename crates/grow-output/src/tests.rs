//! Unit tests for the output writers and the bus recorder.

use grow_core::Tick;
use grow_events::{EventBus, EventLevel, SimEvent};
use serde_json::json;

use crate::csv::CsvWriter;
use crate::recorder::EventRecorder;
use crate::row::{EventRow, TickSummaryRow};
use crate::writer::EventWriter;
use crate::{OutputError, OutputResult};

fn event(kind: &str, tick: u64) -> SimEvent {
    let mut event = SimEvent::new(kind, EventLevel::Info, json!({ "n": tick }));
    event.tick = Some(Tick(tick));
    event.ts = Some(tick as i64 * 1_000);
    event
}

fn completed_event(tick: u64, event_count: u64) -> SimEvent {
    let mut event = SimEvent::new(
        "sim.tickCompleted",
        EventLevel::Info,
        json!({ "tick": tick, "durationMs": 1.5, "eventCount": event_count }),
    );
    event.tick = Some(Tick(tick));
    event.ts = Some(tick as i64 * 1_000);
    event
}

#[cfg(test)]
mod csv_writer {
    use super::*;

    #[test]
    fn writes_headers_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = CsvWriter::new(dir.path()).unwrap();
        writer
            .write_event(&EventRow {
                tick: 3,
                ts_unix_ms: 3_000,
                kind: "world.zoneCreated".into(),
                level: "info".into(),
                payload_json: "{\"zoneId\":\"zone-1\"}".into(),
            })
            .unwrap();
        writer
            .write_tick_summary(&TickSummaryRow {
                tick: 3,
                ts_unix_ms: 3_000,
                duration_ms: 0.7,
                event_count: 1,
            })
            .unwrap();
        writer.finish().unwrap();
        writer.finish().unwrap(); // idempotent

        let events = std::fs::read_to_string(dir.path().join("events.csv")).unwrap();
        assert!(events.starts_with("tick,ts_unix_ms,type,level,payload"));
        assert!(events.contains("world.zoneCreated"));

        let summaries = std::fs::read_to_string(dir.path().join("tick_summaries.csv")).unwrap();
        assert_eq!(summaries.lines().count(), 2);
    }
}

#[cfg(test)]
mod recorder {
    use super::*;

    /// Writer that counts rows and fails on demand.
    #[derive(Default)]
    struct ProbeWriter {
        events: usize,
        summaries: usize,
        fail_events: bool,
    }

    impl EventWriter for ProbeWriter {
        fn write_event(&mut self, _row: &EventRow) -> OutputResult<()> {
            if self.fail_events {
                return Err(OutputError::Io(std::io::Error::other("disk full")));
            }
            self.events += 1;
            Ok(())
        }

        fn write_tick_summary(&mut self, _row: &TickSummaryRow) -> OutputResult<()> {
            self.summaries += 1;
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn records_events_and_summaries() {
        let bus = EventBus::new();
        let recorder = EventRecorder::new(ProbeWriter::default());
        let _subscription = recorder.attach(&bus);

        bus.emit(event("world.zoneCreated", 1));
        bus.emit(completed_event(1, 1));
        bus.emit(event("finance.tick", 2));
        bus.emit(completed_event(2, 1));

        // Four event rows, two of which are tick completions → two summaries.
        recorder.finish();
        assert!(recorder.take_error().is_none());
    }

    #[test]
    fn first_error_is_kept() {
        let bus = EventBus::new();
        let recorder = EventRecorder::new(ProbeWriter { fail_events: true, ..Default::default() });
        let _subscription = recorder.attach(&bus);

        bus.emit(event("a", 1));
        bus.emit(event("b", 2));

        let error = recorder.take_error().expect("error stored");
        assert!(error.to_string().contains("disk full"));
        // Only the first error is retained; the second take is empty.
        assert!(recorder.take_error().is_none());
    }

    #[test]
    fn csv_end_to_end_through_the_bus() {
        let dir = tempfile::tempdir().unwrap();
        let bus = EventBus::new();
        let recorder = EventRecorder::new(CsvWriter::new(dir.path()).unwrap());
        let _subscription = recorder.attach(&bus);

        bus.emit(event("world.zoneCreated", 1));
        bus.emit(completed_event(1, 1));
        recorder.finish();
        assert!(recorder.take_error().is_none());

        let events = std::fs::read_to_string(dir.path().join("events.csv")).unwrap();
        assert_eq!(events.lines().count(), 3, "header + two events");
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_writer {
    use super::*;
    use crate::sqlite::SqliteWriter;

    #[test]
    fn rows_survive_the_commit() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = SqliteWriter::new(dir.path()).unwrap();
        writer
            .write_event(&EventRow {
                tick: 1,
                ts_unix_ms: 1_000,
                kind: "finance.tick".into(),
                level: "info".into(),
                payload_json: "{}".into(),
            })
            .unwrap();
        writer
            .write_tick_summary(&TickSummaryRow {
                tick: 1,
                ts_unix_ms: 1_000,
                duration_ms: 2.0,
                event_count: 1,
            })
            .unwrap();
        writer.finish().unwrap();

        let connection = rusqlite::Connection::open(dir.path().join("telemetry.db")).unwrap();
        let events: i64 = connection
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
            .unwrap();
        let summaries: i64 = connection
            .query_row("SELECT COUNT(*) FROM tick_summaries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(events, 1);
        assert_eq!(summaries, 1);
    }
}
