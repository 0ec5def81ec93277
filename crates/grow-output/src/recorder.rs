//! `EventRecorder<W>` — bridges the event bus to an `EventWriter`.

use std::sync::{Arc, Mutex};

use grow_events::{EventBus, SimEvent, Subscription};

use crate::row::{EventRow, TickSummaryRow};
use crate::writer::EventWriter;
use crate::OutputError;

struct RecorderInner<W: EventWriter> {
    writer: W,
    last_error: Option<OutputError>,
}

impl<W: EventWriter> RecorderInner<W> {
    fn store_err(&mut self, result: crate::OutputResult<()>) {
        // Keep only the first error.
        if let Err(error) = result {
            if self.last_error.is_none() {
                self.last_error = Some(error);
            }
        }
    }
}

/// Subscribes to a bus and writes every delivered event as a row; each
/// `sim.tickCompleted` additionally produces a tick summary row.
///
/// Bus handlers have no return value, so writer errors are stored internally
/// — check [`take_error`][Self::take_error] after the run.
pub struct EventRecorder<W: EventWriter> {
    inner: Arc<Mutex<RecorderInner<W>>>,
}

impl<W: EventWriter + 'static> EventRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self { inner: Arc::new(Mutex::new(RecorderInner { writer, last_error: None })) }
    }

    /// Attach to `bus`.  Keep the returned subscription if you intend to
    /// detach later.
    pub fn attach(&self, bus: &EventBus) -> Subscription {
        let inner = Arc::clone(&self.inner);
        bus.subscribe(move |event| {
            let mut inner = inner.lock().expect("recorder poisoned");
            record(&mut inner, event);
        })
    }

    /// Take the stored write error (if any).
    pub fn take_error(&self) -> Option<OutputError> {
        self.inner.lock().expect("recorder poisoned").last_error.take()
    }

    /// Flush and close the underlying writer.
    pub fn finish(&self) {
        let mut inner = self.inner.lock().expect("recorder poisoned");
        let result = inner.writer.finish();
        inner.store_err(result);
    }
}

fn record<W: EventWriter>(inner: &mut RecorderInner<W>, event: &SimEvent) {
    let tick = event.tick.map(|t| t.0).unwrap_or(0);
    let ts = event.ts.unwrap_or(0);

    let payload_json = if event.payload.is_null() {
        String::new()
    } else {
        serde_json::to_string(&event.payload).unwrap_or_default()
    };
    let row = EventRow {
        tick,
        ts_unix_ms: ts,
        kind: event.kind.clone(),
        level: format!("{:?}", event.level).to_lowercase(),
        payload_json,
    };
    let result = inner.writer.write_event(&row);
    inner.store_err(result);

    if event.kind == "sim.tickCompleted" {
        let summary = TickSummaryRow {
            tick,
            ts_unix_ms: ts,
            duration_ms: event
                .payload
                .get("durationMs")
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0),
            event_count: event
                .payload
                .get("eventCount")
                .and_then(|v| v.as_u64())
                .unwrap_or(0),
        };
        let result = inner.writer.write_tick_summary(&summary);
        inner.store_err(result);
    }
}
