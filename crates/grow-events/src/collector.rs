//! The transaction-scoped event outbox.
//!
//! One collector is created per command dispatch and per simulation tick.
//! Handlers queue events here; whoever owns the transaction decides whether
//! the buffer reaches the bus (success) or is discarded (failure).  This is
//! the explicit-object replacement for a closure-captured buffer.

use grow_core::Tick;
use serde_json::Value;

use crate::event::{EventLevel, SimEvent};

pub struct EventCollector {
    tick: Tick,
    buffer: Vec<SimEvent>,
}

impl EventCollector {
    /// A collector whose queued events default to `tick`.
    pub fn new(tick: Tick) -> Self {
        Self { tick, buffer: Vec::new() }
    }

    /// The tick this collector stamps onto queued events.
    #[inline]
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Queue an event, stamping the collector's tick.  The timestamp stays
    /// unset until flush.
    pub fn queue(&mut self, kind: impl Into<String>, payload: Value, level: EventLevel) {
        let mut event = SimEvent::new(kind, level, payload);
        event.tick = Some(self.tick);
        self.buffer.push(event);
    }

    /// Queue a pre-built event as-is (tick/ts left for the flusher to stamp).
    pub fn queue_event(&mut self, event: SimEvent) {
        self.buffer.push(event);
    }

    pub fn queue_many(&mut self, events: impl IntoIterator<Item = SimEvent>) {
        self.buffer.extend(events);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Take the buffered events, stamping `tick`/`ts` where still unset.
    /// The collector is left empty (the discard path simply drops it).
    pub fn drain_stamped(&mut self, ts: i64) -> Vec<SimEvent> {
        let tick = self.tick;
        self.buffer.drain(..).map(|e| e.stamped(tick, ts)).collect()
    }
}
