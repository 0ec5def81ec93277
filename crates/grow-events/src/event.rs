//! The simulation event record.

use grow_core::Tick;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// One simulation event: append-only, never mutated after emission.
///
/// `tick` and `ts` are optional at queue time — whatever flushes the event
/// (dispatcher or tick loop) stamps the current tick and wall-clock time on
/// any event still missing them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimEvent {
    /// Dotted event type, e.g. `world.zoneCreated`, `sim.tickCompleted`.
    #[serde(rename = "type")]
    pub kind: String,
    pub level: EventLevel,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick: Option<Tick>,
    /// Unix milliseconds at emission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
}

impl SimEvent {
    pub fn new(kind: impl Into<String>, level: EventLevel, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            level,
            payload,
            tick: None,
            ts: None,
        }
    }

    /// Shorthand for an `info` event.
    pub fn info(kind: impl Into<String>, payload: Value) -> Self {
        Self::new(kind, EventLevel::Info, payload)
    }

    /// Fill in `tick`/`ts` where still unset.
    pub fn stamped(mut self, tick: Tick, ts: i64) -> Self {
        self.tick.get_or_insert(tick);
        self.ts.get_or_insert(ts);
        self
    }
}
