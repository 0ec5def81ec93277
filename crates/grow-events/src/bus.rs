//! The event bus: ordered delivery to filtered subscribers.

use std::sync::{Arc, Mutex, Weak};

use crate::event::{EventLevel, SimEvent};

// ── EventFilter ───────────────────────────────────────────────────────────────

/// Declarative subscriber filter.
///
/// An event is delivered when it matches **all** populated constraints:
///
/// - `kinds`: at least one pattern matches `event.kind`.  Patterns support a
///   `*` wildcard (`"world.*"`, `"*.zoneCreated"`); a pattern without `*` is
///   an exact match.
/// - `levels`: `event.level` is in the set.
/// - `min_level`: `event.level` is at least this severe.
///
/// The default filter matches everything.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    pub kinds: Vec<String>,
    pub levels: Vec<EventLevel>,
    pub min_level: Option<EventLevel>,
}

impl EventFilter {
    /// Filter on a single kind pattern.
    pub fn kind(pattern: impl Into<String>) -> Self {
        Self { kinds: vec![pattern.into()], ..Self::default() }
    }

    /// Filter on a single exact level.
    pub fn level(level: EventLevel) -> Self {
        Self { levels: vec![level], ..Self::default() }
    }

    /// Filter on a minimum severity.
    pub fn at_least(level: EventLevel) -> Self {
        Self { min_level: Some(level), ..Self::default() }
    }

    pub fn matches(&self, event: &SimEvent) -> bool {
        if !self.kinds.is_empty() && !self.kinds.iter().any(|p| wildcard_match(p, &event.kind)) {
            return false;
        }
        if !self.levels.is_empty() && !self.levels.contains(&event.level) {
            return false;
        }
        if let Some(min) = self.min_level {
            if event.level < min {
                return false;
            }
        }
        true
    }
}

/// Greedy `*` wildcard match; a literal pattern must match exactly.
fn wildcard_match(pattern: &str, value: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == value;
    }
    let mut remainder = value;
    let mut segments = pattern.split('*').peekable();

    // The first segment is anchored at the start.
    if let Some(first) = segments.next() {
        if !remainder.starts_with(first) {
            return false;
        }
        remainder = &remainder[first.len()..];
    }

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            // Last segment is anchored at the end.
            return segment.is_empty() || remainder.ends_with(segment);
        }
        if segment.is_empty() {
            continue;
        }
        match remainder.find(segment) {
            Some(pos) => remainder = &remainder[pos + segment.len()..],
            None => return false,
        }
    }
    true
}

// ── EventBus ──────────────────────────────────────────────────────────────────

type Handler = Box<dyn FnMut(&SimEvent) + Send>;

struct Subscriber {
    id: u64,
    filter: Option<EventFilter>,
    handler: Handler,
}

#[derive(Default)]
struct BusInner {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

/// Ordered pub/sub channel for simulation events.
///
/// Cheap to clone — clones share the subscriber list.  The bus holds no
/// persistent event buffer; delivery is the only effect of emission.
///
/// Delivery runs under the bus lock, so `emit_many` is atomic with respect to
/// other emitters.  Handlers must therefore not call back into the bus.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<BusInner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one event to every matching subscriber, in subscription order.
    pub fn emit(&self, event: SimEvent) {
        let mut inner = self.inner.lock().expect("event bus poisoned");
        deliver(&mut inner, &event);
    }

    /// Deliver a batch.  Each subscriber sees the events in array order and
    /// no other emitter's events interleave within the batch.
    pub fn emit_many(&self, events: Vec<SimEvent>) {
        if events.is_empty() {
            return;
        }
        let mut inner = self.inner.lock().expect("event bus poisoned");
        for event in &events {
            deliver(&mut inner, event);
        }
    }

    /// Subscribe to every event.
    pub fn subscribe(&self, handler: impl FnMut(&SimEvent) + Send + 'static) -> Subscription {
        self.attach(None, Box::new(handler))
    }

    /// Subscribe with a filter; events failing the filter are silently
    /// skipped.
    pub fn subscribe_filtered(
        &self,
        filter: EventFilter,
        handler: impl FnMut(&SimEvent) + Send + 'static,
    ) -> Subscription {
        self.attach(Some(filter), Box::new(handler))
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().expect("event bus poisoned").subscribers.len()
    }

    fn attach(&self, filter: Option<EventFilter>, handler: Handler) -> Subscription {
        let mut inner = self.inner.lock().expect("event bus poisoned");
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push(Subscriber { id, filter, handler });
        Subscription { bus: Arc::downgrade(&self.inner), id }
    }
}

fn deliver(inner: &mut BusInner, event: &SimEvent) {
    for subscriber in &mut inner.subscribers {
        let matches = subscriber
            .filter
            .as_ref()
            .map(|f| f.matches(event))
            .unwrap_or(true);
        if matches {
            (subscriber.handler)(event);
        }
    }
}

// ── Subscription ──────────────────────────────────────────────────────────────

/// Handle returned by `subscribe`; detach with [`unsubscribe`][Self::unsubscribe].
///
/// Dropping the handle without unsubscribing leaves the subscriber attached
/// for the lifetime of the bus.
pub struct Subscription {
    bus: Weak<Mutex<BusInner>>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(inner) = self.bus.upgrade() {
            let mut inner = inner.lock().expect("event bus poisoned");
            inner.subscribers.retain(|s| s.id != self.id);
        }
    }
}
