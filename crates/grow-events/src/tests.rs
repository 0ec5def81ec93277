//! Unit tests for the event bus and collector.

use std::sync::{Arc, Mutex};

use grow_core::Tick;
use serde_json::json;

use crate::bus::{EventBus, EventFilter};
use crate::collector::EventCollector;
use crate::event::{EventLevel, SimEvent};

/// Shared recording sink for subscriber callbacks.
fn recorder() -> (Arc<Mutex<Vec<String>>>, impl FnMut(&SimEvent) + Send + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let handler = move |event: &SimEvent| {
        sink.lock().unwrap().push(event.kind.clone());
    };
    (seen, handler)
}

#[cfg(test)]
mod bus {
    use super::*;

    #[test]
    fn emit_reaches_all_subscribers_in_order() {
        let bus = EventBus::new();
        let (seen_a, handler_a) = recorder();
        let (seen_b, handler_b) = recorder();
        bus.subscribe(handler_a);
        bus.subscribe(handler_b);

        bus.emit(SimEvent::info("world.zoneCreated", json!({})));
        assert_eq!(seen_a.lock().unwrap().as_slice(), ["world.zoneCreated"]);
        assert_eq!(seen_b.lock().unwrap().as_slice(), ["world.zoneCreated"]);
    }

    #[test]
    fn emit_many_preserves_array_order() {
        let bus = EventBus::new();
        let (seen, handler) = recorder();
        bus.subscribe(handler);

        bus.emit_many(vec![
            SimEvent::info("a", json!({})),
            SimEvent::info("b", json!({})),
            SimEvent::info("c", json!({})),
        ]);
        assert_eq!(seen.lock().unwrap().as_slice(), ["a", "b", "c"]);
    }

    #[test]
    fn filter_by_kind_pattern() {
        let bus = EventBus::new();
        let (seen, handler) = recorder();
        bus.subscribe_filtered(EventFilter::kind("world.*"), handler);

        bus.emit(SimEvent::info("world.zoneCreated", json!({})));
        bus.emit(SimEvent::info("sim.tickCompleted", json!({})));
        bus.emit(SimEvent::info("world.roomDeleted", json!({})));

        assert_eq!(
            seen.lock().unwrap().as_slice(),
            ["world.zoneCreated", "world.roomDeleted"]
        );
    }

    #[test]
    fn filter_by_level_and_min_level() {
        let bus = EventBus::new();
        let (errors_only, handler_a) = recorder();
        let (warnings_up, handler_b) = recorder();
        bus.subscribe_filtered(EventFilter::level(EventLevel::Error), handler_a);
        bus.subscribe_filtered(EventFilter::at_least(EventLevel::Warning), handler_b);

        bus.emit(SimEvent::new("one", EventLevel::Info, json!({})));
        bus.emit(SimEvent::new("two", EventLevel::Warning, json!({})));
        bus.emit(SimEvent::new("three", EventLevel::Error, json!({})));

        assert_eq!(errors_only.lock().unwrap().as_slice(), ["three"]);
        assert_eq!(warnings_up.lock().unwrap().as_slice(), ["two", "three"]);
    }

    #[test]
    fn filter_matching_nothing_is_not_an_error() {
        let bus = EventBus::new();
        let (seen, handler) = recorder();
        bus.subscribe_filtered(EventFilter::kind("never.*"), handler);
        bus.emit(SimEvent::info("world.zoneCreated", json!({})));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn unsubscribe_detaches() {
        let bus = EventBus::new();
        let (seen, handler) = recorder();
        let sub = bus.subscribe(handler);
        bus.emit(SimEvent::info("a", json!({})));
        sub.unsubscribe();
        bus.emit(SimEvent::info("b", json!({})));
        assert_eq!(seen.lock().unwrap().as_slice(), ["a"]);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn wildcard_edges() {
        let cases = [
            ("world.*", "world.zoneCreated", true),
            ("world.*", "worldly", false),
            ("*.zoneCreated", "world.zoneCreated", true),
            ("*", "anything", true),
            ("sim.tickCompleted", "sim.tickCompleted", true),
            ("sim.tickCompleted", "sim.tick", false),
        ];
        for (pattern, kind, expected) in cases {
            let filter = EventFilter::kind(pattern);
            let event = SimEvent::info(kind, json!({}));
            assert_eq!(filter.matches(&event), expected, "{pattern} vs {kind}");
        }
    }
}

#[cfg(test)]
mod collector {
    use super::*;

    #[test]
    fn queue_stamps_collector_tick() {
        let mut collector = EventCollector::new(Tick(7));
        collector.queue("world.zoneCreated", json!({"zoneId": "zone-1"}), EventLevel::Info);
        let events = collector.drain_stamped(123_456);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tick, Some(Tick(7)));
        assert_eq!(events[0].ts, Some(123_456));
    }

    #[test]
    fn drain_preserves_queue_order_and_empties() {
        let mut collector = EventCollector::new(Tick(1));
        collector.queue("a", json!({}), EventLevel::Info);
        collector.queue("b", json!({}), EventLevel::Warning);
        let events = collector.drain_stamped(0);
        assert_eq!(events[0].kind, "a");
        assert_eq!(events[1].kind, "b");
        assert!(collector.is_empty());
    }

    #[test]
    fn pre_stamped_events_keep_their_marks() {
        let mut collector = EventCollector::new(Tick(9));
        let mut event = SimEvent::info("x", json!({}));
        event.tick = Some(Tick(3));
        event.ts = Some(1);
        collector.queue_event(event);
        let events = collector.drain_stamped(999);
        assert_eq!(events[0].tick, Some(Tick(3)));
        assert_eq!(events[0].ts, Some(1));
    }

    #[test]
    fn discarding_a_collector_delivers_nothing() {
        let bus = EventBus::new();
        let (seen, handler) = recorder();
        bus.subscribe(handler);

        let mut collector = EventCollector::new(Tick(1));
        collector.queue("world.zoneCreated", json!({}), EventLevel::Info);
        drop(collector); // failure path: buffer never reaches the bus

        assert!(seen.lock().unwrap().is_empty());
    }
}
