//! Unit tests for the dispatch pipeline.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use grow_core::{DomainError, ErrorCode, IdGenerator};
use grow_catalog::BlueprintRepository;
use grow_events::{EventBus, EventLevel, SimEvent};
use grow_state::{GameMetadata, WorldState};

use crate::payload::PayloadReader;
use crate::registry::{
    strip_intent_metadata, CommandRegistry, CommandSpec, DispatchEnv, Preprocess,
};
use crate::result::{normalize_warnings, CommandFailure, CommandReply, CommandResult};

// ── Fixtures ──────────────────────────────────────────────────────────────────

struct Harness {
    state: WorldState,
    repository: BlueprintRepository,
    ids: IdGenerator,
    bus: EventBus,
}

impl Harness {
    fn new() -> Self {
        Self {
            state: WorldState::empty(GameMetadata::standard("game-1", "seed", 0)),
            repository: BlueprintRepository::with_defaults(),
            ids: IdGenerator::new(),
            bus: EventBus::new(),
        }
    }

    fn execute(
        &mut self,
        registry: &CommandRegistry,
        domain: &str,
        action: &str,
        payload: Value,
    ) -> CommandResult<Value> {
        let mut env = DispatchEnv {
            state: &mut self.state,
            repository: &self.repository,
            ids: &self.ids,
            bus: &self.bus,
        };
        registry.execute(domain, action, payload, &mut env)
    }

    fn record_events(&self) -> Arc<Mutex<Vec<SimEvent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        self.bus.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
        seen
    }
}

/// A registry with one command that queues an event, mutates a note into the
/// world, and then succeeds or fails depending on the payload.
fn test_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(
        "test",
        "poke",
        CommandSpec::new("test.poke", Preprocess::EmptyWhenMissing, |payload, ctx| {
            let mut reader = PayloadReader::root("test.poke", &payload)?;
            let label = reader.require_string("label");
            let fail = reader.optional_string("fail");
            reader.finish()?;

            ctx.events.queue("test.poked", json!({ "label": label }), EventLevel::Info);
            ctx.state.notes.push(grow_state::SimulationNote {
                id: ctx.ids.next("note"),
                tick: ctx.tick,
                message: label,
                level: "info".to_string(),
            });

            if fail.is_some() {
                return Err(CommandFailure::Domain(DomainError::conflict(
                    "Poke rejected.",
                    vec!["test.poke".into()],
                )));
            }
            Ok(CommandReply::new(json!({ "poked": true })))
        }),
    );
    registry.register("test", "panics", CommandSpec::new(
        "test.panics",
        Preprocess::AlwaysEmpty,
        |_payload, _ctx| panic!("boom"),
    ));
    registry.register("workforce", "hire", CommandSpec::unwired("workforce.hire"));
    registry
}

// ── PayloadReader ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod payload_reader {
    use super::*;

    #[test]
    fn valid_payload_parses() {
        let payload = json!({ "structureId": "s-1", "room": { "name": "Veg", "area": 40.0 } });
        let mut reader = PayloadReader::root("world.createRoom", &payload).unwrap();
        let structure_id = reader.require_identifier("structureId");
        let mut name = String::new();
        let mut area = 0.0;
        if let Some(mut room) = reader.nested("room") {
            name = room.require_string("name");
            area = room.require_positive_number("area");
            reader.absorb(room);
        }
        reader.finish().unwrap();
        assert_eq!(structure_id, "s-1");
        assert_eq!(name, "Veg");
        assert_eq!(area, 40.0);
    }

    #[test]
    fn one_error_per_violated_constraint() {
        let payload = json!({ "area": -3, "name": "" });
        let mut reader = PayloadReader::root("world.createRoom", &payload).unwrap();
        reader.require_positive_number("area");
        reader.require_string("name");
        reader.require_identifier("structureId");
        let errors = reader.finish().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.code == ErrorCode::Validation));
    }

    #[test]
    fn error_paths_start_with_the_command() {
        let payload = json!({ "room": { "area": "wide" } });
        let mut reader = PayloadReader::root("world.createRoom", &payload).unwrap();
        if let Some(mut room) = reader.nested("room") {
            room.require_positive_number("area");
            reader.absorb(room);
        }
        let errors = reader.finish().unwrap_err();
        let area_error = errors.iter().find(|e| e.path.last().unwrap() == "area").unwrap();
        assert_eq!(area_error.path, vec!["world.createRoom", "room", "area"]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let payload = json!({ "zoneId": "z-1", "surprise": 1 });
        let mut reader = PayloadReader::root("world.deleteZone", &payload).unwrap();
        reader.require_identifier("zoneId");
        let errors = reader.finish().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path.last().unwrap(), "surprise");
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let errors = PayloadReader::root("time.step", &json!(42)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, vec!["time.step"]);
    }

    #[test]
    fn optional_fields_absent_are_fine_invalid_are_not() {
        let payload = json!({ "ticks": 0 });
        let mut reader = PayloadReader::root("time.step", &payload).unwrap();
        assert_eq!(reader.optional_positive_integer("ticks"), None);
        assert!(reader.finish().is_err());

        let payload = json!({});
        let mut reader = PayloadReader::root("time.step", &payload).unwrap();
        assert_eq!(reader.optional_positive_integer("ticks"), None);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn integers_reject_fractions() {
        let payload = json!({ "count": 2.5 });
        let mut reader = PayloadReader::root("x", &payload).unwrap();
        reader.require_positive_integer("count");
        assert!(reader.finish().is_err());
    }
}

// ── Normalization ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod normalization {
    use super::*;

    #[test]
    fn warnings_are_trimmed_deduped_ordered() {
        let warnings = normalize_warnings(vec![
            "  clamped  ".into(),
            "".into(),
            "clamped".into(),
            "approximate".into(),
        ]);
        assert_eq!(warnings, vec!["clamped", "approximate"]);
    }

    #[test]
    fn failures_always_carry_an_error() {
        let errors = crate::result::normalize_errors("test.poke", vec![]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::InvalidState);
    }
}

// ── Dispatch pipeline ─────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch {
    use super::*;

    #[test]
    fn success_flushes_events_with_stamps() {
        let registry = test_registry();
        let mut harness = Harness::new();
        let seen = harness.record_events();

        let result = harness.execute(&registry, "test", "poke", json!({ "label": "hello" }));
        assert!(result.ok);

        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, "test.poked");
        assert!(events[0].tick.is_some());
        assert!(events[0].ts.is_some());
    }

    #[test]
    fn failure_suppresses_events_but_not_mutations() {
        let registry = test_registry();
        let mut harness = Harness::new();
        let seen = harness.record_events();

        let result = harness.execute(
            &registry,
            "test",
            "poke",
            json!({ "label": "doomed", "fail": "yes" }),
        );
        assert!(!result.ok);
        assert_eq!(result.first_error().unwrap().code, ErrorCode::Conflict);

        // Zero deliveries to any subscriber …
        assert!(seen.lock().unwrap().is_empty());
        // … while the handler's pre-failure mutation is preserved (the
        // documented non-rollback trade-off).
        assert_eq!(harness.state.notes.len(), 1);
    }

    #[test]
    fn validation_failure_never_reaches_the_handler() {
        let registry = test_registry();
        let mut harness = Harness::new();
        let seen = harness.record_events();

        let result = harness.execute(&registry, "test", "poke", json!({ "label": 12 }));
        assert!(!result.ok);
        assert_eq!(result.first_error().unwrap().code, ErrorCode::Validation);
        // No mutation, no events: the handler body never ran.
        assert!(harness.state.notes.is_empty());
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(harness.state.clock.tick.0, 0);
    }

    #[test]
    fn unknown_command_is_not_found() {
        let registry = test_registry();
        let mut harness = Harness::new();
        let result = harness.execute(&registry, "test", "nope", json!({}));
        assert_eq!(result.first_error().unwrap().code, ErrorCode::NotFound);

        let result = harness.execute(&registry, "ghosts", "boo", json!({}));
        assert_eq!(result.first_error().unwrap().code, ErrorCode::NotFound);
    }

    #[test]
    fn unwired_handler_is_invalid_state() {
        let registry = test_registry();
        let mut harness = Harness::new();
        let result = harness.execute(&registry, "workforce", "hire", json!({}));
        assert_eq!(result.first_error().unwrap().code, ErrorCode::InvalidState);
        assert!(result.first_error().unwrap().message.contains("not configured"));
    }

    #[test]
    fn panics_map_to_err_internal() {
        let registry = test_registry();
        let mut harness = Harness::new();
        let result = harness.execute(&registry, "test", "panics", json!({}));
        assert!(!result.ok);
        let error = result.first_error().unwrap();
        assert_eq!(error.code, ErrorCode::Internal);
        assert!(error.message.contains("boom"));
    }

    #[test]
    fn request_id_is_stripped_before_validation() {
        let registry = test_registry();
        let mut harness = Harness::new();
        // `requestId` is not in the schema; it must not trip the strict
        // unknown-field check.
        let result = harness.execute(
            &registry,
            "test",
            "poke",
            json!({ "label": "x", "requestId": "req-99" }),
        );
        assert!(result.ok, "errors: {:?}", result.errors);
    }

    #[test]
    fn missing_payload_defaults_to_empty_object() {
        let registry = test_registry();
        let mut harness = Harness::new();
        // `label` missing → validation error (not a panic on null payload).
        let result = harness.execute(&registry, "test", "poke", Value::Null);
        assert_eq!(result.first_error().unwrap().code, ErrorCode::Validation);
    }

    #[test]
    fn strip_metadata_only_touches_objects() {
        assert_eq!(strip_intent_metadata(json!(7)), json!(7));
        assert_eq!(
            strip_intent_metadata(json!({ "requestId": "r", "a": 1 })),
            json!({ "a": 1 })
        );
    }

    #[test]
    fn domain_listing_tracks_registrations() {
        let registry = test_registry();
        assert!(registry.has_domain("test"));
        assert!(registry.has_domain("workforce"));
        assert_eq!(registry.actions("test"), vec!["panics", "poke"]);
    }
}
