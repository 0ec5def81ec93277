//! The command registry and dispatch pipeline.
//!
//! The registry owns a `(domain, action) → CommandSpec` table.  Handlers are
//! opaque closures over a JSON payload; each entry's parse function decodes
//! the payload into its typed intent before any state is touched.

use std::panic::{self, AssertUnwindSafe};

use rustc_hash::FxHashMap;
use serde_json::Value;

use grow_core::time::unix_ms_now;
use grow_core::{DomainError, ErrorCode, IdGenerator, Tick};
use grow_catalog::BlueprintRepository;
use grow_events::{EventBus, EventCollector};
use grow_state::WorldState;

use crate::result::{
    normalize_errors, normalize_warnings, CommandFailure, CommandResult, HandlerResult,
};

// ── CommandContext ────────────────────────────────────────────────────────────

/// Everything a handler may touch during one dispatch.
///
/// `events` is the command's private outbox — invisible to bus subscribers
/// until the dispatcher flushes it on success.
pub struct CommandContext<'a> {
    /// Fully-qualified command name, e.g. `world.createZone`.
    pub command: &'a str,
    /// Tick at dispatch time.
    pub tick: Tick,
    pub state: &'a mut WorldState,
    pub repository: &'a BlueprintRepository,
    pub ids: &'a IdGenerator,
    pub events: EventCollector,
}

impl CommandContext<'_> {
    /// Path helper: `[command, tail...]`.
    pub fn path(&self, tail: &[&str]) -> Vec<String> {
        let mut path = vec![self.command.to_string()];
        path.extend(tail.iter().map(|s| s.to_string()));
        path
    }
}

/// Borrowed world collaborators handed to the dispatcher per call.
pub struct DispatchEnv<'a> {
    pub state: &'a mut WorldState,
    pub repository: &'a BlueprintRepository,
    pub ids: &'a IdGenerator,
    pub bus: &'a EventBus,
}

// ── CommandSpec ───────────────────────────────────────────────────────────────

/// How a missing/defaulted payload is handled before validation.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Preprocess {
    /// Pass the payload through untouched.
    #[default]
    None,
    /// Replace a missing (`null`) payload with `{}`.
    EmptyWhenMissing,
    /// Ignore the payload entirely and validate `{}` (parameterless command).
    AlwaysEmpty,
}

type Handler = Box<dyn Fn(Value, &mut CommandContext<'_>) -> HandlerResult<Value> + Send + Sync>;

/// One registered command.
pub struct CommandSpec {
    /// Fully-qualified name (`domain.action`).
    pub name: String,
    pub preprocess: Preprocess,
    handler: Handler,
}

impl CommandSpec {
    pub fn new(
        name: impl Into<String>,
        preprocess: Preprocess,
        handler: impl Fn(Value, &mut CommandContext<'_>) -> HandlerResult<Value> + Send + Sync + 'static,
    ) -> Self {
        Self { name: name.into(), preprocess, handler: Box::new(handler) }
    }

    /// A registered command whose backing service is not configured; resolves
    /// with `ERR_INVALID_STATE` instead of panicking or dropping the intent.
    pub fn unwired(name: impl Into<String>) -> Self {
        let name = name.into();
        let message_name = name.clone();
        Self::new(name, Preprocess::EmptyWhenMissing, move |_payload, _ctx| {
            Err(CommandFailure::Domain(DomainError::invalid_state(
                format!("Command handler for {message_name} is not configured."),
                vec![message_name.clone()],
            )))
        })
    }
}

// ── CommandRegistry ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct CommandRegistry {
    commands: FxHashMap<(String, String), CommandSpec>,
    domains: Vec<String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, domain: &str, action: &str, spec: CommandSpec) {
        if !self.domains.iter().any(|d| d == domain) {
            self.domains.push(domain.to_string());
        }
        self.commands.insert((domain.to_string(), action.to_string()), spec);
    }

    pub fn has_domain(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d == domain)
    }

    /// Registered domain names, in registration order.
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// Registered actions of one domain, sorted.
    pub fn actions(&self, domain: &str) -> Vec<&str> {
        let mut actions: Vec<&str> = self
            .commands
            .keys()
            .filter(|(d, _)| d == domain)
            .map(|(_, a)| a.as_str())
            .collect();
        actions.sort_unstable();
        actions
    }

    /// Run the full dispatch pipeline for one intent.  Never panics and
    /// never returns an `Err` — every outcome is a `CommandResult`.
    pub fn execute(
        &self,
        domain: &str,
        action: &str,
        payload: Value,
        env: &mut DispatchEnv<'_>,
    ) -> CommandResult<Value> {
        let Some(spec) = self.commands.get(&(domain.to_string(), action.to_string())) else {
            return CommandResult::fail(
                ErrorCode::NotFound,
                format!("Unknown command {domain}.{action}."),
                vec![format!("{domain}.{action}")],
            );
        };
        self.run(spec, payload, env)
    }

    fn run(
        &self,
        spec: &CommandSpec,
        payload: Value,
        env: &mut DispatchEnv<'_>,
    ) -> CommandResult<Value> {
        // ① Transport metadata never reaches validation.
        let payload = strip_intent_metadata(payload);

        // ② Preprocess.
        let payload = match spec.preprocess {
            Preprocess::None => payload,
            Preprocess::EmptyWhenMissing if payload.is_null() => Value::Object(Default::default()),
            Preprocess::EmptyWhenMissing => payload,
            Preprocess::AlwaysEmpty => Value::Object(Default::default()),
        };

        // ④ Fresh context with a private event buffer.
        let tick = env.state.clock.tick;
        let mut ctx = CommandContext {
            command: &spec.name,
            tick,
            state: &mut *env.state,
            repository: env.repository,
            ids: env.ids,
            events: EventCollector::new(tick),
        };

        // ③+⑤ Validation runs inside the handler's parse step, strictly
        // before any state access; panics anywhere below become ERR_INTERNAL.
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| (spec.handler)(payload, &mut ctx)));

        // ⑥ Normalize, ⑦ flush-on-success.
        match outcome {
            Ok(Ok(reply)) => {
                let events = ctx.events.drain_stamped(unix_ms_now());
                env.bus.emit_many(events);
                CommandResult {
                    ok: true,
                    data: reply.data,
                    warnings: normalize_warnings(reply.warnings),
                    errors: Vec::new(),
                }
            }
            Ok(Err(CommandFailure::Validation(errors))) => {
                CommandResult::fail_with(normalize_errors(&spec.name, errors))
            }
            Ok(Err(CommandFailure::Domain(error))) => {
                let path = if error.path.is_empty() {
                    vec![spec.name.clone()]
                } else {
                    error.path
                };
                CommandResult::fail(error.code, error.message, path)
            }
            Err(panic_payload) => CommandResult::fail(
                ErrorCode::Internal,
                panic_message(panic_payload),
                vec![spec.name.clone()],
            ),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Remove transport-only metadata (request correlation id) from the payload.
pub fn strip_intent_metadata(payload: Value) -> Value {
    match payload {
        Value::Object(mut object) => {
            object.remove("requestId");
            Value::Object(object)
        }
        other => other,
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Handler panicked without a message.".to_string()
    }
}
