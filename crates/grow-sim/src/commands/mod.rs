//! Payload parsing and registry wiring, one module per intent domain.
//!
//! Each command is a `parse` function (explicit validation with per-field
//! error paths) plus a thin closure binding the parsed intent to its
//! `grow-engine` service.  Time commands are parsed here too but executed by
//! the facade, which owns the scheduler.

pub mod devices;
pub mod finance;
pub mod plants;
pub mod time;
pub mod world;

use grow_core::DomainError;
use grow_command::{CommandFailure, CommandRegistry, CommandReply, CommandSpec, HandlerResult};
use serde::Serialize;
use serde_json::Value;

/// Encode a typed service reply into the opaque wire reply.
pub(crate) fn encode<T: Serialize>(reply: CommandReply<T>) -> HandlerResult<Value> {
    let data = match reply.data {
        None => None,
        Some(data) => Some(serde_json::to_value(data).map_err(|e| {
            CommandFailure::Domain(DomainError::internal(format!(
                "Command result could not be encoded: {e}"
            )))
        })?),
    };
    Ok(CommandReply { data, warnings: reply.warnings })
}

/// Build the full command registry for every state-mutating domain.
pub fn build_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    world::register(&mut registry);
    devices::register(&mut registry);
    plants::register(&mut registry);
    finance::register(&mut registry);

    // Workforce management ships with the excluded engine; the commands are
    // registered so transports can discover them, but resolve unwired.
    registry.register("workforce", "hire", CommandSpec::unwired("workforce.hire"));
    registry.register("workforce", "fire", CommandSpec::unwired("workforce.fire"));

    registry
}
