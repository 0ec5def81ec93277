//! `grow-command` — the intent dispatch pipeline.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`result`]  | `CommandResult`, `CommandReply`, `CommandFailure`         |
//! | [`payload`] | `PayloadReader` — explicit, path-tracking validation      |
//! | [`registry`]| `CommandRegistry`, `CommandContext`, the dispatch pipeline|
//!
//! # Dispatch pipeline
//!
//! ```text
//! executeCommand(domain, action, payload):
//!   ① strip transport metadata (requestId)
//!   ② preprocess (default missing payloads to {})
//!   ③ validate — on failure return ERR_VALIDATION, handler never runs
//!   ④ build CommandContext with a private EventCollector
//!   ⑤ invoke handler (panics are caught → ERR_INTERNAL)
//!   ⑥ normalize — dedupe warnings, failures carry ≥1 error
//!   ⑦ iff ok: flush the collector to the bus (tick/ts stamped);
//!      otherwise the buffer is discarded
//! ```
//!
//! Step ⑦ is the system's only transactional boundary: state mutations made
//! by a handler before it decided to fail are *not* rolled back — only their
//! announcement is suppressed.  Handlers are therefore written
//! validate-first (all fallible checks before the first mutation).

pub mod payload;
pub mod registry;
pub mod result;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use payload::PayloadReader;
pub use registry::{CommandContext, CommandRegistry, CommandSpec, DispatchEnv, Preprocess};
pub use result::{CommandFailure, CommandReply, CommandResult, HandlerResult};
