//! `grow-events` — simulation event plumbing.
//!
//! # Crate layout
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`event`]     | `SimEvent`, `EventLevel`                              |
//! | [`bus`]       | `EventBus`, `EventFilter`, `Subscription`             |
//! | [`collector`] | `EventCollector` — per-command/per-tick outbox        |
//!
//! # Delivery contract
//!
//! Events are fire-and-forget and never mutated after emission.  Within one
//! `emit_many` call every subscriber sees the events in array order, with no
//! interleaving from other emitters.  Filters that match nothing are not an
//! error — delivery is silently skipped.
//!
//! # Transactional emission
//!
//! Handlers never talk to the bus directly.  They queue into an
//! [`EventCollector`]; the dispatcher flushes the collector to the bus only
//! when the command succeeded, and discards it otherwise.  The same pattern
//! batches all events of one simulation tick.

pub mod bus;
pub mod collector;
pub mod event;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use bus::{EventBus, EventFilter, Subscription};
pub use collector::EventCollector;
pub use event::{EventLevel, SimEvent};
