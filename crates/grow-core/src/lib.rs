//! `grow-core` — foundational types for the `rust_grow` facility simulation.
//!
//! This crate is a dependency of every other `grow-*` crate.  It intentionally
//! has no `grow-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | [`ids`]   | `IdGenerator` (prefix-tagged, process-unique string ids)  |
//! | [`time`]  | `Tick`, `TickLength`, `SimClock`                          |
//! | [`rng`]   | `SimRng` (deterministic, seedable)                        |
//! | [`error`] | `ErrorCode`, `CommandError`, `DomainError`, `CoreError`   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CommandError, CoreError, CoreResult, DomainError, ErrorCode};
pub use ids::IdGenerator;
pub use rng::SimRng;
pub use time::{SimClock, Tick, TickLength};
