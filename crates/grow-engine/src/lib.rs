//! `grow-engine` — domain services and per-tick processors.
//!
//! # Crate layout
//!
//! | Module          | Contents                                               |
//! |-----------------|--------------------------------------------------------|
//! | [`world`]       | Structure/room/zone lifecycle services                 |
//! | [`devices`]     | Device install/update/move/remove services             |
//! | [`plants`]      | Planting services and the plant growth stage           |
//! | [`finance`]     | Inventory sales and utility price services             |
//! | [`economy`]     | Tick accumulator, ledger recording, rent & utilities   |
//! | [`environment`] | Device effects, ambient drift, VPD derivation          |
//! | [`degradation`] | Device wear model                                      |
//!
//! Command-facing services are free functions
//! `fn(&Intent, &mut CommandContext) -> Result<CommandReply<_>, DomainError>`;
//! the command glue in `grow-sim` parses payloads into the typed intents
//! defined here.  Tick processors are plain functions over `WorldState`
//! invoked by the simulation loop in its fixed phase order.

pub mod degradation;
pub mod devices;
pub mod economy;
pub mod environment;
pub mod finance;
pub mod plants;
pub mod world;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use economy::TickAccumulator;
