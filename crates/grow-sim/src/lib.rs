//! `grow-sim` — the tick loop and the public command facade.
//!
//! # Crate layout
//!
//! | Module         | Contents                                               |
//! |----------------|--------------------------------------------------------|
//! | [`machine`]    | `TickStateMachine` — explicit per-tick phase machine   |
//! | [`simulation`] | `SimulationLoop` — fixed phase order, tick commit      |
//! | [`facade`]     | `SimulationFacade` — intents, state reads, scheduling  |
//! | [`builder`]    | `FacadeBuilder`                                        |
//! | [`commands`]   | Payload parsing and registry wiring per domain         |
//!
//! # Tick pipeline
//!
//! ```text
//! process_tick:
//!   ① ApplyDevices       — device effects, energy tally
//!   ② DeriveEnvironment  — drift, clamping, VPD, metrics
//!   ③ Irrigation         — water/nutrient demand
//!   ④ UpdatePlants       — growth, phenology, stress
//!   ⑤ Harvest            — post-harvest inventory bookkeeping
//!   ⑥ Accounting         — degradation, rent, utilities, settlement
//!   ⑦ Commit             — clock += 1 (exactly once), events flushed,
//!                          sim.tickCompleted emitted
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use grow_catalog::BlueprintRepository;
//! use grow_sim::FacadeBuilder;
//! use grow_state::{GameMetadata, WorldState};
//!
//! let state = WorldState::empty(GameMetadata::standard("g", "seed", now_ms));
//! let mut facade = FacadeBuilder::new(state, BlueprintRepository::with_defaults()).build();
//! let result = facade.world().rent_structure(intent);
//! facade.time().step(Some(3));
//! ```

pub mod builder;
pub mod commands;
pub mod error;
pub mod facade;
pub mod machine;
pub mod simulation;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::FacadeBuilder;
pub use error::{SimError, SimResult};
pub use facade::{SimulationFacade, TimeStatus};
pub use machine::{MachineState, TickPhase, TickStateMachine, TICK_PHASES};
pub use simulation::{
    PhaseContext, PhaseHandler, PhaseOverrides, PhaseTiming, SimulationLoop, TickReport,
};
