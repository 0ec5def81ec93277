//! `grow-state` — the mutable world model for the rust_grow simulation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`world`]     | `WorldState`, `GameMetadata`, economics settings         |
//! | [`facility`]  | `Structure` → `Room` → `Zone` containment tree           |
//! | [`device`]    | `Device`, maintenance record, status                     |
//! | [`plant`]     | `Plant`, growth stages                                   |
//! | [`inventory`] | Global inventory: resources, seeds, devices, harvest     |
//! | [`finance`]   | Cash, ledger, summary, utility prices                    |
//! | [`personnel`] | Employees, candidate pool, task queue                    |
//! | [`geometry`]  | Structural invariants (area/volume containment)          |
//! | [`selectors`] | Tree lookups (`find_room`, `find_zone_mut`, …)           |
//! | [`defaults`]  | Fresh-entity defaults and duplicate naming               |
//!
//! # Ownership model
//!
//! There is exactly one `WorldState` per session and one logical owner (the
//! facade).  Command handlers and tick phases receive `&mut WorldState` and
//! mutate in place — there is no copy-on-write, so every return path must
//! leave the tree internally consistent.  External readers only ever see
//! deep copies (`WorldState` is `Clone`), never the live tree.

pub mod defaults;
pub mod device;
pub mod facility;
pub mod finance;
pub mod geometry;
pub mod inventory;
pub mod personnel;
pub mod plant;
pub mod selectors;
pub mod world;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use device::{Device, DeviceMaintenance, DeviceStatus};
pub use facility::{
    Footprint, Room, Structure, StructureStatus, Zone, ZoneControl, ZoneCultivation,
    ZoneEnvironment, ZoneHealth, ZoneMetrics, ZoneResources,
};
pub use finance::{Finances, LedgerCategory, LedgerEntry, LedgerEntryType, UtilityPrices};
pub use geometry::{validate_structure_geometry, GeometryError, EPSILON};
pub use inventory::{DeviceStockEntry, HarvestBatch, HarvestStage, Inventory, ResourceInventory, SeedStockEntry};
pub use personnel::{Employee, Personnel, TaskQueue, WorkOrder};
pub use plant::{Plant, PlantStage};
pub use world::{Difficulty, EconomicsSettings, GameMetadata, SimulationNote, WorldState};
