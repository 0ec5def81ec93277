//! `grow-catalog` — the read-only blueprint and price catalog.
//!
//! Blueprints are immutable templates (cultivation methods, containers,
//! substrates, devices, strains, structures, room purposes) looked up by id or
//! slug.  Commands resolve blueprints at execution time and copy what they
//! need into World State; the catalog itself is never mutated by the
//! simulation.
//!
//! # Crate layout
//!
//! | Module         | Contents                                          |
//! |----------------|---------------------------------------------------|
//! | [`blueprints`] | Blueprint record types                            |
//! | [`prices`]     | Price-table record types                          |
//! | [`repository`] | `BlueprintRepository` — id/slug indexed lookups   |
//! | [`loader`]     | CSV loading (`load_catalog_dir`, per-file readers)|
//! | [`defaults`]   | `BlueprintRepository::with_defaults()` test set   |
//! | [`error`]      | `CatalogError`, `CatalogResult<T>`                |

pub mod blueprints;
pub mod defaults;
pub mod error;
pub mod loader;
pub mod prices;
pub mod repository;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use blueprints::{
    ContainerBlueprint, CultivationMethodBlueprint, DeviceBlueprint, RoomPurpose,
    StrainBlueprint, StructureBlueprint,
};
pub use blueprints::SubstrateBlueprint;
pub use error::{CatalogError, CatalogResult};
pub use prices::{
    ContainerPrice, DevicePrice, HarvestPrice, MethodPrice, SubstratePrice,
};
pub use repository::BlueprintRepository;
