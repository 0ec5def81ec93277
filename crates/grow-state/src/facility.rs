//! The containment tree: `Structure` → `Room` → `Zone`.
//!
//! Geometry fields are denormalised (`volume` is stored even though it is
//! derivable) so snapshots are self-contained; the invariants tying them
//! together are enforced by [`crate::geometry`] after every structural
//! mutation.

use grow_core::Tick;
use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::plant::Plant;

// ── Footprint ─────────────────────────────────────────────────────────────────

/// Outer dimensions of a structure with the derived area/volume.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Footprint {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub area: f64,
    pub volume: f64,
}

impl Footprint {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        let area = length * width;
        Self { length, width, height, area, volume: area * height }
    }
}

// ── Structure ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StructureStatus {
    Active,
    UnderConstruction,
    Decommissioned,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Structure {
    pub id: String,
    pub blueprint_id: String,
    pub name: String,
    pub status: StructureStatus,
    pub footprint: Footprint,
    pub rooms: Vec<Room>,
    /// Hourly rent base rate; multiplied by the tick length in hours to derive
    /// the per-tick charge.
    pub rent_per_hour: f64,
    pub upfront_cost_paid: f64,
}

// ── Room ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub structure_id: String,
    pub name: String,
    pub purpose_id: String,
    pub area: f64,
    pub height: f64,
    pub volume: f64,
    pub zones: Vec<Zone>,
    pub cleanliness: f64,
    pub maintenance_level: f64,
}

// ── Zone sub-state ────────────────────────────────────────────────────────────

/// Instantaneous climate of a zone.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneEnvironment {
    /// Air temperature, °C.
    pub temperature: f64,
    /// Relative humidity as a fraction (0–1).
    pub relative_humidity: f64,
    /// CO₂ concentration, ppm.
    pub co2: f64,
    /// Photosynthetic photon flux density, µmol·m⁻²·s⁻¹.
    pub ppfd: f64,
    /// Vapour pressure deficit, kPa — derived each tick from temperature and
    /// humidity.
    pub vpd: f64,
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneResources {
    pub water_liters: f64,
    pub nutrient_solution_liters: f64,
    pub nutrient_strength: f64,
    pub substrate_health: f64,
    pub reservoir_level: f64,
    pub last_transpiration_liters: f64,
}

/// Rolling climate averages plus the stress aggregate.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneMetrics {
    pub average_temperature: f64,
    pub average_humidity: f64,
    pub average_co2: f64,
    pub average_ppfd: f64,
    pub stress_level: f64,
    pub last_updated_tick: Tick,
}

/// Operator setpoints; `None` means "uncontrolled".
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneControl {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub co2: Option<f64>,
    pub ppfd: Option<f64>,
    pub vpd: Option<f64>,
}

/// Pest/disease bookkeeping.  Treatment scheduling lives in the excluded
/// health engine; the core only tracks the counters it reports on.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneHealth {
    pub pending_treatments: Vec<String>,
    pub applied_treatments: Vec<String>,
    pub active_disease_count: u32,
    pub active_pest_count: u32,
}

/// Installed container setup for a zone.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneContainerSetup {
    pub blueprint_id: String,
    pub slug: String,
    pub container_type: String,
    pub count: u32,
    pub name: String,
}

/// Installed substrate setup for a zone.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSubstrateSetup {
    pub blueprint_id: String,
    pub slug: String,
    pub substrate_type: String,
    pub total_volume_liters: f64,
    pub name: String,
}

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct ZoneCultivation {
    pub container: Option<ZoneContainerSetup>,
    pub substrate: Option<ZoneSubstrateSetup>,
}

// ── Zone ──────────────────────────────────────────────────────────────────────

/// The smallest cultivable unit: owns its plants, devices, and climate.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    pub room_id: String,
    pub name: String,
    pub cultivation_method_id: String,
    pub strain_id: Option<String>,
    pub area: f64,
    pub ceiling_height: f64,
    pub volume: f64,
    pub environment: ZoneEnvironment,
    pub resources: ZoneResources,
    pub plants: Vec<Plant>,
    pub devices: Vec<Device>,
    pub metrics: ZoneMetrics,
    pub control: ZoneControl,
    pub health: ZoneHealth,
    pub active_task_ids: Vec<String>,
    pub cultivation: ZoneCultivation,
}
