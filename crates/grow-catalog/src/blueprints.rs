//! Blueprint record types.
//!
//! Every record carries both an `id` (stable, referenced from World State) and
//! — where operators type them — a human-friendly `slug`.  Compatible-type
//! sets are plain string sets; an **empty set means "any type accepted"**.

use serde::{Deserialize, Serialize};

/// A cultivation method (soil pots, hydro trays, …).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CultivationMethodBlueprint {
    pub id: String,
    pub slug: String,
    pub name: String,
    /// Container types this method accepts; empty = any.
    pub compatible_container_types: Vec<String>,
    /// Substrate types this method accepts; empty = any.
    pub compatible_substrate_types: Vec<String>,
    /// Container slug to migrate to when a zone switches to this method and
    /// the caller did not pick one.
    pub default_container_slug: Option<String>,
    /// Substrate slug to migrate to on a method switch.
    pub default_substrate_slug: Option<String>,
}

/// A plant container (pot, tray, bag).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerBlueprint {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub container_type: String,
    /// Floor area one container occupies, m².
    pub footprint_area: f64,
    /// Fill volume of one container, litres.
    pub volume_liters: f64,
    /// Fraction of the zone floor usable for containers (aisles excluded).
    pub packing_density: f64,
}

/// A growing substrate (soil mix, coco coir, rockwool).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstrateBlueprint {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub substrate_type: String,
}

/// An installable device template.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceBlueprint {
    pub id: String,
    pub name: String,
    /// Lamp, ClimateUnit, HumidityControlUnit, CO2Injector, …
    pub kind: String,
    /// Nominal electrical draw at full output, kW.
    pub power_draw_kw: f64,
    /// Zone area one unit can serve, m².
    pub coverage_area: f64,
}

/// A plant strain with the optima the growth stage reads.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrainBlueprint {
    pub id: String,
    pub name: String,
    pub optimal_temperature_min: f64,
    pub optimal_temperature_max: f64,
    pub optimal_humidity_min: f64,
    pub optimal_humidity_max: f64,
    /// Dry biomass gained per simulated hour under ideal conditions, grams.
    pub growth_rate_grams_per_hour: f64,
    /// Hours from germination to the vegetative stage.
    pub vegetative_after_hours: f64,
    /// Hours until flowering begins.
    pub flowering_after_hours: f64,
    /// Hours until the plant is harvest-ready.
    pub harvest_after_hours: f64,
}

/// A rentable structure template.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureBlueprint {
    pub id: String,
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub rental_cost_per_sqm_per_month: f64,
    pub upfront_fee: f64,
}

impl StructureBlueprint {
    #[inline]
    pub fn area(&self) -> f64 {
        self.length * self.width
    }
}

/// A room purpose (growroom, processing, breakroom, …).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoomPurpose {
    pub id: String,
    pub name: String,
}
