//! Global inventory: bulk resources, seed stock, spare devices, harvest lots.

use grow_core::Tick;
use serde::{Deserialize, Serialize};

/// Bulk consumables shared by every structure.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInventory {
    pub water_liters: f64,
    pub nutrients_grams: f64,
    pub co2_kg: f64,
    pub substrate_liters: f64,
}

impl Default for ResourceInventory {
    fn default() -> Self {
        Self {
            water_liters: 10_000.0,
            nutrients_grams: 50_000.0,
            co2_kg: 100.0,
            substrate_liters: 0.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedStockEntry {
    pub id: String,
    pub strain_id: String,
    pub quantity: u32,
    /// Germination probability in [0, 1].
    pub viability: f64,
    pub stored_at_tick: Tick,
}

/// Uninstalled devices held in storage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStockEntry {
    pub id: String,
    pub blueprint_id: String,
    pub quantity: u32,
    pub condition: f64,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HarvestStage {
    Fresh,
    Drying,
    Cured,
    Waste,
}

/// One harvested lot moving through post-processing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestBatch {
    pub id: String,
    pub strain_id: String,
    pub weight_grams: f64,
    pub quality: f64,
    pub stage: HarvestStage,
    pub harvested_at_tick: Tick,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub resources: ResourceInventory,
    pub seeds: Vec<SeedStockEntry>,
    pub devices: Vec<DeviceStockEntry>,
    pub harvest: Vec<HarvestBatch>,
}
