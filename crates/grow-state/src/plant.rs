//! Plant instances and their growth stages.

use grow_core::Tick;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlantStage {
    Seedling,
    Vegetative,
    Flowering,
    Ripening,
    HarvestReady,
    Dead,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: String,
    pub strain_id: String,
    pub zone_id: String,
    pub stage: PlantStage,
    pub planted_at_tick: Tick,
    pub age_hours: f64,
    /// Vitality in [0, 1]; 0 is dead.
    pub health: f64,
    /// Accumulated stress in [0, 1].
    pub stress: f64,
    pub biomass_dry_grams: f64,
    pub height_meters: f64,
    pub yield_dry_grams: f64,
    /// Product quality in [0, 1], settled at harvest.
    pub quality: f64,
    pub last_measurement_tick: Tick,
}

impl Plant {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.stage != PlantStage::Dead && self.health > 0.0
    }

    #[inline]
    pub fn is_harvestable(&self) -> bool {
        self.stage == PlantStage::HarvestReady
    }
}
