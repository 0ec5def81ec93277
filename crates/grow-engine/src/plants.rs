//! Planting services and the plant-growth tick stages.

use grow_core::{DomainError, Tick, TickLength};
use grow_catalog::StrainBlueprint;
use grow_command::{CommandContext, CommandReply};
use grow_events::EventLevel;
use grow_state::selectors::{find_zone, find_zone_mut};
use grow_state::{HarvestBatch, HarvestStage, Plant, PlantStage, WorldState};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::economy::TickAccumulator;

// ── Growth constants ──────────────────────────────────────────────────────────

/// Stress added per simulated hour while the climate is outside the strain's
/// optimal window, and shed while inside it.
const STRESS_GAIN_PER_HOUR: f64 = 0.02;
const STRESS_DECAY_PER_HOUR: f64 = 0.01;

/// Health lost per hour once stress passes the damage threshold.
const HEALTH_LOSS_PER_HOUR: f64 = 0.015;
const STRESS_DAMAGE_THRESHOLD: f64 = 0.7;

/// PPFD at which growth stops being light-limited.
const LIGHT_SATURATION_PPFD: f64 = 800.0;

/// Fraction of standing biomass banked as dry yield at harvest readiness.
const YIELD_FRACTION: f64 = 0.45;

/// Water demand per plant per simulated hour, litres.
const WATER_DEMAND_PER_PLANT_PER_HOUR: f64 = 0.05;

/// Quality decay per hour for fresh, unprocessed harvest lots.
const FRESH_LOT_DECAY_PER_HOUR: f64 = 0.001;

// ── Intents / results ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPlantingIntent {
    pub zone_id: String,
    pub strain_id: String,
    pub count: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CullPlantingIntent {
    pub zone_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_ids: Option<Vec<String>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPlantingResult {
    pub plant_ids: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestPlantingResult {
    pub batch_ids: Vec<String>,
    pub total_weight_grams: f64,
}

fn path(command: &str, tail: &[&str]) -> Vec<String> {
    let mut p = vec![command.to_string()];
    p.extend(tail.iter().map(|s| s.to_string()));
    p
}

// ── addPlanting ───────────────────────────────────────────────────────────────

pub fn add_planting(
    intent: &AddPlantingIntent,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<AddPlantingResult>, DomainError> {
    let command = ctx.command;

    let (container_count, existing_plants, strain_exists) = {
        let lookup = find_zone(ctx.state, &intent.zone_id).ok_or_else(|| {
            DomainError::not_found(
                format!("Zone {} was not found.", intent.zone_id),
                path(command, &["zoneId"]),
            )
        })?;
        (
            lookup.zone.cultivation.container.as_ref().map(|c| c.count),
            lookup.zone.plants.len() as u32,
            ctx.repository.strain(&intent.strain_id).is_some(),
        )
    };

    if !strain_exists {
        return Err(DomainError::not_found(
            format!("Strain {} was not found.", intent.strain_id),
            path(command, &["strainId"]),
        ));
    }
    let Some(capacity) = container_count else {
        return Err(DomainError::invalid_state(
            "Zone has no container configuration; install containers before planting.",
            path(command, &["zoneId"]),
        ));
    };
    if existing_plants + intent.count > capacity {
        return Err(DomainError::conflict(
            format!(
                "Planting {} plants exceeds the zone's container capacity of {capacity} ({existing_plants} occupied).",
                intent.count,
            ),
            path(command, &["count"]),
        ));
    }

    let tick = ctx.tick;
    let mut plant_ids = Vec::with_capacity(intent.count as usize);
    {
        let zone = find_zone_mut(ctx.state, &intent.zone_id)
            .ok_or_else(|| DomainError::internal("Zone disappeared mid-command."))?;
        zone.strain_id = Some(intent.strain_id.clone());
        for _ in 0..intent.count {
            let id = ctx.ids.next("plant");
            plant_ids.push(id.clone());
            zone.plants.push(Plant {
                id,
                strain_id: intent.strain_id.clone(),
                zone_id: intent.zone_id.clone(),
                stage: PlantStage::Seedling,
                planted_at_tick: tick,
                age_hours: 0.0,
                health: 1.0,
                stress: 0.0,
                biomass_dry_grams: 0.0,
                height_meters: 0.05,
                yield_dry_grams: 0.0,
                quality: 1.0,
                last_measurement_tick: tick,
            });
        }
    }

    ctx.events.queue(
        "plants.plantingAdded",
        json!({
            "zoneId": intent.zone_id,
            "strainId": intent.strain_id,
            "count": intent.count,
        }),
        EventLevel::Info,
    );

    Ok(CommandReply::new(AddPlantingResult { plant_ids }))
}

// ── cullPlanting ──────────────────────────────────────────────────────────────

pub fn cull_planting(
    intent: &CullPlantingIntent,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<()>, DomainError> {
    let command = ctx.command;

    if find_zone(ctx.state, &intent.zone_id).is_none() {
        return Err(DomainError::not_found(
            format!("Zone {} was not found.", intent.zone_id),
            path(command, &["zoneId"]),
        ));
    }

    let culled = {
        let zone = find_zone_mut(ctx.state, &intent.zone_id)
            .ok_or_else(|| DomainError::internal("Zone disappeared mid-command."))?;
        let before = zone.plants.len();
        match &intent.plant_ids {
            Some(ids) => zone.plants.retain(|p| !ids.iter().any(|id| id == &p.id)),
            None => zone.plants.clear(),
        }
        before - zone.plants.len()
    };

    ctx.events.queue(
        "plants.plantingCulled",
        json!({ "zoneId": intent.zone_id, "culled": culled }),
        EventLevel::Info,
    );

    Ok(CommandReply::empty())
}

// ── harvestPlanting ───────────────────────────────────────────────────────────

/// Move every harvest-ready plant in the zone into fresh inventory lots.
pub fn harvest_planting(
    zone_id: &str,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<HarvestPlantingResult>, DomainError> {
    let command = ctx.command;

    if find_zone(ctx.state, zone_id).is_none() {
        return Err(DomainError::not_found(
            format!("Zone {zone_id} was not found."),
            path(command, &["zoneId"]),
        ));
    }

    let tick = ctx.tick;
    let harvested: Vec<Plant> = {
        let zone = find_zone_mut(ctx.state, zone_id)
            .ok_or_else(|| DomainError::internal("Zone disappeared mid-command."))?;
        let (ready, rest): (Vec<Plant>, Vec<Plant>) =
            zone.plants.drain(..).partition(|p| p.is_harvestable());
        zone.plants = rest;
        ready
    };

    if harvested.is_empty() {
        return Ok(CommandReply::with_warnings(
            HarvestPlantingResult { batch_ids: Vec::new(), total_weight_grams: 0.0 },
            vec!["No harvest-ready plants in the zone.".to_string()],
        ));
    }

    let mut batch_ids = Vec::with_capacity(harvested.len());
    let mut total_weight = 0.0;
    for plant in &harvested {
        let weight = plant.yield_dry_grams.max(0.0);
        total_weight += weight;
        let id = ctx.ids.next("harvest");
        batch_ids.push(id.clone());
        ctx.state.inventory.harvest.push(HarvestBatch {
            id,
            strain_id: plant.strain_id.clone(),
            weight_grams: weight,
            quality: plant.quality.clamp(0.0, 1.0),
            stage: HarvestStage::Fresh,
            harvested_at_tick: tick,
        });
    }

    ctx.events.queue(
        "plants.harvested",
        json!({
            "zoneId": zone_id,
            "plantCount": harvested.len(),
            "totalWeightGrams": total_weight,
        }),
        EventLevel::Info,
    );

    Ok(CommandReply::new(HarvestPlantingResult { batch_ids, total_weight_grams: total_weight }))
}

// ── Tick stages ───────────────────────────────────────────────────────────────

/// Growth, phenology, and stress for every plant, against its strain optima.
pub fn update_plants(
    state: &mut WorldState,
    repository: &grow_catalog::BlueprintRepository,
    tick: Tick,
    tick_length: TickLength,
) {
    let hours = tick_length.as_hours();
    if hours <= 0.0 {
        return;
    }

    for structure in &mut state.structures {
        for room in &mut structure.rooms {
            for zone in &mut room.zones {
                let env = zone.environment;
                for plant in &mut zone.plants {
                    let Some(strain) = repository.strain(&plant.strain_id) else {
                        continue;
                    };
                    advance_plant(plant, strain, env.temperature, env.relative_humidity, env.ppfd, hours);
                    plant.last_measurement_tick = tick;
                }
            }
        }
    }
}

fn advance_plant(
    plant: &mut Plant,
    strain: &StrainBlueprint,
    temperature: f64,
    humidity: f64,
    ppfd: f64,
    hours: f64,
) {
    if plant.stage == PlantStage::Dead {
        return;
    }
    plant.age_hours += hours;

    // Stress rises outside the strain's optimal window, decays inside it.
    let in_optimum = (strain.optimal_temperature_min..=strain.optimal_temperature_max)
        .contains(&temperature)
        && (strain.optimal_humidity_min..=strain.optimal_humidity_max).contains(&humidity);
    if in_optimum {
        plant.stress = (plant.stress - STRESS_DECAY_PER_HOUR * hours).max(0.0);
    } else {
        plant.stress = (plant.stress + STRESS_GAIN_PER_HOUR * hours).min(1.0);
    }
    if plant.stress > STRESS_DAMAGE_THRESHOLD {
        plant.health = (plant.health - HEALTH_LOSS_PER_HOUR * hours).max(0.0);
    }
    if plant.health <= 0.0 {
        plant.stage = PlantStage::Dead;
        return;
    }

    // Light-limited growth from the vegetative stage onward.
    if plant.stage != PlantStage::Seedling {
        let light_factor = (ppfd / LIGHT_SATURATION_PPFD).clamp(0.0, 1.0);
        let growth = strain.growth_rate_grams_per_hour
            * hours
            * light_factor
            * (1.0 - plant.stress)
            * plant.health;
        plant.biomass_dry_grams += growth.max(0.0);
        plant.height_meters += growth.max(0.0) * 0.002;
    }

    // Phenology by age; quality settles once harvest-ready.
    plant.stage = match plant.stage {
        PlantStage::Seedling if plant.age_hours >= strain.vegetative_after_hours => {
            PlantStage::Vegetative
        }
        PlantStage::Vegetative if plant.age_hours >= strain.flowering_after_hours => {
            PlantStage::Flowering
        }
        PlantStage::Flowering if plant.age_hours >= strain.harvest_after_hours * 0.9 => {
            PlantStage::Ripening
        }
        PlantStage::Ripening if plant.age_hours >= strain.harvest_after_hours => {
            plant.yield_dry_grams = plant.biomass_dry_grams * YIELD_FRACTION;
            plant.quality = (plant.health * (1.0 - plant.stress * 0.5)).clamp(0.0, 1.0);
            PlantStage::HarvestReady
        }
        stage => stage,
    };
}

/// Water and nutrient demand against zone reservoirs and global inventory.
pub fn process_irrigation(
    state: &mut WorldState,
    tick_length: TickLength,
    accumulator: &mut TickAccumulator,
) {
    let hours = tick_length.as_hours();
    if hours <= 0.0 {
        return;
    }

    for structure in &mut state.structures {
        for room in &mut structure.rooms {
            for zone in &mut room.zones {
                let alive = zone.plants.iter().filter(|p| p.is_alive()).count();
                if alive == 0 {
                    continue;
                }
                let demand = alive as f64 * WATER_DEMAND_PER_PLANT_PER_HOUR * hours;

                // Draw the zone reservoir first, then cover the rest from
                // global stock.
                let from_reservoir = demand.min(zone.resources.water_liters);
                zone.resources.water_liters -= from_reservoir;
                let shortfall = demand - from_reservoir;
                let from_global = shortfall.min(state.inventory.resources.water_liters);
                state.inventory.resources.water_liters -= from_global;

                zone.resources.last_transpiration_liters = demand;
                accumulator.water_liters += demand;
            }
        }
    }
}

/// Post-harvest bookkeeping: fresh lots slowly lose quality until processed.
pub fn process_harvest_inventory(state: &mut WorldState, tick_length: TickLength) {
    let hours = tick_length.as_hours();
    if hours <= 0.0 {
        return;
    }
    for batch in &mut state.inventory.harvest {
        if batch.stage == HarvestStage::Fresh {
            batch.quality = (batch.quality - FRESH_LOT_DECAY_PER_HOUR * hours).max(0.0);
        }
    }
}
