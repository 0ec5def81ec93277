//! `plants.*` — planting, culling, harvesting.

use grow_core::CommandError;
use grow_command::{CommandRegistry, CommandSpec, PayloadReader, Preprocess};
use grow_engine::plants::{self, AddPlantingIntent, CullPlantingIntent};
use serde_json::Value;

use super::encode;

pub fn register(registry: &mut CommandRegistry) {
    registry.register(
        "plants",
        "addPlanting",
        CommandSpec::new("plants.addPlanting", Preprocess::None, |payload, ctx| {
            let intent = parse_add_planting(&payload)?;
            encode(plants::add_planting(&intent, ctx)?)
        }),
    );
    registry.register(
        "plants",
        "cullPlanting",
        CommandSpec::new("plants.cullPlanting", Preprocess::None, |payload, ctx| {
            let intent = parse_cull_planting(&payload)?;
            encode(plants::cull_planting(&intent, ctx)?)
        }),
    );
    registry.register(
        "plants",
        "harvestPlanting",
        CommandSpec::new("plants.harvestPlanting", Preprocess::None, |payload, ctx| {
            let zone_id = parse_harvest_planting(&payload)?;
            encode(plants::harvest_planting(&zone_id, ctx)?)
        }),
    );
}

fn parse_add_planting(payload: &Value) -> Result<AddPlantingIntent, Vec<CommandError>> {
    let mut reader = PayloadReader::root("plants.addPlanting", payload)?;
    let zone_id = reader.require_identifier("zoneId");
    let strain_id = reader.require_identifier("strainId");
    let count = reader.require_positive_integer("count") as u32;
    reader.finish()?;
    Ok(AddPlantingIntent { zone_id, strain_id, count })
}

fn parse_cull_planting(payload: &Value) -> Result<CullPlantingIntent, Vec<CommandError>> {
    let mut reader = PayloadReader::root("plants.cullPlanting", payload)?;
    let zone_id = reader.require_identifier("zoneId");
    let plant_ids = reader.optional_identifier_list("plantIds");
    reader.finish()?;
    Ok(CullPlantingIntent { zone_id, plant_ids })
}

fn parse_harvest_planting(payload: &Value) -> Result<String, Vec<CommandError>> {
    let mut reader = PayloadReader::root("plants.harvestPlanting", payload)?;
    let zone_id = reader.require_identifier("zoneId");
    reader.finish()?;
    Ok(zone_id)
}
