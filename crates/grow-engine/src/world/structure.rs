//! Structure lifecycle: rent, rename, delete, duplicate.

use grow_core::DomainError;
use grow_command::{CommandContext, CommandReply};
use grow_events::EventLevel;
use grow_state::defaults::derive_duplicate_name;
use grow_state::selectors::{find_structure, find_structure_mut};
use grow_state::{Footprint, LedgerCategory, Room, Structure, StructureStatus};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

use crate::economy::{self, TickAccumulator};
use crate::world::zone::{clone_zone, record_device_purchases};

const HOURS_PER_MONTH: f64 = 30.0 * 24.0;

// ── Intents / results ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentStructureIntent {
    pub structure_blueprint_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentStructureResult {
    pub structure_id: String,
    pub upfront_fee: f64,
    pub rent_per_hour: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateStructureResult {
    pub structure_id: String,
}

fn path(command: &str, tail: &[&str]) -> Vec<String> {
    let mut p = vec![command.to_string()];
    p.extend(tail.iter().map(|s| s.to_string()));
    p
}

// ── rentStructure ─────────────────────────────────────────────────────────────

pub fn rent_structure(
    intent: &RentStructureIntent,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<RentStructureResult>, DomainError> {
    let command = ctx.command;

    let blueprint = ctx
        .repository
        .structure(&intent.structure_blueprint_id)
        .ok_or_else(|| {
            DomainError::not_found(
                format!("Structure blueprint {} was not found.", intent.structure_blueprint_id),
                path(command, &["structureBlueprintId"]),
            )
        })?;

    let multiplier = ctx.state.metadata.economics.item_price_multiplier;
    let upfront_fee = blueprint.upfront_fee.max(0.0) * multiplier;
    if !ctx.state.finances.can_afford(upfront_fee) {
        return Err(DomainError::insufficient_funds(
            format!(
                "Upfront fee of {upfront_fee:.2} exceeds available cash of {:.2}.",
                ctx.state.finances.cash_on_hand,
            ),
            path(command, &["structureBlueprintId"]),
        ));
    }

    let rent_per_hour =
        blueprint.rental_cost_per_sqm_per_month.max(0.0) * blueprint.area() / HOURS_PER_MONTH;
    let structure_id = ctx.ids.next("structure");
    let name = intent
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(&blueprint.name)
        .to_string();

    let structure = Structure {
        id: structure_id.clone(),
        blueprint_id: blueprint.id.clone(),
        name: name.clone(),
        status: StructureStatus::Active,
        footprint: Footprint::new(blueprint.length, blueprint.width, blueprint.height),
        rooms: Vec::new(),
        rent_per_hour,
        upfront_cost_paid: upfront_fee,
    };

    let timestamp = grow_core::time::unix_ms_now();
    let mut accumulator = TickAccumulator::new();
    economy::record_expense(
        ctx.state,
        ctx.ids,
        upfront_fee,
        LedgerCategory::Structure,
        format!("Upfront fee: {name}"),
        ctx.tick,
        timestamp,
        &mut accumulator,
    );
    economy::apply_accumulator(ctx.state, &accumulator);

    ctx.state.structures.push(structure);

    ctx.events.queue(
        "world.structureRented",
        json!({
            "structureId": structure_id,
            "blueprintId": blueprint.id,
            "name": name,
            "upfrontFee": upfront_fee,
            "rentPerHour": rent_per_hour,
        }),
        EventLevel::Info,
    );

    Ok(CommandReply::new(RentStructureResult { structure_id, upfront_fee, rent_per_hour }))
}

// ── renameStructure / deleteStructure ─────────────────────────────────────────

pub fn rename_structure(
    structure_id: &str,
    name: &str,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<()>, DomainError> {
    let command = ctx.command;
    let structure = find_structure_mut(ctx.state, structure_id).ok_or_else(|| {
        DomainError::not_found(
            format!("Structure {structure_id} was not found."),
            path(command, &["structureId"]),
        )
    })?;
    structure.name = name.trim().to_string();
    let applied = structure.name.clone();

    ctx.events.queue(
        "world.structureRenamed",
        json!({ "structureId": structure_id, "name": applied }),
        EventLevel::Info,
    );
    Ok(CommandReply::empty())
}

pub fn delete_structure(
    structure_id: &str,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<()>, DomainError> {
    let command = ctx.command;
    if find_structure(ctx.state, structure_id).is_none() {
        return Err(DomainError::not_found(
            format!("Structure {structure_id} was not found."),
            path(command, &["structureId"]),
        ));
    }
    ctx.state.structures.retain(|s| s.id != structure_id);

    ctx.events.queue(
        "world.structureDeleted",
        json!({ "structureId": structure_id }),
        EventLevel::Info,
    );
    Ok(CommandReply::empty())
}

// ── duplicateStructure ────────────────────────────────────────────────────────

pub fn duplicate_structure(
    structure_id: &str,
    desired_name: Option<&str>,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<DuplicateStructureResult>, DomainError> {
    let command = ctx.command;

    let source = find_structure(ctx.state, structure_id)
        .ok_or_else(|| {
            DomainError::not_found(
                format!("Structure {structure_id} was not found."),
                path(command, &["structureId"]),
            )
        })?
        .clone();

    let multiplier = ctx.state.metadata.economics.item_price_multiplier;
    let upfront_fee = ctx
        .repository
        .structure(&source.blueprint_id)
        .map(|b| b.upfront_fee.max(0.0) * multiplier)
        .unwrap_or(source.upfront_cost_paid);
    if !ctx.state.finances.can_afford(upfront_fee) {
        return Err(DomainError::insufficient_funds(
            format!(
                "Upfront fee of {upfront_fee:.2} exceeds available cash of {:.2}.",
                ctx.state.finances.cash_on_hand,
            ),
            path(command, &["structureId"]),
        ));
    }

    let new_structure_id = ctx.ids.next("structure");
    let name = match desired_name.map(str::trim).filter(|s| !s.is_empty()) {
        Some(forced) => forced.to_string(),
        None => derive_duplicate_name(&source.name, "Structure Copy"),
    };

    // Clone the whole room tree with fresh ids, tallying device re-purchases.
    let mut purchases: BTreeMap<String, u32> = BTreeMap::new();
    let mut rooms = Vec::with_capacity(source.rooms.len());
    for room in &source.rooms {
        let new_room_id = ctx.ids.next("room");
        let mut zones = Vec::with_capacity(room.zones.len());
        for zone in &room.zones {
            let (clone, zone_purchases) = clone_zone(zone, &new_room_id, ctx.ids, ctx.tick, None);
            for (blueprint_id, count) in zone_purchases {
                *purchases.entry(blueprint_id).or_insert(0) += count;
            }
            zones.push(clone);
        }
        rooms.push(Room {
            id: new_room_id,
            structure_id: new_structure_id.clone(),
            name: room.name.clone(),
            purpose_id: room.purpose_id.clone(),
            area: room.area,
            height: room.height,
            volume: room.volume,
            zones,
            cleanliness: 1.0,
            maintenance_level: 1.0,
        });
    }

    let timestamp = grow_core::time::unix_ms_now();
    let mut accumulator = TickAccumulator::new();
    economy::record_expense(
        ctx.state,
        ctx.ids,
        upfront_fee,
        LedgerCategory::Structure,
        format!("Upfront fee: {name}"),
        ctx.tick,
        timestamp,
        &mut accumulator,
    );
    economy::apply_accumulator(ctx.state, &accumulator);
    record_device_purchases(ctx, &purchases, &format!("Structure duplication from {structure_id}"));

    ctx.state.structures.push(Structure {
        id: new_structure_id.clone(),
        blueprint_id: source.blueprint_id.clone(),
        name: name.clone(),
        status: StructureStatus::Active,
        footprint: source.footprint,
        rooms,
        rent_per_hour: source.rent_per_hour,
        upfront_cost_paid: upfront_fee,
    });

    ctx.events.queue(
        "world.structureDuplicated",
        json!({
            "structureId": new_structure_id,
            "sourceStructureId": structure_id,
            "name": name,
        }),
        EventLevel::Info,
    );

    Ok(CommandReply::new(DuplicateStructureResult { structure_id: new_structure_id }))
}
