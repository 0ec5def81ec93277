//! Room lifecycle: create, update, delete, duplicate.

use grow_core::DomainError;
use grow_command::{CommandContext, CommandReply};
use grow_events::EventLevel;
use grow_state::defaults::{derive_duplicate_name, DEFAULT_ROOM_HEIGHT};
use grow_state::selectors::{find_room, find_structure, structure_index_of_room};
use grow_state::{validate_structure_geometry, Room, EPSILON};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

use crate::world::zone::{clone_zone, record_device_purchases};

// ── Intents / results ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSpec {
    pub name: String,
    pub purpose_id: String,
    pub area: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomIntent {
    pub structure_id: String,
    pub room: RoomSpec,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomIntent {
    pub room_id: String,
    pub patch: RoomPatch,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomResult {
    pub room_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateRoomResult {
    pub room_id: String,
    pub zone_ids: Vec<String>,
}

fn path(command: &str, tail: &[&str]) -> Vec<String> {
    let mut p = vec![command.to_string()];
    p.extend(tail.iter().map(|s| s.to_string()));
    p
}

// ── createRoom ────────────────────────────────────────────────────────────────

pub fn create_room(
    intent: &CreateRoomIntent,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<CreateRoomResult>, DomainError> {
    let command = ctx.command;
    let spec = &intent.room;

    let (footprint_area, footprint_height, existing_area) = {
        let structure = find_structure(ctx.state, &intent.structure_id).ok_or_else(|| {
            DomainError::not_found(
                format!("Structure {} was not found.", intent.structure_id),
                path(command, &["structureId"]),
            )
        })?;
        (
            structure.footprint.area,
            structure.footprint.height,
            structure.rooms.iter().map(|r| r.area).sum::<f64>(),
        )
    };

    if ctx.repository.room_purpose(&spec.purpose_id).is_none() {
        return Err(DomainError::not_found(
            format!("Room purpose {} was not found.", spec.purpose_id),
            path(command, &["room", "purposeId"]),
        ));
    }

    if existing_area + spec.area - footprint_area > EPSILON {
        return Err(DomainError::conflict(
            "Adding the room would exceed the structure footprint.",
            path(command, &["room", "area"]),
        ));
    }

    let height = spec.height.unwrap_or_else(|| DEFAULT_ROOM_HEIGHT.min(footprint_height));
    if height - footprint_height > EPSILON {
        return Err(DomainError::conflict(
            "Room height would exceed the structure ceiling.",
            path(command, &["room", "height"]),
        ));
    }

    let room_id = ctx.ids.next("room");
    let room = Room {
        id: room_id.clone(),
        structure_id: intent.structure_id.clone(),
        name: spec.name.trim().to_string(),
        purpose_id: spec.purpose_id.clone(),
        area: spec.area,
        height,
        volume: spec.area * height,
        zones: Vec::new(),
        cleanliness: 1.0,
        maintenance_level: 1.0,
    };

    let index = ctx
        .state
        .structures
        .iter()
        .position(|s| s.id == intent.structure_id)
        .ok_or_else(|| DomainError::internal("Structure disappeared mid-command."))?;
    ctx.state.structures[index].rooms.push(room);
    validate_structure_geometry(&ctx.state.structures[index])
        .map_err(|e| DomainError::internal(e.to_string()))?;

    ctx.events.queue(
        "world.roomCreated",
        json!({
            "roomId": room_id,
            "structureId": intent.structure_id,
            "name": spec.name.trim(),
            "purposeId": spec.purpose_id,
            "area": spec.area,
        }),
        EventLevel::Info,
    );

    Ok(CommandReply::new(CreateRoomResult { room_id }))
}

// ── updateRoom ────────────────────────────────────────────────────────────────

pub fn update_room(
    intent: &UpdateRoomIntent,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<()>, DomainError> {
    let command = ctx.command;
    let patch = &intent.patch;

    let (structure_id, sibling_area, footprint_area, footprint_height, zone_area, max_zone_ceiling, current_area, current_height) = {
        let lookup = find_room(ctx.state, &intent.room_id).ok_or_else(|| {
            DomainError::not_found(
                format!("Room {} was not found.", intent.room_id),
                path(command, &["roomId"]),
            )
        })?;
        let sibling_area: f64 = lookup
            .structure
            .rooms
            .iter()
            .filter(|r| r.id != intent.room_id)
            .map(|r| r.area)
            .sum();
        let zone_area: f64 = lookup.room.zones.iter().map(|z| z.area).sum();
        let max_zone_ceiling = lookup
            .room
            .zones
            .iter()
            .map(|z| z.ceiling_height)
            .fold(0.0_f64, f64::max);
        (
            lookup.structure.id.clone(),
            sibling_area,
            lookup.structure.footprint.area,
            lookup.structure.footprint.height,
            zone_area,
            max_zone_ceiling,
            lookup.room.area,
            lookup.room.height,
        )
    };

    if let Some(purpose_id) = &patch.purpose_id {
        if ctx.repository.room_purpose(purpose_id).is_none() {
            return Err(DomainError::not_found(
                format!("Room purpose {purpose_id} was not found."),
                path(command, &["patch", "purposeId"]),
            ));
        }
    }

    if let Some(area) = patch.area {
        if zone_area - area > EPSILON {
            return Err(DomainError::conflict(
                "Updated room area would no longer fit its zones.",
                path(command, &["patch", "area"]),
            ));
        }
        if sibling_area + area - footprint_area > EPSILON {
            return Err(DomainError::conflict(
                "Updated room area would exceed the structure footprint.",
                path(command, &["patch", "area"]),
            ));
        }
    }

    if let Some(height) = patch.height {
        if height - footprint_height > EPSILON {
            return Err(DomainError::conflict(
                "Updated room height would exceed the structure ceiling.",
                path(command, &["patch", "height"]),
            ));
        }
        if max_zone_ceiling - height > EPSILON {
            return Err(DomainError::conflict(
                "Updated room height would fall below a zone ceiling.",
                path(command, &["patch", "height"]),
            ));
        }
    }

    let geometry_changed = patch.area.is_some() || patch.height.is_some();
    let new_area = patch.area.unwrap_or(current_area);
    let new_height = patch.height.unwrap_or(current_height);

    let structure_index = structure_index_of_room(ctx.state, &intent.room_id)
        .ok_or_else(|| DomainError::internal("Room disappeared mid-command."))?;
    {
        let structure = &mut ctx.state.structures[structure_index];
        let room = structure
            .rooms
            .iter_mut()
            .find(|r| r.id == intent.room_id)
            .ok_or_else(|| DomainError::internal("Room disappeared mid-command."))?;
        if let Some(name) = &patch.name {
            room.name = name.trim().to_string();
        }
        if let Some(purpose_id) = &patch.purpose_id {
            room.purpose_id = purpose_id.clone();
        }
        room.area = new_area;
        room.height = new_height;
        room.volume = new_area * new_height;
    }

    if geometry_changed {
        validate_structure_geometry(&ctx.state.structures[structure_index])
            .map_err(|e| DomainError::internal(e.to_string()))?;
    }

    ctx.events.queue(
        "world.roomUpdated",
        json!({
            "roomId": intent.room_id,
            "structureId": structure_id,
            "area": new_area,
            "height": new_height,
        }),
        EventLevel::Info,
    );

    Ok(CommandReply::empty())
}

// ── deleteRoom / duplicateRoom ────────────────────────────────────────────────

pub fn delete_room(
    room_id: &str,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<()>, DomainError> {
    let command = ctx.command;

    let structure_id = {
        let lookup = find_room(ctx.state, room_id).ok_or_else(|| {
            DomainError::not_found(
                format!("Room {room_id} was not found."),
                path(command, &["roomId"]),
            )
        })?;
        lookup.structure.id.clone()
    };

    for structure in &mut ctx.state.structures {
        structure.rooms.retain(|r| r.id != room_id);
    }

    ctx.events.queue(
        "world.roomDeleted",
        json!({ "roomId": room_id, "structureId": structure_id }),
        EventLevel::Info,
    );

    Ok(CommandReply::empty())
}

pub fn duplicate_room(
    room_id: &str,
    desired_name: Option<&str>,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<DuplicateRoomResult>, DomainError> {
    let command = ctx.command;

    let (source, structure_id, footprint_area, total_room_area) = {
        let lookup = find_room(ctx.state, room_id).ok_or_else(|| {
            DomainError::not_found(
                format!("Room {room_id} was not found."),
                path(command, &["roomId"]),
            )
        })?;
        (
            lookup.room.clone(),
            lookup.structure.id.clone(),
            lookup.structure.footprint.area,
            lookup.structure.rooms.iter().map(|r| r.area).sum::<f64>(),
        )
    };

    if total_room_area + source.area - footprint_area > EPSILON {
        return Err(DomainError::conflict(
            "Duplicating the room would exceed the structure footprint.",
            path(command, &["roomId"]),
        ));
    }

    let new_room_id = ctx.ids.next("room");
    let mut purchases: BTreeMap<String, u32> = BTreeMap::new();
    let mut zones = Vec::with_capacity(source.zones.len());
    for zone in &source.zones {
        let (clone, zone_purchases) = clone_zone(zone, &new_room_id, ctx.ids, ctx.tick, None);
        for (blueprint_id, count) in zone_purchases {
            *purchases.entry(blueprint_id).or_insert(0) += count;
        }
        zones.push(clone);
    }
    let zone_ids: Vec<String> = zones.iter().map(|z| z.id.clone()).collect();

    let name = match desired_name.map(str::trim).filter(|s| !s.is_empty()) {
        Some(forced) => forced.to_string(),
        None => derive_duplicate_name(&source.name, "Room Copy"),
    };

    let new_room = Room {
        id: new_room_id.clone(),
        structure_id: structure_id.clone(),
        name,
        purpose_id: source.purpose_id.clone(),
        area: source.area,
        height: source.height,
        volume: source.volume,
        zones,
        cleanliness: 1.0,
        maintenance_level: 1.0,
    };

    record_device_purchases(ctx, &purchases, &format!("Room duplication from {room_id}"));

    let structure_index = ctx
        .state
        .structures
        .iter()
        .position(|s| s.id == structure_id)
        .ok_or_else(|| DomainError::internal("Structure disappeared mid-command."))?;
    ctx.state.structures[structure_index].rooms.push(new_room);
    validate_structure_geometry(&ctx.state.structures[structure_index])
        .map_err(|e| DomainError::internal(e.to_string()))?;

    ctx.events.queue(
        "world.roomDuplicated",
        json!({
            "roomId": new_room_id,
            "sourceRoomId": room_id,
            "structureId": structure_id,
            "zoneCount": zone_ids.len(),
        }),
        EventLevel::Info,
    );

    Ok(CommandReply::new(DuplicateRoomResult { room_id: new_room_id, zone_ids }))
}
