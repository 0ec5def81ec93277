//! `world.*` — structure, room, and zone lifecycle commands.

use grow_core::CommandError;
use grow_command::{CommandRegistry, CommandSpec, PayloadReader, Preprocess};
use grow_engine::world::room::{CreateRoomIntent, RoomPatch, RoomSpec, UpdateRoomIntent};
use grow_engine::world::structure::RentStructureIntent;
use grow_engine::world::zone::{
    ContainerSpec, CreateZoneIntent, SubstrateSpec, UpdateZoneIntent, ZonePatch, ZoneSpec,
};
use grow_engine::world::{room, structure, zone};
use serde_json::Value;

use super::encode;

pub fn register(registry: &mut CommandRegistry) {
    registry.register(
        "world",
        "rentStructure",
        CommandSpec::new("world.rentStructure", Preprocess::None, |payload, ctx| {
            let intent = parse_rent_structure(&payload)?;
            encode(structure::rent_structure(&intent, ctx)?)
        }),
    );
    registry.register(
        "world",
        "renameStructure",
        CommandSpec::new("world.renameStructure", Preprocess::None, |payload, ctx| {
            let (structure_id, name) = parse_rename_structure(&payload)?;
            encode(structure::rename_structure(&structure_id, &name, ctx)?)
        }),
    );
    registry.register(
        "world",
        "deleteStructure",
        CommandSpec::new("world.deleteStructure", Preprocess::None, |payload, ctx| {
            let structure_id = parse_single_id("world.deleteStructure", "structureId", &payload)?;
            encode(structure::delete_structure(&structure_id, ctx)?)
        }),
    );
    registry.register(
        "world",
        "duplicateStructure",
        CommandSpec::new("world.duplicateStructure", Preprocess::None, |payload, ctx| {
            let (structure_id, name) =
                parse_id_with_name("world.duplicateStructure", "structureId", &payload)?;
            encode(structure::duplicate_structure(&structure_id, name.as_deref(), ctx)?)
        }),
    );

    registry.register(
        "world",
        "createRoom",
        CommandSpec::new("world.createRoom", Preprocess::None, |payload, ctx| {
            let intent = parse_create_room(&payload)?;
            encode(room::create_room(&intent, ctx)?)
        }),
    );
    registry.register(
        "world",
        "updateRoom",
        CommandSpec::new("world.updateRoom", Preprocess::None, |payload, ctx| {
            let intent = parse_update_room(&payload)?;
            encode(room::update_room(&intent, ctx)?)
        }),
    );
    registry.register(
        "world",
        "deleteRoom",
        CommandSpec::new("world.deleteRoom", Preprocess::None, |payload, ctx| {
            let room_id = parse_single_id("world.deleteRoom", "roomId", &payload)?;
            encode(room::delete_room(&room_id, ctx)?)
        }),
    );
    registry.register(
        "world",
        "duplicateRoom",
        CommandSpec::new("world.duplicateRoom", Preprocess::None, |payload, ctx| {
            let (room_id, name) = parse_id_with_name("world.duplicateRoom", "roomId", &payload)?;
            encode(room::duplicate_room(&room_id, name.as_deref(), ctx)?)
        }),
    );

    registry.register(
        "world",
        "createZone",
        CommandSpec::new("world.createZone", Preprocess::None, |payload, ctx| {
            let intent = parse_create_zone(&payload)?;
            encode(zone::create_zone(&intent, ctx)?)
        }),
    );
    registry.register(
        "world",
        "updateZone",
        CommandSpec::new("world.updateZone", Preprocess::None, |payload, ctx| {
            let intent = parse_update_zone(&payload)?;
            encode(zone::update_zone(&intent, ctx)?)
        }),
    );
    registry.register(
        "world",
        "deleteZone",
        CommandSpec::new("world.deleteZone", Preprocess::None, |payload, ctx| {
            let zone_id = parse_single_id("world.deleteZone", "zoneId", &payload)?;
            encode(zone::delete_zone(&zone_id, ctx)?)
        }),
    );
    registry.register(
        "world",
        "duplicateZone",
        CommandSpec::new("world.duplicateZone", Preprocess::None, |payload, ctx| {
            let (zone_id, name) = parse_id_with_name("world.duplicateZone", "zoneId", &payload)?;
            encode(zone::duplicate_zone(&zone_id, name.as_deref(), ctx)?)
        }),
    );
}

// ── Shared shapes ─────────────────────────────────────────────────────────────

fn parse_single_id(command: &str, key: &str, payload: &Value) -> Result<String, Vec<CommandError>> {
    let mut reader = PayloadReader::root(command, payload)?;
    let id = reader.require_identifier(key);
    reader.finish()?;
    Ok(id)
}

fn parse_id_with_name(
    command: &str,
    key: &str,
    payload: &Value,
) -> Result<(String, Option<String>), Vec<CommandError>> {
    let mut reader = PayloadReader::root(command, payload)?;
    let id = reader.require_identifier(key);
    let name = reader.optional_string("name");
    reader.finish()?;
    Ok((id, name))
}

// ── Structures ────────────────────────────────────────────────────────────────

fn parse_rent_structure(payload: &Value) -> Result<RentStructureIntent, Vec<CommandError>> {
    let mut reader = PayloadReader::root("world.rentStructure", payload)?;
    let structure_blueprint_id = reader.require_identifier("structureBlueprintId");
    let name = reader.optional_string("name");
    reader.finish()?;
    Ok(RentStructureIntent { structure_blueprint_id, name })
}

fn parse_rename_structure(payload: &Value) -> Result<(String, String), Vec<CommandError>> {
    let mut reader = PayloadReader::root("world.renameStructure", payload)?;
    let structure_id = reader.require_identifier("structureId");
    let name = reader.require_string("name");
    reader.finish()?;
    Ok((structure_id, name))
}

// ── Rooms ─────────────────────────────────────────────────────────────────────

fn parse_create_room(payload: &Value) -> Result<CreateRoomIntent, Vec<CommandError>> {
    let mut reader = PayloadReader::root("world.createRoom", payload)?;
    let structure_id = reader.require_identifier("structureId");
    let mut spec = RoomSpec {
        name: String::new(),
        purpose_id: String::new(),
        area: 0.0,
        height: None,
    };
    if let Some(mut inner) = reader.nested("room") {
        spec.name = inner.require_string("name");
        spec.purpose_id = inner.require_identifier("purposeId");
        spec.area = inner.require_positive_number("area");
        spec.height = inner.optional_positive_number("height");
        reader.absorb(inner);
    }
    reader.finish()?;
    Ok(CreateRoomIntent { structure_id, room: spec })
}

fn parse_update_room(payload: &Value) -> Result<UpdateRoomIntent, Vec<CommandError>> {
    let command = "world.updateRoom";
    let mut reader = PayloadReader::root(command, payload)?;
    let room_id = reader.require_identifier("roomId");
    let mut patch = RoomPatch::default();
    if let Some(mut inner) = reader.nested("patch") {
        let empty = !inner.has_any_field();
        patch.name = inner.optional_string("name");
        patch.purpose_id = inner.optional_identifier("purposeId");
        patch.area = inner.optional_positive_number("area");
        patch.height = inner.optional_positive_number("height");
        reader.absorb(inner);
        if empty {
            reader.error("patch", "At least one field must be provided in patch.");
        }
    }
    reader.finish()?;
    Ok(UpdateRoomIntent { room_id, patch })
}

// ── Zones ─────────────────────────────────────────────────────────────────────

/// Read a `container` object; `required` decides whether absence is an error.
fn read_container(reader: &mut PayloadReader<'_>, required: bool) -> Option<ContainerSpec> {
    let child = if required {
        reader.nested("container")
    } else {
        reader.optional_nested("container")
    };
    let mut child = child?;
    let spec = ContainerSpec {
        blueprint_id: child.require_identifier("blueprintId"),
        container_type: child.require_string("type"),
        count: child.require_positive_integer("count") as u32,
    };
    reader.absorb(child);
    Some(spec)
}

/// Read a `substrate` object; `required` decides whether absence is an error.
fn read_substrate(reader: &mut PayloadReader<'_>, required: bool) -> Option<SubstrateSpec> {
    let child = if required {
        reader.nested("substrate")
    } else {
        reader.optional_nested("substrate")
    };
    let mut child = child?;
    let spec = SubstrateSpec {
        blueprint_id: child.require_identifier("blueprintId"),
        substrate_type: child.require_string("type"),
        volume_liters: child.optional_positive_number("volumeLiters"),
    };
    reader.absorb(child);
    Some(spec)
}

fn parse_create_zone(payload: &Value) -> Result<CreateZoneIntent, Vec<CommandError>> {
    let mut reader = PayloadReader::root("world.createZone", payload)?;
    let room_id = reader.require_identifier("roomId");

    let mut spec = ZoneSpec {
        name: String::new(),
        area: 0.0,
        method_id: String::new(),
        container: ContainerSpec {
            blueprint_id: String::new(),
            container_type: String::new(),
            count: 0,
        },
        substrate: SubstrateSpec {
            blueprint_id: String::new(),
            substrate_type: String::new(),
            volume_liters: None,
        },
    };
    if let Some(mut inner) = reader.nested("zone") {
        spec.name = inner.require_string("name");
        spec.area = inner.require_positive_number("area");
        spec.method_id = inner.require_identifier("methodId");
        if let Some(container) = read_container(&mut inner, true) {
            spec.container = container;
        }
        if let Some(substrate) = read_substrate(&mut inner, true) {
            spec.substrate = substrate;
        }
        reader.absorb(inner);
    }
    reader.finish()?;
    Ok(CreateZoneIntent { room_id, zone: spec })
}

fn parse_update_zone(payload: &Value) -> Result<UpdateZoneIntent, Vec<CommandError>> {
    let mut reader = PayloadReader::root("world.updateZone", payload)?;
    let zone_id = reader.require_identifier("zoneId");
    let mut patch = ZonePatch::default();
    if let Some(mut inner) = reader.nested("patch") {
        let empty = !inner.has_any_field();
        patch.name = inner.optional_string("name");
        patch.area = inner.optional_positive_number("area");
        patch.method_id = inner.optional_identifier("methodId");
        patch.container = read_container(&mut inner, false);
        patch.substrate = read_substrate(&mut inner, false);
        reader.absorb(inner);
        if empty {
            reader.error("patch", "At least one field must be provided in patch.");
        }
    }
    reader.finish()?;
    Ok(UpdateZoneIntent { zone_id, patch })
}
