//! `devices.*` — install, update, move, remove.

use grow_core::CommandError;
use grow_command::{CommandRegistry, CommandSpec, PayloadReader, Preprocess};
use grow_engine::devices::{
    self, DevicePatch, InstallDeviceIntent, UpdateDeviceIntent,
};
use grow_state::DeviceStatus;
use serde_json::Value;

use super::encode;

pub fn register(registry: &mut CommandRegistry) {
    registry.register(
        "devices",
        "installDevice",
        CommandSpec::new("devices.installDevice", Preprocess::None, |payload, ctx| {
            let intent = parse_install_device(&payload)?;
            encode(devices::install_device(&intent, ctx)?)
        }),
    );
    registry.register(
        "devices",
        "updateDevice",
        CommandSpec::new("devices.updateDevice", Preprocess::None, |payload, ctx| {
            let intent = parse_update_device(&payload)?;
            encode(devices::update_device(&intent, ctx)?)
        }),
    );
    registry.register(
        "devices",
        "moveDevice",
        CommandSpec::new("devices.moveDevice", Preprocess::None, |payload, ctx| {
            let (device_id, target_zone_id) = parse_move_device(&payload)?;
            encode(devices::move_device(&device_id, &target_zone_id, ctx)?)
        }),
    );
    registry.register(
        "devices",
        "removeDevice",
        CommandSpec::new("devices.removeDevice", Preprocess::None, |payload, ctx| {
            let device_id = parse_remove_device(&payload)?;
            encode(devices::remove_device(&device_id, ctx)?)
        }),
    );
}

fn parse_install_device(payload: &Value) -> Result<InstallDeviceIntent, Vec<CommandError>> {
    let mut reader = PayloadReader::root("devices.installDevice", payload)?;
    let zone_id = reader.require_identifier("zoneId");
    let blueprint_id = reader.require_identifier("blueprintId");
    let name = reader.optional_string("name");
    let settings = reader.optional_object_value("settings");
    reader.finish()?;
    Ok(InstallDeviceIntent { zone_id, blueprint_id, name, settings })
}

fn parse_status(reader: &mut PayloadReader<'_>) -> Option<DeviceStatus> {
    match reader.optional_string("status") {
        None => None,
        Some(value) => match value.as_str() {
            "operational" => Some(DeviceStatus::Operational),
            "maintenance" => Some(DeviceStatus::Maintenance),
            "offline" => Some(DeviceStatus::Offline),
            "failed" => Some(DeviceStatus::Failed),
            _ => {
                reader.error(
                    "status",
                    "Must be one of operational, maintenance, offline, failed.",
                );
                None
            }
        },
    }
}

fn parse_update_device(payload: &Value) -> Result<UpdateDeviceIntent, Vec<CommandError>> {
    let mut reader = PayloadReader::root("devices.updateDevice", payload)?;
    let device_id = reader.require_identifier("deviceId");
    let mut patch = DevicePatch::default();
    if let Some(mut inner) = reader.nested("patch") {
        let empty = !inner.has_any_field();
        patch.name = inner.optional_string("name");
        patch.status = parse_status(&mut inner);
        patch.settings = inner.optional_object_value("settings");
        reader.absorb(inner);
        if empty {
            reader.error("patch", "At least one field must be provided in patch.");
        }
    }
    reader.finish()?;
    Ok(UpdateDeviceIntent { device_id, patch })
}

fn parse_move_device(payload: &Value) -> Result<(String, String), Vec<CommandError>> {
    let mut reader = PayloadReader::root("devices.moveDevice", payload)?;
    let device_id = reader.require_identifier("deviceId");
    let target_zone_id = reader.require_identifier("targetZoneId");
    reader.finish()?;
    Ok((device_id, target_zone_id))
}

fn parse_remove_device(payload: &Value) -> Result<String, Vec<CommandError>> {
    let mut reader = PayloadReader::root("devices.removeDevice", payload)?;
    let device_id = reader.require_identifier("deviceId");
    reader.finish()?;
    Ok(device_id)
}
