//! Device services: install, update, move, remove.

use grow_core::DomainError;
use grow_command::{CommandContext, CommandReply};
use grow_events::EventLevel;
use grow_state::defaults::DEFAULT_MAINTENANCE_INTERVAL_TICKS;
use grow_state::selectors::find_zone;
use grow_state::{Device, DeviceMaintenance, DeviceStatus, DeviceStockEntry};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::economy::{self, TickAccumulator};

// ── Intents / results ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallDeviceIntent {
    pub zone_id: String,
    pub blueprint_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DeviceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeviceIntent {
    pub device_id: String,
    pub patch: DevicePatch,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallDeviceResult {
    pub device_id: String,
    pub total_cost: f64,
}

fn path(command: &str, tail: &[&str]) -> Vec<String> {
    let mut p = vec![command.to_string()];
    p.extend(tail.iter().map(|s| s.to_string()));
    p
}

fn find_device_zone(state: &grow_state::WorldState, device_id: &str) -> Option<String> {
    for structure in &state.structures {
        for room in &structure.rooms {
            for zone in &room.zones {
                if zone.devices.iter().any(|d| d.id == device_id) {
                    return Some(zone.id.clone());
                }
            }
        }
    }
    None
}

// ── installDevice ─────────────────────────────────────────────────────────────

pub fn install_device(
    intent: &InstallDeviceIntent,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<InstallDeviceResult>, DomainError> {
    let command = ctx.command;

    if find_zone(ctx.state, &intent.zone_id).is_none() {
        return Err(DomainError::not_found(
            format!("Zone {} was not found.", intent.zone_id),
            path(command, &["zoneId"]),
        ));
    }
    let blueprint = ctx.repository.device(&intent.blueprint_id).ok_or_else(|| {
        DomainError::not_found(
            format!("Device blueprint {} was not found.", intent.blueprint_id),
            path(command, &["blueprintId"]),
        )
    })?;

    let multiplier = ctx.state.metadata.economics.item_price_multiplier;
    let total_cost = ctx
        .repository
        .device_price(&intent.blueprint_id)
        .map(|p| p.capital_expenditure.max(0.0) * multiplier)
        .unwrap_or(0.0);
    if !ctx.state.finances.can_afford(total_cost) {
        return Err(DomainError::insufficient_funds(
            format!(
                "Device cost of {total_cost:.2} exceeds available cash of {:.2}.",
                ctx.state.finances.cash_on_hand,
            ),
            path(command, &["blueprintId"]),
        ));
    }

    // Nominal draw rides along in settings so tick processing never needs the
    // catalog.
    let mut settings = intent.settings.clone().unwrap_or_default();
    settings
        .entry("power".to_string())
        .or_insert_with(|| json!(blueprint.power_draw_kw));

    let device_id = ctx.ids.next("device");
    let device = Device {
        id: device_id.clone(),
        blueprint_id: blueprint.id.clone(),
        kind: blueprint.kind.clone(),
        name: intent
            .name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&blueprint.name)
            .to_string(),
        zone_id: intent.zone_id.clone(),
        status: DeviceStatus::Operational,
        efficiency: 1.0,
        runtime_hours: 0.0,
        maintenance: DeviceMaintenance {
            last_service_tick: ctx.tick,
            next_due_tick: ctx.tick + DEFAULT_MAINTENANCE_INTERVAL_TICKS,
            condition: 1.0,
            runtime_hours_at_last_service: 0.0,
            degradation: 0.0,
        },
        settings,
    };

    let timestamp = grow_core::time::unix_ms_now();
    let mut accumulator = TickAccumulator::new();
    economy::record_device_purchase(
        ctx.state,
        ctx.repository,
        ctx.ids,
        &intent.blueprint_id,
        1,
        format!("Device install: {}", device.name),
        ctx.tick,
        timestamp,
        &mut accumulator,
        &mut ctx.events,
    );
    economy::apply_accumulator(ctx.state, &accumulator);

    let zone = grow_state::selectors::find_zone_mut(ctx.state, &intent.zone_id)
        .ok_or_else(|| DomainError::internal("Zone disappeared mid-command."))?;
    zone.devices.push(device);

    ctx.events.queue(
        "devices.deviceInstalled",
        json!({
            "deviceId": device_id,
            "zoneId": intent.zone_id,
            "blueprintId": intent.blueprint_id,
            "totalCost": total_cost,
        }),
        EventLevel::Info,
    );

    Ok(CommandReply::new(InstallDeviceResult { device_id, total_cost }))
}

// ── updateDevice ──────────────────────────────────────────────────────────────

pub fn update_device(
    intent: &UpdateDeviceIntent,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<()>, DomainError> {
    let command = ctx.command;
    let zone_id = find_device_zone(ctx.state, &intent.device_id).ok_or_else(|| {
        DomainError::not_found(
            format!("Device {} was not found.", intent.device_id),
            path(command, &["deviceId"]),
        )
    })?;

    let zone = grow_state::selectors::find_zone_mut(ctx.state, &zone_id)
        .ok_or_else(|| DomainError::internal("Zone disappeared mid-command."))?;
    let device = zone
        .devices
        .iter_mut()
        .find(|d| d.id == intent.device_id)
        .ok_or_else(|| DomainError::internal("Device disappeared mid-command."))?;

    if let Some(name) = &intent.patch.name {
        device.name = name.trim().to_string();
    }
    if let Some(status) = intent.patch.status {
        device.status = status;
    }
    if let Some(settings) = &intent.patch.settings {
        for (key, value) in settings {
            device.settings.insert(key.clone(), value.clone());
        }
    }
    let status = device.status;

    ctx.events.queue(
        "devices.deviceUpdated",
        json!({ "deviceId": intent.device_id, "zoneId": zone_id, "status": status }),
        EventLevel::Info,
    );

    Ok(CommandReply::empty())
}

// ── moveDevice ────────────────────────────────────────────────────────────────

pub fn move_device(
    device_id: &str,
    target_zone_id: &str,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<()>, DomainError> {
    let command = ctx.command;

    let source_zone_id = find_device_zone(ctx.state, device_id).ok_or_else(|| {
        DomainError::not_found(
            format!("Device {device_id} was not found."),
            path(command, &["deviceId"]),
        )
    })?;
    if find_zone(ctx.state, target_zone_id).is_none() {
        return Err(DomainError::not_found(
            format!("Zone {target_zone_id} was not found."),
            path(command, &["targetZoneId"]),
        ));
    }
    if source_zone_id == target_zone_id {
        return Ok(CommandReply::warnings_only(vec![
            "Device is already installed in the target zone.".to_string(),
        ]));
    }

    let mut device = {
        let source = grow_state::selectors::find_zone_mut(ctx.state, &source_zone_id)
            .ok_or_else(|| DomainError::internal("Zone disappeared mid-command."))?;
        let index = source
            .devices
            .iter()
            .position(|d| d.id == device_id)
            .ok_or_else(|| DomainError::internal("Device disappeared mid-command."))?;
        source.devices.remove(index)
    };
    device.zone_id = target_zone_id.to_string();

    let target = grow_state::selectors::find_zone_mut(ctx.state, target_zone_id)
        .ok_or_else(|| DomainError::internal("Zone disappeared mid-command."))?;
    target.devices.push(device);

    ctx.events.queue(
        "devices.deviceMoved",
        json!({
            "deviceId": device_id,
            "fromZoneId": source_zone_id,
            "toZoneId": target_zone_id,
        }),
        EventLevel::Info,
    );

    Ok(CommandReply::empty())
}

// ── removeDevice ──────────────────────────────────────────────────────────────

/// Uninstall a device; it goes to inventory storage, not the scrap heap.
pub fn remove_device(
    device_id: &str,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<()>, DomainError> {
    let command = ctx.command;

    let zone_id = find_device_zone(ctx.state, device_id).ok_or_else(|| {
        DomainError::not_found(
            format!("Device {device_id} was not found."),
            path(command, &["deviceId"]),
        )
    })?;

    let device = {
        let zone = grow_state::selectors::find_zone_mut(ctx.state, &zone_id)
            .ok_or_else(|| DomainError::internal("Zone disappeared mid-command."))?;
        let index = zone
            .devices
            .iter()
            .position(|d| d.id == device_id)
            .ok_or_else(|| DomainError::internal("Device disappeared mid-command."))?;
        zone.devices.remove(index)
    };

    let stock_id = ctx.ids.next("stock");
    ctx.state.inventory.devices.push(DeviceStockEntry {
        id: stock_id,
        blueprint_id: device.blueprint_id.clone(),
        quantity: 1,
        condition: device.maintenance.condition,
    });

    ctx.events.queue(
        "devices.deviceRemoved",
        json!({
            "deviceId": device_id,
            "zoneId": zone_id,
            "blueprintId": device.blueprint_id,
        }),
        EventLevel::Info,
    );

    Ok(CommandReply::empty())
}
