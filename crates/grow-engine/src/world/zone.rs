//! Zone lifecycle: create, update, duplicate, delete.
//!
//! Handlers are written validate-first: every fallible check runs before the
//! first world mutation, so a failed command leaves the zone tree untouched
//! even though the dispatcher does not roll back.

use grow_core::{DomainError, Tick};
use grow_catalog::{ContainerBlueprint, CultivationMethodBlueprint};
use grow_command::{CommandContext, CommandReply};
use grow_events::EventLevel;
use grow_state::defaults::{
    default_metrics, default_resources, derive_duplicate_name, empty_health,
    DEFAULT_MAINTENANCE_INTERVAL_TICKS, DEFAULT_ROOM_HEIGHT,
};
use grow_state::facility::{ZoneContainerSetup, ZoneSubstrateSetup};
use grow_state::selectors::{find_room, find_zone, structure_index_of_room, structure_index_of_zone};
use grow_state::{
    validate_structure_geometry, Device, DeviceMaintenance, DeviceStatus, Zone, ZoneCultivation,
    EPSILON,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

use crate::economy::{self, TickAccumulator};

// ── Intents ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSpec {
    pub blueprint_id: String,
    #[serde(rename = "type")]
    pub container_type: String,
    pub count: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstrateSpec {
    pub blueprint_id: String,
    #[serde(rename = "type")]
    pub substrate_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_liters: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSpec {
    pub name: String,
    pub area: f64,
    pub method_id: String,
    pub container: ContainerSpec,
    pub substrate: SubstrateSpec,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateZoneIntent {
    pub room_id: String,
    pub zone: ZoneSpec,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substrate: Option<SubstrateSpec>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateZoneIntent {
    pub zone_id: String,
    pub patch: ZonePatch,
}

// ── Results ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodCostBreakdown {
    pub blueprint_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_cost: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerCostBreakdown {
    pub blueprint_id: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub container_type: String,
    pub count: u32,
    pub max_supported: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstrateCostBreakdown {
    pub blueprint_id: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub substrate_type: String,
    pub total_volume_liters: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateZoneResult {
    pub zone_id: String,
    pub method: MethodCostBreakdown,
    pub container: ContainerCostBreakdown,
    pub substrate: SubstrateCostBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateZoneResult {
    pub zone_id: String,
}

// ── Shared capacity math ──────────────────────────────────────────────────────

/// Maximum container count a zone area supports, or the coded failure when
/// the blueprint's footprint cannot support even one.
fn container_capacity(
    blueprint: &ContainerBlueprint,
    zone_area: f64,
    command: &str,
    blueprint_path: &[&str],
    count_path: &[&str],
) -> Result<u32, DomainError> {
    let footprint = blueprint.footprint_area;
    if !footprint.is_finite() || footprint <= 0.0 {
        return Err(DomainError::invalid_state(
            format!("Container blueprint '{}' is missing a valid footprint area.", blueprint.slug),
            path(command, blueprint_path),
        ));
    }

    let density = if blueprint.packing_density.is_finite() {
        blueprint.packing_density.max(0.0)
    } else {
        1.0
    };
    let effective_density = if density > 0.0 { density } else { 1.0 };
    let theoretical = (zone_area / footprint) * effective_density;
    let max_containers = if theoretical.is_finite() {
        theoretical.max(0.0).floor() as u32
    } else {
        0
    };

    if max_containers == 0 {
        return Err(DomainError::invalid_state(
            format!(
                "Zone area {zone_area:.2} m² cannot support container footprint {footprint:.2} m².",
            ),
            path(command, count_path),
        ));
    }
    Ok(max_containers)
}

fn container_unit_volume(
    blueprint: &ContainerBlueprint,
    command: &str,
    blueprint_path: &[&str],
) -> Result<f64, DomainError> {
    let volume = blueprint.volume_liters;
    if !volume.is_finite() || volume <= 0.0 {
        return Err(DomainError::invalid_state(
            format!("Container blueprint '{}' is missing a valid fill volume.", blueprint.slug),
            path(command, blueprint_path),
        ));
    }
    Ok(volume)
}

/// Warn when a caller-supplied substrate volume strays outside ±5 % (with a
/// 1 L floor) of the derived requirement.
fn check_substrate_volume(provided: f64, required: f64, warnings: &mut Vec<String>) {
    let tolerance = (required * 0.05).max(1.0);
    if (provided - required).abs() > tolerance {
        warnings.push(format!(
            "Submitted substrate volume ({provided:.2} L) differs from the required {required:.2} L.",
        ));
    }
}

fn ensure_container_compatible(
    method: &CultivationMethodBlueprint,
    container_type: &str,
    command: &str,
    tail: &[&str],
) -> Result<(), DomainError> {
    if !method.compatible_container_types.is_empty()
        && !method.compatible_container_types.iter().any(|t| t == container_type)
    {
        return Err(DomainError::invalid_state(
            format!(
                "Container type '{container_type}' is incompatible with cultivation method '{}'.",
                method.name,
            ),
            path(command, tail),
        ));
    }
    Ok(())
}

fn ensure_substrate_compatible(
    method: &CultivationMethodBlueprint,
    substrate_type: &str,
    command: &str,
    tail: &[&str],
) -> Result<(), DomainError> {
    if !method.compatible_substrate_types.is_empty()
        && !method.compatible_substrate_types.iter().any(|t| t == substrate_type)
    {
        return Err(DomainError::invalid_state(
            format!(
                "Substrate type '{substrate_type}' is incompatible with cultivation method '{}'.",
                method.name,
            ),
            path(command, tail),
        ));
    }
    Ok(())
}

fn path(command: &str, tail: &[&str]) -> Vec<String> {
    let mut p = vec![command.to_string()];
    p.extend(tail.iter().map(|s| s.to_string()));
    p
}

// ── createZone ────────────────────────────────────────────────────────────────

pub fn create_zone(
    intent: &CreateZoneIntent,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<CreateZoneResult>, DomainError> {
    let command = ctx.command;
    let repo = ctx.repository;
    let spec = &intent.zone;

    // ── Room and capacity ─────────────────────────────────────────────────
    let (room_id, room_area, room_height, structure_id, existing_area) = {
        let lookup = find_room(ctx.state, &intent.room_id).ok_or_else(|| {
            DomainError::not_found(
                format!("Room {} was not found.", intent.room_id),
                path(command, &["roomId"]),
            )
        })?;
        (
            lookup.room.id.clone(),
            lookup.room.area,
            lookup.room.height,
            lookup.structure.id.clone(),
            lookup.room.zones.iter().map(|z| z.area).sum::<f64>(),
        )
    };

    if existing_area + spec.area - room_area > EPSILON {
        return Err(DomainError::conflict(
            "Adding the zone would exceed the room area.",
            path(command, &["zone", "area"]),
        ));
    }

    // ── Blueprints and compatibility ──────────────────────────────────────
    let method = repo.cultivation_method(&spec.method_id).ok_or_else(|| {
        DomainError::not_found(
            format!("Cultivation method {} was not found.", spec.method_id),
            path(command, &["zone", "methodId"]),
        )
    })?;

    let container_blueprint = repo.container(&spec.container.blueprint_id).ok_or_else(|| {
        DomainError::not_found(
            format!("Container blueprint {} was not found.", spec.container.blueprint_id),
            path(command, &["zone", "container", "blueprintId"]),
        )
    })?;
    if container_blueprint.container_type != spec.container.container_type {
        return Err(DomainError::validation(
            "Container type does not match blueprint metadata.",
            path(command, &["zone", "container", "type"]),
        ));
    }
    ensure_container_compatible(
        method,
        &container_blueprint.container_type,
        command,
        &["zone", "container", "type"],
    )?;

    let max_containers = container_capacity(
        container_blueprint,
        spec.area,
        command,
        &["zone", "container", "blueprintId"],
        &["zone", "container", "count"],
    )?;
    if spec.container.count > max_containers {
        return Err(DomainError::conflict(
            format!(
                "Requested {} containers exceeds maximum supported count of {max_containers}.",
                spec.container.count,
            ),
            path(command, &["zone", "container", "count"]),
        ));
    }

    let substrate_blueprint = repo.substrate(&spec.substrate.blueprint_id).ok_or_else(|| {
        DomainError::not_found(
            format!("Substrate blueprint {} was not found.", spec.substrate.blueprint_id),
            path(command, &["zone", "substrate", "blueprintId"]),
        )
    })?;
    if substrate_blueprint.substrate_type != spec.substrate.substrate_type {
        return Err(DomainError::validation(
            "Substrate type does not match blueprint metadata.",
            path(command, &["zone", "substrate", "type"]),
        ));
    }
    ensure_substrate_compatible(
        method,
        &substrate_blueprint.substrate_type,
        command,
        &["zone", "substrate", "type"],
    )?;

    // ── Substrate volume ──────────────────────────────────────────────────
    let unit_volume = container_unit_volume(
        container_blueprint,
        command,
        &["zone", "container", "blueprintId"],
    )?;
    let required_volume = unit_volume * spec.container.count as f64;

    let mut warnings = Vec::new();
    if let Some(provided) = spec.substrate.volume_liters {
        check_substrate_volume(provided, required_volume, &mut warnings);
    }

    // ── Capital cost ──────────────────────────────────────────────────────
    let multiplier = ctx.state.metadata.economics.item_price_multiplier;
    let method_price = repo.method_price(&method.id);
    let container_price = repo.container_price(&container_blueprint.slug);
    let substrate_price = repo.substrate_price(&substrate_blueprint.slug);

    let method_cost = method_price.map(|p| p.setup_cost.max(0.0) * multiplier);
    let container_cost =
        container_price.map(|p| p.cost_per_unit.max(0.0) * spec.container.count as f64 * multiplier);
    let substrate_cost =
        substrate_price.map(|p| p.cost_per_liter.max(0.0) * required_volume * multiplier);

    let components = [method_cost, container_cost, substrate_cost];
    let total: f64 = components.iter().flatten().sum();
    let total_cost = if components.iter().flatten().any(|c| *c > 0.0) {
        Some(total)
    } else {
        None
    };

    // ── Construct and attach ──────────────────────────────────────────────
    let ceiling_height = if room_height > 0.0 { room_height } else { DEFAULT_ROOM_HEIGHT };
    let zone_id = ctx.ids.next("zone");
    let new_zone = Zone {
        id: zone_id.clone(),
        room_id: room_id.clone(),
        name: spec.name.trim().to_string(),
        cultivation_method_id: spec.method_id.clone(),
        strain_id: None,
        area: spec.area,
        ceiling_height,
        volume: spec.area * ceiling_height,
        environment: grow_state::defaults::default_environment(),
        resources: default_resources(),
        plants: Vec::new(),
        devices: Vec::new(),
        metrics: default_metrics(ctx.tick),
        control: Default::default(),
        health: empty_health(),
        active_task_ids: Vec::new(),
        cultivation: ZoneCultivation {
            container: Some(ZoneContainerSetup {
                blueprint_id: container_blueprint.id.clone(),
                slug: container_blueprint.slug.clone(),
                container_type: container_blueprint.container_type.clone(),
                count: spec.container.count,
                name: container_blueprint.name.clone(),
            }),
            substrate: Some(ZoneSubstrateSetup {
                blueprint_id: substrate_blueprint.id.clone(),
                slug: substrate_blueprint.slug.clone(),
                substrate_type: substrate_blueprint.substrate_type.clone(),
                total_volume_liters: required_volume,
                name: substrate_blueprint.name.clone(),
            }),
        },
    };

    let result = CreateZoneResult {
        zone_id: zone_id.clone(),
        method: MethodCostBreakdown { blueprint_id: method.id.clone(), setup_cost: method_cost },
        container: ContainerCostBreakdown {
            blueprint_id: container_blueprint.id.clone(),
            slug: container_blueprint.slug.clone(),
            container_type: container_blueprint.container_type.clone(),
            count: spec.container.count,
            max_supported: max_containers,
            unit_cost: container_price.map(|p| p.cost_per_unit),
            total_cost: container_cost,
        },
        substrate: SubstrateCostBreakdown {
            blueprint_id: substrate_blueprint.id.clone(),
            slug: substrate_blueprint.slug.clone(),
            substrate_type: substrate_blueprint.substrate_type.clone(),
            total_volume_liters: required_volume,
            unit_cost: substrate_price.map(|p| p.cost_per_liter),
            total_cost: substrate_cost,
        },
        total_cost,
    };

    attach_zone(ctx, &room_id, new_zone)?;

    ctx.events.queue(
        "world.zoneCreated",
        json!({
            "zoneId": zone_id,
            "roomId": room_id,
            "structureId": structure_id,
            "name": spec.name.trim(),
            "container": { "slug": container_blueprint.slug, "count": spec.container.count },
            "substrate": { "slug": substrate_blueprint.slug, "totalVolumeLiters": required_volume },
        }),
        EventLevel::Info,
    );

    Ok(CommandReply::with_warnings(result, warnings))
}

/// Push `zone` into its room and re-validate the owning structure.
fn attach_zone(
    ctx: &mut CommandContext<'_>,
    room_id: &str,
    zone: Zone,
) -> Result<(), DomainError> {
    let index = structure_index_of_room(ctx.state, room_id)
        .ok_or_else(|| DomainError::internal(format!("Room {room_id} disappeared mid-command.")))?;
    let structure = &mut ctx.state.structures[index];
    let room = structure
        .rooms
        .iter_mut()
        .find(|r| r.id == room_id)
        .ok_or_else(|| DomainError::internal(format!("Room {room_id} disappeared mid-command.")))?;
    room.zones.push(zone);

    validate_structure_geometry(&ctx.state.structures[index])
        .map_err(|e| DomainError::internal(e.to_string()))
}

// ── updateZone ────────────────────────────────────────────────────────────────

pub fn update_zone(
    intent: &UpdateZoneIntent,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<()>, DomainError> {
    let command = ctx.command;
    let repo = ctx.repository;
    let patch = &intent.patch;

    // ── Snapshot the zone and its surroundings ────────────────────────────
    let (room_id, room_area, sibling_area, structure_id, current) = {
        let lookup = find_zone(ctx.state, &intent.zone_id).ok_or_else(|| {
            DomainError::not_found(
                format!("Zone {} was not found.", intent.zone_id),
                path(command, &["zoneId"]),
            )
        })?;
        let sibling_area: f64 = lookup
            .room
            .zones
            .iter()
            .filter(|z| z.id != intent.zone_id)
            .map(|z| z.area)
            .sum();
        (
            lookup.room.id.clone(),
            lookup.room.area,
            sibling_area,
            lookup.structure.id.clone(),
            lookup.zone.clone(),
        )
    };

    let mut warnings = Vec::new();

    // ── Geometry ──────────────────────────────────────────────────────────
    let geometry_changed = patch.area.is_some();
    if let Some(area) = patch.area {
        if sibling_area + area - room_area > EPSILON {
            return Err(DomainError::conflict(
                "Updated zone area would exceed the room capacity.",
                path(command, &["patch", "area"]),
            ));
        }
    }
    let target_area = patch.area.unwrap_or(current.area);

    // ── Method resolution ─────────────────────────────────────────────────
    let method_changed = patch
        .method_id
        .as_ref()
        .is_some_and(|id| *id != current.cultivation_method_id);
    let requested_method_id =
        patch.method_id.clone().unwrap_or_else(|| current.cultivation_method_id.clone());
    let method = repo.cultivation_method(&requested_method_id).ok_or_else(|| {
        let tail: &[&str] = if patch.method_id.is_some() {
            &["patch", "methodId"]
        } else {
            &["zone", "cultivationMethodId"]
        };
        DomainError::not_found(
            format!("Cultivation method {requested_method_id} was not found."),
            path(command, tail),
        )
    })?;

    // ── Resolve the next container setup ──────────────────────────────────
    let previous_container_slug = current.cultivation.container.as_ref().map(|c| c.slug.clone());
    let previous_substrate_slug = current.cultivation.substrate.as_ref().map(|s| s.slug.clone());

    let mut next_container: Option<ZoneContainerSetup> = None;
    let mut container_blueprint: Option<&ContainerBlueprint> = None;

    if let Some(spec) = &patch.container {
        let blueprint = repo.container(&spec.blueprint_id).ok_or_else(|| {
            DomainError::not_found(
                format!("Container blueprint {} was not found.", spec.blueprint_id),
                path(command, &["patch", "container", "blueprintId"]),
            )
        })?;
        if blueprint.container_type != spec.container_type {
            return Err(DomainError::validation(
                "Container type does not match blueprint metadata.",
                path(command, &["patch", "container", "type"]),
            ));
        }
        next_container = Some(ZoneContainerSetup {
            blueprint_id: blueprint.id.clone(),
            slug: blueprint.slug.clone(),
            container_type: blueprint.container_type.clone(),
            count: spec.count,
            name: blueprint.name.clone(),
        });
        container_blueprint = Some(blueprint);
    } else if let Some(existing) = &current.cultivation.container {
        let blueprint = repo.container(&existing.blueprint_id).ok_or_else(|| {
            DomainError::invalid_state(
                format!("Container blueprint {} was not found.", existing.blueprint_id),
                path(command, &["zone", "cultivation", "container", "blueprintId"]),
            )
        })?;
        next_container = Some(existing.clone());
        container_blueprint = Some(blueprint);
    }

    // ── Resolve the next substrate setup ──────────────────────────────────
    let mut next_substrate: Option<ZoneSubstrateSetup> = None;

    if let Some(spec) = &patch.substrate {
        if next_container.is_none() {
            return Err(DomainError::invalid_state(
                "Container configuration must be provided before updating substrate.",
                path(command, &["patch", "substrate", "blueprintId"]),
            ));
        }
        let blueprint = repo.substrate(&spec.blueprint_id).ok_or_else(|| {
            DomainError::not_found(
                format!("Substrate blueprint {} was not found.", spec.blueprint_id),
                path(command, &["patch", "substrate", "blueprintId"]),
            )
        })?;
        if blueprint.substrate_type != spec.substrate_type {
            return Err(DomainError::validation(
                "Substrate type does not match blueprint metadata.",
                path(command, &["patch", "substrate", "type"]),
            ));
        }
        let carried_volume = current
            .cultivation
            .substrate
            .as_ref()
            .map(|s| s.total_volume_liters)
            .unwrap_or(0.0);
        next_substrate = Some(ZoneSubstrateSetup {
            blueprint_id: blueprint.id.clone(),
            slug: blueprint.slug.clone(),
            substrate_type: blueprint.substrate_type.clone(),
            total_volume_liters: spec.volume_liters.unwrap_or(carried_volume),
            name: blueprint.name.clone(),
        });
    } else if let Some(existing) = &current.cultivation.substrate {
        next_substrate = Some(existing.clone());
    }

    // ── Method-change defaulting ──────────────────────────────────────────
    //
    // Switching method without simultaneously re-specifying equipment pulls
    // the new method's default slugs and auto-migrates; prior equipment is
    // reported as moved to storage.
    if method_changed {
        if patch.container.is_none() {
            if let Some(slug) = &method.default_container_slug {
                if let Some(defaulted) = repo.container_by_slug(slug) {
                    let count = next_container.as_ref().map(|c| c.count).unwrap_or(0);
                    next_container = Some(ZoneContainerSetup {
                        blueprint_id: defaulted.id.clone(),
                        slug: defaulted.slug.clone(),
                        container_type: defaulted.container_type.clone(),
                        count,
                        name: defaulted.name.clone(),
                    });
                    container_blueprint = Some(defaulted);
                    if previous_container_slug
                        .as_ref()
                        .is_some_and(|previous| previous != &defaulted.slug)
                    {
                        warnings.push(format!(
                            "Existing containers were moved to storage. Install {} before planting.",
                            defaulted.name,
                        ));
                    }
                }
            }
        }
        if patch.substrate.is_none() {
            if let Some(slug) = &method.default_substrate_slug {
                if let Some(defaulted) = repo.substrate_by_slug(slug) {
                    let carried_volume =
                        next_substrate.as_ref().map(|s| s.total_volume_liters).unwrap_or(0.0);
                    next_substrate = Some(ZoneSubstrateSetup {
                        blueprint_id: defaulted.id.clone(),
                        slug: defaulted.slug.clone(),
                        substrate_type: defaulted.substrate_type.clone(),
                        total_volume_liters: carried_volume,
                        name: defaulted.name.clone(),
                    });
                    if previous_substrate_slug
                        .as_ref()
                        .is_some_and(|previous| previous != &defaulted.slug)
                    {
                        warnings.push(format!(
                            "Existing substrate was routed to storage. Restock with {} before planting.",
                            defaulted.name,
                        ));
                    }
                }
            }
        }
    }

    // ── Compatibility against the (possibly defaulted) setup ──────────────
    if let Some(container) = &next_container {
        let tail: &[&str] = if patch.container.is_some() {
            &["patch", "container", "type"]
        } else {
            &["patch", "methodId"]
        };
        ensure_container_compatible(method, &container.container_type, command, tail)?;
    }
    if let Some(substrate) = &next_substrate {
        let tail: &[&str] = if patch.substrate.is_some() {
            &["patch", "substrate", "type"]
        } else {
            &["patch", "methodId"]
        };
        ensure_substrate_compatible(method, &substrate.substrate_type, command, tail)?;
    }

    // ── Capacity and substrate volume ─────────────────────────────────────
    let mut required_volume: Option<f64> = None;
    if let (Some(container), Some(blueprint)) = (next_container.as_mut(), container_blueprint) {
        let blueprint_tail: &[&str] = if patch.container.is_some() {
            &["patch", "container", "blueprintId"]
        } else {
            &["zone", "cultivation", "container", "blueprintId"]
        };
        let count_tail: &[&str] = if patch.container.is_some() {
            &["patch", "container", "count"]
        } else {
            &["zone", "cultivation", "container", "count"]
        };

        let max_containers =
            container_capacity(blueprint, target_area, command, blueprint_tail, count_tail)?;

        if container.count == 0 {
            return Err(DomainError::validation(
                "Container count must be a positive integer.",
                path(command, count_tail),
            ));
        }

        // Over-capacity counts are clamped, not rejected.
        if container.count > max_containers {
            warnings.push(format!(
                "Container count has been clamped to {max_containers} to fit the zone capacity ({max_containers}).",
            ));
            container.count = max_containers;
        }

        let unit_volume = container_unit_volume(blueprint, command, blueprint_tail)?;
        required_volume = Some(unit_volume * container.count as f64);
    }

    if let (Some(substrate), Some(required)) = (next_substrate.as_mut(), required_volume) {
        if let Some(provided) = patch.substrate.as_ref().and_then(|s| s.volume_liters) {
            check_substrate_volume(provided, required, &mut warnings);
        }
        substrate.total_volume_liters = required;
    }

    // ── Apply ─────────────────────────────────────────────────────────────
    let container_changed = current.cultivation.container.as_ref().map(|c| (&c.blueprint_id, c.count))
        != next_container.as_ref().map(|c| (&c.blueprint_id, c.count));
    let substrate_changed = current
        .cultivation
        .substrate
        .as_ref()
        .map(|s| (&s.blueprint_id, s.total_volume_liters))
        != next_substrate
            .as_ref()
            .map(|s| (&s.blueprint_id, s.total_volume_liters));
    let cultivation_changed = method_changed || container_changed || substrate_changed;

    let structure_index = structure_index_of_zone(ctx.state, &intent.zone_id)
        .ok_or_else(|| DomainError::internal("Zone disappeared mid-command."))?;
    {
        let structure = &mut ctx.state.structures[structure_index];
        let zone = structure
            .rooms
            .iter_mut()
            .flat_map(|r| r.zones.iter_mut())
            .find(|z| z.id == intent.zone_id)
            .ok_or_else(|| DomainError::internal("Zone disappeared mid-command."))?;

        if let Some(name) = &patch.name {
            zone.name = name.trim().to_string();
        }
        if let Some(area) = patch.area {
            zone.area = area;
            zone.volume = area * zone.ceiling_height;
        }
        if method_changed {
            zone.cultivation_method_id = requested_method_id.clone();
        }
        if let Some(container) = next_container.clone() {
            zone.cultivation.container = Some(container);
        }
        if let Some(substrate) = next_substrate.clone() {
            zone.cultivation.substrate = Some(substrate);
        }
    }

    if geometry_changed {
        validate_structure_geometry(&ctx.state.structures[structure_index])
            .map_err(|e| DomainError::internal(e.to_string()))?;
    }

    if geometry_changed || cultivation_changed {
        let mut payload = serde_json::Map::new();
        payload.insert("zoneId".into(), json!(intent.zone_id));
        payload.insert("roomId".into(), json!(room_id));
        payload.insert("structureId".into(), json!(structure_id));
        if cultivation_changed {
            payload.insert("methodId".into(), json!(requested_method_id));
            if let Some(container) = &next_container {
                payload.insert(
                    "container".into(),
                    json!({ "slug": container.slug, "count": container.count }),
                );
            }
            if let Some(substrate) = &next_substrate {
                payload.insert(
                    "substrate".into(),
                    json!({
                        "slug": substrate.slug,
                        "totalVolumeLiters": substrate.total_volume_liters,
                    }),
                );
            }
        }
        if geometry_changed {
            payload.insert("area".into(), json!(target_area));
        }
        ctx.events.queue("world.zoneUpdated", serde_json::Value::Object(payload), EventLevel::Info);
    }

    Ok(CommandReply::warnings_only(warnings))
}

// ── duplicateZone / deleteZone ────────────────────────────────────────────────

/// Deep-clone a zone with fresh ids for the zone and every device.
///
/// Live plants are never cloned; resources and health reset to defaults.
/// Returns the clone and a per-blueprint tally of the devices that must be
/// re-purchased.
pub fn clone_zone(
    source: &Zone,
    room_id: &str,
    ids: &grow_core::IdGenerator,
    tick: Tick,
    forced_name: Option<&str>,
) -> (Zone, BTreeMap<String, u32>) {
    let new_zone_id = ids.next("zone");
    let mut purchases: BTreeMap<String, u32> = BTreeMap::new();
    let mut devices = Vec::with_capacity(source.devices.len());

    for device in &source.devices {
        devices.push(Device {
            id: ids.next("device"),
            blueprint_id: device.blueprint_id.clone(),
            kind: device.kind.clone(),
            name: device.name.clone(),
            zone_id: new_zone_id.clone(),
            status: DeviceStatus::Operational,
            efficiency: device.efficiency,
            runtime_hours: 0.0,
            maintenance: DeviceMaintenance {
                last_service_tick: tick,
                next_due_tick: tick + DEFAULT_MAINTENANCE_INTERVAL_TICKS,
                condition: 1.0,
                runtime_hours_at_last_service: 0.0,
                degradation: 0.0,
            },
            settings: device.settings.clone(),
        });
        *purchases.entry(device.blueprint_id.clone()).or_insert(0) += 1;
    }

    let name = match forced_name {
        Some(forced) => forced.to_string(),
        None => derive_duplicate_name(&source.name, "Zone Copy"),
    };

    let zone = Zone {
        id: new_zone_id,
        room_id: room_id.to_string(),
        name,
        cultivation_method_id: source.cultivation_method_id.clone(),
        strain_id: source.strain_id.clone(),
        area: source.area,
        ceiling_height: source.ceiling_height,
        volume: source.volume,
        environment: source.environment,
        resources: default_resources(),
        plants: Vec::new(),
        devices,
        metrics: default_metrics(tick),
        control: source.control,
        health: empty_health(),
        active_task_ids: Vec::new(),
        cultivation: source.cultivation.clone(),
    };

    (zone, purchases)
}

pub fn duplicate_zone(
    zone_id: &str,
    desired_name: Option<&str>,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<DuplicateZoneResult>, DomainError> {
    let command = ctx.command;

    let (source, room_id, room_area, total_zone_area, structure_id) = {
        let lookup = find_zone(ctx.state, zone_id).ok_or_else(|| {
            DomainError::not_found(
                format!("Zone {zone_id} was not found."),
                path(command, &["zoneId"]),
            )
        })?;
        (
            lookup.zone.clone(),
            lookup.room.id.clone(),
            lookup.room.area,
            lookup.room.zones.iter().map(|z| z.area).sum::<f64>(),
            lookup.structure.id.clone(),
        )
    };

    if total_zone_area + source.area - room_area > EPSILON {
        return Err(DomainError::conflict(
            "Duplicating the zone would exceed the room area.",
            path(command, &["zoneId"]),
        ));
    }

    let forced_name = desired_name.map(str::trim).filter(|s| !s.is_empty());
    let (new_zone, purchases) = clone_zone(&source, &room_id, ctx.ids, ctx.tick, forced_name);
    let new_zone_id = new_zone.id.clone();

    record_device_purchases(ctx, &purchases, &format!("Zone duplication from {zone_id}"));

    attach_zone(ctx, &room_id, new_zone)?;

    ctx.events.queue(
        "world.zoneDuplicated",
        json!({
            "zoneId": new_zone_id,
            "sourceZoneId": zone_id,
            "roomId": room_id,
            "structureId": structure_id,
        }),
        EventLevel::Info,
    );

    Ok(CommandReply::new(DuplicateZoneResult { zone_id: new_zone_id }))
}

/// Charge the capital cost of re-purchasing cloned devices.
pub fn record_device_purchases(
    ctx: &mut CommandContext<'_>,
    purchases: &BTreeMap<String, u32>,
    description: &str,
) {
    if purchases.is_empty() {
        return;
    }
    let timestamp = grow_core::time::unix_ms_now();
    let mut accumulator = TickAccumulator::new();
    for (blueprint_id, quantity) in purchases {
        economy::record_device_purchase(
            ctx.state,
            ctx.repository,
            ctx.ids,
            blueprint_id,
            *quantity,
            description,
            ctx.tick,
            timestamp,
            &mut accumulator,
            &mut ctx.events,
        );
    }
    economy::apply_accumulator(ctx.state, &accumulator);
}

pub fn delete_zone(
    zone_id: &str,
    ctx: &mut CommandContext<'_>,
) -> Result<CommandReply<()>, DomainError> {
    let command = ctx.command;

    let (room_id, structure_id) = {
        let lookup = find_zone(ctx.state, zone_id).ok_or_else(|| {
            DomainError::not_found(
                format!("Zone {zone_id} was not found."),
                path(command, &["zoneId"]),
            )
        })?;
        (lookup.room.id.clone(), lookup.structure.id.clone())
    };

    for structure in &mut ctx.state.structures {
        for room in &mut structure.rooms {
            room.zones.retain(|z| z.id != zone_id);
        }
    }

    ctx.events.queue(
        "world.zoneDeleted",
        json!({ "zoneId": zone_id, "roomId": room_id, "structureId": structure_id }),
        EventLevel::Info,
    );

    Ok(CommandReply::empty())
}
