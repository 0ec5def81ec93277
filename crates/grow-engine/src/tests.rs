//! Unit tests for the domain services and tick stages.

use grow_core::{ErrorCode, IdGenerator, Tick, TickLength};
use grow_catalog::BlueprintRepository;
use grow_command::CommandContext;
use grow_events::EventCollector;
use grow_state::{GameMetadata, WorldState};

use crate::world::room::{CreateRoomIntent, RoomSpec};
use crate::world::structure::RentStructureIntent;
use crate::world::zone::{
    ContainerSpec, CreateZoneIntent, SubstrateSpec, UpdateZoneIntent, ZonePatch, ZoneSpec,
};
use crate::world::{room, structure, zone};

// ── Harness ───────────────────────────────────────────────────────────────────

struct Harness {
    state: WorldState,
    repository: BlueprintRepository,
    ids: IdGenerator,
}

impl Harness {
    fn new() -> Self {
        Self {
            state: WorldState::empty(GameMetadata::standard("game-1", "seed", 0)),
            repository: BlueprintRepository::with_defaults(),
            ids: IdGenerator::new(),
        }
    }

    fn ctx<'a>(&'a mut self, command: &'a str) -> CommandContext<'a> {
        let tick = self.state.clock.tick;
        CommandContext {
            command,
            tick,
            state: &mut self.state,
            repository: &self.repository,
            ids: &self.ids,
            events: EventCollector::new(tick),
        }
    }

    /// Rent the small warehouse and carve one growroom of `area` m².
    fn with_room(&mut self, area: f64) -> (String, String) {
        let rent = RentStructureIntent {
            structure_blueprint_id: "structure-warehouse-small".into(),
            name: None,
        };
        let structure_id = {
            let mut ctx = self.ctx("world.rentStructure");
            structure::rent_structure(&rent, &mut ctx)
                .unwrap()
                .data
                .unwrap()
                .structure_id
        };
        let create = CreateRoomIntent {
            structure_id: structure_id.clone(),
            room: RoomSpec {
                name: "Grow A".into(),
                purpose_id: "purpose-growroom".into(),
                area,
                height: Some(2.5),
            },
        };
        let room_id = {
            let mut ctx = self.ctx("world.createRoom");
            room::create_room(&create, &mut ctx).unwrap().data.unwrap().room_id
        };
        (structure_id, room_id)
    }

    fn create_zone(&mut self, room_id: &str, spec: ZoneSpec) -> Result<zone::CreateZoneResult, grow_core::DomainError> {
        let intent = CreateZoneIntent { room_id: room_id.to_string(), zone: spec };
        let mut ctx = self.ctx("world.createZone");
        zone::create_zone(&intent, &mut ctx).map(|reply| reply.data.unwrap())
    }
}

fn bench_zone_spec(name: &str, area: f64, count: u32) -> ZoneSpec {
    ZoneSpec {
        name: name.into(),
        area,
        method_id: "method-open-bench".into(),
        container: ContainerSpec {
            blueprint_id: "container-bench-2m".into(),
            container_type: "bench".into(),
            count,
        },
        substrate: SubstrateSpec {
            blueprint_id: "substrate-soil-allmix".into(),
            substrate_type: "soil".into(),
            volume_liters: None,
        },
    }
}

fn soil_zone_spec(name: &str, area: f64, count: u32) -> ZoneSpec {
    ZoneSpec {
        name: name.into(),
        area,
        method_id: "method-basic-soil".into(),
        container: ContainerSpec {
            blueprint_id: "container-pot-10l".into(),
            container_type: "pot".into(),
            count,
        },
        substrate: SubstrateSpec {
            blueprint_id: "substrate-soil-allmix".into(),
            substrate_type: "soil".into(),
            volume_liters: None,
        },
    }
}

// ── Zone creation ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod create_zone {
    use super::*;

    #[test]
    fn room_area_conservation() {
        // Room of 80 with an existing zone of 30: a second zone of 60 must
        // fail on zone.area and leave the room untouched.
        let mut harness = Harness::new();
        let (_, room_id) = harness.with_room(80.0);

        harness.create_zone(&room_id, bench_zone_spec("Zone 1", 30.0, 5)).unwrap();
        let err = harness
            .create_zone(&room_id, bench_zone_spec("Zone 2", 60.0, 5))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.path.last().map(String::as_str), Some("area"));

        let room = grow_state::selectors::find_room(&harness.state, &room_id).unwrap();
        assert_eq!(room.room.zones.len(), 1);
    }

    #[test]
    fn container_capacity_bound() {
        // footprint 2 m², density 1, zone 50 m² ⇒ 25 containers max.
        let mut harness = Harness::new();
        let (_, room_id) = harness.with_room(80.0);

        let err = harness
            .create_zone(&room_id, bench_zone_spec("Too Dense", 50.0, 30))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.path.last().map(String::as_str), Some("count"));

        let result = harness
            .create_zone(&room_id, bench_zone_spec("Just Right", 50.0, 25))
            .unwrap();
        assert_eq!(result.container.max_supported, 25);
        // substrate volume = containerVolume × count
        assert_eq!(result.substrate.total_volume_liters, 60.0 * 25.0);
    }

    #[test]
    fn packing_density_shrinks_capacity() {
        // pot-10l: footprint 0.25, density 0.8 ⇒ 20 m² supports 64 pots.
        let mut harness = Harness::new();
        let (_, room_id) = harness.with_room(80.0);
        let result = harness.create_zone(&room_id, soil_zone_spec("Pots", 20.0, 64)).unwrap();
        assert_eq!(result.container.max_supported, 64);

        let err = harness
            .create_zone(&room_id, soil_zone_spec("Pots 2", 20.0, 65))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[test]
    fn incompatible_container_type_is_invalid_state() {
        let mut harness = Harness::new();
        let (_, room_id) = harness.with_room(80.0);
        // basic-soil accepts pot|bag, not tray.
        let spec = ZoneSpec {
            name: "Mismatch".into(),
            area: 20.0,
            method_id: "method-basic-soil".into(),
            container: ContainerSpec {
                blueprint_id: "container-tray-flood-1m".into(),
                container_type: "tray".into(),
                count: 4,
            },
            substrate: SubstrateSpec {
                blueprint_id: "substrate-soil-allmix".into(),
                substrate_type: "soil".into(),
                volume_liters: None,
            },
        };
        let err = harness.create_zone(&room_id, spec).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidState);
    }

    #[test]
    fn empty_compatibility_set_accepts_any_type() {
        let mut harness = Harness::new();
        let (_, room_id) = harness.with_room(80.0);
        // open-bench declares no compatible sets; tray containers pass.
        let spec = ZoneSpec {
            name: "Anything Goes".into(),
            area: 10.0,
            method_id: "method-open-bench".into(),
            container: ContainerSpec {
                blueprint_id: "container-tray-flood-1m".into(),
                container_type: "tray".into(),
                count: 5,
            },
            substrate: SubstrateSpec {
                blueprint_id: "substrate-rockwool-slab".into(),
                substrate_type: "rockwool".into(),
                volume_liters: None,
            },
        };
        assert!(harness.create_zone(&room_id, spec).is_ok());
    }

    #[test]
    fn substrate_volume_outside_tolerance_warns_but_succeeds() {
        let mut harness = Harness::new();
        let (_, room_id) = harness.with_room(80.0);
        let mut spec = bench_zone_spec("Sloppy Volume", 10.0, 4);
        // required = 60 × 4 = 240 L; 200 L is outside the 5 % band.
        spec.substrate.volume_liters = Some(200.0);

        let intent = CreateZoneIntent { room_id: room_id.clone(), zone: spec };
        let mut ctx = harness.ctx("world.createZone");
        let reply = zone::create_zone(&intent, &mut ctx).unwrap();
        assert_eq!(reply.warnings.len(), 1);
        assert!(reply.warnings[0].contains("differs from the required"));
        // Stored volume is the derived one, not the submitted one.
        assert_eq!(reply.data.unwrap().substrate.total_volume_liters, 240.0);
    }

    #[test]
    fn capital_cost_breakdown_scales_with_multiplier() {
        let mut harness = Harness::new();
        harness.state.metadata.economics.item_price_multiplier = 2.0;
        let (_, room_id) = harness.with_room(80.0);

        let result = harness.create_zone(&room_id, soil_zone_spec("Costed", 10.0, 10)).unwrap();
        // setup 400, pots 8.5 × 10, soil 0.6 × (10 L × 10) — all doubled.
        assert_eq!(result.method.setup_cost, Some(800.0));
        assert_eq!(result.container.total_cost, Some(170.0));
        assert_eq!(result.substrate.total_cost, Some(120.0));
        assert_eq!(result.total_cost, Some(800.0 + 170.0 + 120.0));
        assert_eq!(result.container.unit_cost, Some(8.5));
    }

    #[test]
    fn missing_room_is_not_found() {
        let mut harness = Harness::new();
        harness.with_room(80.0);
        let err = harness
            .create_zone("room-missing", bench_zone_spec("Ghost", 10.0, 1))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}

// ── Zone updates ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod update_zone {
    use super::*;

    fn setup_zone(harness: &mut Harness, area: f64, count: u32) -> (String, String) {
        let (_, room_id) = harness.with_room(80.0);
        let result = harness.create_zone(&room_id, bench_zone_spec("Veg", area, count)).unwrap();
        (room_id, result.zone_id)
    }

    #[test]
    fn over_capacity_count_clamps_with_one_warning() {
        let mut harness = Harness::new();
        let (_, zone_id) = setup_zone(&mut harness, 50.0, 10);

        let intent = UpdateZoneIntent {
            zone_id: zone_id.clone(),
            patch: ZonePatch {
                container: Some(ContainerSpec {
                    blueprint_id: "container-bench-2m".into(),
                    container_type: "bench".into(),
                    count: 40, // capacity is 25
                }),
                ..ZonePatch::default()
            },
        };
        let mut ctx = harness.ctx("world.updateZone");
        let reply = zone::update_zone(&intent, &mut ctx).unwrap();
        let clamp_warnings: Vec<_> =
            reply.warnings.iter().filter(|w| w.contains("clamped")).collect();
        assert_eq!(clamp_warnings.len(), 1);

        let lookup = grow_state::selectors::find_zone(&harness.state, &zone_id).unwrap();
        assert_eq!(lookup.zone.cultivation.container.as_ref().unwrap().count, 25);
        // Substrate volume follows the clamped count.
        assert_eq!(
            lookup.zone.cultivation.substrate.as_ref().unwrap().total_volume_liters,
            60.0 * 25.0
        );
    }

    #[test]
    fn clamp_is_idempotent() {
        let mut harness = Harness::new();
        let (_, zone_id) = setup_zone(&mut harness, 50.0, 10);

        for _ in 0..2 {
            let intent = UpdateZoneIntent {
                zone_id: zone_id.clone(),
                patch: ZonePatch {
                    container: Some(ContainerSpec {
                        blueprint_id: "container-bench-2m".into(),
                        container_type: "bench".into(),
                        count: 99,
                    }),
                    ..ZonePatch::default()
                },
            };
            let mut ctx = harness.ctx("world.updateZone");
            zone::update_zone(&intent, &mut ctx).unwrap();
            let lookup = grow_state::selectors::find_zone(&harness.state, &zone_id).unwrap();
            assert_eq!(lookup.zone.cultivation.container.as_ref().unwrap().count, 25);
        }
    }

    #[test]
    fn area_growth_beyond_room_conflicts_and_leaves_zone_unchanged() {
        let mut harness = Harness::new();
        let (_, room_id) = harness.with_room(80.0);
        harness.create_zone(&room_id, bench_zone_spec("A", 30.0, 5)).unwrap();
        let b = harness.create_zone(&room_id, bench_zone_spec("B", 30.0, 5)).unwrap();

        let intent = UpdateZoneIntent {
            zone_id: b.zone_id.clone(),
            patch: ZonePatch { area: Some(60.0), ..ZonePatch::default() },
        };
        let mut ctx = harness.ctx("world.updateZone");
        let err = zone::update_zone(&intent, &mut ctx).unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        let lookup = grow_state::selectors::find_zone(&harness.state, &b.zone_id).unwrap();
        assert_eq!(lookup.zone.area, 30.0);
    }

    #[test]
    fn method_change_pulls_default_equipment_with_storage_warnings() {
        let mut harness = Harness::new();
        let (_, room_id) = harness.with_room(80.0);
        // Start on hydro trays.
        let spec = ZoneSpec {
            name: "Hydro".into(),
            area: 20.0,
            method_id: "method-hydro-tray".into(),
            container: ContainerSpec {
                blueprint_id: "container-tray-flood-1m".into(),
                container_type: "tray".into(),
                count: 10,
            },
            substrate: SubstrateSpec {
                blueprint_id: "substrate-rockwool-slab".into(),
                substrate_type: "rockwool".into(),
                volume_liters: None,
            },
        };
        let created = harness.create_zone(&room_id, spec).unwrap();

        // Switch to soil without specifying container/substrate: defaults
        // auto-migrate (pot-10l / soil-allmix) with storage warnings.
        let intent = UpdateZoneIntent {
            zone_id: created.zone_id.clone(),
            patch: ZonePatch {
                method_id: Some("method-basic-soil".into()),
                ..ZonePatch::default()
            },
        };
        let mut ctx = harness.ctx("world.updateZone");
        let reply = zone::update_zone(&intent, &mut ctx).unwrap();
        assert!(reply.warnings.iter().any(|w| w.contains("moved to storage")));
        assert!(reply.warnings.iter().any(|w| w.contains("routed to storage")));

        let lookup = grow_state::selectors::find_zone(&harness.state, &created.zone_id).unwrap();
        let container = lookup.zone.cultivation.container.as_ref().unwrap();
        let substrate = lookup.zone.cultivation.substrate.as_ref().unwrap();
        assert_eq!(lookup.zone.cultivation_method_id, "method-basic-soil");
        assert_eq!(container.slug, "pot-10l");
        assert_eq!(container.count, 10, "count carries over");
        assert_eq!(substrate.slug, "soil-allmix");
        // Volume re-derived for the new container: 10 L × 10.
        assert_eq!(substrate.total_volume_liters, 100.0);
    }

    #[test]
    fn explicit_incompatible_container_still_fails_on_method_change() {
        let mut harness = Harness::new();
        let (_, zone_id) = setup_zone(&mut harness, 20.0, 4);

        let intent = UpdateZoneIntent {
            zone_id,
            patch: ZonePatch {
                method_id: Some("method-basic-soil".into()),
                container: Some(ContainerSpec {
                    blueprint_id: "container-tray-flood-1m".into(),
                    container_type: "tray".into(),
                    count: 4,
                }),
                ..ZonePatch::default()
            },
        };
        let mut ctx = harness.ctx("world.updateZone");
        let err = zone::update_zone(&intent, &mut ctx).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidState);
        assert_eq!(err.path.last().map(String::as_str), Some("type"));
    }
}

// ── Duplication ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod duplicate_zone {
    use super::*;
    use crate::devices::{install_device, InstallDeviceIntent};

    #[test]
    fn duplicate_needs_room_headroom() {
        let mut harness = Harness::new();
        let (_, room_id) = harness.with_room(80.0);
        let created = harness.create_zone(&room_id, bench_zone_spec("Big", 50.0, 10)).unwrap();

        let mut ctx = harness.ctx("world.duplicateZone");
        let err = zone::duplicate_zone(&created.zone_id, None, &mut ctx).unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[test]
    fn duplicate_clones_devices_with_fresh_ids_and_charges_for_them() {
        let mut harness = Harness::new();
        let (_, room_id) = harness.with_room(80.0);
        let created = harness.create_zone(&room_id, bench_zone_spec("Veg", 20.0, 5)).unwrap();

        let install = InstallDeviceIntent {
            zone_id: created.zone_id.clone(),
            blueprint_id: "device-led-600".into(),
            name: None,
            settings: None,
        };
        {
            let mut ctx = harness.ctx("devices.installDevice");
            install_device(&install, &mut ctx).unwrap();
        }
        let cash_before = harness.state.finances.cash_on_hand;

        let duplicated = {
            let mut ctx = harness.ctx("world.duplicateZone");
            zone::duplicate_zone(&created.zone_id, Some("Veg Twin"), &mut ctx)
                .unwrap()
                .data
                .unwrap()
        };

        let source = grow_state::selectors::find_zone(&harness.state, &created.zone_id)
            .unwrap()
            .zone
            .clone();
        let clone = grow_state::selectors::find_zone(&harness.state, &duplicated.zone_id)
            .unwrap()
            .zone
            .clone();

        assert_eq!(clone.name, "Veg Twin");
        assert_eq!(clone.devices.len(), 1);
        assert_ne!(clone.devices[0].id, source.devices[0].id);
        assert!(clone.plants.is_empty(), "live plants are never cloned");
        // LED 600 capex is 950 at multiplier 1.
        assert!((cash_before - harness.state.finances.cash_on_hand - 950.0).abs() < 1e-6);
    }
}

// ── Tick stages ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod stages {
    use super::*;
    use crate::economy::TickAccumulator;
    use crate::environment::{apply_devices, derive_environment, vapor_pressure_deficit};
    use crate::{degradation, economy};

    #[test]
    fn vpd_matches_magnus_reference_points() {
        // Saturated air has zero deficit.
        assert!(vapor_pressure_deficit(25.0, 1.0).abs() < 1e-9);
        // 25 °C at 50 % RH sits near 1.58 kPa.
        let vpd = vapor_pressure_deficit(25.0, 0.5);
        assert!((vpd - 1.58).abs() < 0.05, "got {vpd}");
        // Colder air holds less vapour: deficit shrinks with temperature.
        assert!(vapor_pressure_deficit(18.0, 0.5) < vpd);
    }

    #[test]
    fn wear_curve_is_sublinear_and_capped() {
        let short = degradation::compute_wear(100.0);
        let long = degradation::compute_wear(1_000.0);
        assert!(short > 0.0 && long > short);
        assert!(long < 10.0 * short, "exponent 0.9 is sub-linear");
        assert_eq!(degradation::compute_wear(0.0), 0.0);
        assert!(degradation::compute_wear(1e12) <= 0.95);
    }

    #[test]
    fn operational_devices_accrue_runtime_and_lose_efficiency() {
        let mut harness = Harness::new();
        let (_, room_id) = harness.with_room(80.0);
        let created = harness.create_zone(&room_id, bench_zone_spec("Veg", 20.0, 5)).unwrap();
        {
            let mut ctx = harness.ctx("devices.installDevice");
            crate::devices::install_device(
                &crate::devices::InstallDeviceIntent {
                    zone_id: created.zone_id.clone(),
                    blueprint_id: "device-led-600".into(),
                    name: None,
                    settings: None,
                },
                &mut ctx,
            )
            .unwrap();
        }

        for tick in 1..=200u64 {
            degradation::process(&mut harness.state, Tick(tick), TickLength::HOUR);
        }
        let zone = grow_state::selectors::find_zone(&harness.state, &created.zone_id).unwrap();
        let device = &zone.zone.devices[0];
        assert_eq!(device.runtime_hours, 200.0);
        assert!(device.maintenance.degradation > 0.0);
        assert!(device.efficiency < 0.98);
    }

    #[test]
    fn climate_unit_pulls_temperature_toward_setpoint() {
        let mut harness = Harness::new();
        let (_, room_id) = harness.with_room(80.0);
        let created = harness.create_zone(&room_id, bench_zone_spec("Veg", 20.0, 5)).unwrap();
        {
            let mut ctx = harness.ctx("devices.installDevice");
            crate::devices::install_device(
                &crate::devices::InstallDeviceIntent {
                    zone_id: created.zone_id.clone(),
                    blueprint_id: "device-split-ac".into(),
                    name: None,
                    settings: Some(
                        serde_json::json!({ "targetTemperature": 26.0 })
                            .as_object()
                            .unwrap()
                            .clone(),
                    ),
                },
                &mut ctx,
            )
            .unwrap();
        }

        let before = grow_state::selectors::find_zone(&harness.state, &created.zone_id)
            .unwrap()
            .zone
            .environment
            .temperature;
        let mut accumulator = TickAccumulator::new();
        apply_devices(&mut harness.state, TickLength::HOUR, &mut accumulator);
        let after = grow_state::selectors::find_zone(&harness.state, &created.zone_id)
            .unwrap()
            .zone
            .environment
            .temperature;
        assert!(after > before, "moving toward the 26 °C setpoint");
        assert!(accumulator.energy_kwh > 0.0, "climate unit drew power");
    }

    #[test]
    fn derive_environment_updates_vpd_and_metrics() {
        let mut harness = Harness::new();
        let (_, room_id) = harness.with_room(80.0);
        let created = harness.create_zone(&room_id, bench_zone_spec("Veg", 20.0, 5)).unwrap();

        derive_environment(&mut harness.state, Tick(1), TickLength::HOUR);
        let zone = grow_state::selectors::find_zone(&harness.state, &created.zone_id).unwrap();
        assert!(zone.zone.environment.vpd > 0.0);
        assert_eq!(zone.zone.metrics.last_updated_tick, Tick(1));
    }

    #[test]
    fn rent_accrual_books_a_ledger_entry() {
        let mut harness = Harness::new();
        harness.with_room(80.0);
        let cash_before = harness.state.finances.cash_on_hand;
        let ids = IdGenerator::new();

        let mut accumulator = TickAccumulator::new();
        economy::accrue_rent(
            &mut harness.state,
            &ids,
            Tick(1),
            TickLength::HOUR,
            0,
            &mut accumulator,
        );

        assert!(harness.state.finances.cash_on_hand < cash_before);
        assert!(accumulator.expenses > 0.0);
        let entry = harness.state.finances.ledger.last().unwrap();
        assert!(matches!(entry.category, grow_state::LedgerCategory::Rent));
    }
}

// ── Planting ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod planting {
    use super::*;
    use crate::plants::{add_planting, AddPlantingIntent};

    #[test]
    fn planting_is_bounded_by_container_count() {
        let mut harness = Harness::new();
        let (_, room_id) = harness.with_room(80.0);
        let created = harness.create_zone(&room_id, bench_zone_spec("Veg", 20.0, 8)).unwrap();

        let over = AddPlantingIntent {
            zone_id: created.zone_id.clone(),
            strain_id: "strain-ak47".into(),
            count: 9,
        };
        let err = {
            let mut ctx = harness.ctx("plants.addPlanting");
            add_planting(&over, &mut ctx).unwrap_err()
        };
        assert_eq!(err.code, ErrorCode::Conflict);

        let fits = AddPlantingIntent {
            zone_id: created.zone_id.clone(),
            strain_id: "strain-ak47".into(),
            count: 8,
        };
        let result = {
            let mut ctx = harness.ctx("plants.addPlanting");
            add_planting(&fits, &mut ctx).unwrap().data.unwrap()
        };
        assert_eq!(result.plant_ids.len(), 8);

        // The zone is now full: one more plant conflicts.
        let one_more = AddPlantingIntent {
            zone_id: created.zone_id,
            strain_id: "strain-ak47".into(),
            count: 1,
        };
        let mut ctx = harness.ctx("plants.addPlanting");
        assert!(add_planting(&one_more, &mut ctx).is_err());
    }

    #[test]
    fn unknown_strain_is_not_found() {
        let mut harness = Harness::new();
        let (_, room_id) = harness.with_room(80.0);
        let created = harness.create_zone(&room_id, bench_zone_spec("Veg", 20.0, 8)).unwrap();

        let intent = AddPlantingIntent {
            zone_id: created.zone_id,
            strain_id: "strain-unknown".into(),
            count: 1,
        };
        let mut ctx = harness.ctx("plants.addPlanting");
        assert_eq!(add_planting(&intent, &mut ctx).unwrap_err().code, ErrorCode::NotFound);
    }
}

// ── Funds ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod funds {
    use super::*;

    #[test]
    fn renting_beyond_cash_is_insufficient_funds() {
        let mut harness = Harness::new();
        harness.state.finances.cash_on_hand = 100.0;
        let intent = RentStructureIntent {
            structure_blueprint_id: "structure-warehouse-small".into(),
            name: None,
        };
        let mut ctx = harness.ctx("world.rentStructure");
        let err = structure::rent_structure(&intent, &mut ctx).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientFunds);
    }

    #[test]
    fn renting_charges_the_upfront_fee() {
        let mut harness = Harness::new();
        let cash_before = harness.state.finances.cash_on_hand;
        harness.with_room(10.0);
        // Small warehouse upfront fee is 10 000 at multiplier 1.
        assert!((cash_before - harness.state.finances.cash_on_hand - 10_000.0).abs() < 1e-6);
        assert_eq!(harness.state.finances.summary.total_expenses, 10_000.0);
    }
}
