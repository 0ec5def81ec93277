//! Quickstart: drive the facade through a full command flow, then
//! fast-forward a day of simulated time.
//!
//! ```sh
//! cargo run -p quickstart
//! ```

use grow_core::time::unix_ms_now;
use grow_catalog::BlueprintRepository;
use grow_engine::devices::InstallDeviceIntent;
use grow_engine::plants::AddPlantingIntent;
use grow_engine::world::room::{CreateRoomIntent, RoomSpec};
use grow_engine::world::structure::RentStructureIntent;
use grow_engine::world::zone::{ContainerSpec, CreateZoneIntent, SubstrateSpec, ZoneSpec};
use grow_sim::FacadeBuilder;
use grow_state::{GameMetadata, WorldState};

fn main() {
    let metadata = GameMetadata::standard("quickstart", "demo-seed", unix_ms_now());
    let state = WorldState::empty(metadata);
    let mut facade = FacadeBuilder::new(state, BlueprintRepository::with_defaults()).build();

    // Log warnings and errors as they happen.
    facade.subscribe_filtered(
        grow_events::EventFilter::at_least(grow_events::EventLevel::Warning),
        |event| println!("[{:?}] {}", event.level, event.kind),
    );

    // ── Build out the facility ────────────────────────────────────────────
    let rented = facade.world().rent_structure(RentStructureIntent {
        structure_blueprint_id: "structure-warehouse-small".into(),
        name: Some("Demo HQ".into()),
    });
    let structure_id = rented.data.expect("structure rented").structure_id;
    println!("rented structure {structure_id}");

    let room = facade.world().create_room(CreateRoomIntent {
        structure_id,
        room: RoomSpec {
            name: "Veg Room".into(),
            purpose_id: "purpose-growroom".into(),
            area: 80.0,
            height: Some(2.5),
        },
    });
    let room_id = room.data.expect("room created").room_id;

    let zone = facade.world().create_zone(CreateZoneIntent {
        room_id,
        zone: ZoneSpec {
            name: "Veg A".into(),
            area: 20.0,
            method_id: "method-basic-soil".into(),
            container: ContainerSpec {
                blueprint_id: "container-pot-10l".into(),
                container_type: "pot".into(),
                count: 32,
            },
            substrate: SubstrateSpec {
                blueprint_id: "substrate-soil-allmix".into(),
                substrate_type: "soil".into(),
                volume_liters: None,
            },
        },
    });
    let created = zone.data.expect("zone created");
    println!(
        "created zone {} (max {} containers, setup cost {:?})",
        created.zone_id, created.container.max_supported, created.total_cost,
    );
    let zone_id = created.zone_id;

    facade
        .devices()
        .install_device(InstallDeviceIntent {
            zone_id: zone_id.clone(),
            blueprint_id: "device-led-600".into(),
            name: None,
            settings: Some(
                serde_json::json!({ "ppfd": 650.0 }).as_object().cloned().unwrap_or_default(),
            ),
        })
        .data
        .expect("lamp installed");

    facade
        .plants()
        .add_planting(AddPlantingIntent {
            zone_id: zone_id.clone(),
            strain_id: "strain-ak47".into(),
            count: 16,
        })
        .data
        .expect("plants added");

    // ── Fast-forward one simulated day ────────────────────────────────────
    let status = facade.time().step(Some(24));
    println!("stepped to tick {:?}", status.data.map(|s| s.tick));

    let snapshot = facade.state();
    println!(
        "cash: {:.2}, ledger entries: {}, zones: {}",
        snapshot.finances.cash_on_hand,
        snapshot.finances.ledger.len(),
        snapshot.zone_count(),
    );
    let environment = facade.select(|state| {
        grow_state::selectors::find_zone(state, &zone_id).map(|l| l.zone.environment)
    });
    if let Some(environment) = environment {
        println!(
            "zone climate: {:.1} °C, {:.0}% RH, VPD {:.2} kPa, PPFD {:.0}",
            environment.temperature,
            environment.relative_humidity * 100.0,
            environment.vpd,
            environment.ppfd,
        );
    }
}
