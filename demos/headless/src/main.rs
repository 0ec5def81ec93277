//! Headless paced run: start the scheduler, pump it from a host loop for a
//! few real seconds at x4 speed, and record the event stream to CSV.
//!
//! ```sh
//! cargo run -p headless
//! ```

use std::time::{Duration, Instant};

use grow_core::time::unix_ms_now;
use grow_catalog::BlueprintRepository;
use grow_engine::world::room::{CreateRoomIntent, RoomSpec};
use grow_engine::world::structure::RentStructureIntent;
use grow_output::{CsvWriter, EventRecorder};
use grow_schedule::SchedulerConfig;
use grow_sim::FacadeBuilder;
use grow_state::{GameMetadata, WorldState};

fn main() {
    let metadata = GameMetadata::standard("headless", "headless-seed", unix_ms_now());
    let state = WorldState::empty(metadata);
    let mut facade = FacadeBuilder::new(state, BlueprintRepository::with_defaults())
        // One tick per 250 real ms so the demo finishes quickly.
        .scheduler_config(SchedulerConfig { tick_interval_ms: 250.0, ..Default::default() })
        .on_scheduler_error(|message| eprintln!("scheduler error: {message}"))
        .build();

    let output_dir = std::env::temp_dir().join("grow-headless");
    if let Err(error) = std::fs::create_dir_all(&output_dir) {
        eprintln!("cannot create {}: {error}", output_dir.display());
        return;
    }
    let writer = match CsvWriter::new(&output_dir) {
        Ok(writer) => writer,
        Err(error) => {
            eprintln!("cannot open telemetry files: {error}");
            return;
        }
    };
    let recorder = EventRecorder::new(writer);
    let _subscription = recorder.attach(facade.bus());

    // Minimal facility so rent and utilities flow every tick.
    let structure_id = facade
        .world()
        .rent_structure(RentStructureIntent {
            structure_blueprint_id: "structure-warehouse-small".into(),
            name: None,
        })
        .data
        .expect("structure rented")
        .structure_id;
    facade
        .world()
        .create_room(CreateRoomIntent {
            structure_id,
            room: RoomSpec {
                name: "Floor".into(),
                purpose_id: "purpose-growroom".into(),
                area: 120.0,
                height: Some(3.0),
            },
        })
        .data
        .expect("room created");

    facade.time().start(None);
    facade.time().set_speed(4.0);

    // ── Host loop: pump for three real seconds ────────────────────────────
    let deadline = Instant::now() + Duration::from_secs(3);
    let mut executed = 0u32;
    while Instant::now() < deadline {
        let report = facade.pump();
        executed += report.executed;
        if report.stopped {
            eprintln!("scheduler stopped after repeated tick failures");
            break;
        }
        std::thread::sleep(Duration::from_millis(16));
    }
    facade.time().pause();

    recorder.finish();
    if let Some(error) = recorder.take_error() {
        eprintln!("telemetry error: {error}");
    }

    let snapshot = facade.state();
    println!(
        "executed {executed} ticks → clock at {}, cash {:.2}",
        snapshot.clock.tick, snapshot.finances.cash_on_hand,
    );
    println!("telemetry written to {}", output_dir.display());
}
