//! Unit tests for the world model.

use grow_core::Tick;

use crate::defaults::{default_environment, default_metrics, default_resources, empty_health};
use crate::facility::{
    Footprint, Room, Structure, StructureStatus, Zone, ZoneControl, ZoneCultivation,
};
use crate::geometry::validate_structure_geometry;
use crate::selectors::{find_room, find_zone, find_zone_mut};
use crate::world::{GameMetadata, WorldState};

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn test_zone(id: &str, room_id: &str, area: f64, ceiling: f64) -> Zone {
    Zone {
        id: id.to_string(),
        room_id: room_id.to_string(),
        name: id.to_string(),
        cultivation_method_id: "method-basic-soil".to_string(),
        strain_id: None,
        area,
        ceiling_height: ceiling,
        volume: area * ceiling,
        environment: default_environment(),
        resources: default_resources(),
        plants: Vec::new(),
        devices: Vec::new(),
        metrics: default_metrics(Tick::ZERO),
        control: ZoneControl::default(),
        health: empty_health(),
        active_task_ids: Vec::new(),
        cultivation: ZoneCultivation::default(),
    }
}

fn test_room(id: &str, structure_id: &str, area: f64, height: f64, zones: Vec<Zone>) -> Room {
    Room {
        id: id.to_string(),
        structure_id: structure_id.to_string(),
        name: id.to_string(),
        purpose_id: "purpose-growroom".to_string(),
        area,
        height,
        volume: area * height,
        zones,
        cleanliness: 1.0,
        maintenance_level: 1.0,
    }
}

fn test_structure(id: &str, length: f64, width: f64, height: f64, rooms: Vec<Room>) -> Structure {
    Structure {
        id: id.to_string(),
        blueprint_id: "structure-warehouse-small".to_string(),
        name: id.to_string(),
        status: StructureStatus::Active,
        footprint: Footprint::new(length, width, height),
        rooms,
        rent_per_hour: 10.0,
        upfront_cost_paid: 0.0,
    }
}

fn test_world(structures: Vec<Structure>) -> WorldState {
    let mut world = WorldState::empty(GameMetadata::standard("game-1", "seed", 0));
    world.structures = structures;
    world
}

// ── Geometry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod geometry {
    use super::*;
    use crate::geometry::GeometryError;

    #[test]
    fn consistent_tree_passes() {
        let zone = test_zone("zone-1", "room-1", 30.0, 2.5);
        let room = test_room("room-1", "s-1", 80.0, 2.5, vec![zone]);
        let structure = test_structure("s-1", 20.0, 10.0, 3.0, vec![room]);
        assert!(validate_structure_geometry(&structure).is_ok());
    }

    #[test]
    fn zone_overflow_is_reported() {
        let a = test_zone("zone-1", "room-1", 50.0, 2.5);
        let b = test_zone("zone-2", "room-1", 40.0, 2.5);
        let room = test_room("room-1", "s-1", 80.0, 2.5, vec![a, b]);
        let structure = test_structure("s-1", 20.0, 10.0, 3.0, vec![room]);
        assert!(matches!(
            validate_structure_geometry(&structure),
            Err(GeometryError::ZoneAreaOverflow { .. })
        ));
    }

    #[test]
    fn room_overflow_is_reported() {
        let room = test_room("room-1", "s-1", 250.0, 2.5, vec![]);
        let structure = test_structure("s-1", 20.0, 10.0, 3.0, vec![room]);
        assert!(matches!(
            validate_structure_geometry(&structure),
            Err(GeometryError::RoomAreaOverflow { .. })
        ));
    }

    #[test]
    fn epsilon_tolerates_float_noise() {
        // 3 × 26.666… sums to 79.999…8 vs. room area 80 — must pass.
        let zones: Vec<Zone> = (0..3)
            .map(|i| test_zone(&format!("zone-{i}"), "room-1", 80.0 / 3.0, 2.5))
            .collect();
        let room = test_room("room-1", "s-1", 80.0, 2.5, zones);
        let structure = test_structure("s-1", 20.0, 10.0, 3.0, vec![room]);
        assert!(validate_structure_geometry(&structure).is_ok());
    }

    #[test]
    fn volume_mismatch_is_reported() {
        let mut zone = test_zone("zone-1", "room-1", 30.0, 2.5);
        zone.volume = 1.0;
        let room = test_room("room-1", "s-1", 80.0, 2.5, vec![zone]);
        let structure = test_structure("s-1", 20.0, 10.0, 3.0, vec![room]);
        assert!(matches!(
            validate_structure_geometry(&structure),
            Err(GeometryError::ZoneVolumeMismatch { .. })
        ));
    }

    #[test]
    fn zone_ceiling_above_room_height_is_reported() {
        let zone = test_zone("zone-1", "room-1", 30.0, 2.8);
        let room = test_room("room-1", "s-1", 80.0, 2.5, vec![zone]);
        let structure = test_structure("s-1", 20.0, 10.0, 3.0, vec![room]);
        assert!(matches!(
            validate_structure_geometry(&structure),
            Err(GeometryError::HeightOverflow { .. })
        ));
    }
}

// ── Selectors ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod selectors {
    use super::*;

    fn sample_world() -> WorldState {
        let zone = test_zone("zone-1", "room-1", 30.0, 2.5);
        let room = test_room("room-1", "s-1", 80.0, 2.5, vec![zone]);
        let structure = test_structure("s-1", 20.0, 10.0, 3.0, vec![room]);
        test_world(vec![structure])
    }

    #[test]
    fn find_zone_returns_ancestors() {
        let world = sample_world();
        let lookup = find_zone(&world, "zone-1").unwrap();
        assert_eq!(lookup.room.id, "room-1");
        assert_eq!(lookup.structure.id, "s-1");
    }

    #[test]
    fn find_room_and_missing_ids() {
        let world = sample_world();
        assert!(find_room(&world, "room-1").is_some());
        assert!(find_room(&world, "room-404").is_none());
        assert!(find_zone(&world, "zone-404").is_none());
    }

    #[test]
    fn find_zone_mut_mutates_in_place() {
        let mut world = sample_world();
        find_zone_mut(&mut world, "zone-1").unwrap().name = "renamed".to_string();
        assert_eq!(find_zone(&world, "zone-1").unwrap().zone.name, "renamed");
    }
}

// ── Snapshot independence ─────────────────────────────────────────────────────

#[cfg(test)]
mod snapshots {
    use super::*;

    #[test]
    fn clone_is_deep() {
        let zone = test_zone("zone-1", "room-1", 30.0, 2.5);
        let room = test_room("room-1", "s-1", 80.0, 2.5, vec![zone]);
        let mut world = test_world(vec![test_structure("s-1", 20.0, 10.0, 3.0, vec![room])]);

        let snapshot = world.clone();
        find_zone_mut(&mut world, "zone-1").unwrap().area = 55.0;

        assert_eq!(find_zone(&snapshot, "zone-1").unwrap().zone.area, 30.0);
        assert_eq!(find_zone(&world, "zone-1").unwrap().zone.area, 55.0);
    }

    #[test]
    fn world_serializes_round_trip() {
        let world = test_world(vec![test_structure("s-1", 20.0, 10.0, 3.0, vec![])]);
        let json = serde_json::to_string(&world).unwrap();
        let back: WorldState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.structures.len(), 1);
        assert_eq!(back.structures[0].footprint.area, 200.0);
    }
}

// ── Defaults ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod defaults {
    use crate::defaults::derive_duplicate_name;

    #[test]
    fn duplicate_names() {
        assert_eq!(derive_duplicate_name("Veg A", "Zone Copy"), "Veg A (Copy)");
        assert_eq!(derive_duplicate_name("Veg A (Copy)", "Zone Copy"), "Veg A (Copy 2)");
        assert_eq!(derive_duplicate_name("  ", "Zone Copy"), "Zone Copy");
    }
}
