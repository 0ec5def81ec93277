//! Read and write lookups over the containment tree.
//!
//! Ids are unique across the whole world, so every lookup walks the tree and
//! returns the first match together with its ancestors — handlers almost
//! always need the parent room/structure for capacity checks and event
//! payloads.

use crate::facility::{Room, Structure, Zone};
use crate::world::WorldState;

/// A zone plus its ancestors (borrowed immutably).
pub struct ZoneLookup<'a> {
    pub structure: &'a Structure,
    pub room: &'a Room,
    pub zone: &'a Zone,
}

/// A room plus its structure (borrowed immutably).
pub struct RoomLookup<'a> {
    pub structure: &'a Structure,
    pub room: &'a Room,
}

pub fn find_structure<'a>(state: &'a WorldState, structure_id: &str) -> Option<&'a Structure> {
    state.structures.iter().find(|s| s.id == structure_id)
}

pub fn find_structure_mut<'a>(
    state: &'a mut WorldState,
    structure_id: &str,
) -> Option<&'a mut Structure> {
    state.structures.iter_mut().find(|s| s.id == structure_id)
}

pub fn find_room<'a>(state: &'a WorldState, room_id: &str) -> Option<RoomLookup<'a>> {
    for structure in &state.structures {
        if let Some(room) = structure.rooms.iter().find(|r| r.id == room_id) {
            return Some(RoomLookup { structure, room });
        }
    }
    None
}

/// Mutable room access; returns the owning structure index so callers can
/// re-borrow the structure for geometry validation after mutating the room.
pub fn find_room_mut<'a>(state: &'a mut WorldState, room_id: &str) -> Option<&'a mut Room> {
    state
        .structures
        .iter_mut()
        .flat_map(|s| s.rooms.iter_mut())
        .find(|r| r.id == room_id)
}

pub fn find_zone<'a>(state: &'a WorldState, zone_id: &str) -> Option<ZoneLookup<'a>> {
    for structure in &state.structures {
        for room in &structure.rooms {
            if let Some(zone) = room.zones.iter().find(|z| z.id == zone_id) {
                return Some(ZoneLookup { structure, room, zone });
            }
        }
    }
    None
}

pub fn find_zone_mut<'a>(state: &'a mut WorldState, zone_id: &str) -> Option<&'a mut Zone> {
    state
        .structures
        .iter_mut()
        .flat_map(|s| s.rooms.iter_mut())
        .flat_map(|r| r.zones.iter_mut())
        .find(|z| z.id == zone_id)
}

/// Index of the structure that owns `room_id`, if any.
pub fn structure_index_of_room(state: &WorldState, room_id: &str) -> Option<usize> {
    state
        .structures
        .iter()
        .position(|s| s.rooms.iter().any(|r| r.id == room_id))
}

/// Index of the structure that owns `zone_id`, if any.
pub fn structure_index_of_zone(state: &WorldState, zone_id: &str) -> Option<usize> {
    state.structures.iter().position(|s| {
        s.rooms.iter().any(|r| r.zones.iter().any(|z| z.id == zone_id))
    })
}

/// Iterate every zone in the world immutably.
pub fn all_zones(state: &WorldState) -> impl Iterator<Item = &Zone> {
    state
        .structures
        .iter()
        .flat_map(|s| &s.rooms)
        .flat_map(|r| &r.zones)
}
