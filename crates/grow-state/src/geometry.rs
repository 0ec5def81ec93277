//! Structural geometry invariants.
//!
//! Checked after every mutation that touches areas or heights:
//!
//! - Σ room areas ≤ structure footprint area
//! - Σ zone areas ≤ room area
//! - room volume = area × height; zone volume = area × ceiling height
//! - zone ceiling ≤ room height ≤ structure height
//!
//! All comparisons use [`EPSILON`] to absorb floating-point noise.  Services
//! validate the *incoming* change themselves (so they can fail with a precise
//! `CommandError` path); this module is the backstop that proves the tree is
//! still consistent after the mutation landed.

use thiserror::Error;

use crate::facility::Structure;

/// Tolerance for all area/volume comparisons.
pub const EPSILON: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("structure {structure_id}: room area {room_total:.4} exceeds footprint area {footprint:.4}")]
    RoomAreaOverflow {
        structure_id: String,
        room_total: f64,
        footprint: f64,
    },

    #[error("room {room_id}: zone area {zone_total:.4} exceeds room area {room_area:.4}")]
    ZoneAreaOverflow {
        room_id: String,
        zone_total: f64,
        room_area: f64,
    },

    #[error("room {room_id}: volume {volume:.4} does not equal area × height {expected:.4}")]
    RoomVolumeMismatch {
        room_id: String,
        volume: f64,
        expected: f64,
    },

    #[error("zone {zone_id}: volume {volume:.4} does not equal area × ceiling height {expected:.4}")]
    ZoneVolumeMismatch {
        zone_id: String,
        volume: f64,
        expected: f64,
    },

    #[error("{entity_id}: height {height:.4} exceeds ceiling {limit:.4}")]
    HeightOverflow {
        entity_id: String,
        height: f64,
        limit: f64,
    },

    #[error("{entity_id}: {field} must be non-negative")]
    Negative { entity_id: String, field: &'static str },
}

fn ensure_non_negative(value: f64, entity_id: &str, field: &'static str) -> Result<(), GeometryError> {
    if value < -EPSILON {
        return Err(GeometryError::Negative { entity_id: entity_id.to_string(), field });
    }
    Ok(())
}

fn ensure_not_exceeding(
    value: f64,
    limit: f64,
    make: impl FnOnce() -> GeometryError,
) -> Result<(), GeometryError> {
    if value - limit > EPSILON {
        return Err(make());
    }
    Ok(())
}

/// Validate the whole containment tree of one structure.
pub fn validate_structure_geometry(structure: &Structure) -> Result<(), GeometryError> {
    let footprint_area = structure.footprint.area.max(0.0);
    let footprint_height = structure.footprint.height.max(0.0);

    let room_total: f64 = structure.rooms.iter().map(|r| r.area).sum();
    ensure_not_exceeding(room_total, footprint_area, || GeometryError::RoomAreaOverflow {
        structure_id: structure.id.clone(),
        room_total,
        footprint: footprint_area,
    })?;

    for room in &structure.rooms {
        ensure_non_negative(room.area, &room.id, "area")?;
        ensure_non_negative(room.height, &room.id, "height")?;
        ensure_not_exceeding(room.height, footprint_height, || GeometryError::HeightOverflow {
            entity_id: room.id.clone(),
            height: room.height,
            limit: footprint_height,
        })?;

        let expected = room.area * room.height;
        if (room.volume - expected).abs() > EPSILON {
            return Err(GeometryError::RoomVolumeMismatch {
                room_id: room.id.clone(),
                volume: room.volume,
                expected,
            });
        }

        let zone_total: f64 = room.zones.iter().map(|z| z.area).sum();
        ensure_not_exceeding(zone_total, room.area, || GeometryError::ZoneAreaOverflow {
            room_id: room.id.clone(),
            zone_total,
            room_area: room.area,
        })?;

        for zone in &room.zones {
            ensure_non_negative(zone.area, &zone.id, "area")?;
            ensure_non_negative(zone.ceiling_height, &zone.id, "ceilingHeight")?;
            ensure_not_exceeding(zone.ceiling_height, room.height, || {
                GeometryError::HeightOverflow {
                    entity_id: zone.id.clone(),
                    height: zone.ceiling_height,
                    limit: room.height,
                }
            })?;

            let expected = zone.area * zone.ceiling_height;
            if (zone.volume - expected).abs() > EPSILON {
                return Err(GeometryError::ZoneVolumeMismatch {
                    zone_id: zone.id.clone(),
                    volume: zone.volume,
                    expected,
                });
            }
        }
    }

    Ok(())
}
