//! Device wear model.
//!
//! Wear follows a sub-linear power curve of runtime hours since the last
//! service:
//!
//! ```text
//! wear = λ · hours^k        (λ = 1e-5, k = 0.9, capped at 0.95)
//! efficiency = min(condition, 0.98) · (1 − wear)
//! ```
//!
//! A device parked in `Maintenance` resets its service marker and wear; its
//! efficiency snaps back to the condition-capped baseline.  Devices whose
//! service window has lapsed are flagged (status `Maintenance` is an operator
//! decision, so the model only stamps `next_due_tick`).

use grow_core::{Tick, TickLength};
use grow_state::defaults::DEFAULT_MAINTENANCE_INTERVAL_TICKS;
use grow_state::{Device, DeviceStatus, WorldState};

const LAMBDA: f64 = 1e-5;
const EXPONENT: f64 = 0.9;
const MAINTENANCE_EFFICIENCY_CAP: f64 = 0.98;
const MAX_WEAR: f64 = 0.95;

/// Advance wear for every device in the world by one tick.
pub fn process(state: &mut WorldState, tick: Tick, tick_length: TickLength) {
    let tick_hours = tick_length.as_hours();
    for structure in &mut state.structures {
        for room in &mut structure.rooms {
            for zone in &mut room.zones {
                for device in &mut zone.devices {
                    update_device(device, tick, tick_hours);
                }
            }
        }
    }
}

fn update_device(device: &mut Device, tick: Tick, tick_hours: f64) {
    let base_condition = device.maintenance.condition.clamp(0.0, 1.0);
    let base_efficiency = base_condition.min(MAINTENANCE_EFFICIENCY_CAP);

    if device.status == DeviceStatus::Maintenance {
        // Being serviced: marker moves to the current runtime, wear clears.
        device.maintenance.runtime_hours_at_last_service = device.runtime_hours.max(0.0);
        device.maintenance.degradation = 0.0;
        device.maintenance.last_service_tick = tick;
        device.maintenance.next_due_tick = tick + DEFAULT_MAINTENANCE_INTERVAL_TICKS;
        device.efficiency = base_efficiency;
        return;
    }

    if device.status == DeviceStatus::Operational && tick_hours > 0.0 {
        device.runtime_hours = (device.runtime_hours + tick_hours).max(0.0);
    }

    let runtime = device.runtime_hours.max(0.0);
    let marker = device
        .maintenance
        .runtime_hours_at_last_service
        .clamp(0.0, runtime);
    device.maintenance.runtime_hours_at_last_service = marker;

    let wear = compute_wear(runtime - marker);
    device.maintenance.degradation = wear;

    if base_efficiency <= 0.0 {
        device.efficiency = 0.0;
        return;
    }
    device.efficiency = (base_efficiency * (1.0 - wear)).clamp(0.0, base_efficiency);
}

/// λ · hours^k, clamped to `[0, MAX_WEAR]`.
pub fn compute_wear(hours_since_service: f64) -> f64 {
    if !hours_since_service.is_finite() || hours_since_service <= 0.0 {
        return 0.0;
    }
    let wear = LAMBDA * hours_since_service.powf(EXPONENT);
    if !wear.is_finite() || wear <= 0.0 {
        return 0.0;
    }
    wear.clamp(0.0, MAX_WEAR)
}
