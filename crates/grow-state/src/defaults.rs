//! Fresh-entity defaults and duplicate naming.
//!
//! New zones start at a neutral indoor climate; metrics mirror the starting
//! environment so rolling averages don't spike on the first tick.

use grow_core::Tick;

use crate::facility::{ZoneEnvironment, ZoneHealth, ZoneMetrics, ZoneResources};

/// Ticks between scheduled device services (at hourly ticks: 30 days).
pub const DEFAULT_MAINTENANCE_INTERVAL_TICKS: u64 = 720;

/// Default ceiling height when a room does not specify one, metres.
pub const DEFAULT_ROOM_HEIGHT: f64 = 2.5;

pub fn default_environment() -> ZoneEnvironment {
    ZoneEnvironment {
        temperature: 22.0,
        relative_humidity: 0.6,
        co2: 400.0,
        ppfd: 0.0,
        vpd: 1.2,
    }
}

pub fn default_resources() -> ZoneResources {
    ZoneResources {
        water_liters: 100.0,
        nutrient_solution_liters: 50.0,
        nutrient_strength: 1.0,
        substrate_health: 1.0,
        reservoir_level: 1.0,
        last_transpiration_liters: 0.0,
    }
}

pub fn default_metrics(tick: Tick) -> ZoneMetrics {
    let env = default_environment();
    ZoneMetrics {
        average_temperature: env.temperature,
        average_humidity: env.relative_humidity,
        average_co2: env.co2,
        average_ppfd: env.ppfd,
        stress_level: 0.0,
        last_updated_tick: tick,
    }
}

pub fn empty_health() -> ZoneHealth {
    ZoneHealth::default()
}

/// Name for a duplicated entity: `"Veg A"` → `"Veg A (Copy)"`, and an
/// existing `"(Copy)"` suffix gets numbered rather than stacked.
pub fn derive_duplicate_name(original: &str, fallback: &str) -> String {
    let base = original.trim();
    if base.is_empty() {
        return fallback.to_string();
    }
    if let Some(stripped) = base.strip_suffix(" (Copy)") {
        return format!("{stripped} (Copy 2)");
    }
    format!("{base} (Copy)")
}
