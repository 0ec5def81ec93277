//! Zone environment processing: device effects, ambient drift, VPD.
//!
//! Two tick stages live here:
//!
//! 1. [`apply_devices`] — operational devices pull their controlled metric
//!    toward its setpoint at a bounded rate, scaled by efficiency, and their
//!    energy draw is tallied for the accounting stage.
//! 2. [`derive_environment`] — uncontrolled drift back toward ambient,
//!    clamping, VPD derivation, and the rolling metric update.

use grow_core::{Tick, TickLength};
use grow_state::{DeviceStatus, WorldState, Zone};

use crate::economy::TickAccumulator;

// ── Ambient reference ─────────────────────────────────────────────────────────

const AMBIENT_TEMPERATURE: f64 = 20.0;
const AMBIENT_HUMIDITY: f64 = 0.5;
const AMBIENT_CO2: f64 = 400.0;

/// Fraction of the gap to ambient recovered per simulated hour when no
/// device opposes the drift.
const DRIFT_RATE_PER_HOUR: f64 = 0.08;

/// Exponential smoothing factor for the rolling metric averages.
const METRIC_ALPHA: f64 = 0.2;

// ── Device actuation limits (per simulated hour, at efficiency 1.0) ──────────

const TEMPERATURE_PULL_PER_HOUR: f64 = 2.0;
const HUMIDITY_PULL_PER_HOUR: f64 = 0.08;
const CO2_PULL_PER_HOUR: f64 = 400.0;

// ── Magnus formula constants ──────────────────────────────────────────────────

const MAGNUS_COEFFICIENT_A: f64 = 17.62;
const MAGNUS_COEFFICIENT_B: f64 = 243.12;
const MAGNUS_PRESSURE_COEFFICIENT: f64 = 0.6112;

/// Saturation vapour pressure at `temperature_c`, in kPa.
pub fn saturation_vapor_pressure(temperature_c: f64) -> f64 {
    let t = temperature_c.clamp(-50.0, 60.0);
    let exponent = (MAGNUS_COEFFICIENT_A * t) / (t + MAGNUS_COEFFICIENT_B);
    MAGNUS_PRESSURE_COEFFICIENT * exponent.exp()
}

/// Vapour pressure deficit for the given temperature and relative humidity
/// fraction, in kPa.
pub fn vapor_pressure_deficit(temperature_c: f64, relative_humidity: f64) -> f64 {
    let saturation = saturation_vapor_pressure(temperature_c);
    let actual = saturation * relative_humidity.clamp(0.0, 1.0);
    (saturation - actual).max(0.0)
}

// ── Stage 1: device effects ───────────────────────────────────────────────────

/// Apply every operational device's effect on its zone and tally energy use.
pub fn apply_devices(
    state: &mut WorldState,
    tick_length: TickLength,
    accumulator: &mut TickAccumulator,
) {
    let hours = tick_length.as_hours();
    if hours <= 0.0 {
        return;
    }

    for structure in &mut state.structures {
        for room in &mut structure.rooms {
            for zone in &mut room.zones {
                apply_zone_devices(zone, hours, accumulator);
            }
        }
    }
}

fn apply_zone_devices(zone: &mut Zone, hours: f64, accumulator: &mut TickAccumulator) {
    let mut lamp_ppfd = 0.0;

    // Collect targets first: devices read the control setpoints but mutate
    // only the environment.
    let control = zone.control;

    for device in &mut zone.devices {
        if device.status != DeviceStatus::Operational {
            continue;
        }
        let efficiency = device.efficiency.clamp(0.0, 1.0);
        if efficiency <= 0.0 {
            continue;
        }

        // Nominal draw is recorded in settings at install time; duty cycle
        // scales with how hard the device works this tick.
        let power_kw = device.setting_f64("power").unwrap_or(0.0);
        let mut duty = 1.0;

        match device.kind.as_str() {
            "Lamp" => {
                let target = device
                    .setting_f64("ppfd")
                    .or(control.ppfd)
                    .unwrap_or(0.0);
                lamp_ppfd += target * efficiency;
                // Lamps dissipate heat into the zone.
                zone.environment.temperature += 0.25 * efficiency * hours;
                duty = if target > 0.0 { 1.0 } else { 0.0 };
            }
            "ClimateUnit" => {
                let target = device
                    .setting_f64("targetTemperature")
                    .or(control.temperature)
                    .unwrap_or(AMBIENT_TEMPERATURE);
                let gap = target - zone.environment.temperature;
                let pull = gap.clamp(
                    -TEMPERATURE_PULL_PER_HOUR * efficiency * hours,
                    TEMPERATURE_PULL_PER_HOUR * efficiency * hours,
                );
                zone.environment.temperature += pull;
                duty = (gap.abs() / TEMPERATURE_PULL_PER_HOUR).clamp(0.2, 1.0);
            }
            "HumidityControlUnit" => {
                let target = device
                    .setting_f64("targetHumidity")
                    .or(control.humidity)
                    .unwrap_or(AMBIENT_HUMIDITY);
                let gap = target - zone.environment.relative_humidity;
                let pull = gap.clamp(
                    -HUMIDITY_PULL_PER_HOUR * efficiency * hours,
                    HUMIDITY_PULL_PER_HOUR * efficiency * hours,
                );
                zone.environment.relative_humidity += pull;
                duty = (gap.abs() / HUMIDITY_PULL_PER_HOUR).clamp(0.2, 1.0);
            }
            "CO2Injector" => {
                let target = device
                    .setting_f64("targetCO2")
                    .or(control.co2)
                    .unwrap_or(AMBIENT_CO2);
                let gap = target - zone.environment.co2;
                // Injection only; CO₂ decays on its own in the drift stage.
                let pull = gap.clamp(0.0, CO2_PULL_PER_HOUR * efficiency * hours);
                zone.environment.co2 += pull;
                duty = (pull / CO2_PULL_PER_HOUR).clamp(0.0, 1.0);
            }
            _ => {}
        }

        accumulator.energy_kwh += power_kw * duty * hours;
    }

    zone.environment.ppfd = lamp_ppfd;
}

// ── Stage 2: ambient drift and derivation ─────────────────────────────────────

/// Drift every zone toward ambient, clamp, derive VPD, update rolling
/// metrics.
pub fn derive_environment(state: &mut WorldState, tick: Tick, tick_length: TickLength) {
    let hours = tick_length.as_hours();
    let drift = (DRIFT_RATE_PER_HOUR * hours).min(1.0);

    for structure in &mut state.structures {
        for room in &mut structure.rooms {
            for zone in &mut room.zones {
                let env = &mut zone.environment;

                env.temperature += (AMBIENT_TEMPERATURE - env.temperature) * drift;
                env.relative_humidity += (AMBIENT_HUMIDITY - env.relative_humidity) * drift;
                env.co2 += (AMBIENT_CO2 - env.co2) * drift;

                env.temperature = env.temperature.clamp(-10.0, 50.0);
                env.relative_humidity = env.relative_humidity.clamp(0.0, 1.0);
                env.co2 = env.co2.clamp(0.0, 5_000.0);
                env.ppfd = env.ppfd.clamp(0.0, 2_500.0);
                env.vpd = vapor_pressure_deficit(env.temperature, env.relative_humidity);

                let metrics = &mut zone.metrics;
                metrics.average_temperature = lerp(metrics.average_temperature, env.temperature);
                metrics.average_humidity = lerp(metrics.average_humidity, env.relative_humidity);
                metrics.average_co2 = lerp(metrics.average_co2, env.co2);
                metrics.average_ppfd = lerp(metrics.average_ppfd, env.ppfd);

                let plant_count = zone.plants.len();
                metrics.stress_level = if plant_count == 0 {
                    0.0
                } else {
                    zone.plants.iter().map(|p| p.stress).sum::<f64>() / plant_count as f64
                };
                metrics.last_updated_tick = tick;
            }
        }
    }
}

#[inline]
fn lerp(average: f64, sample: f64) -> f64 {
    average + (sample - average) * METRIC_ALPHA
}
