//! Installed device instances and their maintenance bookkeeping.

use grow_core::Tick;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceStatus {
    Operational,
    Maintenance,
    Offline,
    Failed,
}

/// Wear and service history for one device.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceMaintenance {
    pub last_service_tick: Tick,
    pub next_due_tick: Tick,
    /// Mechanical condition in [0, 1]; 1 is factory-fresh.
    pub condition: f64,
    pub runtime_hours_at_last_service: f64,
    /// Wear accumulated since the last service, in [0, 1).
    pub degradation: f64,
}

/// One installed device inside a zone.
///
/// `settings` is a free-form map keyed by kind-specific fields
/// (`targetTemperature`, `ppfd`, `power`, …) so blueprints can introduce new
/// knobs without a schema migration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub blueprint_id: String,
    pub kind: String,
    pub name: String,
    pub zone_id: String,
    pub status: DeviceStatus,
    /// Effective output as a fraction of nominal, in [0, 1].
    pub efficiency: f64,
    pub runtime_hours: f64,
    pub maintenance: DeviceMaintenance,
    pub settings: serde_json::Map<String, Value>,
}

impl Device {
    /// Read a finite numeric setting, if present.
    pub fn setting_f64(&self, key: &str) -> Option<f64> {
        self.settings.get(key).and_then(Value::as_f64).filter(|v| v.is_finite())
    }

    /// Write a numeric setting.
    pub fn set_setting_f64(&mut self, key: &str, value: f64) {
        if let Some(number) = serde_json::Number::from_f64(value) {
            self.settings.insert(key.to_string(), Value::Number(number));
        }
    }
}
