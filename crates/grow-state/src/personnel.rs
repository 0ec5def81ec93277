//! Personnel roster and the facility task queue.
//!
//! The workforce engine that schedules shifts and resolves tasks is an
//! excluded collaborator; the core keeps just enough state for snapshots and
//! for commands that reference employees or work orders.

use grow_core::Tick;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub role_id: String,
    pub hourly_wage: f64,
    pub morale: f64,
    pub assigned_structure_id: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Personnel {
    pub employees: Vec<Employee>,
    pub candidates: Vec<Employee>,
}

/// One unit of pending facility work (scouting, maintenance, harvest, …).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub id: String,
    pub task_kind: String,
    pub zone_id: Option<String>,
    pub created_at_tick: Tick,
    pub priority: u8,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TaskQueue {
    pub pending: Vec<WorkOrder>,
}
