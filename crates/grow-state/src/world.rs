//! The world root: metadata, clock, and every top-level collection.

use grow_core::{SimClock, Tick, TickLength};
use serde::{Deserialize, Serialize};

use crate::facility::Structure;
use crate::finance::Finances;
use crate::inventory::Inventory;
use crate::personnel::{Personnel, TaskQueue};

// ── Metadata ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

/// Tunable economy knobs, fixed at session creation.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicsSettings {
    pub initial_capital: f64,
    /// Global multiplier applied to every catalog purchase price.
    pub item_price_multiplier: f64,
    pub harvest_price_multiplier: f64,
    pub rent_per_sqm_structure_per_tick: f64,
    pub rent_per_sqm_room_per_tick: f64,
}

impl Default for EconomicsSettings {
    fn default() -> Self {
        Self {
            initial_capital: 250_000.0,
            item_price_multiplier: 1.0,
            harvest_price_multiplier: 1.0,
            rent_per_sqm_structure_per_tick: 0.25,
            rent_per_sqm_room_per_tick: 0.15,
        }
    }
}

/// Immutable session metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMetadata {
    pub game_id: String,
    pub seed: String,
    pub difficulty: Difficulty,
    pub simulation_version: String,
    pub created_at_unix_ms: i64,
    pub tick_length: TickLength,
    pub economics: EconomicsSettings,
}

impl GameMetadata {
    /// Standard metadata for a new session.
    pub fn standard(game_id: impl Into<String>, seed: impl Into<String>, now_unix_ms: i64) -> Self {
        Self {
            game_id: game_id.into(),
            seed: seed.into(),
            difficulty: Difficulty::Normal,
            simulation_version: env!("CARGO_PKG_VERSION").to_string(),
            created_at_unix_ms: now_unix_ms,
            tick_length: TickLength::HOUR,
            economics: EconomicsSettings::default(),
        }
    }
}

// ── Notes ─────────────────────────────────────────────────────────────────────

/// A free-form annotation surfaced in the UI journal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationNote {
    pub id: String,
    pub tick: Tick,
    pub message: String,
    pub level: String,
}

// ── WorldState ────────────────────────────────────────────────────────────────

/// The single mutable root of the simulation.
///
/// Cloning produces a deep, independent copy of the whole tree — this is the
/// snapshot mechanism behind the facade's `state()` accessor.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldState {
    pub metadata: GameMetadata,
    pub clock: SimClock,
    pub structures: Vec<Structure>,
    pub inventory: Inventory,
    pub finances: Finances,
    pub personnel: Personnel,
    pub task_queue: TaskQueue,
    pub notes: Vec<SimulationNote>,
}

impl WorldState {
    /// An empty world with starting capital from the economics settings.
    pub fn empty(metadata: GameMetadata) -> Self {
        let started_at = metadata.created_at_unix_ms;
        let finances = Finances::with_capital(metadata.economics.initial_capital);
        Self {
            metadata,
            clock: SimClock::new(started_at),
            structures: Vec::new(),
            inventory: Inventory::default(),
            finances,
            personnel: Personnel::default(),
            task_queue: TaskQueue::default(),
            notes: Vec::new(),
        }
    }

    /// Current tick (shorthand used throughout the services).
    #[inline]
    pub fn tick(&self) -> Tick {
        self.clock.tick
    }

    /// Total number of zones across every structure and room.
    pub fn zone_count(&self) -> usize {
        self.structures
            .iter()
            .flat_map(|s| &s.rooms)
            .map(|r| r.zones.len())
            .sum()
    }
}
