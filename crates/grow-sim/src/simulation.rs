//! The world tick processor.
//!
//! `SimulationLoop` advances the world by exactly one tick per call,
//! executing the seven phases in their fixed order.  Default phase behavior
//! comes from `grow-engine`; individual phases can be overridden for testing
//! or for swapping in richer physiological models.
//!
//! Events queued by phases are buffered per tick and flushed to the bus as
//! one batch at commit, followed by a `sim.tickCompleted` summary event.

use std::time::Instant;

use grow_core::time::unix_ms_now;
use grow_core::{IdGenerator, Tick, TickLength};
use grow_catalog::BlueprintRepository;
use grow_engine::{degradation, economy, environment, plants, TickAccumulator};
use grow_events::{EventBus, EventCollector, EventLevel, SimEvent};
use grow_state::WorldState;
use serde_json::json;

use crate::error::{SimError, SimResult};
use crate::machine::{TickPhase, TickStateMachine, TICK_PHASES};

// ── Phase plumbing ────────────────────────────────────────────────────────────

/// Everything one phase handler may touch.
pub struct PhaseContext<'a> {
    pub state: &'a mut WorldState,
    pub repository: &'a BlueprintRepository,
    pub ids: &'a IdGenerator,
    pub tick: Tick,
    pub tick_length: TickLength,
    pub phase: TickPhase,
    pub events: &'a mut EventCollector,
    pub accumulator: &'a mut TickAccumulator,
}

pub type PhaseHandler = Box<dyn FnMut(&mut PhaseContext<'_>) -> Result<(), String> + Send>;

/// Optional per-phase overrides.  `commit` is a hook that runs *in addition*
/// to the built-in commit (before the clock advances), not a replacement.
#[derive(Default)]
pub struct PhaseOverrides {
    pub apply_devices: Option<PhaseHandler>,
    pub derive_environment: Option<PhaseHandler>,
    pub irrigation: Option<PhaseHandler>,
    pub update_plants: Option<PhaseHandler>,
    pub harvest: Option<PhaseHandler>,
    pub accounting: Option<PhaseHandler>,
    pub commit: Option<PhaseHandler>,
}

/// Relative timing of one phase within its tick.
#[derive(Clone, Copy, Debug)]
pub struct PhaseTiming {
    pub started_at_ms: f64,
    pub completed_at_ms: f64,
    pub duration_ms: f64,
}

/// Summary of one processed tick.
#[derive(Debug)]
pub struct TickReport {
    pub tick: Tick,
    pub duration_ms: f64,
    pub event_count: usize,
    pub phase_timings: Vec<(TickPhase, PhaseTiming)>,
}

// ── SimulationLoop ────────────────────────────────────────────────────────────

pub struct SimulationLoop {
    machine: TickStateMachine,
    overrides: PhaseOverrides,
}

impl SimulationLoop {
    pub fn new() -> Self {
        Self { machine: TickStateMachine::new(), overrides: PhaseOverrides::default() }
    }

    pub fn with_overrides(overrides: PhaseOverrides) -> Self {
        Self { machine: TickStateMachine::new(), overrides }
    }

    /// Advance the world by exactly one tick.
    ///
    /// On success the clock has advanced once, all phase events have reached
    /// the bus (in queue order), and `sim.tickCompleted` has been emitted.
    /// On failure the machine records the failing phase and **no events are
    /// delivered** — the tick's announcements are suppressed just like a
    /// failed command's.
    pub fn process_tick(
        &mut self,
        state: &mut WorldState,
        repository: &BlueprintRepository,
        ids: &IdGenerator,
        bus: &EventBus,
    ) -> SimResult<TickReport> {
        if self.machine.is_running() {
            return Err(SimError::TickInProgress);
        }

        let tick = state.clock.tick + 1;
        let tick_length = state.metadata.tick_length;
        let tick_start = Instant::now();

        let mut events = EventCollector::new(tick);
        let mut accumulator = TickAccumulator::new();
        let mut timings: Vec<(TickPhase, PhaseTiming)> = Vec::with_capacity(TICK_PHASES.len());

        self.machine.start(tick)?;

        while let Some(phase) = self.machine.current_phase() {
            let phase_start = tick_start.elapsed().as_secs_f64() * 1_000.0;

            let outcome = run_phase(
                &mut self.overrides,
                phase,
                state,
                repository,
                ids,
                tick,
                tick_length,
                &mut events,
                &mut accumulator,
            );
            if let Err(message) = outcome {
                self.machine.fail(message.clone());
                return Err(SimError::Phase { tick, phase, message });
            }

            let phase_end = tick_start.elapsed().as_secs_f64() * 1_000.0;
            timings.push((
                phase,
                PhaseTiming {
                    started_at_ms: phase_start,
                    completed_at_ms: phase_end,
                    duration_ms: phase_end - phase_start,
                },
            ));
            self.machine.advance()?;
        }

        self.machine.reset();

        // Flush the tick's event batch, then the completion summary.
        let commit_ts = unix_ms_now();
        let batch = events.drain_stamped(commit_ts);
        let event_count = batch.len();
        bus.emit_many(batch);

        let duration_ms = tick_start.elapsed().as_secs_f64() * 1_000.0;
        let mut completed = SimEvent::new(
            "sim.tickCompleted",
            EventLevel::Info,
            json!({
                "tick": tick.0,
                "durationMs": duration_ms,
                "eventCount": event_count,
                "phaseTimings": timings
                    .iter()
                    .map(|(phase, timing)| json!({
                        "phase": phase,
                        "durationMs": timing.duration_ms,
                    }))
                    .collect::<Vec<_>>(),
            }),
        );
        completed.tick = Some(tick);
        completed.ts = Some(commit_ts);
        bus.emit(completed);

        Ok(TickReport { tick, duration_ms, event_count, phase_timings: timings })
    }
}

impl Default for SimulationLoop {
    fn default() -> Self {
        Self::new()
    }
}

// ── Phase execution ───────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn run_phase(
    overrides: &mut PhaseOverrides,
    phase: TickPhase,
    state: &mut WorldState,
    repository: &BlueprintRepository,
    ids: &IdGenerator,
    tick: Tick,
    tick_length: TickLength,
    events: &mut EventCollector,
    accumulator: &mut TickAccumulator,
) -> Result<(), String> {
    let override_slot = match phase {
        TickPhase::ApplyDevices => &mut overrides.apply_devices,
        TickPhase::DeriveEnvironment => &mut overrides.derive_environment,
        TickPhase::Irrigation => &mut overrides.irrigation,
        TickPhase::UpdatePlants => &mut overrides.update_plants,
        TickPhase::Harvest => &mut overrides.harvest,
        TickPhase::Accounting => &mut overrides.accounting,
        TickPhase::Commit => &mut overrides.commit,
    };

    // Commit's hook is additive; every other override replaces the default.
    if phase != TickPhase::Commit {
        if let Some(handler) = override_slot.as_mut() {
            let mut ctx = PhaseContext {
                state,
                repository,
                ids,
                tick,
                tick_length,
                phase,
                events,
                accumulator,
            };
            return handler(&mut ctx);
        }
    }

    match phase {
        TickPhase::ApplyDevices => {
            environment::apply_devices(state, tick_length, accumulator);
        }
        TickPhase::DeriveEnvironment => {
            environment::derive_environment(state, tick, tick_length);
        }
        TickPhase::Irrigation => {
            plants::process_irrigation(state, tick_length, accumulator);
        }
        TickPhase::UpdatePlants => {
            plants::update_plants(state, repository, tick, tick_length);
        }
        TickPhase::Harvest => {
            plants::process_harvest_inventory(state, tick_length);
        }
        TickPhase::Accounting => {
            let timestamp = unix_ms_now();
            degradation::process(state, tick, tick_length);
            economy::accrue_rent(state, ids, tick, tick_length, timestamp, accumulator);
            economy::settle_utilities(state, ids, tick, timestamp, accumulator);
            economy::finalize_tick(state, tick, accumulator, events);
        }
        TickPhase::Commit => {
            if let Some(handler) = override_slot.as_mut() {
                let mut ctx = PhaseContext {
                    state: &mut *state,
                    repository,
                    ids,
                    tick,
                    tick_length,
                    phase,
                    events,
                    accumulator,
                };
                handler(&mut ctx)?;
            }
            // The clock advances exactly once per tick, here and only here.
            state.clock.advance(unix_ms_now());
        }
    }
    Ok(())
}
