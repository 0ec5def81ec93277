//! The explicit per-tick phase machine.
//!
//! Each tick walks the fixed phase list in order; the machine makes the
//! position explicit so a failed phase leaves an inspectable `Failed` state
//! instead of a half-advanced world with no trace of where it stopped.

use grow_core::Tick;
use serde::Serialize;

use crate::error::{SimError, SimResult};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TickPhase {
    ApplyDevices,
    DeriveEnvironment,
    Irrigation,
    UpdatePlants,
    Harvest,
    Accounting,
    Commit,
}

/// The fixed, deterministic phase order — never reordered at runtime.
pub const TICK_PHASES: [TickPhase; 7] = [
    TickPhase::ApplyDevices,
    TickPhase::DeriveEnvironment,
    TickPhase::Irrigation,
    TickPhase::UpdatePlants,
    TickPhase::Harvest,
    TickPhase::Accounting,
    TickPhase::Commit,
];

#[derive(Clone, Debug, PartialEq)]
pub enum MachineState {
    Idle,
    Running { phase_index: usize, tick: Tick },
    Completed { tick: Tick },
    Failed { tick: Option<Tick>, message: String },
}

#[derive(Debug)]
pub struct TickStateMachine {
    state: MachineState,
}

impl TickStateMachine {
    pub fn new() -> Self {
        Self { state: MachineState::Idle }
    }

    /// Begin processing `tick`; fails if another tick is mid-flight.
    pub fn start(&mut self, tick: Tick) -> SimResult<()> {
        if matches!(self.state, MachineState::Running { .. }) {
            return Err(SimError::Machine("cannot start a tick while one is running"));
        }
        self.state = MachineState::Running { phase_index: 0, tick };
        Ok(())
    }

    /// The phase currently being executed, if running.
    pub fn current_phase(&self) -> Option<TickPhase> {
        match self.state {
            MachineState::Running { phase_index, .. } => TICK_PHASES.get(phase_index).copied(),
            _ => None,
        }
    }

    /// Move to the next phase; transitions to `Completed` past the last one.
    pub fn advance(&mut self) -> SimResult<&MachineState> {
        match self.state {
            MachineState::Running { phase_index, tick } => {
                let next = phase_index + 1;
                self.state = if next >= TICK_PHASES.len() {
                    MachineState::Completed { tick }
                } else {
                    MachineState::Running { phase_index: next, tick }
                };
                Ok(&self.state)
            }
            _ => Err(SimError::Machine("cannot advance while not running")),
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        let tick = match self.state {
            MachineState::Running { tick, .. } | MachineState::Completed { tick } => Some(tick),
            _ => None,
        };
        self.state = MachineState::Failed { tick, message: message.into() };
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, MachineState::Running { .. })
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = MachineState::Idle;
    }
}

impl Default for TickStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
