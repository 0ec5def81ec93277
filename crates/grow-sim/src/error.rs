use grow_core::Tick;
use thiserror::Error;

use crate::machine::TickPhase;

#[derive(Debug, Error)]
pub enum SimError {
    /// `process_tick` re-entered while a tick is mid-flight.
    #[error("a tick is already being processed")]
    TickInProgress,

    /// A phase handler failed; the tick is abandoned.
    #[error("tick {tick} failed in phase {phase:?}: {message}")]
    Phase {
        tick: Tick,
        phase: TickPhase,
        message: String,
    },

    /// The tick machine was driven out of order (programming error).
    #[error("tick state machine misuse: {0}")]
    Machine(&'static str),
}

pub type SimResult<T> = Result<T, SimError>;
