//! Fluent builder for constructing a [`SimulationFacade`].

use grow_core::IdGenerator;
use grow_catalog::BlueprintRepository;
use grow_events::EventBus;
use grow_schedule::{SchedulerConfig, TickScheduler};
use grow_state::WorldState;

use crate::commands;
use crate::facade::{SchedulerErrorHook, SimulationFacade};
use crate::simulation::{PhaseOverrides, SimulationLoop};

/// Fluent builder for [`SimulationFacade`].
///
/// # Required inputs
///
/// - [`WorldState`] — the mutable world root
/// - [`BlueprintRepository`] — the read-only catalog
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                                       |
/// |-------------------------|-----------------------------------------------|
/// | `.bus(b)`               | Fresh `EventBus`                              |
/// | `.scheduler_config(c)`  | Interval from the world's tick length, x1, 5  |
/// | `.phase_overrides(p)`   | All engine defaults                           |
/// | `.on_scheduler_error(f)`| No hook (events only)                         |
///
/// # Example
///
/// ```rust,ignore
/// let mut facade = FacadeBuilder::new(state, BlueprintRepository::with_defaults())
///     .scheduler_config(SchedulerConfig { tick_interval_ms: 250.0, ..Default::default() })
///     .build();
/// ```
pub struct FacadeBuilder {
    state: WorldState,
    repository: BlueprintRepository,
    bus: Option<EventBus>,
    scheduler_config: Option<SchedulerConfig>,
    phase_overrides: Option<PhaseOverrides>,
    on_scheduler_error: Option<SchedulerErrorHook>,
}

impl FacadeBuilder {
    pub fn new(state: WorldState, repository: BlueprintRepository) -> Self {
        Self {
            state,
            repository,
            bus: None,
            scheduler_config: None,
            phase_overrides: None,
            on_scheduler_error: None,
        }
    }

    /// Share an existing bus (e.g. one that already has recorders attached).
    pub fn bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Override scheduler pacing.  Without this, one tick is paced at the
    /// world's tick length (one simulated minute per real second) at x1.
    pub fn scheduler_config(mut self, config: SchedulerConfig) -> Self {
        self.scheduler_config = Some(config);
        self
    }

    /// Swap individual tick phases (testing, richer physiological models).
    pub fn phase_overrides(mut self, overrides: PhaseOverrides) -> Self {
        self.phase_overrides = Some(overrides);
        self
    }

    /// Side-channel for scheduler tick failures, in addition to the
    /// `sim.schedulerError` event.
    pub fn on_scheduler_error(mut self, hook: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_scheduler_error = Some(Box::new(hook));
        self
    }

    pub fn build(self) -> SimulationFacade {
        let scheduler_config = self.scheduler_config.unwrap_or_else(|| SchedulerConfig {
            tick_interval_ms: self.state.metadata.tick_length.interval_ms(),
            ..SchedulerConfig::default()
        });
        let sim_loop = match self.phase_overrides {
            Some(overrides) => SimulationLoop::with_overrides(overrides),
            None => SimulationLoop::new(),
        };

        SimulationFacade {
            state: self.state,
            repository: self.repository,
            bus: self.bus.unwrap_or_default(),
            ids: IdGenerator::new(),
            registry: commands::build_registry(),
            scheduler: TickScheduler::new(scheduler_config),
            sim_loop,
            on_scheduler_error: self.on_scheduler_error,
        }
    }
}
