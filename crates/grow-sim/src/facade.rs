//! `SimulationFacade` — the single entry point composing validation,
//! dispatch, the scheduler, and the event bus.
//!
//! All world mutation funnels through one `&mut self` method at a time, so
//! no command handler and no tick callback ever overlap: exclusive access to
//! `WorldState` is the serialization mechanism.
//!
//! Time commands are executed by the facade itself (they touch the scheduler
//! and the tick loop); every other domain dispatches through the registry.
//! Both paths share the same result contract and the same flush-on-success
//! event semantics.

use grow_core::time::unix_ms_now;
use grow_core::{ErrorCode, IdGenerator, Tick};
use grow_catalog::BlueprintRepository;
use grow_command::{
    registry::strip_intent_metadata, CommandRegistry, CommandResult, DispatchEnv,
};
use grow_command::result::{normalize_errors, normalize_warnings};
use grow_events::{EventBus, EventCollector, EventFilter, EventLevel, SimEvent, Subscription};
use grow_schedule::{PumpReport, ResumeOutcome, TickScheduler};
use grow_state::WorldState;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::commands::time::{self as time_commands, SetSpeedIntent, TimeStartIntent, TimeStepIntent};
use crate::simulation::SimulationLoop;

// ── TimeStatus ────────────────────────────────────────────────────────────────

/// Snapshot of the scheduler/clock returned by every `time.*` command.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeStatus {
    pub running: bool,
    pub paused: bool,
    pub speed: f64,
    pub tick: Tick,
    pub target_tick_rate: f64,
}

/// Hook invoked with the message of every failed scheduler tick.
pub type SchedulerErrorHook = Box<dyn FnMut(&str) + Send>;

// ── SimulationFacade ──────────────────────────────────────────────────────────

pub struct SimulationFacade {
    pub(crate) state: WorldState,
    pub(crate) repository: BlueprintRepository,
    pub(crate) bus: EventBus,
    pub(crate) ids: IdGenerator,
    pub(crate) registry: CommandRegistry,
    pub(crate) scheduler: TickScheduler,
    pub(crate) sim_loop: SimulationLoop,
    pub(crate) on_scheduler_error: Option<SchedulerErrorHook>,
}

impl SimulationFacade {
    // ── State read API ────────────────────────────────────────────────────

    /// Deep, independent copy of World State — callers can never mutate the
    /// live tree through it.
    pub fn state(&self) -> WorldState {
        self.state.clone()
    }

    /// Apply a projection to an independent state copy.
    pub fn select<T>(&self, selector: impl FnOnce(&WorldState) -> T) -> T {
        let snapshot = self.state.clone();
        selector(&snapshot)
    }

    /// The bus this facade emits through (e.g. for attaching recorders).
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Read-only access to the blueprint catalog.
    pub fn repository(&self) -> &BlueprintRepository {
        &self.repository
    }

    // ── Event subscription API ────────────────────────────────────────────

    pub fn subscribe(&self, handler: impl FnMut(&SimEvent) + Send + 'static) -> Subscription {
        self.bus.subscribe(handler)
    }

    pub fn subscribe_filtered(
        &self,
        filter: EventFilter,
        handler: impl FnMut(&SimEvent) + Send + 'static,
    ) -> Subscription {
        self.bus.subscribe_filtered(filter, handler)
    }

    // ── Generic intent API ────────────────────────────────────────────────

    /// Dispatch `(domain, action, payload)`.  Used by transport gateways
    /// that don't know the concrete payload type; every command resolves —
    /// callers branch on `result.ok`, never on errors.
    pub fn invoke(&mut self, domain: &str, action: &str, payload: Value) -> CommandResult<Value> {
        if domain == "time" {
            return self.execute_time(action, payload);
        }
        let mut env = DispatchEnv {
            state: &mut self.state,
            repository: &self.repository,
            ids: &self.ids,
            bus: &self.bus,
        };
        self.registry.execute(domain, action, payload, &mut env)
    }

    /// Registered intent domains (including `time`).
    pub fn domains(&self) -> Vec<String> {
        let mut domains = vec!["time".to_string()];
        domains.extend(self.registry.domains().iter().cloned());
        domains
    }

    // ── Typed intent APIs ─────────────────────────────────────────────────

    pub fn time(&mut self) -> TimeApi<'_> {
        TimeApi { facade: self }
    }

    pub fn world(&mut self) -> WorldApi<'_> {
        WorldApi { facade: self }
    }

    pub fn devices(&mut self) -> DevicesApi<'_> {
        DevicesApi { facade: self }
    }

    pub fn plants(&mut self) -> PlantsApi<'_> {
        PlantsApi { facade: self }
    }

    pub fn finance(&mut self) -> FinanceApi<'_> {
        FinanceApi { facade: self }
    }

    // ── Host loop ─────────────────────────────────────────────────────────

    /// Execute all automatic ticks currently due.  Call this from the host's
    /// frame loop; it returns immediately while stopped or paused.
    pub fn pump(&mut self) -> PumpReport {
        let Self { state, repository, ids, bus, scheduler, sim_loop, .. } = self;
        let report = scheduler.pump(|| {
            sim_loop
                .process_tick(&mut *state, &*repository, &*ids, &*bus)
                .map(|_| ())
        });

        for message in &report.failures {
            self.emit_scheduler_error(message);
        }
        if report.stopped {
            self.state.clock.is_paused = true;
        }
        report
    }

    pub fn time_status(&self) -> TimeStatus {
        TimeStatus {
            running: self.scheduler.is_running(),
            paused: self.scheduler.is_paused(),
            speed: self.scheduler.speed(),
            tick: self.state.clock.tick,
            target_tick_rate: self.state.clock.target_tick_rate,
        }
    }

    // ── Time command execution ────────────────────────────────────────────

    fn execute_time(&mut self, action: &str, payload: Value) -> CommandResult<Value> {
        let payload = strip_intent_metadata(payload);
        let payload = if payload.is_null() {
            Value::Object(Default::default())
        } else {
            payload
        };

        match action {
            "start" => match time_commands::parse_start(&payload) {
                Ok(intent) => self.handle_start(&intent),
                Err(errors) => validation_failure("time.start", errors),
            },
            "pause" => match time_commands::parse_empty("time.pause", &payload) {
                Ok(()) => self.handle_pause(),
                Err(errors) => validation_failure("time.pause", errors),
            },
            "resume" => match time_commands::parse_empty("time.resume", &payload) {
                Ok(()) => self.handle_resume(),
                Err(errors) => validation_failure("time.resume", errors),
            },
            "step" => match time_commands::parse_step(&payload) {
                Ok(intent) => self.handle_step(&intent),
                Err(errors) => validation_failure("time.step", errors),
            },
            "setSpeed" => match time_commands::parse_set_speed(&payload) {
                Ok(intent) => self.handle_set_speed(&intent),
                Err(errors) => validation_failure("time.setSpeed", errors),
            },
            other => CommandResult::fail(
                ErrorCode::NotFound,
                format!("Unknown command time.{other}."),
                vec![format!("time.{other}")],
            ),
        }
    }

    fn handle_start(&mut self, intent: &TimeStartIntent) -> CommandResult<Value> {
        if self.scheduler.is_running() {
            return CommandResult::fail(
                ErrorCode::Conflict,
                "Simulation is already running.",
                vec!["time.start".to_string()],
            );
        }
        if let Some(cap) = intent.max_ticks_per_frame {
            self.scheduler.set_max_ticks_per_frame(cap);
        }
        if let Some(speed) = intent.game_speed {
            if let Err(error) = self.scheduler.set_speed(speed) {
                return CommandResult::fail(
                    ErrorCode::Validation,
                    error.to_string(),
                    vec!["time.start".to_string(), "gameSpeed".to_string()],
                );
            }
        }
        // Cannot conflict: checked above.
        let _ = self.scheduler.start();
        self.state.clock.is_paused = false;
        self.state.clock.target_tick_rate = self.scheduler.speed();

        self.finish_time_command("sim.resumed", Vec::new())
    }

    fn handle_pause(&mut self) -> CommandResult<Value> {
        if !self.scheduler.is_running() {
            return CommandResult::fail(
                ErrorCode::InvalidState,
                "Simulation is not running.",
                vec!["time.pause".to_string()],
            );
        }
        if self.scheduler.is_paused() {
            return self.time_ok(vec!["Simulation is already paused.".to_string()]);
        }
        // Cannot fail: running was just checked.
        let _ = self.scheduler.pause();
        self.state.clock.is_paused = true;

        self.finish_time_command("sim.paused", Vec::new())
    }

    fn handle_resume(&mut self) -> CommandResult<Value> {
        match self.scheduler.resume() {
            ResumeOutcome::Stopped => {
                self.time_ok(vec!["Simulation has not been started.".to_string()])
            }
            ResumeOutcome::AlreadyRunning => {
                self.time_ok(vec!["Simulation is already running.".to_string()])
            }
            ResumeOutcome::Resumed => {
                self.state.clock.is_paused = false;
                self.state.clock.target_tick_rate = self.scheduler.speed();
                self.finish_time_command("sim.resumed", Vec::new())
            }
        }
    }

    fn handle_step(&mut self, intent: &TimeStepIntent) -> CommandResult<Value> {
        let ticks = intent.ticks.unwrap_or(1);

        let Self { state, repository, ids, bus, scheduler, sim_loop, .. } = self;
        let report = scheduler.step(ticks, || {
            sim_loop
                .process_tick(&mut *state, &*repository, &*ids, &*bus)
                .map(|_| ())
        });

        if let Some(message) = report.failure {
            self.emit_scheduler_error(&message);
            return CommandResult::fail(
                ErrorCode::Internal,
                message,
                vec!["time.step".to_string()],
            );
        }
        self.time_ok(Vec::new())
    }

    fn handle_set_speed(&mut self, intent: &SetSpeedIntent) -> CommandResult<Value> {
        match self.scheduler.set_speed(intent.multiplier) {
            Err(error) => CommandResult::fail(
                ErrorCode::Validation,
                error.to_string(),
                vec!["time.setSpeed".to_string(), "multiplier".to_string()],
            ),
            Ok(change) if !change.changed => {
                self.time_ok(vec!["Speed multiplier unchanged.".to_string()])
            }
            Ok(change) => {
                self.state.clock.target_tick_rate = change.speed;
                self.finish_time_command("sim.speedChanged", Vec::new())
            }
        }
    }

    /// Emit the status event for a successful scheduler transition, then
    /// resolve with the status payload.
    fn finish_time_command(&mut self, event_kind: &str, warnings: Vec<String>) -> CommandResult<Value> {
        let status = self.time_status();
        let mut collector = EventCollector::new(self.state.clock.tick);
        collector.queue(event_kind, json!(status), EventLevel::Info);
        self.bus.emit_many(collector.drain_stamped(unix_ms_now()));

        CommandResult {
            ok: true,
            data: Some(json!(status)),
            warnings: normalize_warnings(warnings),
            errors: Vec::new(),
        }
    }

    /// Resolve ok with status data and warnings, emitting nothing.
    fn time_ok(&self, warnings: Vec<String>) -> CommandResult<Value> {
        CommandResult {
            ok: true,
            data: Some(json!(self.time_status())),
            warnings: normalize_warnings(warnings),
            errors: Vec::new(),
        }
    }

    fn emit_scheduler_error(&mut self, message: &str) {
        let mut event = SimEvent::new(
            "sim.schedulerError",
            EventLevel::Error,
            json!({ "message": message }),
        );
        event.tick = Some(self.state.clock.tick);
        event.ts = Some(unix_ms_now());
        self.bus.emit(event);
        if let Some(hook) = self.on_scheduler_error.as_mut() {
            hook(message);
        }
    }
}

fn validation_failure(command: &str, errors: Vec<grow_core::CommandError>) -> CommandResult<Value> {
    CommandResult::fail_with(normalize_errors(command, errors))
}

// ── Typed domain APIs ─────────────────────────────────────────────────────────

fn typed_invoke<I: Serialize, T: serde::de::DeserializeOwned>(
    facade: &mut SimulationFacade,
    domain: &str,
    action: &str,
    intent: &I,
) -> CommandResult<T> {
    match serde_json::to_value(intent) {
        Ok(payload) => facade.invoke(domain, action, payload).decode(),
        Err(error) => CommandResult::fail(
            ErrorCode::Internal,
            format!("Intent could not be encoded: {error}"),
            vec![format!("{domain}.{action}")],
        ),
    }
}

pub struct TimeApi<'a> {
    facade: &'a mut SimulationFacade,
}

impl TimeApi<'_> {
    pub fn start(&mut self, intent: Option<TimeStartIntent>) -> CommandResult<TimeStatus> {
        typed_invoke(self.facade, "time", "start", &intent.unwrap_or_default())
    }

    pub fn pause(&mut self) -> CommandResult<TimeStatus> {
        self.facade.invoke("time", "pause", Value::Null).decode()
    }

    pub fn resume(&mut self) -> CommandResult<TimeStatus> {
        self.facade.invoke("time", "resume", Value::Null).decode()
    }

    pub fn step(&mut self, ticks: Option<u32>) -> CommandResult<TimeStatus> {
        typed_invoke(self.facade, "time", "step", &TimeStepIntent { ticks })
    }

    pub fn set_speed(&mut self, multiplier: f64) -> CommandResult<TimeStatus> {
        typed_invoke(self.facade, "time", "setSpeed", &SetSpeedIntent { multiplier })
    }
}

pub struct WorldApi<'a> {
    facade: &'a mut SimulationFacade,
}

impl WorldApi<'_> {
    pub fn rent_structure(
        &mut self,
        intent: grow_engine::world::structure::RentStructureIntent,
    ) -> CommandResult<grow_engine::world::structure::RentStructureResult> {
        typed_invoke(self.facade, "world", "rentStructure", &intent)
    }

    pub fn create_room(
        &mut self,
        intent: grow_engine::world::room::CreateRoomIntent,
    ) -> CommandResult<grow_engine::world::room::CreateRoomResult> {
        typed_invoke(self.facade, "world", "createRoom", &intent)
    }

    pub fn update_room(
        &mut self,
        intent: grow_engine::world::room::UpdateRoomIntent,
    ) -> CommandResult<Value> {
        typed_invoke(self.facade, "world", "updateRoom", &intent)
    }

    pub fn delete_room(&mut self, room_id: &str) -> CommandResult<Value> {
        self.facade
            .invoke("world", "deleteRoom", json!({ "roomId": room_id }))
    }

    pub fn duplicate_room(
        &mut self,
        room_id: &str,
        name: Option<&str>,
    ) -> CommandResult<grow_engine::world::room::DuplicateRoomResult> {
        self.facade
            .invoke("world", "duplicateRoom", json!({ "roomId": room_id, "name": name }))
            .decode()
    }

    pub fn create_zone(
        &mut self,
        intent: grow_engine::world::zone::CreateZoneIntent,
    ) -> CommandResult<grow_engine::world::zone::CreateZoneResult> {
        typed_invoke(self.facade, "world", "createZone", &intent)
    }

    pub fn update_zone(
        &mut self,
        intent: grow_engine::world::zone::UpdateZoneIntent,
    ) -> CommandResult<Value> {
        typed_invoke(self.facade, "world", "updateZone", &intent)
    }

    pub fn delete_zone(&mut self, zone_id: &str) -> CommandResult<Value> {
        self.facade
            .invoke("world", "deleteZone", json!({ "zoneId": zone_id }))
    }

    pub fn duplicate_zone(
        &mut self,
        zone_id: &str,
        name: Option<&str>,
    ) -> CommandResult<grow_engine::world::zone::DuplicateZoneResult> {
        self.facade
            .invoke("world", "duplicateZone", json!({ "zoneId": zone_id, "name": name }))
            .decode()
    }

    pub fn rename_structure(&mut self, structure_id: &str, name: &str) -> CommandResult<Value> {
        self.facade.invoke(
            "world",
            "renameStructure",
            json!({ "structureId": structure_id, "name": name }),
        )
    }

    pub fn delete_structure(&mut self, structure_id: &str) -> CommandResult<Value> {
        self.facade
            .invoke("world", "deleteStructure", json!({ "structureId": structure_id }))
    }

    pub fn duplicate_structure(
        &mut self,
        structure_id: &str,
        name: Option<&str>,
    ) -> CommandResult<grow_engine::world::structure::DuplicateStructureResult> {
        self.facade
            .invoke(
                "world",
                "duplicateStructure",
                json!({ "structureId": structure_id, "name": name }),
            )
            .decode()
    }
}

pub struct DevicesApi<'a> {
    facade: &'a mut SimulationFacade,
}

impl DevicesApi<'_> {
    pub fn install_device(
        &mut self,
        intent: grow_engine::devices::InstallDeviceIntent,
    ) -> CommandResult<grow_engine::devices::InstallDeviceResult> {
        typed_invoke(self.facade, "devices", "installDevice", &intent)
    }

    pub fn update_device(
        &mut self,
        intent: grow_engine::devices::UpdateDeviceIntent,
    ) -> CommandResult<Value> {
        typed_invoke(self.facade, "devices", "updateDevice", &intent)
    }

    pub fn move_device(&mut self, device_id: &str, target_zone_id: &str) -> CommandResult<Value> {
        self.facade.invoke(
            "devices",
            "moveDevice",
            json!({ "deviceId": device_id, "targetZoneId": target_zone_id }),
        )
    }

    pub fn remove_device(&mut self, device_id: &str) -> CommandResult<Value> {
        self.facade
            .invoke("devices", "removeDevice", json!({ "deviceId": device_id }))
    }
}

pub struct PlantsApi<'a> {
    facade: &'a mut SimulationFacade,
}

impl PlantsApi<'_> {
    pub fn add_planting(
        &mut self,
        intent: grow_engine::plants::AddPlantingIntent,
    ) -> CommandResult<grow_engine::plants::AddPlantingResult> {
        typed_invoke(self.facade, "plants", "addPlanting", &intent)
    }

    pub fn cull_planting(
        &mut self,
        intent: grow_engine::plants::CullPlantingIntent,
    ) -> CommandResult<Value> {
        typed_invoke(self.facade, "plants", "cullPlanting", &intent)
    }

    pub fn harvest_planting(
        &mut self,
        zone_id: &str,
    ) -> CommandResult<grow_engine::plants::HarvestPlantingResult> {
        self.facade
            .invoke("plants", "harvestPlanting", json!({ "zoneId": zone_id }))
            .decode()
    }
}

pub struct FinanceApi<'a> {
    facade: &'a mut SimulationFacade,
}

impl FinanceApi<'_> {
    pub fn sell_inventory(
        &mut self,
        intent: grow_engine::finance::SellInventoryIntent,
    ) -> CommandResult<grow_engine::finance::SellInventoryResult> {
        typed_invoke(self.facade, "finance", "sellInventory", &intent)
    }

    pub fn set_utility_prices(
        &mut self,
        patch: grow_engine::finance::UtilityPricesPatch,
    ) -> CommandResult<Value> {
        typed_invoke(self.facade, "finance", "setUtilityPrices", &patch)
    }
}
