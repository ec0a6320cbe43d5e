//! Ice cycle engine
//!
//! Owns every counter and flag of the ice-making process. Collaborators
//! read it through accessors and drive it through [`Engine::advance`],
//! [`Engine::abort`], [`Engine::stage_table`] and [`Engine::restore_step`].
//!
//! Tick order:
//! 1. install a staged timing table
//! 2. interlocks (a trip forces `Standby` and ends the tick)
//! 3. initialization routine, while requested
//! 4. make-enabled gate
//! 5. at most one state transition

use crate::ambient::Arbitration;
use crate::config::{ConfigError, EngineConfig};
use crate::refrigeration::{hot_gas_hz, hot_gas_secs, ice_hz, preheat_hz, preheat_secs};
use crate::refrigeration::GasRoute;
use crate::safety::{self, abort_rule, AbortOutcome};
use crate::state::{IceCycleState, Phase, INIT_STEP};
use crate::timing::TimingTable;
use crate::tray::{TrayCommand, TrayFaultLog, TrayMotion, TrayRecovery};

use super::io::{Commands, TickInputs, TickOutput, Transition};
use super::telemetry::Telemetry;

/// Faults latched by the engine itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineFault {
    /// An actuator did not arrive within the configured retry limit
    ActuatorTimeout(IceCycleState),
}

/// The ice-making process engine
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    table: TimingTable,
    staged: Option<TimingTable>,
    phase: Phase,
    init_step: u8,
    needs_init: bool,
    initializing: bool,
    defrost_heater: bool,
    crystal_ice: bool,
    /// Ticks into the current take-off; cleared when the freeze ends
    take_off_elapsed: u16,
    /// Take-offs completed since the freeze ended
    take_off_passes: u8,
    /// Compressor speed held between speed changes; zero when stopped
    demand_hz: u8,
    tray_faults: TrayFaultLog,
    telemetry: Telemetry,
    fault: Option<EngineFault>,
    poll_ticks: u16,
    pending_tray: Option<TrayCommand>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine with the factory configuration and timing table
    pub fn new() -> Self {
        Self::build(EngineConfig::default())
    }

    /// Create an engine with a custom configuration
    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            config,
            table: TimingTable::factory(),
            staged: None,
            phase: Phase::Standby,
            init_step: 0,
            needs_init: false,
            initializing: false,
            defrost_heater: false,
            crystal_ice: false,
            take_off_elapsed: 0,
            take_off_passes: 0,
            demand_hz: 0,
            tray_faults: TrayFaultLog::default(),
            telemetry: Telemetry::default(),
            fault: None,
            poll_ticks: 0,
            pending_tray: None,
        }
    }

    /// Run one control tick
    pub fn advance(&mut self, inputs: &TickInputs) -> TickOutput {
        if let Some(table) = self.staged.take() {
            self.table = table;
        }

        let from = self.phase.state();
        let mut commands = Commands {
            tray: self.pending_tray.take(),
            ..Default::default()
        };

        let forced = safety::check(&inputs.interlocks);
        if forced.is_some() {
            self.force_standby();
            self.initializing = false;
        } else if inputs.interlocks.init_in_progress || self.needs_init {
            self.initializing = true;
            self.phase = Phase::Standby;
            self.demand_hz = 0;
            self.run_init(inputs, &mut commands);
        } else {
            self.initializing = false;
            self.init_step = 0;
            if inputs.interlocks.make_enabled {
                self.step_state(inputs, &mut commands);
            } else {
                self.phase = Phase::Standby;
                self.defrost_heater = false;
                self.poll_ticks = 0;
                self.demand_hz = 0;
            }
        }

        commands.defrost_heater = self.defrost_heater;
        commands.mix_back = self.mix_back();
        let to = self.phase.state();
        TickOutput {
            state: to,
            transition: (from != to).then_some(Transition { from, to }),
            commands,
            compressor_demand: self.demand_hz,
            forced,
        }
    }

    /// Operator abort
    ///
    /// The effect depends on the current state, see [`abort_rule`]. A tray
    /// command produced by the abort goes out with the next tick.
    pub fn abort(&mut self) -> AbortOutcome {
        let outcome = abort_rule(self.phase.state(), self.initializing || self.needs_init);
        match outcome {
            AbortOutcome::ReArmInit => {
                self.init_step = 0;
                self.needs_init = true;
                self.demand_hz = 0;
            }
            AbortOutcome::TrayDownAndFinish => {
                self.pending_tray = Some(TrayCommand::Down);
                self.poll_ticks = 0;
                self.demand_hz = 0;
                self.go(IceCycleState::Finish);
            }
            AbortOutcome::FreezeCancelled => {
                if let Phase::MainMaking { remaining, .. } = &mut self.phase {
                    *remaining = 0;
                }
            }
            AbortOutcome::NoEffect => {}
        }
        outcome
    }

    /// Hand over a complete replacement timing table
    ///
    /// It is installed at the top of the next tick. A freeze time already
    /// computed keeps its value.
    pub fn stage_table(&mut self, table: TimingTable) {
        self.staged = Some(table);
    }

    /// Jump to a raw step number
    ///
    /// Unknown step numbers take the invalid-state path: `Standby`, init
    /// step and defrost heater cleared, initialization re-requested.
    pub fn restore_step(&mut self, step: u8) -> IceCycleState {
        match IceCycleState::from_step(step) {
            Some(state) => self.go(state),
            None => self.reset_invalid(),
        }
        self.phase.state()
    }

    /// Clear a latched engine fault
    pub fn clear_fault(&mut self) {
        self.fault = None;
    }

    fn step_state(&mut self, inputs: &TickInputs, commands: &mut Commands) {
        let front = inputs.ambient.front_temp;
        let resolved = inputs.ambient.resolved(Arbitration::Small);

        match self.phase {
            Phase::Standby => {
                let clear_to_start = inputs.compressor.ready()
                    && !inputs.ice_dispensing
                    && !inputs.tray_fill_error;
                if clear_to_start {
                    if inputs.start_with_preheat && resolved < self.config.preheat_ambient_threshold
                    {
                        self.go(IceCycleState::PreheatGasMove);
                    } else {
                        self.go(IceCycleState::TrayUp);
                    }
                } else {
                    // A running compressor is only carried into a cycle
                    // that starts straight away
                    self.demand_hz = 0;
                }
            }
            Phase::PreheatGasMove => {
                commands.gas = Some(GasRoute::HotGas);
                self.go(IceCycleState::PreheatCalcTime);
            }
            Phase::PreheatCalcTime => {
                if inputs.gas.is_at(GasRoute::HotGas) {
                    self.poll_ticks = 0;
                    self.set_hz(preheat_hz(), commands);
                    self.phase = Phase::PreheatRun {
                        remaining: self.config.secs_to_ticks(preheat_secs(resolved)),
                    };
                } else if !self.actuator_stalled(commands) {
                    commands.gas = Some(GasRoute::HotGas);
                }
            }
            Phase::PreheatRun { mut remaining } => {
                if remaining > 0 && inputs.compressor.confirmed_on {
                    remaining -= 1;
                }
                if remaining == 0 {
                    commands.gas = Some(GasRoute::Ice);
                    self.go(IceCycleState::TrayUp);
                } else {
                    self.phase = Phase::PreheatRun { remaining };
                }
            }
            Phase::TrayUp => {
                if inputs.tray.motion == TrayMotion::MovingDown {
                    self.actuator_stalled(commands);
                } else {
                    commands.tray = Some(TrayCommand::Up);
                    self.crystal_ice = true;
                    self.go(IceCycleState::WaitWaterFull);
                }
            }
            Phase::WaitWaterFull => {
                if inputs.tray.settled_up() {
                    self.poll_ticks = 0;
                    // Sole reset point for the jam/abnormal-cycle counters
                    self.tray_faults.clear();
                    if inputs.compressor.outputting {
                        self.go(IceCycleState::ContGasMove);
                    } else {
                        self.go(IceCycleState::CheckTrayFillReady);
                    }
                } else if !self.actuator_stalled(commands)
                    && inputs.tray.motion != TrayMotion::MovingUp
                {
                    self.go(IceCycleState::TrayUp);
                }
            }
            Phase::ContGasMove => {
                commands.gas = Some(GasRoute::Ice);
                self.go(IceCycleState::ContRpsSet);
            }
            Phase::ContRpsSet => {
                if inputs.gas.is_at(GasRoute::Ice) {
                    self.poll_ticks = 0;
                    self.set_hz(ice_hz(front), commands);
                    self.go(IceCycleState::CheckTrayFillReady);
                } else if !self.actuator_stalled(commands) {
                    commands.gas = Some(GasRoute::Ice);
                }
            }
            Phase::CheckTrayFillReady => {
                if !inputs.water_dispensing {
                    self.telemetry.fill_ticks = 0;
                    self.phase = Phase::FillWater {
                        remaining: self.config.fill_target_pulses,
                    };
                }
            }
            Phase::FillWater { remaining } => {
                let remaining = remaining.saturating_sub(inputs.fill_pulses);
                self.telemetry.fill_ticks = self.telemetry.fill_ticks.saturating_add(1);
                if remaining == 0 {
                    self.go(IceCycleState::IceGasMove);
                } else if inputs.tray_fill_error {
                    commands.tray = Some(TrayCommand::Down);
                    if inputs.compressor.outputting {
                        self.go(IceCycleState::TrayDown);
                    } else {
                        self.go(IceCycleState::Finish);
                    }
                } else {
                    self.phase = Phase::FillWater { remaining };
                }
            }
            Phase::IceGasMove => {
                commands.gas = Some(GasRoute::Ice);
                self.go(IceCycleState::CalcMakeTime);
            }
            Phase::CalcMakeTime => {
                if inputs.gas.is_at(GasRoute::Ice) {
                    self.poll_ticks = 0;
                    if inputs.compressor.ready() {
                        let ticks = self.table.make_time_ticks(
                            inputs.ambient.room_temp,
                            front,
                            inputs.ice_size,
                            self.config.small_ice_percent,
                            self.config.tick_ms,
                        );
                        self.telemetry.start_freeze(ticks);
                        self.set_hz(ice_hz(front), commands);
                        self.phase = Phase::MainMaking {
                            remaining: ticks,
                            recovery: TrayRecovery::new(self.config.tray_recovery_ticks),
                        };
                    }
                } else if !self.actuator_stalled(commands) {
                    commands.gas = Some(GasRoute::Ice);
                }
            }
            Phase::MainMaking {
                mut remaining,
                mut recovery,
            } => {
                if remaining > 0 && inputs.compressor.confirmed_on {
                    remaining -= 1;
                    self.telemetry.make_ticks_run = self.telemetry.make_ticks_run.saturating_add(1);
                }
                if remaining == 0 {
                    commands.tray = Some(TrayCommand::Down);
                    self.take_off_elapsed = 0;
                    self.take_off_passes = 0;
                    self.crystal_ice = false;
                    self.go(IceCycleState::TrayDown);
                } else {
                    let safety_active = inputs.interlocks.safety_routine_active;
                    if let Some(cmd) = recovery.recover(inputs.tray.level, safety_active) {
                        commands.tray = Some(cmd);
                    }
                    if remaining <= self.config.noise_reduce_ticks {
                        self.set_hz(hot_gas_hz(resolved), commands);
                    }
                    self.phase = Phase::MainMaking {
                        remaining,
                        recovery,
                    };
                }
            }
            Phase::TrayDown => {
                if inputs.tray.settled_down() {
                    self.poll_ticks = 0;
                    self.go(IceCycleState::HotGasMove);
                } else {
                    self.actuator_stalled(commands);
                }
            }
            Phase::HotGasMove => {
                self.set_hz(hot_gas_hz(resolved), commands);
                commands.gas = Some(GasRoute::HotGas);
                self.go(IceCycleState::CalcHotGasTime);
            }
            Phase::CalcHotGasTime => {
                if inputs.gas.is_at(GasRoute::HotGas) {
                    self.poll_ticks = 0;
                    self.defrost_heater = true;
                    self.phase = Phase::TakeOff {
                        remaining: self.config.secs_to_ticks(hot_gas_secs(front)),
                    };
                } else if !self.actuator_stalled(commands) {
                    commands.gas = Some(GasRoute::HotGas);
                }
            }
            Phase::TakeOff { mut remaining } => {
                if remaining > 0 {
                    remaining -= 1;
                    self.telemetry.hot_gas_ticks_run =
                        self.telemetry.hot_gas_ticks_run.saturating_add(1);
                }
                self.take_off_elapsed = self.take_off_elapsed.saturating_add(1);
                if remaining == 0 {
                    self.defrost_heater = false;
                    self.take_off_passes = self.take_off_passes.saturating_add(1);
                    commands.ir_recheck = true;
                    self.phase = Phase::FeederMix { elapsed: 0 };
                } else {
                    self.phase = Phase::TakeOff { remaining };
                }
            }
            Phase::FeederMix { elapsed } => {
                let elapsed = elapsed.saturating_add(1);
                if elapsed >= self.config.feeder_mix_ticks {
                    commands.ir_recheck = true;
                    self.go(IceCycleState::FullIrCheck);
                } else {
                    self.phase = Phase::FeederMix { elapsed };
                }
            }
            Phase::FullIrCheck => {
                if !inputs.ir_full_pending {
                    self.go(IceCycleState::Finish);
                }
            }
            Phase::Finish => {
                self.crystal_ice = false;
                self.telemetry.cycles_completed = self.telemetry.cycles_completed.wrapping_add(1);
                self.go(IceCycleState::Standby);
            }
        }
    }

    /// Release leftover ice and park the valve before the first cycle
    fn run_init(&mut self, inputs: &TickInputs, commands: &mut Commands) {
        match self.init_step {
            0 => {
                commands.tray = Some(TrayCommand::Down);
                self.init_step = 1;
            }
            1 => {
                if inputs.tray.settled_down() {
                    self.init_step = 2;
                } else if inputs.tray.motion == TrayMotion::Idle {
                    commands.tray = Some(TrayCommand::Down);
                }
            }
            2 => {
                if inputs.gas.is_at(GasRoute::Ice) {
                    self.init_step = 3;
                } else {
                    commands.gas = Some(GasRoute::Ice);
                }
            }
            _ => {
                self.needs_init = false;
                commands.init_complete = true;
            }
        }
    }

    /// Count one more tick of waiting on an actuator
    ///
    /// Returns true if the retry limit was exceeded and the cycle abandoned.
    fn actuator_stalled(&mut self, commands: &mut Commands) -> bool {
        self.poll_ticks = self.poll_ticks.saturating_add(1);
        match self.config.actuator_retry_limit {
            Some(limit) if self.poll_ticks > limit => {
                self.fault = Some(EngineFault::ActuatorTimeout(self.phase.state()));
                self.poll_ticks = 0;
                self.defrost_heater = false;
                self.demand_hz = 0;
                commands.tray = Some(TrayCommand::Down);
                self.go(IceCycleState::Finish);
                true
            }
            _ => false,
        }
    }

    fn set_hz(&mut self, hz: u8, commands: &mut Commands) {
        self.telemetry.target_hz = hz;
        self.demand_hz = hz;
        commands.compressor_hz = Some(hz);
    }

    fn go(&mut self, state: IceCycleState) {
        self.phase = Phase::entry(state, self.config.tray_recovery_ticks);
    }

    fn force_standby(&mut self) {
        self.phase = Phase::Standby;
        self.defrost_heater = false;
        self.init_step = 0;
        self.poll_ticks = 0;
        self.demand_hz = 0;
    }

    fn reset_invalid(&mut self) {
        self.force_standby();
        self.needs_init = true;
    }

    // Accessors

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn table(&self) -> &TimingTable {
        &self.table
    }

    pub fn state(&self) -> IceCycleState {
        self.phase.state()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Diagnostic step number; [`INIT_STEP`] while initializing
    pub fn step(&self) -> u8 {
        if self.initializing {
            INIT_STEP
        } else {
            self.phase.state().step()
        }
    }

    pub fn init_step(&self) -> u8 {
        self.init_step
    }

    pub fn is_initializing(&self) -> bool {
        self.initializing
    }

    /// Engine requests initialization on its own (after an invalid state)
    pub fn needs_init(&self) -> bool {
        self.needs_init
    }

    /// Freeze ticks left
    pub fn make_time_remaining(&self) -> u32 {
        self.phase.make_time_remaining()
    }

    /// Freeze time left in whole seconds
    pub fn make_time_secs(&self) -> u32 {
        self.config.ticks_to_secs(self.phase.make_time_remaining())
    }

    pub fn defrost_time_remaining(&self) -> u16 {
        self.phase.defrost_time_remaining()
    }

    pub fn preheat_time_remaining(&self) -> u16 {
        self.phase.preheat_time_remaining()
    }

    /// Fill quantity left in flow-meter pulses
    pub fn fill_remaining(&self) -> u16 {
        self.phase.fill_remaining()
    }

    /// Fill quantity left in cubic centimetres
    pub fn fill_remaining_cc(&self) -> u16 {
        self.config.pulses_to_cc(self.phase.fill_remaining())
    }

    pub fn feeder_mix_elapsed(&self) -> u16 {
        self.phase.feeder_mix_elapsed()
    }

    pub fn tray_recovery_counter(&self) -> u16 {
        self.phase.tray_recovery_counter()
    }

    pub fn take_off_elapsed(&self) -> u16 {
        self.take_off_elapsed
    }

    pub fn take_off_passes(&self) -> u8 {
        self.take_off_passes
    }

    /// Compressor speed the cycle wants held (Hz); zero to stop
    ///
    /// Set by every speed change and held across states, including from
    /// `Finish` into a cycle that restarts at once. Dropped when the cycle
    /// is abandoned, interrupted or left idle in `Standby`.
    pub fn compressor_demand(&self) -> u8 {
        self.demand_hz
    }

    /// Feeder reverse, held for the whole feeder mix
    pub fn mix_back(&self) -> bool {
        matches!(self.phase, Phase::FeederMix { .. })
    }

    pub fn defrost_heater(&self) -> bool {
        self.defrost_heater
    }

    /// "Clear ice" display hint, raised from tray-up until the freeze ends
    pub fn crystal_ice(&self) -> bool {
        self.crystal_ice
    }

    pub fn tray_faults(&self) -> &TrayFaultLog {
        &self.tray_faults
    }

    /// Jam detector access to the fault counters
    pub fn tray_faults_mut(&mut self) -> &mut TrayFaultLog {
        &mut self.tray_faults
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn fault(&self) -> Option<EngineFault> {
        self.fault
    }
}
