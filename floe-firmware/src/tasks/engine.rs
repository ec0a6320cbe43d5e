//! Ice engine task
//!
//! Runs one `Engine::advance` per control tick:
//! 1. stage any completed timing table and handle an operator abort
//! 2. refresh the cached hardware state and the bin-full check
//! 3. advance the engine and log the transition
//! 4. fan the commands out to the actuator tasks
//! 5. publish the diagnostic snapshot
//!
//! The compressor follows the engine's held demand, so it keeps running
//! from one cycle into the next and stops only when the engine drops it.

use defmt::*;
use embassy_rp::gpio::{Level, Output};
use portable_atomic::Ordering;

use floe_core::config::EngineConfig;
use floe_core::engine::{Commands, DiagSnapshot, Engine, PlantStatus, TickInputs};
use floe_core::state::IceCycleState;
use floe_core::traits::TrayMotorError;
use floe_drivers::sensor::{IrCheck, IrConfig};

use super::tick::{TICK_INTERVAL_MS, TICK_SIGNAL};
use crate::channels::{
    CompressorStatus, PanelState, TrayStatus, ABORT_REQUEST, AMBIENT_READING, COMPRESSOR_HZ,
    COMPRESSOR_STATUS, DIAG_SNAPSHOT, FILL_PULSES, GAS_CMD, GAS_STATUS, PANEL_STATE,
    TABLE_UPDATE, TRAY_CMD, TRAY_STATUS,
};

/// Outputs driven directly by the engine task
pub struct EngineOutputs {
    /// Tray defrost heater relay
    pub defrost_heater: Output<'static>,
    /// Feeder motor reverse (mix-back) relay
    pub feeder_reverse: Output<'static>,
}

/// Hardware state cached between ticks
#[derive(Default)]
struct Plant {
    tray: TrayStatus,
    compressor: CompressorStatus,
    panel: PanelState,
}

impl Plant {
    fn refresh(&mut self, inputs: &mut TickInputs, ir: &mut IrCheck, idle: bool) {
        if let Some(status) = TRAY_STATUS.try_take() {
            self.tray = status;
        }
        if let Some(status) = COMPRESSOR_STATUS.try_take() {
            self.compressor = status;
        }
        if let Some(panel) = PANEL_STATE.try_take() {
            self.panel = panel;
        }
        if let Some(status) = GAS_STATUS.try_take() {
            inputs.gas = status;
        }
        if let Some(reading) = AMBIENT_READING.try_take() {
            inputs.ambient = reading;
        }

        // Keep checking while full so making resumes once ice is taken
        if ir.bin_full() && !ir.pending() {
            ir.request();
        }
        ir.update_with_delta(TICK_INTERVAL_MS, self.panel.ir_blocked);

        let interlocks = &mut inputs.interlocks;
        interlocks.operation_disabled = self.panel.tank_cover_open;
        interlocks.safety_routine_active = self.tray.fault == Some(TrayMotorError::TravelTimeout);
        interlocks.dual_tray_motor_fault = self.tray.fault == Some(TrayMotorError::Interlock);
        interlocks.water_line_clean_in_progress = false;
        // A full bin holds off the next cycle without cutting one short
        interlocks.make_enabled = self.panel.make_enabled && !(idle && ir.bin_full());

        inputs.tray = self.tray.sense;
        inputs.compressor = self.compressor.feedback;
        inputs.ice_dispensing = self.panel.ice_dispensing;
        inputs.water_dispensing = self.panel.water_dispensing;
        inputs.ice_size = self.panel.ice_size;
        inputs.start_with_preheat = self.panel.start_with_preheat;
        inputs.ir_full_pending = ir.pending();
        inputs.fill_pulses = FILL_PULSES.swap(0, Ordering::Relaxed);
    }

    fn status(&self) -> PlantStatus {
        PlantStatus {
            compressor_off_delay: self.compressor.off_delay_ticks,
            compressor_error: self.compressor.error_code,
            compressor_fan: self.compressor.feedback.outputting,
            tank_cover: self.panel.tank_cover_open,
            ..Default::default()
        }
    }
}

/// Engine task - advances the ice cycle once per tick
#[embassy_executor::task]
pub async fn engine_task(mut outputs: EngineOutputs) {
    info!("Engine task started");

    let config = EngineConfig {
        tick_ms: TICK_INTERVAL_MS,
        ..Default::default()
    };
    let mut engine = match Engine::with_config(config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Engine config rejected: {:?}", e);
            Engine::new()
        }
    };
    let mut plant = Plant::default();
    let mut inputs = TickInputs::default();

    // Home the tray and gas switch before the first cycle
    inputs.interlocks.init_in_progress = true;

    // Bin level is unknown until the first check completes
    let mut ir = IrCheck::new(IrConfig::default());
    ir.request();

    let mut demand_hz = 0u8;
    let mut was_forced = false;
    let mut last_fault = None;
    let mut last_tick_ms = 0u32;

    loop {
        let now_ms = TICK_SIGNAL.wait().await;
        let gap = now_ms.wrapping_sub(last_tick_ms);
        if last_tick_ms != 0 && gap > 2 * TICK_INTERVAL_MS {
            warn!("Tick overrun: {} ms since last tick", gap);
        }
        last_tick_ms = now_ms;

        if let Some(table) = TABLE_UPDATE.try_take() {
            info!("Timing table staged for the next cycle");
            engine.stage_table(table);
        }

        if ABORT_REQUEST.try_take().is_some() {
            let state = engine.state();
            let outcome = engine.abort();
            info!("Operator abort in {:?}: {:?}", state, outcome);
        }

        let idle = engine.state() == IceCycleState::Standby;
        plant.refresh(&mut inputs, &mut ir, idle);
        let out = engine.advance(&inputs);

        if let Some(t) = out.transition {
            info!("Ice: {:?} -> {:?}", t.from, t.to);
        }
        match out.forced {
            Some(forced) if !was_forced => warn!("Forced standby: {:?}", forced.reason),
            None if was_forced => info!("Interlocks clear"),
            _ => {}
        }
        was_forced = out.forced.is_some();

        if engine.fault() != last_fault {
            if let Some(fault) = engine.fault() {
                error!("Engine fault: {:?}", fault);
            }
            last_fault = engine.fault();
        }

        if out.commands.init_complete {
            info!("Initialization complete");
            inputs.interlocks.init_in_progress = false;
        }

        dispatch(&out.commands);
        if out.compressor_demand != demand_hz {
            debug!("Compressor demand: {} Hz", out.compressor_demand);
            demand_hz = out.compressor_demand;
            COMPRESSOR_HZ.signal(demand_hz);
        }
        outputs
            .defrost_heater
            .set_level(Level::from(out.commands.defrost_heater));
        outputs
            .feeder_reverse
            .set_level(Level::from(out.commands.mix_back));
        if out.commands.ir_recheck {
            debug!("Bin-full re-check requested");
            ir.request();
        }

        let snapshot = DiagSnapshot::capture(&engine, &inputs, &plant.status());
        *DIAG_SNAPSHOT.lock().await = snapshot;
    }
}

/// Forward one tick's commands to the actuator tasks
fn dispatch(commands: &Commands) {
    if let Some(cmd) = commands.tray {
        debug!("Tray command: {:?}", cmd);
        TRAY_CMD.signal(cmd);
    }
    if let Some(route) = commands.gas {
        GAS_CMD.signal(route);
    }
}
