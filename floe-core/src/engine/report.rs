//! Diagnostic link servicing
//!
//! The engine task publishes a [`DiagSnapshot`] after every tick; the
//! diagnostic task answers polls from the latest snapshot and feeds
//! freezing-table rows into a [`TableAssembler`].

use floe_protocol::messages::heartbeat_reply;
use floe_protocol::reports::{GAS_CODE_HOT_GAS, GAS_CODE_ICE, GAS_CODE_MOVING};
use floe_protocol::{
    ColdSystemReport, CommonSystemReport, Frame, FrameError, Request, NOS_ALL_CLOSED,
};

use crate::ambient::Arbitration;
use crate::refrigeration::{ice_hz, GasSwitchStatus};
use crate::timing::{TableAssembler, TableError, TimingTable};

use super::cycle::Engine;
use super::io::TickInputs;
use super::telemetry::Telemetry;

/// Plant state outside the engine's ownership, sampled by the firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlantStatus {
    /// Remaining compressor off-delay (ticks)
    pub compressor_off_delay: u16,
    pub compressor_error: u8,
    pub compressor_fan: bool,
    /// Cold tank water (whole degrees)
    pub cold_water: i16,
    pub heater_internal: i16,
    pub hot_out: i16,
    pub drain_low: bool,
    pub drain_full: bool,
    pub drain_level: u8,
    pub drain_pump: bool,
    pub tank_cover: bool,
}

/// Report payloads as of the last completed tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiagSnapshot {
    pub common: CommonSystemReport,
    pub cold: ColdSystemReport,
    /// Engine counters, for the service log rather than the wire
    pub telemetry: Telemetry,
}

impl DiagSnapshot {
    /// Snapshot with every report byte zero
    pub const fn new() -> Self {
        Self {
            common: CommonSystemReport::EMPTY,
            cold: ColdSystemReport::EMPTY,
            telemetry: Telemetry::EMPTY,
        }
    }
}

/// Errors servicing a diagnostic request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DiagError {
    Frame(FrameError),
    Table(TableError),
}

impl From<FrameError> for DiagError {
    fn from(e: FrameError) -> Self {
        DiagError::Frame(e)
    }
}

impl From<TableError> for DiagError {
    fn from(e: TableError) -> Self {
        DiagError::Table(e)
    }
}

/// Outcome of one serviced request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Serviced {
    pub reply: Frame,
    /// A replacement timing table, complete and ready to stage
    pub table: Option<TimingTable>,
}

/// Wire code for the gas switch position
pub fn gas_code(status: GasSwitchStatus) -> u8 {
    match status {
        GasSwitchStatus::Ice => GAS_CODE_ICE,
        GasSwitchStatus::HotGas => GAS_CODE_HOT_GAS,
        GasSwitchStatus::Transitioning => GAS_CODE_MOVING,
    }
}

impl DiagSnapshot {
    /// Capture the report payloads after a tick
    pub fn capture(engine: &Engine, inputs: &TickInputs, plant: &PlantStatus) -> Self {
        let ambient = &inputs.ambient;
        let temp = CommonSystemReport::temp_byte;

        let common = CommonSystemReport {
            front_ambient: temp(ambient.front_temp),
            inlet_water: temp(ambient.room_temp),
            purified_water: 0,
            resolved_ambient: temp(ambient.resolved(Arbitration::Small)),
            cold_water: temp(plant.cold_water),
            heater_internal: temp(plant.heater_internal),
            hot_out: temp(plant.hot_out),
            nos: NOS_ALL_CLOSED,
            feed: [0; 15],
        };

        let cold = ColdSystemReport {
            gas_switch: gas_code(inputs.gas),
            compressor_output: inputs.compressor.outputting,
            compressor_off_delay: plant.compressor_off_delay,
            compressor_hz: engine.telemetry().target_hz,
            compressor_error: plant.compressor_error,
            compressor_fan: plant.compressor_fan,
            ice_step: engine.step(),
            ice_target_hz: ice_hz(ambient.front_temp),
            make_time: u16::try_from(engine.make_time_remaining()).unwrap_or(u16::MAX),
            fill_remaining: engine.fill_remaining(),
            tray_position: inputs.tray.level.code(),
            ice_jam: inputs.interlocks.safety_routine_active,
            drain_low: plant.drain_low,
            drain_full: plant.drain_full,
            drain_level: plant.drain_level,
            drain_pump: plant.drain_pump,
            tank_cover: plant.tank_cover,
        };

        Self {
            common,
            cold,
            telemetry: *engine.telemetry(),
        }
    }
}

/// Answer one request from the latest snapshot
///
/// Freezing-table rows are acknowledged with the cold-system report; the
/// completed table is returned once the last row lands.
pub fn service(
    request: &Request,
    snapshot: &DiagSnapshot,
    assembler: &mut TableAssembler,
) -> Result<Serviced, DiagError> {
    let mut table = None;
    let reply = match request {
        Request::Heartbeat => heartbeat_reply(),
        Request::PollCommon => snapshot.common.to_frame()?,
        Request::PollCold => snapshot.cold.to_frame()?,
        Request::FreezingTableRow { room, secs } => {
            table = assembler.insert_row(usize::from(*room), secs)?;
            snapshot.cold.to_frame()?
        }
    };
    Ok(Serviced { reply, table })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambient::AmbientReading;
    use crate::refrigeration::CompressorFeedback;
    use crate::safety::Interlocks;
    use crate::state::IceCycleState;
    use crate::timing::TABLE_DIM;
    use crate::tray::{TrayLevel, TrayMotion, TraySense};
    use floe_protocol::messages::{CMD_HEARTBEAT, CMD_POLL_COLD, CMD_POLL_COMMON};
    use floe_protocol::STEP_INITIALIZING;

    fn inputs() -> TickInputs {
        TickInputs {
            interlocks: Interlocks {
                make_enabled: true,
                ..Default::default()
            },
            ambient: AmbientReading {
                front_temp: 21,
                side_temp: 19,
                room_temp: -3,
                ..Default::default()
            },
            tray: TraySense::new(TrayLevel::InTransit, TrayMotion::MovingUp),
            gas: GasSwitchStatus::Ice,
            compressor: CompressorFeedback {
                outputting: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_capture_common() {
        let engine = Engine::new();
        let snap = DiagSnapshot::capture(&engine, &inputs(), &PlantStatus::default());
        assert_eq!(snap.common.front_ambient, 21);
        assert_eq!(snap.common.inlet_water, 0);
        assert_eq!(snap.common.resolved_ambient, 19);
        assert_eq!(snap.common.nos, NOS_ALL_CLOSED);
        assert_eq!(snap.common.nos, [1; 5]);
    }

    #[test]
    fn test_capture_copies_telemetry() {
        let mut engine = Engine::new();
        engine.restore_step(IceCycleState::FillWater.step());
        engine.advance(&inputs());
        assert_eq!(engine.telemetry().fill_ticks, 1);

        let snap = DiagSnapshot::capture(&engine, &inputs(), &PlantStatus::default());
        assert_eq!(snap.telemetry, *engine.telemetry());
        assert_eq!(DiagSnapshot::new().telemetry, Telemetry::EMPTY);
    }

    #[test]
    fn test_capture_cold() {
        let engine = Engine::new();
        let plant = PlantStatus {
            compressor_off_delay: 1200,
            tank_cover: true,
            ..Default::default()
        };
        let snap = DiagSnapshot::capture(&engine, &inputs(), &plant);
        assert_eq!(snap.cold.gas_switch, GAS_CODE_ICE);
        assert!(snap.cold.compressor_output);
        assert_eq!(snap.cold.compressor_off_delay, 1200);
        assert_eq!(snap.cold.ice_step, 0);
        assert_eq!(snap.cold.ice_target_hz, ice_hz(21));
        assert_eq!(snap.cold.tray_position, 2);
        assert!(snap.cold.tank_cover);
    }

    #[test]
    fn test_capture_reports_initializing_step() {
        let mut engine = Engine::new();
        let mut i = inputs();
        i.interlocks.init_in_progress = true;
        engine.advance(&i);
        let snap = DiagSnapshot::capture(&engine, &i, &PlantStatus::default());
        assert_eq!(snap.cold.ice_step, STEP_INITIALIZING);
    }

    #[test]
    fn test_gas_codes() {
        assert_eq!(gas_code(GasSwitchStatus::Transitioning), 0);
        assert_eq!(gas_code(GasSwitchStatus::HotGas), 1);
        assert_eq!(gas_code(GasSwitchStatus::Ice), 3);
    }

    #[test]
    fn test_service_polls() {
        let snap = DiagSnapshot::default();
        let mut assembler = TableAssembler::new();

        let out = service(&Request::Heartbeat, &snap, &mut assembler).unwrap();
        assert_eq!(out.reply.cmd, CMD_HEARTBEAT);
        assert!(out.reply.data.is_empty());

        let out = service(&Request::PollCommon, &snap, &mut assembler).unwrap();
        assert_eq!(out.reply.cmd, CMD_POLL_COMMON);
        assert_eq!(out.reply.data.len(), 40);

        let out = service(&Request::PollCold, &snap, &mut assembler).unwrap();
        assert_eq!(out.reply.cmd, CMD_POLL_COLD);
        assert_eq!(out.reply.data.len(), 76);
        assert!(out.table.is_none());
    }

    #[test]
    fn test_service_table_rows() {
        let snap = DiagSnapshot::default();
        let mut assembler = TableAssembler::new();

        for room in 0..TABLE_DIM as u8 - 1 {
            let req = Request::FreezingTableRow {
                room,
                secs: [700; TABLE_DIM],
            };
            let out = service(&req, &snap, &mut assembler).unwrap();
            assert_eq!(out.reply.cmd, CMD_POLL_COLD);
            assert!(out.table.is_none());
        }

        let req = Request::FreezingTableRow {
            room: 45,
            secs: [900; TABLE_DIM],
        };
        let out = service(&req, &snap, &mut assembler).unwrap();
        let table = out.table.unwrap();
        assert_eq!(table.lookup_secs(0, 0), 700);
        assert_eq!(table.lookup_secs(45, 3), 900);
    }
}
