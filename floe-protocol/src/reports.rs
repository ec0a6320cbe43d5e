//! Poll report layouts
//!
//! Reports are fixed-length DATA blocks; bytes not carried by this
//! board are sent as zero.

use crate::frame::{Frame, FrameError};
use crate::messages::{ID_MAIN, CMD_POLL_COLD, CMD_POLL_COMMON};

/// DATA length of the common-system (0xF0) report
pub const COMMON_REPORT_LEN: usize = 40;

/// DATA length of the cold-system (0xF1) report
pub const COLD_REPORT_LEN: usize = 76;

/// Ice step reported while initialization is pending
pub const STEP_INITIALIZING: u8 = 255;

/// Swing bar on/off times reported to the PC
const SWING_BAR_ON: u8 = 2;
const SWING_BAR_OFF: u8 = 6;

const NOS_VALVES: usize = 5;
const FEED_VALVES: usize = 15;

/// NOS bytes for an ice-only board with no NOS valves fitted
///
/// The PC tool reads an open NOS valve as a leak alarm, so every valve
/// is reported closed.
pub const NOS_ALL_CLOSED: [u8; NOS_VALVES] = [1; NOS_VALVES];

// Gas switch position codes
pub const GAS_CODE_MOVING: u8 = 0;
pub const GAS_CODE_HOT_GAS: u8 = 1;
pub const GAS_CODE_COOLING: u8 = 2;
pub const GAS_CODE_ICE: u8 = 3;

/// Common-system report: temperatures in whole degrees and valve states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommonSystemReport {
    pub front_ambient: u8,
    pub inlet_water: u8,
    pub purified_water: u8,
    pub resolved_ambient: u8,
    pub cold_water: u8,
    pub heater_internal: u8,
    pub hot_out: u8,
    /// NOS valves, 1 = closed
    pub nos: [u8; NOS_VALVES],
    /// FEED valves, 1 = open
    pub feed: [u8; FEED_VALVES],
}

impl CommonSystemReport {
    /// All-zero report
    pub const EMPTY: Self = Self {
        front_ambient: 0,
        inlet_water: 0,
        purified_water: 0,
        resolved_ambient: 0,
        cold_water: 0,
        heater_internal: 0,
        hot_out: 0,
        nos: [0; NOS_VALVES],
        feed: [0; FEED_VALVES],
    };

    /// Clamp a signed whole-degree reading into the single report byte
    pub fn temp_byte(celsius: i16) -> u8 {
        celsius.clamp(0, 255) as u8
    }

    pub fn encode(&self) -> [u8; COMMON_REPORT_LEN] {
        let mut out = [0u8; COMMON_REPORT_LEN];
        out[..7].copy_from_slice(&[
            self.front_ambient,
            self.inlet_water,
            self.purified_water,
            self.resolved_ambient,
            self.cold_water,
            self.heater_internal,
            self.hot_out,
        ]);
        out[7..7 + NOS_VALVES].copy_from_slice(&self.nos);
        out[7 + NOS_VALVES..7 + NOS_VALVES + FEED_VALVES].copy_from_slice(&self.feed);
        out
    }

    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        Frame::new(ID_MAIN, CMD_POLL_COMMON, &self.encode())
    }
}

/// Cold-system report: refrigeration circuit and ice-making progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColdSystemReport {
    pub gas_switch: u8,
    pub compressor_output: bool,
    /// Remaining compressor off-delay, ticks
    pub compressor_off_delay: u16,
    pub compressor_hz: u8,
    pub compressor_error: u8,
    pub compressor_fan: bool,
    /// Ice step number, [`STEP_INITIALIZING`] while initializing
    pub ice_step: u8,
    pub ice_target_hz: u8,
    /// Remaining make time, ticks
    pub make_time: u16,
    /// Remaining fill quantity, flow pulses
    pub fill_remaining: u16,
    pub tray_position: u8,
    pub ice_jam: bool,
    pub drain_low: bool,
    pub drain_full: bool,
    pub drain_level: u8,
    pub drain_pump: bool,
    pub tank_cover: bool,
}

impl ColdSystemReport {
    /// All-zero report
    pub const EMPTY: Self = Self {
        gas_switch: GAS_CODE_MOVING,
        compressor_output: false,
        compressor_off_delay: 0,
        compressor_hz: 0,
        compressor_error: 0,
        compressor_fan: false,
        ice_step: 0,
        ice_target_hz: 0,
        make_time: 0,
        fill_remaining: 0,
        tray_position: 0,
        ice_jam: false,
        drain_low: false,
        drain_full: false,
        drain_level: 0,
        drain_pump: false,
        tank_cover: false,
    };

    pub fn encode(&self) -> [u8; COLD_REPORT_LEN] {
        let mut out = [0u8; COLD_REPORT_LEN];
        let off_delay = self.compressor_off_delay.to_be_bytes();
        let make = self.make_time.to_be_bytes();
        let fill = self.fill_remaining.to_be_bytes();

        // Refrigeration circuit
        out[0] = self.gas_switch;
        out[1] = 0;
        out[2] = u8::from(self.compressor_output);
        out[3] = off_delay[0];
        out[4] = off_delay[1];
        out[5] = self.compressor_hz;
        out[6] = self.compressor_error;
        out[7] = u8::from(self.compressor_fan);
        out[8] = 0;

        // Cooling block, 9..16, not carried

        // Ice making
        out[16] = self.ice_step;
        out[17] = self.ice_target_hz;
        out[18] = make[0];
        out[19] = make[1];
        out[20] = fill[0];
        out[21] = fill[1];
        out[22] = SWING_BAR_ON;
        out[23] = SWING_BAR_OFF;
        out[24] = self.tray_position;
        out[25] = u8::from(self.ice_jam);

        // Keep-cold block; only the tray position is carried
        out[30] = self.tray_position;

        // Drain tank
        out[31] = u8::from(self.drain_low);
        out[32] = u8::from(self.drain_full);
        out[33] = self.drain_level;
        out[34] = u8::from(self.drain_pump);

        out[35] = u8::from(self.tank_cover);
        out
    }

    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        Frame::new(ID_MAIN, CMD_POLL_COLD, &self.encode())
    }
}

impl Default for CommonSystemReport {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Default for ColdSystemReport {
    fn default() -> Self {
        Self::EMPTY
    }
}
