//! Per-tick engine inputs and outputs

use crate::ambient::AmbientReading;
use crate::refrigeration::{CompressorFeedback, GasRoute, GasSwitchStatus};
use crate::safety::{ForcedReset, Interlocks};
use crate::state::IceCycleState;
use crate::timing::IceSize;
use crate::tray::{TrayCommand, TraySense};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapshot of everything the engine reads in one tick
///
/// Values are only valid for the tick they were sampled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TickInputs {
    pub interlocks: Interlocks,
    pub ambient: AmbientReading,
    pub tray: TraySense,
    pub gas: GasSwitchStatus,
    pub compressor: CompressorFeedback,
    /// Ice is being dispensed
    pub ice_dispensing: bool,
    /// Water is being dispensed
    pub water_dispensing: bool,
    /// Tray inlet reported a transient fill error
    pub tray_fill_error: bool,
    /// Flow-meter pulses counted since the previous tick
    pub fill_pulses: u16,
    pub ice_size: IceSize,
    /// User asked for a preheat pass before freezing
    pub start_with_preheat: bool,
    /// Bin-full IR check has not yet reported clear
    pub ir_full_pending: bool,
}

/// Actuator commands produced by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Commands {
    /// Tray motor request
    pub tray: Option<TrayCommand>,
    /// Gas-switch request
    pub gas: Option<GasRoute>,
    /// New compressor target speed (Hz)
    pub compressor_hz: Option<u8>,
    /// Defrost heater level for this tick
    pub defrost_heater: bool,
    /// Force the bin-full and low-level IR sensors to re-check
    pub ir_recheck: bool,
    /// Run the feeder backwards to mix fresh ice in; held for the whole
    /// feeder mix
    pub mix_back: bool,
    /// Initialization routine finished
    pub init_complete: bool,
}

/// A change of cycle state within one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transition {
    pub from: IceCycleState,
    pub to: IceCycleState,
}

/// Result of one engine tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutput {
    /// State after the tick
    pub state: IceCycleState,
    /// Set when the state changed this tick
    pub transition: Option<Transition>,
    pub commands: Commands,
    /// Compressor speed to hold after this tick (Hz); zero stops it
    pub compressor_demand: u8,
    /// Set when an interlock forced the cycle back to standby
    pub forced: Option<ForcedReset>,
}
