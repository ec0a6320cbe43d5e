//! Ice cycle state numbering

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Step number reported while the initialization routine runs
pub const INIT_STEP: u8 = 255;

/// Ice cycle states, with their diagnostic step numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum IceCycleState {
    /// Idle between cycles
    #[default]
    Standby = 0,
    /// Request hot gas for preheat
    PreheatGasMove = 5,
    /// Wait for hot gas, load preheat time
    PreheatCalcTime = 6,
    /// Count down preheat
    PreheatRun = 7,
    /// Raise the tray
    TrayUp = 10,
    /// Wait for the tray to reach the freeze position
    WaitWaterFull = 11,
    /// Request the ice route with the compressor already running
    ContGasMove = 12,
    /// Wait for the ice route, set ice speed
    ContRpsSet = 13,
    /// Wait for water extraction to finish
    CheckTrayFillReady = 14,
    /// Fill the tray
    FillWater = 20,
    /// Request the ice route
    IceGasMove = 21,
    /// Compute the freeze time
    CalcMakeTime = 30,
    /// Freeze
    MainMaking = 31,
    /// Lower the tray
    TrayDown = 40,
    /// Request hot gas for take-off
    HotGasMove = 41,
    /// Wait for hot gas, load defrost time
    CalcHotGasTime = 42,
    /// Defrost the tray to release the ice
    TakeOff = 43,
    /// Run the feeder to mix the fresh ice in
    FeederMix = 44,
    /// Wait for the bin-full sensor re-check
    FullIrCheck = 50,
    /// End of cycle
    Finish = 51,
}

impl IceCycleState {
    /// Every state, in cycle order
    pub const ALL: [IceCycleState; 20] = [
        IceCycleState::Standby,
        IceCycleState::PreheatGasMove,
        IceCycleState::PreheatCalcTime,
        IceCycleState::PreheatRun,
        IceCycleState::TrayUp,
        IceCycleState::WaitWaterFull,
        IceCycleState::ContGasMove,
        IceCycleState::ContRpsSet,
        IceCycleState::CheckTrayFillReady,
        IceCycleState::FillWater,
        IceCycleState::IceGasMove,
        IceCycleState::CalcMakeTime,
        IceCycleState::MainMaking,
        IceCycleState::TrayDown,
        IceCycleState::HotGasMove,
        IceCycleState::CalcHotGasTime,
        IceCycleState::TakeOff,
        IceCycleState::FeederMix,
        IceCycleState::FullIrCheck,
        IceCycleState::Finish,
    ];

    /// Diagnostic step number
    pub fn step(self) -> u8 {
        self as u8
    }

    /// Parse a step number, rejecting anything not in the table
    pub fn from_step(step: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|state| state.step() == step)
    }

    /// States between the first speed request and the end of defrost
    ///
    /// A compressor running in one of these states belongs to the cycle.
    /// The speed actually held is [`Engine::compressor_demand`].
    ///
    /// [`Engine::compressor_demand`]: crate::engine::Engine::compressor_demand
    pub fn needs_compressor(self) -> bool {
        (IceCycleState::PreheatCalcTime..=IceCycleState::TakeOff).contains(&self)
    }

    /// Cycle has started but freezing has not
    pub fn is_pre_freeze(self) -> bool {
        self >= IceCycleState::PreheatGasMove && self <= IceCycleState::CalcMakeTime
    }

    /// Tray descent, defrost, or the tail of the cycle
    pub fn is_defrost_or_later(self) -> bool {
        self >= IceCycleState::TrayDown
    }
}
