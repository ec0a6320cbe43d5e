//! Refrigerant circuit state

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Gas-switch routing requested by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GasRoute {
    /// Refrigerant through the ice tray evaporator
    Ice,
    /// Hot discharge gas through the tray for defrost/preheat
    HotGas,
}

/// Sensed gas-switch valve position
///
/// The valve needs real time to move; a request is only complete once the
/// status reports the requested route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GasSwitchStatus {
    /// Parked on the ice route
    Ice,
    /// Parked on the hot-gas route
    HotGas,
    /// Moving, or position unknown
    #[default]
    Transitioning,
}

impl GasSwitchStatus {
    /// Check whether the valve has arrived at `route`
    pub fn is_at(self, route: GasRoute) -> bool {
        matches!(
            (self, route),
            (GasSwitchStatus::Ice, GasRoute::Ice) | (GasSwitchStatus::HotGas, GasRoute::HotGas)
        )
    }
}

impl From<GasRoute> for GasSwitchStatus {
    fn from(route: GasRoute) -> Self {
        match route {
            GasRoute::Ice => GasSwitchStatus::Ice,
            GasRoute::HotGas => GasSwitchStatus::HotGas,
        }
    }
}

/// Compressor feedback sampled once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompressorFeedback {
    /// Compressor output is commanded on
    pub outputting: bool,
    /// Inverter confirms the compressor is actually running
    pub confirmed_on: bool,
    /// Restart protection delay since the last stop has elapsed
    pub off_delay_elapsed: bool,
}

impl CompressorFeedback {
    /// Compressor may be (re)started or is already running
    pub fn ready(&self) -> bool {
        self.off_delay_elapsed || self.outputting
    }
}
