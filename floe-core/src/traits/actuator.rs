//! Actuator traits for the refrigerant circuit and the ice tray

use crate::refrigeration::{CompressorFeedback, GasRoute, GasSwitchStatus};
use crate::tray::{TrayCommand, TraySense};

/// Errors reported by the tray motor driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrayMotorError {
    /// Target switch not reached within the travel limit
    TravelTimeout,
    /// Both position switches asserted at once
    Interlock,
}

/// Refrigerant gas-switch valve
pub trait GasSwitch {
    /// Start moving toward `route`
    ///
    /// Repeating a request for the route already in progress is a no-op.
    fn request(&mut self, route: GasRoute);

    /// Current valve position
    fn status(&self) -> GasSwitchStatus;
}

/// Tray lift motor with position switches
pub trait TrayActuator {
    /// Start moving the tray; up and down are mutually exclusive
    fn command(&mut self, cmd: TrayCommand) -> Result<(), TrayMotorError>;

    /// Stop the motor
    fn stop(&mut self);

    /// Sensed level and motion
    fn sense(&self) -> TraySense;

    /// Latched fault, if any
    fn fault(&self) -> Option<TrayMotorError>;
}

/// Variable-speed (BLDC) compressor
pub trait Compressor {
    /// Set the target speed; zero stops the compressor
    fn set_target_hz(&mut self, hz: u8);

    /// Current target speed
    fn target_hz(&self) -> u8;

    /// Output/confirmation/restart-delay state
    fn feedback(&self) -> CompressorFeedback;
}
