//! Tray lift motor with reed switch end stops
//!
//! The tray is driven by a geared DC motor through two outputs, one per
//! direction. A reed switch at each end reports arrival. The driver:
//! - never drives both outputs at once
//! - stops on reaching the commanded end switch
//! - latches a travel timeout if the switch is not reached in time
//! - latches an interlock fault if both switches read closed
//!
//! # Usage
//!
//! ```ignore
//! let mut tray = TrayMotor::new(TrayMotorConfig::default());
//! tray.command(TrayCommand::Up)?;
//!
//! // Every control tick:
//! tray.update_switches(making_switch.is_low()?, throw_switch.is_low()?);
//! tray.update_with_delta(100);
//! tray.apply(&mut up_pin, &mut down_pin)?;
//! ```

use embedded_hal::digital::OutputPin;
use floe_core::traits::{TrayActuator, TrayMotorError};
use floe_core::tray::{TrayCommand, TrayLevel, TrayMotion, TraySense};

/// Tray motor configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrayMotorConfig {
    /// Longest allowed end-to-end travel (ms)
    pub travel_timeout_ms: u32,
    /// Outputs are active-high (true) or active-low (false)
    pub active_high: bool,
}

impl Default for TrayMotorConfig {
    fn default() -> Self {
        Self {
            travel_timeout_ms: 20_000,
            active_high: true,
        }
    }
}

/// Tray lift motor driver
#[derive(Debug)]
pub struct TrayMotor {
    config: TrayMotorConfig,
    motion: TrayMotion,
    at_making: bool,
    at_throw: bool,
    travel_ms: u32,
    fault: Option<TrayMotorError>,
}

impl TrayMotor {
    pub fn new(config: TrayMotorConfig) -> Self {
        Self {
            config,
            motion: TrayMotion::Idle,
            at_making: false,
            at_throw: false,
            travel_ms: 0,
            fault: None,
        }
    }

    pub fn config(&self) -> &TrayMotorConfig {
        &self.config
    }

    /// Latch the end switch readings for this tick
    pub fn update_switches(&mut self, at_making: bool, at_throw: bool) {
        self.at_making = at_making;
        self.at_throw = at_throw;
    }

    /// Advance travel timing by `delta_ms`
    pub fn update_with_delta(&mut self, delta_ms: u32) {
        if self.at_making && self.at_throw {
            self.motion = TrayMotion::Idle;
            self.fault = Some(TrayMotorError::Interlock);
            return;
        }

        let arrived = match self.motion {
            TrayMotion::Idle => return,
            TrayMotion::MovingUp => self.at_making,
            TrayMotion::MovingDown => self.at_throw,
        };

        if arrived {
            self.motion = TrayMotion::Idle;
            self.travel_ms = 0;
            return;
        }

        self.travel_ms = self.travel_ms.saturating_add(delta_ms);
        if self.travel_ms >= self.config.travel_timeout_ms {
            self.motion = TrayMotion::Idle;
            self.fault = Some(TrayMotorError::TravelTimeout);
        }
    }

    /// Time spent on the current travel (ms)
    pub fn travel_ms(&self) -> u32 {
        self.travel_ms
    }

    /// Level of the "up" output, accounting for polarity
    pub fn up_pin_state(&self) -> bool {
        (self.motion == TrayMotion::MovingUp) == self.config.active_high
    }

    /// Level of the "down" output, accounting for polarity
    pub fn down_pin_state(&self) -> bool {
        (self.motion == TrayMotion::MovingDown) == self.config.active_high
    }

    /// Drive the direction outputs
    ///
    /// The inactive side is released first so the H-bridge never sees both
    /// inputs asserted.
    pub fn apply<P: OutputPin>(&self, up: &mut P, down: &mut P) -> Result<(), P::Error> {
        let (first, first_level, second, second_level) = match self.motion {
            TrayMotion::MovingDown => (up, self.up_pin_state(), down, self.down_pin_state()),
            _ => (down, self.down_pin_state(), up, self.up_pin_state()),
        };
        first.set_state(first_level.into())?;
        second.set_state(second_level.into())
    }
}

impl TrayActuator for TrayMotor {
    fn command(&mut self, cmd: TrayCommand) -> Result<(), TrayMotorError> {
        if self.at_making && self.at_throw {
            self.fault = Some(TrayMotorError::Interlock);
            return Err(TrayMotorError::Interlock);
        }

        let (target, already_there) = match cmd {
            TrayCommand::Up => (TrayMotion::MovingUp, self.at_making),
            TrayCommand::Down => (TrayMotion::MovingDown, self.at_throw),
        };

        if self.motion == target {
            return Ok(());
        }
        self.fault = None;
        self.travel_ms = 0;
        self.motion = if already_there { TrayMotion::Idle } else { target };
        Ok(())
    }

    fn stop(&mut self) {
        self.motion = TrayMotion::Idle;
        self.travel_ms = 0;
    }

    fn sense(&self) -> TraySense {
        let level = match (self.at_making, self.at_throw) {
            (true, false) => TrayLevel::AtIceMaking,
            (false, true) => TrayLevel::AtIceThrow,
            _ => TrayLevel::InTransit,
        };
        TraySense::new(level, self.motion)
    }

    fn fault(&self) -> Option<TrayMotorError> {
        self.fault
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPin;

    fn parked_down() -> TrayMotor {
        let mut tray = TrayMotor::new(TrayMotorConfig::default());
        tray.update_switches(false, true);
        tray
    }

    #[test]
    fn test_travel_up_and_stop_at_switch() {
        let mut tray = parked_down();
        tray.command(TrayCommand::Up).unwrap();
        assert_eq!(tray.sense().motion, TrayMotion::MovingUp);

        tray.update_switches(false, false);
        tray.update_with_delta(100);
        assert_eq!(
            tray.sense(),
            TraySense::new(TrayLevel::InTransit, TrayMotion::MovingUp)
        );

        tray.update_switches(true, false);
        tray.update_with_delta(100);
        assert_eq!(
            tray.sense(),
            TraySense::new(TrayLevel::AtIceMaking, TrayMotion::Idle)
        );
        assert!(tray.sense().settled_up());
        assert_eq!(tray.fault(), None);
    }

    #[test]
    fn test_command_at_target_is_idle() {
        let mut tray = parked_down();
        tray.command(TrayCommand::Down).unwrap();
        assert_eq!(tray.sense().motion, TrayMotion::Idle);
        assert!(tray.sense().settled_down());
    }

    #[test]
    fn test_repeat_command_keeps_travel_time() {
        let mut tray = parked_down();
        tray.command(TrayCommand::Up).unwrap();
        tray.update_switches(false, false);
        tray.update_with_delta(500);
        tray.command(TrayCommand::Up).unwrap();
        assert_eq!(tray.travel_ms(), 500);
    }

    #[test]
    fn test_reverse_mid_travel() {
        let mut tray = parked_down();
        tray.command(TrayCommand::Up).unwrap();
        tray.update_switches(false, false);
        tray.update_with_delta(300);

        tray.command(TrayCommand::Down).unwrap();
        assert_eq!(tray.sense().motion, TrayMotion::MovingDown);
        assert_eq!(tray.travel_ms(), 0);
    }

    #[test]
    fn test_travel_timeout() {
        let config = TrayMotorConfig {
            travel_timeout_ms: 1_000,
            ..Default::default()
        };
        let mut tray = TrayMotor::new(config);
        tray.update_switches(false, false);
        tray.command(TrayCommand::Down).unwrap();

        for _ in 0..9 {
            tray.update_with_delta(100);
        }
        assert_eq!(tray.fault(), None);

        tray.update_with_delta(100);
        assert_eq!(tray.fault(), Some(TrayMotorError::TravelTimeout));
        assert_eq!(tray.sense().motion, TrayMotion::Idle);

        // A fresh command clears the timeout and retries
        tray.command(TrayCommand::Down).unwrap();
        assert_eq!(tray.fault(), None);
        assert_eq!(tray.sense().motion, TrayMotion::MovingDown);
    }

    #[test]
    fn test_both_switches_is_interlock() {
        let mut tray = parked_down();
        tray.command(TrayCommand::Up).unwrap();
        tray.update_switches(true, true);
        tray.update_with_delta(100);
        assert_eq!(tray.fault(), Some(TrayMotorError::Interlock));
        assert_eq!(tray.sense().motion, TrayMotion::Idle);
        assert_eq!(tray.sense().level, TrayLevel::InTransit);
        assert_eq!(tray.command(TrayCommand::Down), Err(TrayMotorError::Interlock));
    }

    #[test]
    fn test_pins_exclusive() {
        let mut tray = parked_down();
        let mut up = MockPin::default();
        let mut down = MockPin::default();

        tray.command(TrayCommand::Up).unwrap();
        tray.apply(&mut up, &mut down).unwrap();
        assert!(up.high);
        assert!(!down.high);

        tray.stop();
        tray.apply(&mut up, &mut down).unwrap();
        assert!(!up.high);
        assert!(!down.high);
    }

    #[test]
    fn test_active_low_outputs() {
        let config = TrayMotorConfig {
            active_high: false,
            ..Default::default()
        };
        let mut tray = TrayMotor::new(config);
        tray.update_switches(false, true);
        assert!(tray.up_pin_state());
        assert!(tray.down_pin_state());

        tray.command(TrayCommand::Up).unwrap();
        assert!(!tray.up_pin_state());
        assert!(tray.down_pin_state());
    }
}
