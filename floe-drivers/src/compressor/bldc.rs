//! BLDC compressor through an inverter board
//!
//! The inverter takes an enable line and a PWM speed input, full duty at
//! `max_hz`. This driver owns
//! the parts the engine needs to reason about:
//! - restart protection: after any stop the compressor may not restart
//!   until the off-delay has elapsed (also armed at power-up)
//! - run confirmation: the output counts as confirmed once the inverter
//!   has been running for `confirm_ms` without reporting an error
//! - inverter errors stop the output and re-arm the off-delay
//!
//! A non-zero target requested during the off-delay is held and applied
//! as soon as the delay runs out.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use floe_core::refrigeration::CompressorFeedback;
use floe_core::traits::Compressor;

/// Compressor configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BldcConfig {
    /// Restart protection delay after a stop (ms)
    pub off_delay_ms: u32,
    /// Running time before the output is reported confirmed (ms)
    pub confirm_ms: u32,
    /// Speed at full PWM duty (Hz)
    pub max_hz: u8,
}

impl Default for BldcConfig {
    fn default() -> Self {
        Self {
            off_delay_ms: 180_000,
            confirm_ms: 2_000,
            max_hz: 120,
        }
    }
}

/// BLDC compressor driver
#[derive(Debug)]
pub struct BldcCompressor {
    config: BldcConfig,
    target_hz: u8,
    outputting: bool,
    on_ms: u32,
    off_delay_remaining_ms: u32,
    error_code: u8,
}

impl BldcCompressor {
    /// Create a stopped compressor with the restart delay armed
    pub fn new(config: BldcConfig) -> Self {
        let off_delay_remaining_ms = config.off_delay_ms;
        Self {
            config,
            target_hz: 0,
            outputting: false,
            on_ms: 0,
            off_delay_remaining_ms,
            error_code: 0,
        }
    }

    fn stop_output(&mut self) {
        if self.outputting {
            self.outputting = false;
            self.off_delay_remaining_ms = self.config.off_delay_ms;
        }
        self.on_ms = 0;
    }

    /// Latch the inverter's error code (0 = healthy)
    pub fn set_error_code(&mut self, code: u8) {
        self.error_code = code;
        if code != 0 {
            self.stop_output();
        }
    }

    pub fn error_code(&self) -> u8 {
        self.error_code
    }

    /// Advance timers by `delta_ms`
    pub fn update_with_delta(&mut self, delta_ms: u32) {
        if self.outputting {
            self.on_ms = self.on_ms.saturating_add(delta_ms);
            return;
        }

        self.off_delay_remaining_ms = self.off_delay_remaining_ms.saturating_sub(delta_ms);
        if self.target_hz > 0 && self.off_delay_remaining_ms == 0 && self.error_code == 0 {
            self.outputting = true;
            self.on_ms = 0;
        }
    }

    /// Remaining restart protection (ms)
    pub fn off_delay_remaining_ms(&self) -> u32 {
        self.off_delay_remaining_ms
    }

    /// Speed command for the inverter; zero while the output is off
    pub fn command_hz(&self) -> u8 {
        if self.outputting {
            self.target_hz
        } else {
            0
        }
    }

    /// Drive the inverter enable line
    pub fn apply<P: OutputPin>(&self, enable: &mut P) -> Result<(), P::Error> {
        enable.set_state(self.outputting.into())
    }

    /// Drive the inverter speed input from [`command_hz`](Self::command_hz)
    ///
    /// Speeds above `max_hz` are clamped to full duty.
    pub fn apply_speed<S: SetDutyCycle>(&self, speed: &mut S) -> Result<(), S::Error> {
        let max = u16::from(self.config.max_hz.max(1));
        let hz = u16::from(self.command_hz()).min(max);
        speed.set_duty_cycle_fraction(hz, max)
    }
}

impl Compressor for BldcCompressor {
    fn set_target_hz(&mut self, hz: u8) {
        self.target_hz = hz;
        if hz == 0 {
            self.stop_output();
        }
    }

    fn target_hz(&self) -> u8 {
        self.target_hz
    }

    fn feedback(&self) -> CompressorFeedback {
        CompressorFeedback {
            outputting: self.outputting,
            confirmed_on: self.outputting
                && self.error_code == 0
                && self.on_ms >= self.config.confirm_ms,
            off_delay_elapsed: self.off_delay_remaining_ms == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockPin, MockPwm};

    fn quick() -> BldcConfig {
        BldcConfig {
            off_delay_ms: 1_000,
            confirm_ms: 300,
            max_hz: 100,
        }
    }

    fn run(c: &mut BldcCompressor, ms: u32) {
        for _ in 0..ms / 100 {
            c.update_with_delta(100);
        }
    }

    #[test]
    fn test_power_up_delay() {
        let mut c = BldcCompressor::new(quick());
        c.set_target_hz(65);
        assert!(!c.feedback().outputting);
        assert!(!c.feedback().off_delay_elapsed);

        run(&mut c, 900);
        assert!(!c.feedback().outputting);
        run(&mut c, 100);
        assert!(c.feedback().outputting);
        assert!(c.feedback().off_delay_elapsed);
        assert_eq!(c.command_hz(), 65);
    }

    #[test]
    fn test_confirmation_after_running() {
        let mut c = BldcCompressor::new(quick());
        c.set_target_hz(65);
        run(&mut c, 1_000);
        assert!(!c.feedback().confirmed_on);
        run(&mut c, 300);
        assert!(c.feedback().confirmed_on);
    }

    #[test]
    fn test_stop_rearms_off_delay() {
        let mut c = BldcCompressor::new(quick());
        c.set_target_hz(60);
        run(&mut c, 1_500);
        assert!(c.feedback().outputting);

        c.set_target_hz(0);
        let fb = c.feedback();
        assert!(!fb.outputting);
        assert!(!fb.confirmed_on);
        assert!(!fb.off_delay_elapsed);
        assert_eq!(c.off_delay_remaining_ms(), 1_000);

        // Restart is held until the delay runs out
        c.set_target_hz(60);
        run(&mut c, 500);
        assert!(!c.feedback().outputting);
        run(&mut c, 500);
        assert!(c.feedback().outputting);
    }

    #[test]
    fn test_speed_change_while_running() {
        let mut c = BldcCompressor::new(quick());
        c.set_target_hz(60);
        run(&mut c, 1_500);
        c.set_target_hz(47);
        assert!(c.feedback().confirmed_on);
        assert_eq!(c.command_hz(), 47);
    }

    #[test]
    fn test_inverter_error_stops_output() {
        let mut c = BldcCompressor::new(quick());
        c.set_target_hz(65);
        run(&mut c, 1_500);

        c.set_error_code(7);
        assert!(!c.feedback().outputting);
        assert_eq!(c.command_hz(), 0);

        // No restart while the error persists
        run(&mut c, 2_000);
        assert!(!c.feedback().outputting);

        c.set_error_code(0);
        run(&mut c, 100);
        assert!(c.feedback().outputting);
    }

    #[test]
    fn test_enable_pin_follows_output() {
        let mut c = BldcCompressor::new(quick());
        let mut enable = MockPin::default();
        c.set_target_hz(65);
        c.apply(&mut enable).unwrap();
        assert!(!enable.high);

        run(&mut c, 1_000);
        c.apply(&mut enable).unwrap();
        assert!(enable.high);
    }

    #[test]
    fn test_speed_output_follows_command() {
        let mut c = BldcCompressor::new(quick());
        let mut speed = MockPwm::new(1_000);
        c.set_target_hz(65);
        c.apply_speed(&mut speed).unwrap();
        // Held off by the restart delay
        assert_eq!(speed.duty, 0);

        run(&mut c, 1_000);
        c.apply_speed(&mut speed).unwrap();
        assert_eq!(speed.duty, 650);

        c.set_target_hz(47);
        c.apply_speed(&mut speed).unwrap();
        assert_eq!(speed.duty, 470);

        c.set_target_hz(0);
        c.apply_speed(&mut speed).unwrap();
        assert_eq!(speed.duty, 0);
    }

    #[test]
    fn test_speed_clamped_at_full_duty() {
        let mut c = BldcCompressor::new(quick());
        let mut speed = MockPwm::new(1_000);
        c.set_target_hz(140);
        run(&mut c, 1_000);
        c.apply_speed(&mut speed).unwrap();
        assert_eq!(speed.duty, 1_000);
    }
}
