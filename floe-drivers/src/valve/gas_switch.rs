//! Stepper-driven refrigerant gas switch
//!
//! A four-coil unipolar stepper rotates the valve between the ice route
//! (step 0) and the hot-gas route (`travel_steps`). There is no position
//! sensor; after power-up the valve is driven past the ice end against the
//! mechanical stop to establish the origin.
//!
//! The coils are half-stepped and released once the valve arrives.

use embedded_hal::digital::OutputPin;
use floe_core::refrigeration::{GasRoute, GasSwitchStatus};
use floe_core::traits::GasSwitch;

/// Half-step coil pattern, bit n = coil n
const HALF_STEP: [u8; 8] = [
    0b0001, 0b0011, 0b0010, 0b0110, 0b0100, 0b1100, 0b1000, 0b1001,
];

/// Gas switch configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GasSwitchConfig {
    /// Half-steps between the ice and hot-gas positions
    pub travel_steps: u16,
    /// Extra half-steps driven into the stop while homing
    pub homing_margin: u16,
    /// Time per half-step (ms)
    pub step_interval_ms: u32,
}

impl Default for GasSwitchConfig {
    fn default() -> Self {
        Self {
            travel_steps: 200,
            homing_margin: 40,
            step_interval_ms: 10,
        }
    }
}

/// Stepper gas-switch driver
#[derive(Debug)]
pub struct SteppedGasSwitch {
    config: GasSwitchConfig,
    /// Known position in half-steps; `None` until homed
    position: Option<u16>,
    target: Option<GasRoute>,
    homing_remaining: u16,
    phase: u8,
    elapsed_ms: u32,
    energized: bool,
}

impl SteppedGasSwitch {
    pub fn new(config: GasSwitchConfig) -> Self {
        Self {
            config,
            position: None,
            target: None,
            homing_remaining: 0,
            phase: 0,
            elapsed_ms: 0,
            energized: false,
        }
    }

    fn target_steps(&self, route: GasRoute) -> u16 {
        match route {
            GasRoute::Ice => 0,
            GasRoute::HotGas => self.config.travel_steps,
        }
    }

    /// Advance the stepper by `delta_ms`
    pub fn update_with_delta(&mut self, delta_ms: u32) {
        let Some(route) = self.target else {
            self.energized = false;
            return;
        };

        self.energized = true;
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        while self.elapsed_ms >= self.config.step_interval_ms {
            self.elapsed_ms -= self.config.step_interval_ms;
            if !self.step_toward(route) {
                self.target = None;
                self.energized = false;
                self.elapsed_ms = 0;
                break;
            }
        }
    }

    /// Take one half-step; returns false once the route is reached
    fn step_toward(&mut self, route: GasRoute) -> bool {
        let Some(position) = self.position else {
            // Homing: always toward the ice stop
            self.phase = self.phase.wrapping_sub(1) & 0x07;
            self.homing_remaining = self.homing_remaining.saturating_sub(1);
            if self.homing_remaining == 0 {
                self.position = Some(0);
            }
            return true;
        };

        let target = self.target_steps(route);
        if position == target {
            return false;
        }
        if position < target {
            self.phase = self.phase.wrapping_add(1) & 0x07;
            self.position = Some(position + 1);
        } else {
            self.phase = self.phase.wrapping_sub(1) & 0x07;
            self.position = Some(position - 1);
        }
        true
    }

    /// Current coil bit pattern; zero while released
    pub fn coil_pattern(&self) -> u8 {
        if self.energized {
            HALF_STEP[usize::from(self.phase)]
        } else {
            0
        }
    }

    pub fn is_homed(&self) -> bool {
        self.position.is_some()
    }

    /// Drive the four coil outputs
    pub fn apply<P: OutputPin>(&self, coils: &mut [P; 4]) -> Result<(), P::Error> {
        let pattern = self.coil_pattern();
        for (bit, coil) in coils.iter_mut().enumerate() {
            coil.set_state((pattern & (1 << bit) != 0).into())?;
        }
        Ok(())
    }
}

impl GasSwitch for SteppedGasSwitch {
    fn request(&mut self, route: GasRoute) {
        if self.target == Some(route) {
            return;
        }
        if self.position.is_none() && self.homing_remaining == 0 {
            self.homing_remaining = self.config.travel_steps + self.config.homing_margin;
        }
        self.target = Some(route);
    }

    fn status(&self) -> GasSwitchStatus {
        if self.target.is_some() {
            return GasSwitchStatus::Transitioning;
        }
        match self.position {
            Some(0) => GasSwitchStatus::Ice,
            Some(p) if p == self.config.travel_steps => GasSwitchStatus::HotGas,
            _ => GasSwitchStatus::Transitioning,
        }
    }
}
