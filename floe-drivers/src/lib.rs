//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the actuator and sensor
//! traits defined in floe-core:
//!
//! - Gas-switch valve (unipolar stepper, four coils)
//! - Tray lift motor (up/down outputs, reed switch position sensing)
//! - BLDC compressor output, speed command and restart-delay tracking
//! - Ambient temperature sensors (NTC thermistor)
//! - Bin-full infrared check
//!
//! Drivers are plain state machines advanced by `update_with_delta`; the
//! firmware copies their pin states out to `embedded_hal` outputs.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod compressor;
pub mod sensor;
pub mod tray;
pub mod valve;

#[cfg(test)]
pub(crate) mod mock;
