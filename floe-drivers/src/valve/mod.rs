//! Refrigerant gas-switch valve

pub mod gas_switch;

pub use gas_switch::{GasSwitchConfig, SteppedGasSwitch};
