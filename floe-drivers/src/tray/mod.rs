//! Ice tray lift motor

pub mod motor;

pub use motor::{TrayMotor, TrayMotorConfig};
