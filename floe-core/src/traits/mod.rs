//! Hardware abstraction traits
//!
//! These traits define the interface between the ice engine and the
//! hardware-specific drivers.

pub mod actuator;
pub mod sensor;

pub use actuator::{Compressor, GasSwitch, TrayActuator, TrayMotorError};
pub use sensor::{SensorError, TemperatureSensor};
