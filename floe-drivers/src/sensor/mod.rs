//! Temperature and bin-level sensor implementations

pub mod ir;
pub mod ntc;

pub use ir::{IrCheck, IrConfig};
pub use ntc::{AdcReader, NtcSensor};
