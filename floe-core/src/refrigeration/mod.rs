//! Compressor and gas-switch scheduling
//!
//! Pure band lookups from ambient temperature to compressor speed and to
//! preheat/defrost durations, plus the refrigerant routing vocabulary the
//! engine uses to talk to the gas-switch valve and compressor.

pub mod bands;
pub mod circuit;

pub use bands::{
    hot_gas_hz, hot_gas_secs, hot_gas_ticks, ice_hz, preheat_hz, preheat_secs, preheat_ticks,
    target_hz, RpsMode, PREHEAT_HZ, TICKS_PER_SECOND,
};
pub use circuit::{CompressorFeedback, GasRoute, GasSwitchStatus};
