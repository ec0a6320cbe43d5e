//! Configuration types
//!
//! Tunable engine parameters. Band tables and compressor speeds are fixed
//! appliance data and live with the scheduler instead.

pub mod engine;

pub use engine::*;
