//! Board-agnostic core logic for the ice/water appliance firmware
//!
//! This crate contains the ice-making process engine and everything it
//! consults, with no dependency on specific hardware:
//!
//! - Ambient temperature arbitration across redundant sensors
//! - Compressor speed and gas-switch band scheduling
//! - Freeze-duration timing table
//! - Tray motion and recovery supervision
//! - Interlock and operator-abort handling
//! - The ice cycle state machine and its per-tick engine
//! - Hardware abstraction traits implemented by the drivers crate

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod ambient;
pub mod config;
pub mod engine;
pub mod refrigeration;
pub mod safety;
pub mod state;
pub mod timing;
pub mod traits;
pub mod tray;
