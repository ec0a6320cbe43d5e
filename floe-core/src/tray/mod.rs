//! Ice tray motion and supervision
//!
//! The tray is raised into the freeze position, filled, frozen, then
//! lowered to throw the ice. This module holds the sensed tray state, the
//! recovery watchdog that nudges a tray that slipped out of the freeze
//! position, and the jam/abnormal-cycle fault counters.

pub mod faults;
pub mod position;
pub mod recovery;

pub use faults::TrayFaultLog;
pub use position::{TrayCommand, TrayLevel, TrayMotion, TraySense};
pub use recovery::TrayRecovery;
