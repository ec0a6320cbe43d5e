//! Ambient temperature arbitration
//!
//! Two redundant thermistors watch the air around the appliance. The
//! arbiter turns them into one trusted reading, degrading gracefully when
//! either sensor faults.

pub mod arbiter;

pub use arbiter::{resolve, AmbientReading, Arbitration, FALLBACK_AMBIENT};
