//! Ice cycle states
//!
//! [`IceCycleState`] is the flat, numbered state exposed to telemetry.
//! [`Phase`] is the engine's working state: the same states, each carrying
//! only the counters that matter while it is current.

pub mod cycle;
pub mod phase;

pub use cycle::{IceCycleState, INIT_STEP};
pub use phase::Phase;
