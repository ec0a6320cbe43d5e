//! Ice-making process engine
//!
//! The engine is advanced exactly once per control tick. Each call takes a
//! snapshot of every input it needs ([`TickInputs`]) and returns the
//! commands for the actuators ([`Commands`]). Nothing in here blocks; a
//! state that is waiting for hardware simply stays put until a later tick.

pub mod cycle;
pub mod io;
pub mod report;
pub mod telemetry;

pub use cycle::{Engine, EngineFault};
pub use io::{Commands, TickInputs, TickOutput, Transition};
pub use report::{service, DiagError, DiagSnapshot, PlantStatus, Serviced};
pub use telemetry::Telemetry;
