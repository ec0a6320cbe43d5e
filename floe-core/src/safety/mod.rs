//! Interlock and abort handling
//!
//! Interlocks are checked before any state logic and always win. Operator
//! abort is softer: its effect depends on how far the cycle has gone.

pub mod abort;
pub mod interlock;

pub use abort::{abort_rule, AbortOutcome};
pub use interlock::{check, ForcedReset, Interlocks, ResetReason};
