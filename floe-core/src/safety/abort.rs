//! Operator abort rules

use crate::state::IceCycleState;

/// Effect of an operator abort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AbortOutcome {
    /// Initialization restarts from its first step
    ReArmInit,
    /// Tray lowered, cycle jumps to `Finish`
    TrayDownAndFinish,
    /// Remaining freeze time dropped; the defrost tail still runs
    FreezeCancelled,
    /// Nothing to abort, or unsafe to interrupt
    NoEffect,
}

/// Decide what an operator abort does in `state`
///
/// Tray descent and defrost are never interrupted.
pub fn abort_rule(state: IceCycleState, initializing: bool) -> AbortOutcome {
    if initializing {
        return AbortOutcome::ReArmInit;
    }

    if state.is_pre_freeze() {
        AbortOutcome::TrayDownAndFinish
    } else if state == IceCycleState::MainMaking {
        AbortOutcome::FreezeCancelled
    } else {
        AbortOutcome::NoEffect
    }
}
