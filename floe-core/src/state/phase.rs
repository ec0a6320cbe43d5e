//! Engine working state
//!
//! Countdown and counter fields exist only on the variant that uses them,
//! so two timers can never be live at once.

use super::cycle::IceCycleState;
use crate::tray::TrayRecovery;

/// Current ice cycle state with its per-state data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    #[default]
    Standby,
    PreheatGasMove,
    PreheatCalcTime,
    PreheatRun {
        /// Preheat ticks left
        remaining: u16,
    },
    TrayUp,
    WaitWaterFull,
    ContGasMove,
    ContRpsSet,
    CheckTrayFillReady,
    FillWater {
        /// Flow-meter pulses still to fill
        remaining: u16,
    },
    IceGasMove,
    CalcMakeTime,
    MainMaking {
        /// Freeze ticks left
        remaining: u32,
        /// Watchdog for a tray that leaves the freeze position
        recovery: TrayRecovery,
    },
    TrayDown,
    HotGasMove,
    CalcHotGasTime,
    TakeOff {
        /// Defrost ticks left
        remaining: u16,
    },
    FeederMix {
        /// Ticks the feeder has mixed
        elapsed: u16,
    },
    FullIrCheck,
    Finish,
}

impl Phase {
    /// The numbered state this phase belongs to
    pub fn state(&self) -> IceCycleState {
        match self {
            Phase::Standby => IceCycleState::Standby,
            Phase::PreheatGasMove => IceCycleState::PreheatGasMove,
            Phase::PreheatCalcTime => IceCycleState::PreheatCalcTime,
            Phase::PreheatRun { .. } => IceCycleState::PreheatRun,
            Phase::TrayUp => IceCycleState::TrayUp,
            Phase::WaitWaterFull => IceCycleState::WaitWaterFull,
            Phase::ContGasMove => IceCycleState::ContGasMove,
            Phase::ContRpsSet => IceCycleState::ContRpsSet,
            Phase::CheckTrayFillReady => IceCycleState::CheckTrayFillReady,
            Phase::FillWater { .. } => IceCycleState::FillWater,
            Phase::IceGasMove => IceCycleState::IceGasMove,
            Phase::CalcMakeTime => IceCycleState::CalcMakeTime,
            Phase::MainMaking { .. } => IceCycleState::MainMaking,
            Phase::TrayDown => IceCycleState::TrayDown,
            Phase::HotGasMove => IceCycleState::HotGasMove,
            Phase::CalcHotGasTime => IceCycleState::CalcHotGasTime,
            Phase::TakeOff { .. } => IceCycleState::TakeOff,
            Phase::FeederMix { .. } => IceCycleState::FeederMix,
            Phase::FullIrCheck => IceCycleState::FullIrCheck,
            Phase::Finish => IceCycleState::Finish,
        }
    }

    /// Enter `state` with all of its counters at zero
    pub fn entry(state: IceCycleState, recovery_threshold: u16) -> Self {
        match state {
            IceCycleState::Standby => Phase::Standby,
            IceCycleState::PreheatGasMove => Phase::PreheatGasMove,
            IceCycleState::PreheatCalcTime => Phase::PreheatCalcTime,
            IceCycleState::PreheatRun => Phase::PreheatRun { remaining: 0 },
            IceCycleState::TrayUp => Phase::TrayUp,
            IceCycleState::WaitWaterFull => Phase::WaitWaterFull,
            IceCycleState::ContGasMove => Phase::ContGasMove,
            IceCycleState::ContRpsSet => Phase::ContRpsSet,
            IceCycleState::CheckTrayFillReady => Phase::CheckTrayFillReady,
            IceCycleState::FillWater => Phase::FillWater { remaining: 0 },
            IceCycleState::IceGasMove => Phase::IceGasMove,
            IceCycleState::CalcMakeTime => Phase::CalcMakeTime,
            IceCycleState::MainMaking => Phase::MainMaking {
                remaining: 0,
                recovery: TrayRecovery::new(recovery_threshold),
            },
            IceCycleState::TrayDown => Phase::TrayDown,
            IceCycleState::HotGasMove => Phase::HotGasMove,
            IceCycleState::CalcHotGasTime => Phase::CalcHotGasTime,
            IceCycleState::TakeOff => Phase::TakeOff { remaining: 0 },
            IceCycleState::FeederMix => Phase::FeederMix { elapsed: 0 },
            IceCycleState::FullIrCheck => Phase::FullIrCheck,
            IceCycleState::Finish => Phase::Finish,
        }
    }

    /// Freeze ticks left, zero outside the freeze
    pub fn make_time_remaining(&self) -> u32 {
        match self {
            Phase::MainMaking { remaining, .. } => *remaining,
            _ => 0,
        }
    }

    /// Defrost ticks left, zero outside take-off
    pub fn defrost_time_remaining(&self) -> u16 {
        match self {
            Phase::TakeOff { remaining } => *remaining,
            _ => 0,
        }
    }

    /// Preheat ticks left, zero outside preheat
    pub fn preheat_time_remaining(&self) -> u16 {
        match self {
            Phase::PreheatRun { remaining } => *remaining,
            _ => 0,
        }
    }

    /// Fill pulses left, zero outside the fill
    pub fn fill_remaining(&self) -> u16 {
        match self {
            Phase::FillWater { remaining } => *remaining,
            _ => 0,
        }
    }

    /// Feeder mix ticks elapsed, zero outside the mix
    pub fn feeder_mix_elapsed(&self) -> u16 {
        match self {
            Phase::FeederMix { elapsed } => *elapsed,
            _ => 0,
        }
    }

    /// Tray recovery counter, zero outside the freeze
    pub fn tray_recovery_counter(&self) -> u16 {
        match self {
            Phase::MainMaking { recovery, .. } => recovery.counter(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_matches_state() {
        for state in IceCycleState::ALL {
            assert_eq!(Phase::entry(state, 200).state(), state);
        }
    }

    #[test]
    fn test_timers_zero_outside_owner() {
        let phase = Phase::TakeOff { remaining: 42 };
        assert_eq!(phase.defrost_time_remaining(), 42);
        assert_eq!(phase.make_time_remaining(), 0);
        assert_eq!(phase.preheat_time_remaining(), 0);
        assert_eq!(phase.fill_remaining(), 0);
    }
}
