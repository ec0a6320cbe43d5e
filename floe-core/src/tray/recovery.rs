//! Tray recovery watchdog
//!
//! During the freeze the tray must stay against the evaporator. If it is
//! sensed anywhere else for long enough, the supervisor re-issues a single
//! up command and starts counting again.

use super::position::{TrayCommand, TrayLevel};

/// Recovery counter for a tray that slipped out of the freeze position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrayRecovery {
    counter: u16,
    threshold: u16,
}

impl TrayRecovery {
    /// Create a supervisor that nudges after `threshold` ticks
    pub const fn new(threshold: u16) -> Self {
        Self {
            counter: 0,
            threshold,
        }
    }

    /// Run one tick
    ///
    /// The counter only advances while the tray is away from the freeze
    /// position and no safety routine is running; a safety routine or
    /// arrival at the freeze position resets it.
    pub fn recover(&mut self, level: TrayLevel, safety_active: bool) -> Option<TrayCommand> {
        if level == TrayLevel::AtIceMaking {
            self.counter = 0;
            return None;
        }

        if safety_active {
            self.counter = 0;
            return None;
        }

        self.counter = self.counter.saturating_add(1);
        if self.counter >= self.threshold {
            self.counter = 0;
            return Some(TrayCommand::Up);
        }
        None
    }

    /// Ticks counted toward the next nudge
    pub fn counter(&self) -> u16 {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_nudge_after_threshold() {
        let mut recovery = TrayRecovery::new(200);
        let mut commands = 0;
        for tick in 1..=200 {
            if let Some(cmd) = recovery.recover(TrayLevel::InTransit, false) {
                assert_eq!(cmd, TrayCommand::Up);
                assert_eq!(tick, 200);
                commands += 1;
            }
        }
        assert_eq!(commands, 1);
        assert_eq!(recovery.counter(), 0);
    }

    #[test]
    fn test_nudges_repeat_every_threshold() {
        let mut recovery = TrayRecovery::new(200);
        let commands = (0..600)
            .filter(|_| recovery.recover(TrayLevel::AtIceThrow, false).is_some())
            .count();
        assert_eq!(commands, 3);
    }

    #[test]
    fn test_safety_routine_resets_counter() {
        let mut recovery = TrayRecovery::new(200);
        for _ in 0..150 {
            assert!(recovery.recover(TrayLevel::InTransit, false).is_none());
        }
        assert!(recovery.recover(TrayLevel::InTransit, true).is_none());
        assert_eq!(recovery.counter(), 0);

        for _ in 0..199 {
            assert!(recovery.recover(TrayLevel::InTransit, false).is_none());
        }
        assert!(recovery.recover(TrayLevel::InTransit, false).is_some());
    }

    #[test]
    fn test_freeze_position_holds_counter_at_zero() {
        let mut recovery = TrayRecovery::new(200);
        for _ in 0..50 {
            recovery.recover(TrayLevel::InTransit, false);
        }
        for _ in 0..1000 {
            assert!(recovery.recover(TrayLevel::AtIceMaking, false).is_none());
            assert_eq!(recovery.counter(), 0);
        }
    }
}
