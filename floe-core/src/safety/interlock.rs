//! Interlock evaluation

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interlock and go/no-go flags sampled once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interlocks {
    /// Appliance operation switched off
    pub operation_disabled: bool,
    /// Ice jam / safety routine running
    pub safety_routine_active: bool,
    /// Both tray position switches asserted at once
    pub dual_tray_motor_fault: bool,
    /// Water line sterilization in progress
    pub water_line_clean_in_progress: bool,
    /// Boot or forced re-initialization requested
    pub init_in_progress: bool,
    /// Operator allows ice making
    pub make_enabled: bool,
}

/// Why a cycle was forced back to standby
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResetReason {
    OperationDisabled,
    SafetyRoutine,
    DualTrayMotorFault,
    WaterLineClean,
}

/// Forced transition to standby
///
/// Applying it clears the defrost heater and the init step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForcedReset {
    pub reason: ResetReason,
}

/// Check the disabling interlocks
///
/// Returns the first one tripped, in priority order.
pub fn check(interlocks: &Interlocks) -> Option<ForcedReset> {
    let reason = if interlocks.operation_disabled {
        ResetReason::OperationDisabled
    } else if interlocks.safety_routine_active {
        ResetReason::SafetyRoutine
    } else if interlocks.dual_tray_motor_fault {
        ResetReason::DualTrayMotorFault
    } else if interlocks.water_line_clean_in_progress {
        ResetReason::WaterLineClean
    } else {
        return None;
    };
    Some(ForcedReset { reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_interlocks_pass() {
        let interlocks = Interlocks {
            make_enabled: true,
            ..Default::default()
        };
        assert_eq!(check(&interlocks), None);
    }

    #[test]
    fn test_each_interlock_trips() {
        let cases = [
            (
                Interlocks {
                    operation_disabled: true,
                    ..Default::default()
                },
                ResetReason::OperationDisabled,
            ),
            (
                Interlocks {
                    safety_routine_active: true,
                    ..Default::default()
                },
                ResetReason::SafetyRoutine,
            ),
            (
                Interlocks {
                    dual_tray_motor_fault: true,
                    ..Default::default()
                },
                ResetReason::DualTrayMotorFault,
            ),
            (
                Interlocks {
                    water_line_clean_in_progress: true,
                    ..Default::default()
                },
                ResetReason::WaterLineClean,
            ),
        ];
        for (interlocks, reason) in cases {
            assert_eq!(check(&interlocks), Some(ForcedReset { reason }));
        }
    }

    #[test]
    fn test_init_and_make_flags_do_not_trip() {
        let interlocks = Interlocks {
            init_in_progress: true,
            make_enabled: false,
            ..Default::default()
        };
        assert_eq!(check(&interlocks), None);
    }

    #[test]
    fn test_operation_disabled_has_priority() {
        let interlocks = Interlocks {
            operation_disabled: true,
            safety_routine_active: true,
            water_line_clean_in_progress: true,
            ..Default::default()
        };
        assert_eq!(
            check(&interlocks).map(|r| r.reason),
            Some(ResetReason::OperationDisabled)
        );
    }
}
