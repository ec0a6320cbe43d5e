//! Fault-aware selection between the front and side ambient sensors

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reading used when both ambient sensors are faulted (whole degrees)
pub const FALLBACK_AMBIENT: i16 = 25;

/// How to combine two healthy readings
///
/// The ice engine arbitrates with [`Arbitration::Small`]; the cold-water
/// display arbitrates with [`Arbitration::Large`]. Both exist because the
/// consumers want opposite biases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Arbitration {
    /// Take the cooler of the two readings
    #[default]
    Small,
    /// Take the warmer of the two readings
    Large,
}

/// One tick's worth of temperature inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AmbientReading {
    /// Front-panel ambient sensor (whole degrees)
    pub front_temp: i16,
    /// Side ambient sensor (whole degrees)
    pub side_temp: i16,
    /// Front sensor reports open/short
    pub front_fault: bool,
    /// Side sensor reports open/short
    pub side_fault: bool,
    /// Inlet (room) water temperature (whole degrees)
    pub room_temp: i16,
}

impl AmbientReading {
    /// Resolve this reading with the given arbitration variant
    pub fn resolved(&self, variant: Arbitration) -> i16 {
        resolve(
            self.front_temp,
            self.side_temp,
            self.front_fault,
            self.side_fault,
            variant,
        )
    }
}

/// Resolve a single ambient temperature from two redundant sensors
///
/// Priority order:
/// 1. both faulted: [`FALLBACK_AMBIENT`]
/// 2. side faulted: front reading
/// 3. front faulted: side reading
/// 4. otherwise min (`Small`) or max (`Large`) of the two
pub fn resolve(
    front: i16,
    side: i16,
    front_fault: bool,
    side_fault: bool,
    variant: Arbitration,
) -> i16 {
    match (front_fault, side_fault) {
        (true, true) => FALLBACK_AMBIENT,
        (false, true) => front,
        (true, false) => side,
        (false, false) => match variant {
            Arbitration::Small => front.min(side),
            Arbitration::Large => front.max(side),
        },
    }
}
