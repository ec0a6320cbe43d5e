//! Tray position sensing and motor commands

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Level reported by the tray position switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TrayLevel {
    /// Raised against the evaporator, ready to fill and freeze
    AtIceMaking,
    /// Lowered, ice released into the bin
    AtIceThrow,
    /// Between the two switches
    #[default]
    InTransit,
}

impl TrayLevel {
    /// Diagnostic position code (0 making, 1 throw, 2 moving)
    pub fn code(self) -> u8 {
        match self {
            TrayLevel::AtIceMaking => 0,
            TrayLevel::AtIceThrow => 1,
            TrayLevel::InTransit => 2,
        }
    }
}

/// Tray motor direction
///
/// A single enum, so the motor can never be driven up and down at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TrayMotion {
    #[default]
    Idle,
    MovingUp,
    MovingDown,
}

/// Tray state sampled once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraySense {
    pub level: TrayLevel,
    pub motion: TrayMotion,
}

impl TraySense {
    pub const fn new(level: TrayLevel, motion: TrayMotion) -> Self {
        Self { level, motion }
    }

    /// Parked in the freeze position
    pub fn settled_up(&self) -> bool {
        self.level == TrayLevel::AtIceMaking && self.motion != TrayMotion::MovingUp
    }

    /// Parked in the throw position
    pub fn settled_down(&self) -> bool {
        self.level == TrayLevel::AtIceThrow && self.motion != TrayMotion::MovingDown
    }
}

/// Tray motor command issued by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TrayCommand {
    /// Raise to the freeze position
    Up,
    /// Lower to the throw position
    Down,
}
