//! Ambient temperature band tables
//!
//! Each table is a list of `(inclusive upper bound, value)` pairs scanned
//! in order, with a final value for anything warmer than the last bound.
//! A reading equal to a bound belongs to that (lower) band. Bounds written
//! as "< n" in appliance documentation appear here as `n - 1`.
//!
//! These values are compliance data for the physical appliance and must
//! not be tuned.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Engine ticks per second at the nominal 100 ms tick
pub const TICKS_PER_SECOND: u16 = 10;

/// Compressor speed during preheat (Hz)
pub const PREHEAT_HZ: u8 = 60;

/// Ice-mode speed by front ambient
const ICE_HZ: Band<u8> = Band {
    edges: &[(10, 65), (20, 66), (25, 66), (30, 66)],
    above: 65,
};

/// Hot-gas speed by resolved ambient
const HOT_GAS_HZ: Band<u8> = Band {
    edges: &[(8, 50), (13, 50), (19, 50), (24, 47), (29, 47)],
    above: 43,
};

/// Hot-gas (defrost) duration in seconds by front ambient
const HOT_GAS_SECS: Band<u16> = Band {
    edges: &[(8, 765), (13, 600), (19, 180), (24, 30), (29, 20)],
    above: 15,
};

/// Preheat duration in seconds by resolved ambient
const PREHEAT_SECS: Band<u16> = Band {
    edges: &[(13, 600), (19, 360)],
    above: 360,
};

/// Compressor operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RpsMode {
    /// Freezing
    Ice,
    /// Defrost, and noise reduction near the end of a freeze
    HotGas,
    /// Optional low-ambient warm-up before a cycle
    Preheat,
}

struct Band<T: 'static> {
    edges: &'static [(i16, T)],
    above: T,
}

impl<T: Copy + 'static> Band<T> {
    const fn lookup(&self, temp: i16) -> T {
        let mut i = 0;
        while i < self.edges.len() {
            if temp <= self.edges[i].0 {
                return self.edges[i].1;
            }
            i += 1;
        }
        self.above
    }
}

/// Target compressor speed (Hz) for `mode` at `ambient`
///
/// The caller picks the ambient source: front for [`RpsMode::Ice`],
/// resolved for [`RpsMode::HotGas`]. Preheat ignores it.
pub const fn target_hz(mode: RpsMode, ambient: i16) -> u8 {
    match mode {
        RpsMode::Ice => ICE_HZ.lookup(ambient),
        RpsMode::HotGas => HOT_GAS_HZ.lookup(ambient),
        RpsMode::Preheat => PREHEAT_HZ,
    }
}

/// Ice-mode compressor speed by front ambient
pub const fn ice_hz(front_ambient: i16) -> u8 {
    target_hz(RpsMode::Ice, front_ambient)
}

/// Hot-gas compressor speed by resolved ambient
pub const fn hot_gas_hz(resolved_ambient: i16) -> u8 {
    target_hz(RpsMode::HotGas, resolved_ambient)
}

/// Preheat compressor speed
pub const fn preheat_hz() -> u8 {
    PREHEAT_HZ
}

/// Defrost duration in seconds by front ambient
pub const fn hot_gas_secs(front_ambient: i16) -> u16 {
    HOT_GAS_SECS.lookup(front_ambient)
}

/// Preheat duration in seconds by resolved ambient
pub const fn preheat_secs(resolved_ambient: i16) -> u16 {
    PREHEAT_SECS.lookup(resolved_ambient)
}

/// Defrost duration in ticks at the nominal tick
pub const fn hot_gas_ticks(front_ambient: i16) -> u16 {
    hot_gas_secs(front_ambient) * TICKS_PER_SECOND
}

/// Preheat duration in ticks at the nominal tick
pub const fn preheat_ticks(resolved_ambient: i16) -> u16 {
    preheat_secs(resolved_ambient) * TICKS_PER_SECOND
}
