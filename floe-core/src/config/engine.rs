//! Engine configuration
//!
//! Every field has a factory default matching the production appliance.
//! Durations are expressed in control ticks unless the name says otherwise.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Nominal control tick period
pub const DEFAULT_TICK_MS: u32 = 100;

/// Flow-meter pulses equivalent to one 200 cc tray fill
pub const TRAY_FILL_200CC_PULSES: u16 = 1100;

/// Tray fill volume represented by [`TRAY_FILL_200CC_PULSES`]
pub const TRAY_FILL_CC: u16 = 200;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Tick period must be non-zero
    ZeroTickPeriod,
    /// Fill target must be non-zero
    ZeroFillTarget,
    /// Small-ice percentage must be in 1..=100
    SmallIcePercent,
    /// Recovery threshold must be non-zero
    ZeroRecoveryThreshold,
    /// Feeder mix duration must be non-zero
    ZeroFeederMix,
}

/// Ice engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Control tick period (ms); band and table durations in seconds are
    /// converted to ticks of this length
    pub tick_ms: u32,
    /// Preheat is only considered below this resolved ambient (whole degrees)
    pub preheat_ambient_threshold: i16,
    /// Fill target in flow-meter pulses
    pub fill_target_pulses: u16,
    /// Remaining freeze ticks at or below which the hot-gas speed is applied
    pub noise_reduce_ticks: u32,
    /// Feeder mix duration after take-off
    pub feeder_mix_ticks: u16,
    /// Ticks away from the freeze position before the tray is nudged up
    pub tray_recovery_ticks: u16,
    /// Freeze duration percentage applied for small ice
    pub small_ice_percent: u8,
    /// Ticks an actuator may be polled before the cycle is abandoned.
    ///
    /// `None` polls forever.
    pub actuator_retry_limit: Option<u16>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            preheat_ambient_threshold: 25,
            fill_target_pulses: TRAY_FILL_200CC_PULSES,
            noise_reduce_ticks: 600,
            feeder_mix_ticks: 20,
            tray_recovery_ticks: 200,
            small_ice_percent: 90,
            actuator_retry_limit: None,
        }
    }
}

impl EngineConfig {
    /// Check the configuration for values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.fill_target_pulses == 0 {
            return Err(ConfigError::ZeroFillTarget);
        }
        if self.small_ice_percent == 0 || self.small_ice_percent > 100 {
            return Err(ConfigError::SmallIcePercent);
        }
        if self.tray_recovery_ticks == 0 {
            return Err(ConfigError::ZeroRecoveryThreshold);
        }
        if self.feeder_mix_ticks == 0 {
            return Err(ConfigError::ZeroFeederMix);
        }
        Ok(())
    }

    /// Convert a duration in seconds to ticks, saturating at `u16::MAX`
    pub fn secs_to_ticks(&self, secs: u16) -> u16 {
        let ticks = u32::from(secs) * 1000 / self.tick_ms.max(1);
        u16::try_from(ticks).unwrap_or(u16::MAX)
    }

    /// Convert a tick count to whole seconds
    pub fn ticks_to_secs(&self, ticks: u32) -> u32 {
        (u64::from(ticks) * u64::from(self.tick_ms) / 1000) as u32
    }

    /// Convert a fill counter in pulses to cubic centimetres
    pub fn pulses_to_cc(&self, pulses: u16) -> u16 {
        let cc = u32::from(pulses) * u32::from(TRAY_FILL_CC) / u32::from(self.fill_target_pulses.max(1));
        cc.min(u32::from(u16::MAX)) as u16
    }
}
