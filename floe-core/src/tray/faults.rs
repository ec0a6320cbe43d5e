//! Tray jam and abnormal-cycle fault counters
//!
//! An external jam detector accumulates into these counters while the
//! tray misbehaves. They are cleared in exactly one place: when the tray
//! is confirmed back in the freeze position at the start of a fill.

/// Counters kept by the tray jam detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrayFaultLog {
    /// Extra defrost passes run to free a stuck tray
    pub dummy_heat: bool,
    /// Tray jam error latched
    pub error_latched: bool,
    /// Ticks spent in the abnormal-cycle handler
    pub abnormal_timer: u16,
    /// Step within the abnormal-cycle handler
    pub abnormal_step: u8,
    /// Consecutive abnormal cycles
    pub repeat_count: u8,
}

impl TrayFaultLog {
    /// Record one tick of abnormal tray behaviour
    pub fn tick_abnormal(&mut self) {
        self.abnormal_timer = self.abnormal_timer.saturating_add(1);
    }

    /// Record a repeated abnormal cycle
    pub fn note_repeat(&mut self) {
        self.repeat_count = self.repeat_count.saturating_add(1);
    }

    /// No fault has been recorded since the last clear
    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_every_counter() {
        let mut log = TrayFaultLog {
            dummy_heat: true,
            error_latched: true,
            abnormal_step: 3,
            ..Default::default()
        };
        log.tick_abnormal();
        log.note_repeat();
        assert!(!log.is_clear());

        log.clear();
        assert!(log.is_clear());
    }
}
