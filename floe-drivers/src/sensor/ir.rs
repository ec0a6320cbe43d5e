//! Bin-full infrared check
//!
//! The beam across the ice bin is sampled over a fixed window whenever a
//! check is requested. The check stays pending until the window closes;
//! the bin counts as full if the beam was blocked for at least
//! `full_percent` of the window. Falling ice only breaks the beam
//! briefly, so a single blocked sample never reads as full.

/// IR check configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrConfig {
    /// Sampling window per check (ms)
    pub window_ms: u32,
    /// Share of the window the beam must be blocked to report full
    pub full_percent: u8,
}

impl Default for IrConfig {
    fn default() -> Self {
        Self {
            window_ms: 2_000,
            full_percent: 80,
        }
    }
}

/// Bin-full check state
#[derive(Debug)]
pub struct IrCheck {
    config: IrConfig,
    pending: bool,
    elapsed_ms: u32,
    blocked_ms: u32,
    bin_full: bool,
}

impl IrCheck {
    /// Create a checker with no result yet; request a check before use
    pub fn new(config: IrConfig) -> Self {
        Self {
            config,
            pending: false,
            elapsed_ms: 0,
            blocked_ms: 0,
            bin_full: false,
        }
    }

    /// Start a new check window
    ///
    /// A request during a running window restarts it. The previous result
    /// stays readable until the new window closes.
    pub fn request(&mut self) {
        self.pending = true;
        self.elapsed_ms = 0;
        self.blocked_ms = 0;
    }

    /// Advance the window by `delta_ms` with the current beam state
    pub fn update_with_delta(&mut self, delta_ms: u32, beam_blocked: bool) {
        if !self.pending {
            return;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        if beam_blocked {
            self.blocked_ms = self.blocked_ms.saturating_add(delta_ms);
        }
        if self.elapsed_ms >= self.config.window_ms {
            let needed = u64::from(self.elapsed_ms) * u64::from(self.config.full_percent);
            self.bin_full = u64::from(self.blocked_ms) * 100 >= needed;
            self.pending = false;
        }
    }

    /// A requested check has not finished yet
    pub fn pending(&self) -> bool {
        self.pending
    }

    /// Result of the last finished check
    pub fn bin_full(&self) -> bool {
        self.bin_full
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(ir: &mut IrCheck, ms: u32, blocked: bool) {
        for _ in 0..ms / 100 {
            ir.update_with_delta(100, blocked);
        }
    }

    #[test]
    fn test_idle_until_requested() {
        let mut ir = IrCheck::new(IrConfig::default());
        run(&mut ir, 5_000, true);
        assert!(!ir.pending());
        assert!(!ir.bin_full());
    }

    #[test]
    fn test_pending_for_whole_window() {
        let mut ir = IrCheck::new(IrConfig::default());
        ir.request();
        run(&mut ir, 1_900, true);
        assert!(ir.pending());
        assert!(!ir.bin_full());

        run(&mut ir, 100, true);
        assert!(!ir.pending());
        assert!(ir.bin_full());
    }

    #[test]
    fn test_brief_blockage_is_not_full() {
        let mut ir = IrCheck::new(IrConfig::default());
        ir.request();
        run(&mut ir, 500, true);
        run(&mut ir, 1_500, false);
        assert!(!ir.pending());
        assert!(!ir.bin_full());
    }

    #[test]
    fn test_result_held_until_next_window_closes() {
        let mut ir = IrCheck::new(IrConfig::default());
        ir.request();
        run(&mut ir, 2_000, true);
        assert!(ir.bin_full());

        ir.request();
        run(&mut ir, 1_000, false);
        assert!(ir.pending());
        assert!(ir.bin_full());

        run(&mut ir, 1_000, false);
        assert!(!ir.pending());
        assert!(!ir.bin_full());
    }

    #[test]
    fn test_request_restarts_window() {
        let mut ir = IrCheck::new(IrConfig::default());
        ir.request();
        run(&mut ir, 1_500, false);
        ir.request();
        run(&mut ir, 1_500, true);
        assert!(ir.pending());
        run(&mut ir, 500, true);
        assert!(ir.bin_full());
    }

    proptest! {
        #[test]
        fn test_result_from_first_window(blocked in proptest::collection::vec(any::<bool>(), 20..60)) {
            let mut ir = IrCheck::new(IrConfig::default());
            ir.request();
            for b in &blocked {
                ir.update_with_delta(100, *b);
            }
            prop_assert!(!ir.pending());
            // Samples after the window closes are ignored
            let blocked_ms = blocked[..20].iter().filter(|b| **b).count() as u32 * 100;
            prop_assert_eq!(ir.bin_full(), blocked_ms * 100 >= 2_000 * 80);
        }
    }
}
