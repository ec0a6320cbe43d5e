//! Cycle counters read by the diagnostic link

/// Counters mirrored out for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Telemetry {
    /// Freeze duration computed for the current cycle (ticks)
    pub planned_make_ticks: u32,
    /// Freeze ticks actually counted down
    pub make_ticks_run: u32,
    /// Defrost ticks counted down across all take-offs
    pub hot_gas_ticks_run: u32,
    /// Ticks spent filling the tray
    pub fill_ticks: u16,
    /// Last compressor speed requested (Hz)
    pub target_hz: u8,
    /// Completed cycles since power-up
    pub cycles_completed: u32,
}

impl Telemetry {
    /// All counters zero
    pub const EMPTY: Self = Self {
        planned_make_ticks: 0,
        make_ticks_run: 0,
        hot_gas_ticks_run: 0,
        fill_ticks: 0,
        target_hz: 0,
        cycles_completed: 0,
    };

    pub(crate) fn start_freeze(&mut self, ticks: u32) {
        self.planned_make_ticks = ticks;
        self.make_ticks_run = 0;
    }
}
