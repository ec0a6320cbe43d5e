//! Operator panel and cabinet switch task
//!
//! All inputs are switches to ground with pull-ups, so closed reads low.
//! The abort button is edge-triggered; everything else is sampled.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};

use floe_core::timing::IceSize;

use crate::channels::{PanelState, ABORT_REQUEST, PANEL_STATE};

/// Switch sample interval
const SAMPLE_INTERVAL_MS: u64 = 50;

/// Panel and cabinet inputs
pub struct PanelInputs {
    pub make_switch: Input<'static>,
    pub small_ice: Input<'static>,
    pub preheat: Input<'static>,
    pub ice_lever: Input<'static>,
    pub water_lever: Input<'static>,
    pub tank_cover: Input<'static>,
    /// IR bin-full sensor, blocked beam reads low
    pub bin_full: Input<'static>,
    pub abort_button: Input<'static>,
}

impl PanelInputs {
    fn sample(&self) -> PanelState {
        PanelState {
            make_enabled: self.make_switch.is_low(),
            ice_size: if self.small_ice.is_low() {
                IceSize::Small
            } else {
                IceSize::Large
            },
            start_with_preheat: self.preheat.is_low(),
            ice_dispensing: self.ice_lever.is_low(),
            water_dispensing: self.water_lever.is_low(),
            // Cover switch closes when the cover is seated
            tank_cover_open: self.tank_cover.is_high(),
            ir_blocked: self.bin_full.is_low(),
        }
    }
}

/// Panel task - publishes switch state and forwards abort presses
#[embassy_executor::task]
pub async fn panel_task(mut inputs: PanelInputs) {
    info!("Panel task started");

    let mut ticker = Ticker::every(Duration::from_millis(SAMPLE_INTERVAL_MS));
    let mut last = inputs.sample();
    PANEL_STATE.signal(last);

    loop {
        match select(ticker.next(), inputs.abort_button.wait_for_falling_edge()).await {
            Either::First(()) => {
                let state = inputs.sample();
                if state.make_enabled != last.make_enabled {
                    info!("Ice making {}", if state.make_enabled { "enabled" } else { "disabled" });
                }
                if state.tank_cover_open != last.tank_cover_open {
                    info!("Tank cover {}", if state.tank_cover_open { "open" } else { "closed" });
                }
                last = state;
                PANEL_STATE.signal(state);
            }
            Either::Second(()) => {
                info!("Abort pressed");
                ABORT_REQUEST.signal(());
            }
        }
    }
}
