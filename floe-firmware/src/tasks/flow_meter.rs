//! Inlet flow meter pulse counter

use defmt::*;
use embassy_rp::gpio::Input;
use portable_atomic::Ordering;

use crate::channels::FILL_PULSES;

/// Flow meter task - counts rising edges into [`FILL_PULSES`]
#[embassy_executor::task]
pub async fn flow_meter_task(mut pin: Input<'static>) {
    info!("Flow meter task started");

    loop {
        pin.wait_for_rising_edge().await;
        FILL_PULSES.fetch_add(1, Ordering::Relaxed);
    }
}
