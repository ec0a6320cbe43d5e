//! Gas-switch stepper task

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Ticker};

use floe_core::traits::GasSwitch;
use floe_drivers::valve::{GasSwitchConfig, SteppedGasSwitch};

use crate::channels::{GAS_CMD, GAS_STATUS};

/// Stepper update interval, one half-step per tick
const STEP_INTERVAL_MS: u64 = 10;

/// Gas switch task - steps the valve toward the requested route
#[embassy_executor::task]
pub async fn gas_switch_task(mut coils: [Output<'static>; 4]) {
    info!("Gas switch task started");

    let mut valve = SteppedGasSwitch::new(GasSwitchConfig {
        step_interval_ms: STEP_INTERVAL_MS as u32,
        ..Default::default()
    });
    let mut ticker = Ticker::every(Duration::from_millis(STEP_INTERVAL_MS));
    let mut last = valve.status();
    GAS_STATUS.signal(last);

    loop {
        if let Some(route) = GAS_CMD.try_take() {
            debug!("Gas switch -> {:?}", route);
            valve.request(route);
        }

        valve.update_with_delta(STEP_INTERVAL_MS as u32);
        let _ = valve.apply(&mut coils);

        let status = valve.status();
        if status != last {
            debug!("Gas switch at {:?} (homed: {})", status, valve.is_homed());
            last = status;
        }
        GAS_STATUS.signal(status);

        ticker.next().await;
    }
}
