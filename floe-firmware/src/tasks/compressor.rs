//! Compressor task
//!
//! Owns the inverter enable line, its PWM speed input and the
//! restart-protection timer.

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_rp::pwm::PwmOutput;
use embassy_time::{Duration, Ticker};

use floe_core::traits::Compressor;
use floe_drivers::compressor::{BldcCompressor, BldcConfig};

use crate::channels::{CompressorStatus, COMPRESSOR_HZ, COMPRESSOR_STATUS};
use super::tick::TICK_INTERVAL_MS;

/// Inverter error code latched while the fault line is asserted
const INVERTER_FAULT_CODE: u8 = 1;

/// Pins owned by the compressor task
pub struct CompressorPins {
    pub enable: Output<'static>,
    /// Inverter speed input, full duty at the driver's `max_hz`
    pub speed: PwmOutput<'static>,
    /// Inverter fault output, asserted low
    pub fault: Input<'static>,
}

/// Compressor task - applies the engine's speed target
#[embassy_executor::task]
pub async fn compressor_task(mut pins: CompressorPins) {
    info!("Compressor task started");

    let mut compressor = BldcCompressor::new(BldcConfig::default());
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(TICK_INTERVAL_MS)));
    let mut last_hz = 0u8;

    loop {
        if let Some(hz) = COMPRESSOR_HZ.try_take() {
            compressor.set_target_hz(hz);
        }

        let code = if pins.fault.is_low() { INVERTER_FAULT_CODE } else { 0 };
        if code != compressor.error_code() {
            if code != 0 {
                warn!("Inverter fault");
            } else {
                info!("Inverter fault cleared");
            }
            compressor.set_error_code(code);
        }

        compressor.update_with_delta(TICK_INTERVAL_MS);
        let _ = compressor.apply(&mut pins.enable);

        let hz = compressor.command_hz();
        if hz != last_hz {
            debug!("Compressor output {} Hz", hz);
            if compressor.apply_speed(&mut pins.speed).is_err() {
                warn!("Compressor speed output rejected {} Hz", hz);
            }
            last_hz = hz;
        }

        let off_delay_ticks = compressor.off_delay_remaining_ms() / TICK_INTERVAL_MS;
        COMPRESSOR_STATUS.signal(CompressorStatus {
            feedback: compressor.feedback(),
            off_delay_ticks: u16::try_from(off_delay_ticks).unwrap_or(u16::MAX),
            error_code: compressor.error_code(),
        });

        ticker.next().await;
    }
}
