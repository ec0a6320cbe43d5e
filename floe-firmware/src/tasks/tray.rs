//! Tray motor task
//!
//! Applies engine commands to the tray motor, samples the reed switches
//! and publishes the sensed state. A latched fault is retried by lowering
//! the tray once the recovery backoff has elapsed.

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_time::{Duration, Ticker};

use floe_core::traits::TrayActuator;
use floe_core::tray::TrayCommand;
use floe_drivers::tray::{TrayMotor, TrayMotorConfig};

use crate::channels::{TrayStatus, TRAY_CMD, TRAY_STATUS};

/// Tray update interval
const TRAY_INTERVAL_MS: u64 = 50;

/// Wait after a fault before retrying the throw position (ms)
const RECOVERY_BACKOFF_MS: u32 = 10_000;

/// Pins owned by the tray task
pub struct TrayPins {
    pub up: Output<'static>,
    pub down: Output<'static>,
    /// Reed switch at the ice-making end, closed = low
    pub making_switch: Input<'static>,
    /// Reed switch at the ice-throw end, closed = low
    pub throw_switch: Input<'static>,
}

/// Tray task - drives the lift motor
#[embassy_executor::task]
pub async fn tray_task(mut pins: TrayPins) {
    info!("Tray task started");

    let mut tray = TrayMotor::new(TrayMotorConfig::default());
    let mut ticker = Ticker::every(Duration::from_millis(TRAY_INTERVAL_MS));
    let mut last = TrayStatus::default();
    let mut faulted_ms = 0u32;

    loop {
        tray.update_switches(pins.making_switch.is_low(), pins.throw_switch.is_low());

        if let Some(cmd) = TRAY_CMD.try_take() {
            if let Err(e) = tray.command(cmd) {
                warn!("Tray command {:?} refused: {:?}", cmd, e);
            }
        }

        tray.update_with_delta(TRAY_INTERVAL_MS as u32);

        if let Some(fault) = tray.fault() {
            if faulted_ms == 0 {
                warn!("Tray fault: {:?}", fault);
            }
            faulted_ms = faulted_ms.saturating_add(TRAY_INTERVAL_MS as u32);
            if faulted_ms >= RECOVERY_BACKOFF_MS {
                info!("Tray recovery: lowering");
                faulted_ms = 0;
                if let Err(e) = tray.command(TrayCommand::Down) {
                    warn!("Tray recovery refused: {:?}", e);
                }
            }
        } else {
            faulted_ms = 0;
        }

        // Output errors are Infallible on RP2040
        let _ = tray.apply(&mut pins.up, &mut pins.down);

        let status = TrayStatus {
            sense: tray.sense(),
            fault: tray.fault(),
        };
        if status.sense != last.sense || status.fault != last.fault {
            trace!("Tray: {:?}", status);
            last = status;
        }
        TRAY_STATUS.signal(status);

        ticker.next().await;
    }
}
