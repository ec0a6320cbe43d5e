//! Temperature sensing task
//!
//! Samples the two ambient thermistors and the inlet water thermistor and
//! publishes them as one [`AmbientReading`]. Faulted ambient sensors are
//! flagged for arbitration; a faulted inlet sensor keeps its last value.

use defmt::*;
use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_time::{Duration, Ticker};

use floe_core::ambient::AmbientReading;
use floe_core::traits::{SensorError, TemperatureSensor};
use floe_drivers::sensor::{AdcReader, NtcSensor};

use crate::channels::AMBIENT_READING;

/// Sample interval
const SAMPLE_INTERVAL_MS: u64 = 500;

/// Divider pull-up on every thermistor input (ohms)
const PULLUP_OHMS: u32 = 10_000;

/// Thermistor ADC inputs
pub struct SensorChannels {
    pub front: Channel<'static>,
    pub side: Channel<'static>,
    pub room: Channel<'static>,
}

/// One ADC channel borrowed for a single conversion
struct ChannelReader<'a> {
    adc: &'a mut Adc<'static, Blocking>,
    channel: &'a mut Channel<'static>,
}

impl AdcReader for ChannelReader<'_> {
    fn read(&mut self) -> Result<u16, ()> {
        self.adc.blocking_read(self.channel).map_err(|_| ())
    }
}

fn sample(
    adc: &mut Adc<'static, Blocking>,
    channel: &mut Channel<'static>,
) -> Result<i16, SensorError> {
    NtcSensor::new(ChannelReader { adc, channel }, PULLUP_OHMS).read_celsius()
}

/// Sensors task - publishes temperatures every sample interval
#[embassy_executor::task]
pub async fn sensors_task(mut adc: Adc<'static, Blocking>, mut channels: SensorChannels) {
    info!("Sensors task started");

    let mut ticker = Ticker::every(Duration::from_millis(SAMPLE_INTERVAL_MS));
    let mut reading = AmbientReading::default();
    let mut room_fault = false;

    loop {
        match sample(&mut adc, &mut channels.front) {
            Ok(t) => {
                reading.front_temp = t;
                reading.front_fault = false;
            }
            Err(e) => {
                if !reading.front_fault {
                    warn!("Front ambient sensor: {:?}", e);
                }
                reading.front_fault = true;
            }
        }

        match sample(&mut adc, &mut channels.side) {
            Ok(t) => {
                reading.side_temp = t;
                reading.side_fault = false;
            }
            Err(e) => {
                if !reading.side_fault {
                    warn!("Side ambient sensor: {:?}", e);
                }
                reading.side_fault = true;
            }
        }

        match sample(&mut adc, &mut channels.room) {
            Ok(t) => {
                reading.room_temp = t;
                room_fault = false;
            }
            Err(e) => {
                if !room_fault {
                    warn!("Inlet water sensor: {:?}", e);
                }
                room_fault = true;
            }
        }

        trace!(
            "Temps: front={} side={} room={}",
            reading.front_temp,
            reading.side_temp,
            reading.room_temp
        );
        AMBIENT_READING.signal(reading);

        ticker.next().await;
    }
}
