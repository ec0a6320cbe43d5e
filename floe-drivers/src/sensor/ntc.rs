//! NTC 10K ambient thermistor
//!
//! The front and side ambient sensors are 10K NTCs (B = 3435) on the low
//! side of a divider. Temperature comes from an integer lookup table with
//! linear interpolation.

use floe_core::traits::{SensorError, TemperatureSensor};

/// Resistance/temperature table, (ohms, temperature_x10)
///
/// Beta equation with R0 = 10,000 ohms at 25°C, B = 3435K.
/// Sorted by decreasing resistance.
const TEMP_TABLE: &[(u32, i16)] = &[
    (77_523, -200),
    (46_290, -100),
    (28_704, 0),
    (22_897, 50),
    (18_410, 100),
    (14_916, 150),
    (12_171, 200),
    (10_000, 250),
    (8_269, 300),
    (6_881, 350),
    (5_759, 400),
    (4_847, 450),
    (4_101, 500),
    (2_981, 600),
    (2_207, 700),
    (1_662, 800),
];

/// Counts this close to either rail are treated as a wiring fault
const RAIL_MARGIN: u16 = 10;

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read ADC value (12-bit, 0-4095)
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

/// NTC 10K thermistor behind a pull-up divider
///
/// Circuit: VCC -- pullup -- ADC_PIN -- NTC -- GND
pub struct NtcSensor<ADC> {
    adc: ADC,
    pullup_ohms: u32,
    adc_max: u16,
}

impl<ADC> NtcSensor<ADC> {
    /// Create a sensor with a 12-bit ADC
    pub fn new(adc: ADC, pullup_ohms: u32) -> Self {
        Self {
            adc,
            pullup_ohms,
            adc_max: 4096,
        }
    }

    /// Convert an ADC count to thermistor resistance
    ///
    /// `R_ntc = R_pullup * adc / (adc_max - adc)`
    pub fn adc_to_resistance(&self, adc_value: u16) -> Result<u32, SensorError> {
        if adc_value >= self.adc_max - RAIL_MARGIN {
            return Err(SensorError::OpenCircuit);
        }
        if adc_value < RAIL_MARGIN {
            return Err(SensorError::ShortCircuit);
        }

        let numerator = u64::from(self.pullup_ohms) * u64::from(adc_value);
        let denominator = u64::from(self.adc_max - adc_value);
        Ok((numerator / denominator) as u32)
    }

    /// Temperature in 0.1°C units for a thermistor resistance
    pub fn resistance_to_temp_x10(resistance: u32) -> Result<i16, SensorError> {
        let (coldest, _) = TEMP_TABLE[0];
        let (hottest, _) = TEMP_TABLE[TEMP_TABLE.len() - 1];
        if resistance > coldest || resistance < hottest {
            return Err(SensorError::OutOfRange);
        }

        for pair in TEMP_TABLE.windows(2) {
            let (r_high, t_low) = pair[0];
            let (r_low, t_high) = pair[1];

            if resistance <= r_high && resistance >= r_low {
                let r_range = (r_high - r_low) as i32;
                let t_range = i32::from(t_high - t_low);
                let r_offset = (r_high - resistance) as i32;
                return Ok(t_low + (t_range * r_offset / r_range) as i16);
            }
        }

        Err(SensorError::OutOfRange)
    }
}

impl<ADC: AdcReader> TemperatureSensor for NtcSensor<ADC> {
    fn read_celsius_x10(&mut self) -> Result<i16, SensorError> {
        let adc_value = self.adc.read().map_err(|_| SensorError::ConversionError)?;
        let resistance = self.adc_to_resistance(adc_value)?;
        Self::resistance_to_temp_x10(resistance)
    }
}

#[cfg(test)]
pub struct DummyAdc(pub Result<u16, ()>);

#[cfg(test)]
impl AdcReader for DummyAdc {
    fn read(&mut self) -> Result<u16, ()> {
        self.0
    }
}
