//! Temperature sensor trait

/// Errors that can occur with temperature sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Sensor disconnected (open circuit)
    OpenCircuit,
    /// Sensor shorted to ground
    ShortCircuit,
    /// Reading out of expected range
    OutOfRange,
    /// ADC conversion error
    ConversionError,
}

/// Trait for temperature sensors
pub trait TemperatureSensor {
    /// Read the current temperature in 0.1°C units
    ///
    /// Takes `&mut self` because ADC reads typically require mutable access.
    fn read_celsius_x10(&mut self) -> Result<i16, SensorError>;

    /// Read the current temperature in whole degrees, rounded to nearest
    fn read_celsius(&mut self) -> Result<i16, SensorError> {
        self.read_celsius_x10().map(|t| {
            if t >= 0 {
                (t + 5) / 10
            } else {
                (t - 5) / 10
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<i16, SensorError>);

    impl TemperatureSensor for Fixed {
        fn read_celsius_x10(&mut self) -> Result<i16, SensorError> {
            self.0
        }
    }

    #[test]
    fn test_whole_degrees_round_to_nearest() {
        assert_eq!(Fixed(Ok(254)).read_celsius(), Ok(25));
        assert_eq!(Fixed(Ok(255)).read_celsius(), Ok(26));
        assert_eq!(Fixed(Ok(-14)).read_celsius(), Ok(-1));
        assert_eq!(Fixed(Ok(-16)).read_celsius(), Ok(-2));
    }

    #[test]
    fn test_error_passes_through() {
        assert_eq!(
            Fixed(Err(SensorError::OpenCircuit)).read_celsius(),
            Err(SensorError::OpenCircuit)
        );
    }
}
