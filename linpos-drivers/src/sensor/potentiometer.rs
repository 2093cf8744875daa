//! Potentiometer position feedback
//!
//! The actuator's built-in potentiometer is read on an ADC channel and
//! mapped to a stroke percentage through a [`CalibrationTable`].
//!
//! Optionally a plausibility window can be set: raw readings outside it
//! (e.g. a broken wiper pulling the input to a rail) are reported as
//! [`SensorError::OutOfRange`] instead of being clamped into range.

use linpos_core::calibration::CalibrationTable;
use linpos_core::traits::{PositionSensor, SensorError};

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read a raw ADC value
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

/// Potentiometer on an ADC channel
pub struct Potentiometer<ADC> {
    adc: ADC,
    calibration: CalibrationTable,
    /// Plausible raw range, inclusive
    valid: Option<(u16, u16)>,
    last_raw: Option<u16>,
}

impl<ADC> Potentiometer<ADC> {
    /// Create a new potentiometer sensor
    pub fn new(adc: ADC, calibration: CalibrationTable) -> Self {
        Self {
            adc,
            calibration,
            valid: None,
            last_raw: None,
        }
    }

    /// Treat raw readings outside `[min, max]` as a sensor fault
    pub fn with_valid_range(mut self, min: u16, max: u16) -> Self {
        self.valid = Some((min, max));
        self
    }

    /// Most recent raw reading, if any
    pub fn last_raw(&self) -> Option<u16> {
        self.last_raw
    }

    pub fn calibration(&self) -> &CalibrationTable {
        &self.calibration
    }
}

impl<ADC: AdcReader> PositionSensor for Potentiometer<ADC> {
    fn read_percent(&mut self) -> Result<f32, SensorError> {
        let raw = self
            .adc
            .read()
            .map_err(|_| SensorError::ConversionError)?;
        self.last_raw = Some(raw);

        if let Some((min, max)) = self.valid {
            if raw < min || raw > max {
                return Err(SensorError::OutOfRange);
            }
        }

        Ok(self.calibration.to_percent(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DummyAdc(Result<u16, ()>);

    impl AdcReader for DummyAdc {
        fn read(&mut self) -> Result<u16, ()> {
            self.0
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        let d = a - b;
        d < 1e-3 && d > -1e-3
    }

    fn pot(raw: u16) -> Potentiometer<DummyAdc> {
        let table = CalibrationTable::linear(59, 217).unwrap();
        Potentiometer::new(DummyAdc(Ok(raw)), table)
    }

    #[test]
    fn test_maps_through_calibration() {
        let mut sensor = pot(138);
        assert!(approx(sensor.read_percent().unwrap(), 50.0));
        assert_eq!(sensor.last_raw(), Some(138));
    }

    #[test]
    fn test_clamps_outside_window() {
        assert!(approx(pot(10).read_percent().unwrap(), 0.0));
        assert!(approx(pot(1000).read_percent().unwrap(), 100.0));
    }

    #[test]
    fn test_adc_error_is_conversion_error() {
        let table = CalibrationTable::default();
        let mut sensor = Potentiometer::new(DummyAdc(Err(())), table);
        assert_eq!(sensor.read_percent(), Err(SensorError::ConversionError));
        assert_eq!(sensor.last_raw(), None);
    }

    #[test]
    fn test_plausibility_window() {
        let mut sensor = pot(1020).with_valid_range(20, 1000);
        assert_eq!(sensor.read_percent(), Err(SensorError::OutOfRange));
        assert_eq!(sensor.last_raw(), Some(1020));

        let mut sensor = pot(100).with_valid_range(20, 1000);
        assert!(sensor.read_percent().is_ok());
    }
}
