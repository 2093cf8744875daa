//! Position sensor trait

/// Errors that can occur while reading the position sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Raw reading outside the plausible window (wiring fault)
    OutOfRange,
    /// ADC conversion error
    ConversionError,
}

/// Trait for position feedback sensors
///
/// Implementations map the raw reading to a percentage of stroke and clamp
/// it to their calibrated range; callers do not re-validate the value.
pub trait PositionSensor {
    /// Read the current position in percent
    ///
    /// Takes `&mut self` because ADC reads typically require mutable access.
    fn read_percent(&mut self) -> Result<f32, SensorError>;
}
