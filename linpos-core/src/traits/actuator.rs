//! Actuator output trait

/// Errors that can occur when driving the actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// Direction pin could not be set
    Direction,
    /// PWM duty cycle could not be set
    Pwm,
}

/// Trait for a bidirectional actuator driver
///
/// The drive command is signed: the sign selects the direction (positive
/// extends, negative retracts) and the magnitude (0-255) the duty cycle.
/// Zero stops the actuator.
pub trait ActuatorDriver {
    /// Apply a drive command in `-255..=255`
    ///
    /// Values outside the range are saturated.
    fn drive(&mut self, command: i16) -> Result<(), ActuatorError>;

    /// Stop the actuator
    fn stop(&mut self) -> Result<(), ActuatorError> {
        self.drive(0)
    }
}
