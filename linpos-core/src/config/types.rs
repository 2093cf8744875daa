//! Configuration type definitions
//!
//! These types describe the controller, actuator output, position sensor
//! and serial link. The firmware builds a [`MachineConfig`] from the
//! embedded `machine.toml` at boot (see [`super::toml`]).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationTable;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Position limits are empty or inverted (min >= max)
    InvalidRange,
    /// Tolerance is negative
    InvalidTolerance,
    /// A value is NaN or infinite
    NonFiniteValue,
    /// Calibration needs at least two points with increasing raw values
    InvalidCalibration,
    /// Too many calibration points
    TooManyPoints,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            ConfigError::InvalidRange => "min_percent must be below max_percent",
            ConfigError::InvalidTolerance => "tolerance_percent must not be negative",
            ConfigError::NonFiniteValue => "value is not a finite number",
            ConfigError::InvalidCalibration => {
                "calibration needs at least two points with increasing raw values"
            }
            ConfigError::TooManyPoints => "too many calibration points",
        };
        f.write_str(msg)
    }
}

/// What to do with move targets outside the configured limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RangePolicy {
    /// Silently clamp the target into range
    #[default]
    Clamp,
    /// Leave the target unchanged and report the rejected value
    Reject,
}

/// Position controller configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControllerConfig {
    /// Lowest allowed target (percent)
    pub min_percent: f32,
    /// Highest allowed target (percent)
    pub max_percent: f32,
    /// Target at startup, clamped into range
    pub initial_target_percent: f32,
    /// Feedrate before any G1 sets one
    pub default_feedrate: f32,
    /// Dead-band half width around the target (percent)
    pub tolerance_percent: f32,
    /// Out-of-range handling
    pub range_policy: RangePolicy,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            min_percent: 1.0,
            max_percent: 98.0,
            initial_target_percent: 1.0,
            default_feedrate: 100.0,
            tolerance_percent: 0.5,
            range_policy: RangePolicy::Clamp,
        }
    }
}

impl ControllerConfig {
    /// Check limits and tolerance
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            self.min_percent,
            self.max_percent,
            self.initial_target_percent,
            self.default_feedrate,
            self.tolerance_percent,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::NonFiniteValue);
        }
        if self.min_percent >= self.max_percent {
            return Err(ConfigError::InvalidRange);
        }
        if self.tolerance_percent < 0.0 {
            return Err(ConfigError::InvalidTolerance);
        }
        Ok(())
    }
}

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
        }
    }
}

/// Actuator output (direction + PWM) configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActuatorConfig {
    /// Direction pin; `inverted` swaps extend/retract levels
    pub dir_pin: PinConfig,
    /// PWM output pin
    pub pwm_pin: u8,
    /// PWM counter top value (sets the PWM frequency)
    pub pwm_top: u16,
    /// Drive magnitude used while moving (0-255)
    pub drive_speed: u8,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            dir_pin: PinConfig::new(2),
            pwm_pin: 3,
            pwm_top: 0x3FFF,
            drive_speed: 100,
        }
    }
}

/// Position sensor configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorConfig {
    /// ADC input pin
    pub adc_pin: u8,
    /// Raw reading to percent mapping
    pub calibration: CalibrationTable,
    /// Raw readings outside this window are a wiring fault
    pub valid_range: Option<(u16, u16)>,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            adc_pin: 26,
            calibration: CalibrationTable::default(),
            valid_range: None,
        }
    }
}

/// Serial command link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// UART TX pin
    pub tx_pin: u8,
    /// UART RX pin
    pub rx_pin: u8,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baudrate: 9600,
            tx_pin: 0,
            rx_pin: 1,
        }
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MachineConfig {
    pub controller: ControllerConfig,
    pub actuator: ActuatorConfig,
    pub sensor: SensorConfig,
    pub serial: SerialConfig,
    /// Control loop period in milliseconds
    pub tick_interval_ms: u32,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            actuator: ActuatorConfig::default(),
            sensor: SensorConfig::default(),
            serial: SerialConfig::default(),
            tick_interval_ms: 200,
        }
    }
}

impl MachineConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate all sections
    ///
    /// The calibration table validates itself on construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.controller.validate()?;
        if let Some((min, max)) = self.sensor.valid_range {
            if min >= max {
                return Err(ConfigError::InvalidCalibration);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(MachineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_inverted_limits_rejected() {
        let config = ControllerConfig {
            min_percent: 90.0,
            max_percent: 10.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidRange));
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let config = ControllerConfig {
            tolerance_percent: -0.1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidTolerance));
    }

    #[test]
    fn test_empty_sensor_window_rejected() {
        let mut config = MachineConfig::default();
        config.sensor.valid_range = Some((900, 100));
        assert_eq!(config.validate(), Err(ConfigError::InvalidCalibration));
    }

    #[test]
    fn test_non_finite_rejected() {
        let config = ControllerConfig {
            default_feedrate: f32::INFINITY,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NonFiniteValue));
    }
}
