//! Simple TOML parser for machine configuration
//!
//! This is a minimal, allocation-free parser for the subset of TOML used
//! by `machine.toml`. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float, boolean)
//! - [section] headers
//! - Single-line nested arrays for calibration points: `points = [[236, 0.0], [868, 100.0]]`
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings or arrays
//! - Inline tables
//! - Dotted keys

use heapless::Vec;

use super::types::{ConfigError, MachineConfig, PinConfig, RangePolicy};
use crate::calibration::{CalibrationPoint, CalibrationTable, MAX_CALIBRATION_POINTS};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in the current section
    UnknownKey,
    /// Invalid value type
    InvalidValue,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
    /// Invalid pin string
    InvalidPin,
    /// Values parsed but failed validation
    Invalid(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(err: ConfigError) -> Self {
        ParseError::Invalid(err)
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Controller,
    Actuator,
    Sensor,
    Serial,
}

/// Parse TOML configuration into MachineConfig
///
/// Missing keys keep their default values. The result is validated before
/// it is returned.
pub fn parse_config(input: &str) -> Result<MachineConfig, ParseError> {
    let mut config = MachineConfig::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && !line.contains('=') {
            let header = strip_comment(line);
            let header = header
                .strip_prefix('[')
                .and_then(|h| h.strip_suffix(']'))
                .ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(header)?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        } else {
            return Err(ParseError::InvalidValue);
        }
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "controller" => Ok(Section::Controller),
        "actuator" => Ok(Section::Actuator),
        "sensor" => Ok(Section::Sensor),
        "serial" => Ok(Section::Serial),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut MachineConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => match key {
            "tick_interval_ms" => config.tick_interval_ms = parse_int(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Controller => {
            let c = &mut config.controller;
            match key {
                "min_percent" => c.min_percent = parse_float(value)?,
                "max_percent" => c.max_percent = parse_float(value)?,
                "initial_target_percent" => c.initial_target_percent = parse_float(value)?,
                "default_feedrate" => c.default_feedrate = parse_float(value)?,
                "tolerance_percent" => c.tolerance_percent = parse_float(value)?,
                "range_policy" => c.range_policy = parse_range_policy(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Actuator => {
            let a = &mut config.actuator;
            match key {
                "dir_pin" => a.dir_pin = parse_pin(value)?,
                "pwm_pin" => a.pwm_pin = parse_pin(value)?.pin,
                "pwm_top" => a.pwm_top = parse_int(value)?,
                "drive_speed" => a.drive_speed = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Sensor => {
            let s = &mut config.sensor;
            match key {
                "adc_pin" => s.adc_pin = parse_pin(value)?.pin,
                "points" => s.calibration = parse_points(value)?,
                "valid_range" => s.valid_range = Some(parse_range(value)?),
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Serial => {
            let s = &mut config.serial;
            match key {
                "baudrate" => s.baudrate = parse_int(value)?,
                "tx_pin" => s.tx_pin = parse_pin(value)?.pin,
                "rx_pin" => s.rx_pin = parse_pin(value)?.pin,
                _ => return Err(ParseError::UnknownKey),
            }
        }
    }

    Ok(())
}

/// Remove a trailing `# comment` that is not inside a string
fn strip_comment(value: &str) -> &str {
    match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = strip_comment(value.trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a float value (integers are accepted)
fn parse_float(value: &str) -> Result<f32, ParseError> {
    let parsed: f32 = value.trim().parse().map_err(|_| ParseError::InvalidValue)?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(ParseError::InvalidValue)
    }
}

/// Parse a pin string like "gpio2" or "!gpio2"
fn parse_pin(value: &str) -> Result<PinConfig, ParseError> {
    let value = parse_string(value);
    let (inverted, s) = match value.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, value),
    };

    let number = s.strip_prefix("gpio").ok_or(ParseError::InvalidPin)?;
    let pin: u8 = number.parse().map_err(|_| ParseError::InvalidPin)?;
    if pin > 29 {
        return Err(ParseError::InvalidPin);
    }

    Ok(PinConfig { pin, inverted })
}

/// Parse out-of-range policy
fn parse_range_policy(value: &str) -> Result<RangePolicy, ParseError> {
    match parse_string(value) {
        "clamp" | "Clamp" => Ok(RangePolicy::Clamp),
        "reject" | "Reject" => Ok(RangePolicy::Reject),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a raw value window: `[min, max]`
fn parse_range(value: &str) -> Result<(u16, u16), ParseError> {
    let (min, max) = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .and_then(|v| v.split_once(','))
        .ok_or(ParseError::InvalidValue)?;
    Ok((parse_int(min)?, parse_int(max)?))
}

/// Parse calibration points: `[[raw, percent], [raw, percent], ...]`
fn parse_points(value: &str) -> Result<CalibrationTable, ParseError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue)?;

    let mut points: Vec<CalibrationPoint, MAX_CALIBRATION_POINTS> = Vec::new();
    let mut rest = inner.trim();

    while !rest.is_empty() {
        let open = rest.strip_prefix('[').ok_or(ParseError::InvalidValue)?;
        let close = open.find(']').ok_or(ParseError::InvalidValue)?;
        let (raw, percent) = open[..close]
            .split_once(',')
            .ok_or(ParseError::InvalidValue)?;

        points
            .push(CalibrationPoint::new(parse_int(raw)?, parse_float(percent)?))
            .map_err(|_| ParseError::TooManyItems)?;

        rest = open[close + 1..].trim_start();
        rest = rest.strip_prefix(',').unwrap_or(rest).trim_start();
    }

    Ok(CalibrationTable::new(&points)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pin() {
        let pin = parse_pin("gpio2").unwrap();
        assert_eq!(pin.pin, 2);
        assert!(!pin.inverted);

        let pin = parse_pin("\"!gpio12\"").unwrap();
        assert_eq!(pin.pin, 12);
        assert!(pin.inverted);

        assert_eq!(parse_pin("pin3"), Err(ParseError::InvalidPin));
        assert_eq!(parse_pin("gpio30"), Err(ParseError::InvalidPin));
    }

    #[test]
    fn test_parse_points() {
        let table = parse_points("[[236, 0.0], [500, 40], [868, 100.0]]").unwrap();
        assert_eq!(table.points().len(), 3);
        assert_eq!(table.points()[1], CalibrationPoint::new(500, 40.0));

        assert_eq!(
            parse_points("[[868, 0.0], [236, 100.0]]"),
            Err(ParseError::Invalid(ConfigError::InvalidCalibration))
        );
        assert_eq!(parse_points("[236, 0.0]"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("[20, 1000]"), Ok((20, 1000)));
        assert_eq!(parse_range("[20]"), Err(ParseError::InvalidValue));
        assert_eq!(parse_range("20, 1000"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("# nothing here\n").unwrap();
        assert_eq!(config, MachineConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
tick_interval_ms = 100

[controller]
min_percent = 1
max_percent = 99.0
initial_target_percent = 8
default_feedrate = 100
tolerance_percent = 0.5  # dead-band
range_policy = "reject"

[actuator]
dir_pin = "!gpio2"
pwm_pin = "gpio3"
pwm_top = 1000
drive_speed = 180

[sensor]
adc_pin = "gpio26"
points = [[240, 0.0], [860, 100.0]]
valid_range = [20, 1000]

[serial]
baudrate = 115200
tx_pin = "gpio0"
rx_pin = "gpio1"
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.tick_interval_ms, 100);
        assert_eq!(config.controller.max_percent, 99.0);
        assert_eq!(config.controller.initial_target_percent, 8.0);
        assert_eq!(config.controller.range_policy, RangePolicy::Reject);
        assert!(config.actuator.dir_pin.inverted);
        assert_eq!(config.actuator.pwm_pin, 3);
        assert_eq!(config.actuator.drive_speed, 180);
        assert_eq!(config.sensor.calibration.raw_max(), 860);
        assert_eq!(config.sensor.valid_range, Some((20, 1000)));
        assert_eq!(config.serial.baudrate, 115200);
    }

    #[test]
    fn test_unknown_key_and_section() {
        assert_eq!(
            parse_config("[controller]\nmax_prcent = 5\n"),
            Err(ParseError::UnknownKey)
        );
        assert_eq!(
            parse_config("[heater]\nmax_temp = 5\n"),
            Err(ParseError::InvalidSection)
        );
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse_config("[actuator]\ndrive_speed = 300\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[controller]\nrange_policy = \"bounce\"\n"),
            Err(ParseError::InvalidValue)
        );
    }

    #[test]
    fn test_validation_runs_after_parse() {
        assert_eq!(
            parse_config("[controller]\nmin_percent = 50\nmax_percent = 40\n"),
            Err(ParseError::Invalid(ConfigError::InvalidRange))
        );
    }
}
