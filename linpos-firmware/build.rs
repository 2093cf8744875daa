//! Build script for linpos-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates machine.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate machine.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=machine.toml");

    let config_path = Path::new("machine.toml");

    if !config_path.exists() {
        panic!(
            "{}",
            error_box(
                "ERROR: machine.toml not found!",
                &[
                    "The firmware requires a machine.toml configuration file.",
                    "Please create one in the linpos-firmware directory.",
                ],
            )
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => panic!(
            "{}",
            error_box("ERROR: Failed to read machine.toml", &[format!("Error: {}", e).as_str()])
        ),
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let message = e.to_string();
            let lines: Vec<&str> = message.lines().collect();
            panic!(
                "{}",
                error_box("ERROR: Invalid TOML syntax in machine.toml", &lines)
            );
        }
    };

    let mut errors = Vec::new();
    validate_known_keys(&config, &mut errors);
    validate_controller(&config, &mut errors);
    validate_actuator(&config, &mut errors);
    validate_sensor(&config, &mut errors);

    if !errors.is_empty() {
        let lines: Vec<String> = errors.iter().map(|e| format!("• {}", e)).collect();
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        panic!(
            "{}",
            error_box("ERROR: Invalid configuration in machine.toml", &lines)
        );
    }

    println!("cargo:warning=machine.toml validated successfully");
}

/// Characters between the left and right border of an error box
const BOX_INNER: usize = 66;

/// Longest text that fits in a row: two spaces of left margin, one of right
const ROW_TEXT: usize = BOX_INNER - 3;

/// Frame a title and message lines for a build panic
fn error_box(title: &str, lines: &[&str]) -> String {
    let rule = "═".repeat(BOX_INNER);
    let mut out = format!("\n╔{}╗\n{}\n╠{}╣\n", rule, box_row(title), rule);
    for line in lines {
        out.push_str(&box_row(line));
        out.push('\n');
    }
    out.push_str(&format!("╚{}╝\n", rule));
    out
}

/// One bordered row, truncated with "..." if too long
fn box_row(text: &str) -> String {
    let text: String = if text.chars().count() > ROW_TEXT {
        text.chars().take(ROW_TEXT - 3).chain("...".chars()).collect()
    } else {
        text.to_string()
    };
    let pad = ROW_TEXT - text.chars().count();
    format!("║  {}{} ║", text, " ".repeat(pad))
}

/// Keys the firmware's parser understands, per section
const KNOWN_KEYS: &[(&str, &[&str])] = &[
    ("", &["tick_interval_ms"]),
    (
        "controller",
        &[
            "min_percent",
            "max_percent",
            "initial_target_percent",
            "default_feedrate",
            "tolerance_percent",
            "range_policy",
        ],
    ),
    ("actuator", &["dir_pin", "pwm_pin", "pwm_top", "drive_speed"]),
    ("sensor", &["adc_pin", "points", "valid_range"]),
    ("serial", &["baudrate", "tx_pin", "rx_pin"]),
];

/// Reject unknown sections and keys (the on-device parser would)
fn validate_known_keys(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (key, value) in root {
        match value.as_table() {
            Some(section) => {
                let Some((_, keys)) = KNOWN_KEYS.iter().find(|(name, _)| *name == key.as_str()) else {
                    errors.push(format!("unknown section [{}]", key));
                    continue;
                };
                for field in section.keys() {
                    if !keys.contains(&field.as_str()) {
                        errors.push(format!("[{}] unknown key '{}'", key, field));
                    }
                }
            }
            None => {
                if !KNOWN_KEYS[0].1.contains(&key.as_str()) {
                    errors.push(format!("unknown key '{}'", key));
                }
            }
        }
    }
}

fn as_number(value: &toml::Value) -> Option<f64> {
    match value {
        toml::Value::Integer(i) => Some(*i as f64),
        toml::Value::Float(f) => Some(*f),
        _ => None,
    }
}

/// Validate limits, tolerance and range policy
fn validate_controller(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(controller) = config.get("controller") else {
        return;
    };

    let min = controller.get("min_percent").map(as_number);
    let max = controller.get("max_percent").map(as_number);

    for (key, value) in [("min_percent", min), ("max_percent", max)] {
        if value == Some(None) {
            errors.push(format!("[controller] {} must be a number", key));
        }
    }

    let min = min.flatten().unwrap_or(1.0);
    let max = max.flatten().unwrap_or(98.0);
    if min >= max {
        errors.push("[controller] min_percent must be below max_percent".to_string());
    }

    if let Some(tolerance) = controller.get("tolerance_percent").and_then(as_number) {
        if tolerance < 0.0 {
            errors.push("[controller] tolerance_percent must not be negative".to_string());
        }
    }

    if let Some(policy) = controller.get("range_policy") {
        match policy.as_str() {
            Some("clamp") | Some("reject") => {}
            _ => errors.push("[controller] range_policy must be \"clamp\" or \"reject\"".to_string()),
        }
    }
}

/// Validate pins and drive speed
fn validate_actuator(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(actuator) = config.get("actuator") else {
        return;
    };

    for key in ["dir_pin", "pwm_pin"] {
        if let Some(pin) = actuator.get(key) {
            if pin_number(pin).is_none() {
                errors.push(format!("[actuator] {} must be \"gpio0\"..\"gpio29\"", key));
            }
        }
    }

    if let Some(toml::Value::Integer(speed)) = actuator.get("drive_speed") {
        if *speed < 0 || *speed > 255 {
            errors.push("[actuator] drive_speed must be 0-255".to_string());
        }
    }
}

/// Validate the calibration table
fn validate_sensor(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(sensor) = config.get("sensor") else {
        return;
    };

    if let Some(pin) = sensor.get("adc_pin") {
        if !pin_number(pin).is_some_and(|n| n >= 26) {
            errors.push("[sensor] adc_pin must be \"gpio26\"..\"gpio29\"".to_string());
        }
    }

    let Some(points) = sensor.get("points") else {
        return;
    };
    let Some(points) = points.as_array() else {
        errors.push("[sensor] points must be an array".to_string());
        return;
    };

    if points.len() < 2 || points.len() > 8 {
        errors.push("[sensor] points needs 2-8 entries".to_string());
    }

    let mut last_raw = None;
    for (i, point) in points.iter().enumerate() {
        let pair = point.as_array().filter(|p| p.len() == 2);
        let raw = pair.and_then(|p| p[0].as_integer());
        let percent = pair.and_then(|p| as_number(&p[1]));

        match (raw, percent) {
            (Some(raw), Some(_)) => {
                if last_raw.is_some_and(|last| raw <= last) {
                    errors.push(format!("[sensor] point {} raw value must increase", i));
                }
                last_raw = Some(raw);
            }
            _ => errors.push(format!("[sensor] point {} must be [raw, percent]", i)),
        }
    }
}

/// GPIO number of a "gpioN" / "!gpioN" pin string
fn pin_number(value: &toml::Value) -> Option<u8> {
    value
        .as_str()
        .map(|s| s.trim_start_matches('!'))
        .and_then(|s| s.strip_prefix("gpio"))
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|n| *n <= 29)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths(rendered: &str) -> Vec<usize> {
        rendered
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| l.chars().count())
            .collect()
    }

    #[test]
    fn test_error_box_rows_share_one_width() {
        let rendered = error_box(
            "ERROR: machine.toml not found!",
            &[
                "The firmware requires a machine.toml configuration file.",
                "Please create one in the linpos-firmware directory.",
                "• [sensor] point 3 raw value must increase",
                "",
            ],
        );

        let widths = widths(&rendered);
        assert_eq!(widths.len(), 8);
        assert!(widths.iter().all(|w| *w == BOX_INNER + 2), "{:?}", widths);
    }

    #[test]
    fn test_box_row_truncates_long_text() {
        let long = "é".repeat(100);
        let row = box_row(&long);

        assert_eq!(row.chars().count(), BOX_INNER + 2);
        assert!(row.ends_with("... ║"));
    }
}
