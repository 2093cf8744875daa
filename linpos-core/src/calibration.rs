//! Potentiometer calibration
//!
//! Maps raw ADC readings to a position percentage using a piecewise-linear
//! table. Readings outside the table are clamped to the first/last point
//! before interpolation, so the result is always within the table's
//! percent range.
//!
//! A two-point table reproduces the usual "clamp the raw reading to a safe
//! window, then map it linearly to 0-100 %" transform.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Maximum number of calibration points
pub const MAX_CALIBRATION_POINTS: usize = 8;

/// A single measured calibration point
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationPoint {
    /// Raw ADC reading
    pub raw: u16,
    /// Position at that reading (percent)
    pub percent: f32,
}

impl CalibrationPoint {
    pub const fn new(raw: u16, percent: f32) -> Self {
        Self { raw, percent }
    }
}

/// Bounded list of calibration points, as stored in a table
pub type PointList = Vec<CalibrationPoint, MAX_CALIBRATION_POINTS>;

/// Piecewise-linear raw-to-percent table
///
/// Invariants: at least two points, raw values strictly increasing,
/// percent values finite. Deserialized tables are checked the same way.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "PointList", into = "PointList"))]
pub struct CalibrationTable {
    points: PointList,
}

impl TryFrom<PointList> for CalibrationTable {
    type Error = ConfigError;

    fn try_from(points: PointList) -> Result<Self, Self::Error> {
        Self::new(&points)
    }
}

impl From<CalibrationTable> for PointList {
    fn from(table: CalibrationTable) -> Self {
        table.points
    }
}

impl Default for CalibrationTable {
    /// 12-bit ADC, usable potentiometer window 236..=868
    fn default() -> Self {
        let mut points = Vec::new();
        let _ = points.push(CalibrationPoint::new(236, 0.0));
        let _ = points.push(CalibrationPoint::new(868, 100.0));
        Self { points }
    }
}

impl CalibrationTable {
    /// Build a table from measured points
    pub fn new(points: &[CalibrationPoint]) -> Result<Self, ConfigError> {
        if points.len() < 2 {
            return Err(ConfigError::InvalidCalibration);
        }

        let mut table = Vec::new();
        table
            .extend_from_slice(points)
            .map_err(|_| ConfigError::TooManyPoints)?;

        for pair in table.windows(2) {
            if pair[1].raw <= pair[0].raw {
                return Err(ConfigError::InvalidCalibration);
            }
        }
        if table.iter().any(|p| !p.percent.is_finite()) {
            return Err(ConfigError::NonFiniteValue);
        }

        Ok(Self { points: table })
    }

    /// Two-point table: clamp to `[raw_min, raw_max]` and map to 0-100 %
    pub fn linear(raw_min: u16, raw_max: u16) -> Result<Self, ConfigError> {
        Self::new(&[
            CalibrationPoint::new(raw_min, 0.0),
            CalibrationPoint::new(raw_max, 100.0),
        ])
    }

    /// Calibration points in ascending raw order
    pub fn points(&self) -> &[CalibrationPoint] {
        &self.points
    }

    /// Lowest usable raw reading
    pub fn raw_min(&self) -> u16 {
        self.points[0].raw
    }

    /// Highest usable raw reading
    pub fn raw_max(&self) -> u16 {
        self.points[self.points.len() - 1].raw
    }

    /// Convert a raw ADC reading to a position percentage
    pub fn to_percent(&self, raw: u16) -> f32 {
        let raw = raw.clamp(self.raw_min(), self.raw_max());

        for pair in self.points.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if raw <= hi.raw {
                let span = (hi.raw - lo.raw) as f32;
                let offset = (raw - lo.raw) as f32;
                return lo.percent + (hi.percent - lo.percent) * offset / span;
            }
        }

        self.points[self.points.len() - 1].percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        let d = a - b;
        d < 1e-3 && d > -1e-3
    }

    #[test]
    fn test_linear_table_endpoints() {
        let table = CalibrationTable::linear(59, 217).unwrap();
        assert!(approx(table.to_percent(59), 0.0));
        assert!(approx(table.to_percent(217), 100.0));
        assert!(approx(table.to_percent(138), 50.0));
    }

    #[test]
    fn test_readings_outside_window_are_clamped() {
        let table = CalibrationTable::linear(59, 217).unwrap();
        assert!(approx(table.to_percent(0), 0.0));
        assert!(approx(table.to_percent(1023), 100.0));
    }

    #[test]
    fn test_multi_point_interpolation() {
        let table = CalibrationTable::new(&[
            CalibrationPoint::new(100, 0.0),
            CalibrationPoint::new(200, 20.0),
            CalibrationPoint::new(400, 100.0),
        ])
        .unwrap();

        assert!(approx(table.to_percent(150), 10.0));
        assert!(approx(table.to_percent(200), 20.0));
        assert!(approx(table.to_percent(300), 60.0));
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert_eq!(
            CalibrationTable::new(&[CalibrationPoint::new(10, 0.0)]),
            Err(ConfigError::InvalidCalibration)
        );
        assert_eq!(
            CalibrationTable::linear(300, 300),
            Err(ConfigError::InvalidCalibration)
        );
        assert_eq!(
            CalibrationTable::new(&[
                CalibrationPoint::new(10, 0.0),
                CalibrationPoint::new(20, f32::NAN),
            ]),
            Err(ConfigError::NonFiniteValue)
        );

        let too_many = [CalibrationPoint::new(0, 0.0); MAX_CALIBRATION_POINTS + 1];
        assert_eq!(
            CalibrationTable::new(&too_many),
            Err(ConfigError::TooManyPoints)
        );
    }

    #[test]
    fn test_default_table_is_valid() {
        let table = CalibrationTable::default();
        assert!(CalibrationTable::new(table.points()).is_ok());
        assert!(approx(table.to_percent(236), 0.0));
        assert!(approx(table.to_percent(868), 100.0));
    }

    #[test]
    fn test_point_list_conversion_validates() {
        assert_eq!(
            CalibrationTable::try_from(PointList::new()),
            Err(ConfigError::InvalidCalibration)
        );

        let mut reversed = PointList::new();
        reversed.push(CalibrationPoint::new(900, 0.0)).unwrap();
        reversed.push(CalibrationPoint::new(100, 100.0)).unwrap();
        assert_eq!(
            CalibrationTable::try_from(reversed),
            Err(ConfigError::InvalidCalibration)
        );

        let table = CalibrationTable::default();
        let points = PointList::from(table.clone());
        assert_eq!(CalibrationTable::try_from(points), Ok(table));
    }
}
