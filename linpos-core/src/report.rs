//! Status reports sent back over the serial link
//!
//! Every applied command produces exactly one report; the control loop adds
//! reports for state transitions and faults. [`Report`] implements
//! [`core::fmt::Display`], which renders the line text without a terminator.

use core::fmt;

use linpos_protocol::{Line, PositioningMode};

use crate::state::ActuatorState;
use crate::traits::SensorError;

/// Kind of move that updated the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveKind {
    /// G0
    Rapid,
    /// G1, carries a feedrate
    Linear,
}

/// A single status line
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    /// Controller started and is accepting commands
    Ready,
    /// Target updated by a move command
    Moved {
        kind: MoveKind,
        target: f32,
        feedrate: f32,
    },
    /// Positioning mode switched
    ModeChanged(PositioningMode),
    /// Line was not a supported command
    Unrecognized(Line),
    /// Move target outside limits, rejected
    OutOfRange { requested: f32, min: f32, max: f32 },
    /// Actuator state changed this tick
    StateChanged { state: ActuatorState, measured: f32 },
    /// Command line exceeded the buffer and was dropped
    LineOverflow,
    /// Position could not be read; actuator stopped
    SensorFault(SensorError),
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Ready => f.write_str("Ready for G-code"),
            Report::Moved {
                kind: MoveKind::Rapid,
                target,
                ..
            } => write!(f, "Absolute move to: {:.2}", target),
            Report::Moved {
                kind: MoveKind::Linear,
                target,
                feedrate,
            } => write!(f, "Linear move to: {:.2} at feedrate: {:.2}", target, feedrate),
            Report::ModeChanged(PositioningMode::Relative) => {
                f.write_str("Switched to relative (incremental) positioning (G91)")
            }
            Report::ModeChanged(PositioningMode::Absolute) => {
                f.write_str("Switched to absolute positioning (G90)")
            }
            Report::Unrecognized(line) => {
                write!(f, "Unknown or unsupported G-code: {}", line.as_str())
            }
            Report::OutOfRange {
                requested,
                min,
                max,
            } => write!(
                f,
                "Target {:.2} out of range ({:.2} - {:.2}), ignored",
                requested, min, max
            ),
            Report::StateChanged { state, measured } => {
                let what = match state {
                    ActuatorState::Extending => "moving actuator to extend",
                    ActuatorState::Retracting => "moving actuator to retract",
                    ActuatorState::Stopped => "actuator stopped, within tolerance",
                };
                write!(f, "{}, current percent: {:.2}", what, measured)
            }
            Report::LineOverflow => f.write_str("Line too long, discarded"),
            Report::SensorFault(_) => f.write_str("Position sensor fault, actuator stopped"),
        }
    }
}
