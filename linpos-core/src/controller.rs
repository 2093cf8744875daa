//! Target position controller
//!
//! Holds the target, positioning mode and feedrate, applies parsed commands
//! to them and decides which way the actuator should move.

use linpos_protocol::{Command, ModalState, PositioningMode};

use crate::config::{ConfigError, ControllerConfig, RangePolicy};
use crate::report::{MoveKind, Report};
use crate::state::{decide, ActuatorState};

/// Single-axis position controller
#[derive(Debug, Clone, PartialEq)]
pub struct PositionController {
    config: ControllerConfig,
    target: f32,
    mode: PositioningMode,
    feedrate: f32,
}

impl PositionController {
    /// Create a controller from a validated configuration
    ///
    /// The initial target is clamped into the configured limits.
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            target: config
                .initial_target_percent
                .clamp(config.min_percent, config.max_percent),
            mode: PositioningMode::Absolute,
            feedrate: config.default_feedrate,
            config,
        })
    }

    /// Current target position (percent)
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Active positioning mode
    pub fn mode(&self) -> PositioningMode {
        self.mode
    }

    /// Last stored feedrate
    pub fn feedrate(&self) -> f32 {
        self.feedrate
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// State the parser needs for parameter defaults
    pub fn modal(&self) -> ModalState {
        ModalState {
            mode: self.mode,
            target: self.target,
            feedrate: self.feedrate,
        }
    }

    /// Apply a parsed command and describe the outcome
    pub fn apply(&mut self, command: Command) -> Report {
        match command {
            Command::MoveAbsolute { x } => self.move_to(x, None),
            Command::MoveRelative { x } => self.move_to(self.target + x, None),
            Command::MoveLinear { x, feedrate } => self.move_to(x, Some(feedrate)),
            Command::SetMode { relative } => {
                self.mode = PositioningMode::from_relative(relative);
                Report::ModeChanged(self.mode)
            }
            Command::Unrecognized(line) => Report::Unrecognized(line),
        }
    }

    /// Actuator state for a measured position
    pub fn decide(&self, measured: f32, tolerance: f32) -> ActuatorState {
        decide(measured, self.target, tolerance)
    }

    fn move_to(&mut self, requested: f32, feedrate: Option<f32>) -> Report {
        let (min, max) = (self.config.min_percent, self.config.max_percent);
        let in_range = requested >= min && requested <= max;

        if !in_range && self.config.range_policy == RangePolicy::Reject {
            return Report::OutOfRange {
                requested,
                min,
                max,
            };
        }

        // NaN compares false against both limits
        self.target = if requested.is_nan() {
            self.target
        } else {
            requested.clamp(min, max)
        };

        let kind = match feedrate {
            Some(feedrate) => {
                self.feedrate = feedrate;
                MoveKind::Linear
            }
            None => MoveKind::Rapid,
        };

        Report::Moved {
            kind,
            target: self.target,
            feedrate: self.feedrate,
        }
    }
}
