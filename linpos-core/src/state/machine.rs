//! Actuator state definition

/// Largest drive command magnitude (full duty cycle)
pub const MAX_DRIVE: i16 = 255;

/// What the actuator should be doing this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorState {
    /// Within tolerance of the target; output off
    #[default]
    Stopped,
    /// Below target; driving toward increasing position
    Extending,
    /// Above target; driving toward decreasing position
    Retracting,
}

impl ActuatorState {
    /// Check if the actuator is being driven
    pub fn is_moving(&self) -> bool {
        !matches!(self, ActuatorState::Stopped)
    }

    /// Signed drive command for this state
    ///
    /// Extending drives `+speed`, retracting `-speed`, stopped `0`.
    pub fn drive_command(&self, speed: u8) -> i16 {
        let speed = (speed as i16).min(MAX_DRIVE);
        match self {
            ActuatorState::Stopped => 0,
            ActuatorState::Extending => speed,
            ActuatorState::Retracting => -speed,
        }
    }
}

/// Decide the actuator state from the position error
///
/// `|measured - target| <= tolerance` stops the actuator; otherwise it moves
/// toward the target. A NaN measurement stops the actuator.
pub fn decide(measured: f32, target: f32, tolerance: f32) -> ActuatorState {
    if measured.is_nan() {
        return ActuatorState::Stopped;
    }

    let delta = measured - target;
    if delta <= tolerance && delta >= -tolerance {
        ActuatorState::Stopped
    } else if measured < target {
        ActuatorState::Extending
    } else {
        ActuatorState::Retracting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_tolerance_stops() {
        assert_eq!(decide(50.0, 50.0, 0.5), ActuatorState::Stopped);
        assert_eq!(decide(50.5, 50.0, 0.5), ActuatorState::Stopped);
        assert_eq!(decide(49.5, 50.0, 0.5), ActuatorState::Stopped);
    }

    #[test]
    fn test_below_target_extends() {
        assert_eq!(decide(40.0, 50.0, 0.5), ActuatorState::Extending);
        assert_eq!(decide(49.4, 50.0, 0.5), ActuatorState::Extending);
    }

    #[test]
    fn test_above_target_retracts() {
        assert_eq!(decide(60.0, 50.0, 0.5), ActuatorState::Retracting);
        assert_eq!(decide(50.6, 50.0, 0.5), ActuatorState::Retracting);
    }

    #[test]
    fn test_zero_tolerance() {
        assert_eq!(decide(10.0, 10.0, 0.0), ActuatorState::Stopped);
        assert_eq!(decide(10.1, 10.0, 0.0), ActuatorState::Retracting);
    }

    #[test]
    fn test_nan_measurement_stops() {
        assert_eq!(decide(f32::NAN, 10.0, 0.5), ActuatorState::Stopped);
    }

    #[test]
    fn test_drive_command() {
        assert_eq!(ActuatorState::Extending.drive_command(100), 100);
        assert_eq!(ActuatorState::Retracting.drive_command(100), -100);
        assert_eq!(ActuatorState::Stopped.drive_command(100), 0);
        assert_eq!(ActuatorState::Extending.drive_command(255), MAX_DRIVE);
    }

    #[test]
    fn test_is_moving() {
        assert!(ActuatorState::Extending.is_moving());
        assert!(ActuatorState::Retracting.is_moving());
        assert!(!ActuatorState::Stopped.is_moving());
    }
}
