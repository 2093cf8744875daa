//! Direction + PWM actuator output
//!
//! Drives a DC linear actuator through a motor driver with one direction
//! input and one PWM speed input (the common "DIR/PWM" H-bridge wiring).
//!
//! - Positive command: direction LOW, actuator extends
//! - Negative command: direction HIGH, actuator retracts
//! - Zero: PWM duty 0, direction pin left as it was
//!
//! The duty cycle is `|command| / 255` of the PWM channel's full scale.
//! Boards that wire the motor the other way round set `inverted`, which
//! swaps the direction levels.

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::pwm::SetDutyCycle;
use linpos_core::state::MAX_DRIVE;
use linpos_core::traits::{ActuatorDriver, ActuatorError};

/// Actuator on a direction pin and a PWM channel
pub struct DirPwmActuator<DIR, PWM> {
    dir: DIR,
    pwm: PWM,
    /// If true, extend = pin HIGH
    inverted: bool,
    /// Last command applied (saturated)
    command: i16,
}

impl<DIR: OutputPin, PWM: SetDutyCycle> DirPwmActuator<DIR, PWM> {
    /// Create a new actuator output
    ///
    /// The PWM output is switched off immediately.
    pub fn new(dir: DIR, pwm: PWM, inverted: bool) -> Result<Self, ActuatorError> {
        let mut actuator = Self {
            dir,
            pwm,
            inverted,
            command: 0,
        };
        actuator.stop()?;
        Ok(actuator)
    }

    /// Last applied command in `-255..=255`
    pub fn command(&self) -> i16 {
        self.command
    }

    /// Release the pins
    pub fn release(self) -> (DIR, PWM) {
        (self.dir, self.pwm)
    }

    fn set_direction(&mut self, extend: bool) -> Result<(), ActuatorError> {
        // Extend is LOW on a non-inverted board
        let level = PinState::from(extend == self.inverted);
        self.dir
            .set_state(level)
            .map_err(|_| ActuatorError::Direction)
    }
}

impl<DIR: OutputPin, PWM: SetDutyCycle> ActuatorDriver for DirPwmActuator<DIR, PWM> {
    fn drive(&mut self, command: i16) -> Result<(), ActuatorError> {
        let command = command.clamp(-MAX_DRIVE, MAX_DRIVE);

        if command == 0 {
            self.pwm
                .set_duty_cycle_fully_off()
                .map_err(|_| ActuatorError::Pwm)?;
        } else {
            self.set_direction(command > 0)?;
            self.pwm
                .set_duty_cycle_fraction(command.unsigned_abs(), MAX_DRIVE as u16)
                .map_err(|_| ActuatorError::Pwm)?;
        }

        self.command = command;
        Ok(())
    }
}
