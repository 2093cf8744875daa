//! Poll-driven control loop
//!
//! One [`ControlLoop::tick`] drains the character source, applies every
//! complete command line, reads the position sensor, decides the actuator
//! state and drives the actuator. State changes are reported once, on the
//! tick where they happen.

use linpos_protocol::{parse, LineAssembler};

use crate::controller::PositionController;
use crate::report::Report;
use crate::state::{ActuatorState, StateEdge};
use crate::traits::{ActuatorDriver, ActuatorError, CharSource, PositionSensor, ReportSink};

/// Controller plus its four collaborators
pub struct ControlLoop<C, S, A, R> {
    source: C,
    sensor: S,
    actuator: A,
    sink: R,
    assembler: LineAssembler,
    controller: PositionController,
    edge: StateEdge,
    drive_speed: u8,
    sensor_faulted: bool,
}

impl<C, S, A, R> ControlLoop<C, S, A, R>
where
    C: CharSource,
    S: PositionSensor,
    A: ActuatorDriver,
    R: ReportSink,
{
    /// Create a control loop
    ///
    /// `drive_speed` is the duty magnitude (0-255) used while moving.
    pub fn new(
        controller: PositionController,
        drive_speed: u8,
        source: C,
        sensor: S,
        actuator: A,
        sink: R,
    ) -> Self {
        Self {
            source,
            sensor,
            actuator,
            sink,
            assembler: LineAssembler::new(),
            controller,
            edge: StateEdge::new(),
            drive_speed,
            sensor_faulted: false,
        }
    }

    /// Send the startup banner
    pub fn announce(&mut self) {
        self.sink.report(&Report::Ready);
    }

    /// Stop the actuator immediately
    pub fn halt(&mut self) -> Result<(), ActuatorError> {
        self.edge.force(ActuatorState::Stopped);
        self.actuator.stop()
    }

    /// Drain all waiting characters and apply complete lines
    ///
    /// Stops early if the sink cannot take another report; the rest stays in
    /// the source. Returns the number of command lines applied.
    pub fn process_input(&mut self) -> usize {
        let mut applied = 0;

        // One report for this character, one for the tick's state change
        while self.sink.can_accept(2) && self.source.is_available() {
            let ch = self.source.read_char();
            if self.source.take_gap() {
                self.assembler.discard();
            }
            let Some(ch) = ch else {
                break;
            };

            let line = self.assembler.feed(ch);

            if self.assembler.take_overflow() {
                self.sink.report(&Report::LineOverflow);
            }

            if let Some(line) = line {
                let report = self.execute(&line);
                self.sink.report(&report);
                applied += 1;
            }
        }

        applied
    }

    /// Parse and apply a single command line
    ///
    /// The report is returned, not sent.
    pub fn execute(&mut self, line: &str) -> Report {
        let command = parse(line, &self.controller.modal());
        self.controller.apply(command)
    }

    /// Run one control cycle
    ///
    /// A sensor failure stops the actuator and is reported once per fault
    /// episode. Actuator errors are returned to the caller.
    pub fn tick(&mut self) -> Result<ActuatorState, ActuatorError> {
        self.process_input();

        let measured = match self.sensor.read_percent() {
            Ok(measured) => {
                self.sensor_faulted = false;
                measured
            }
            Err(err) => {
                self.edge.force(ActuatorState::Stopped);
                if !self.sensor_faulted {
                    self.sensor_faulted = true;
                    self.sink.report(&Report::SensorFault(err));
                }
                self.actuator.stop()?;
                return Ok(ActuatorState::Stopped);
            }
        };

        let tolerance = self.controller.config().tolerance_percent;
        let state = self.controller.decide(measured, tolerance);

        if let Some(state) = self.edge.update(state) {
            self.sink.report(&Report::StateChanged { state, measured });
        }

        self.actuator.drive(state.drive_command(self.drive_speed))?;
        Ok(state)
    }

    pub fn controller(&self) -> &PositionController {
        &self.controller
    }

    /// State decided on the last tick
    pub fn state(&self) -> ActuatorState {
        self.edge.last()
    }

    pub fn is_sensor_faulted(&self) -> bool {
        self.sensor_faulted
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn source_mut(&mut self) -> &mut C {
        &mut self.source
    }
}
