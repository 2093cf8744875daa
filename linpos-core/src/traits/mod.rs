//! Hardware abstraction traits
//!
//! These traits define the interface between the control loop and the
//! hardware-specific collaborators around it.

pub mod actuator;
pub mod sensor;
pub mod serial;

pub use actuator::{ActuatorDriver, ActuatorError};
pub use sensor::{PositionSensor, SensorError};
pub use serial::{CharSource, ReportSink};
