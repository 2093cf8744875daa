//! Board-agnostic core logic for the linear actuator controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (character source, sensor, actuator, reports)
//! - Position controller (target, positioning mode, feedrate)
//! - Actuator state decision and edge-triggered reporting
//! - Control loop tying the pieces together, one tick at a time
//! - Sensor calibration (raw ADC to percent)
//! - Configuration type definitions and loading

#![no_std]
#![deny(unsafe_code)]

pub mod calibration;
pub mod config;
pub mod control_loop;
pub mod controller;
pub mod report;
pub mod state;
pub mod traits;

pub use control_loop::ControlLoop;
pub use controller::PositionController;
pub use report::{MoveKind, Report};
pub use state::{decide, ActuatorState, StateEdge};
