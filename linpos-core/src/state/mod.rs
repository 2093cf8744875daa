//! Actuator state decision
//!
//! The actuator state is recomputed from scratch every control tick. The
//! only thing remembered between ticks is the previous state, kept by
//! [`StateEdge`] so that transitions are reported once.

pub mod edge;
pub mod machine;

pub use edge::StateEdge;
pub use machine::{decide, ActuatorState, MAX_DRIVE};
