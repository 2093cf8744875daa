//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in linpos-core for the actuator hardware:
//!
//! - Actuator output (direction pin + PWM channel, e.g. an H-bridge)
//! - Position feedback (potentiometer on an ADC channel)

#![no_std]
#![deny(unsafe_code)]

pub mod actuator;
pub mod sensor;
