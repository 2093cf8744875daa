//! Actuator output drivers

pub mod dir_pwm;

pub use dir_pwm::DirPwmActuator;
