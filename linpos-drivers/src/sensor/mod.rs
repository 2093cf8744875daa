//! Position sensor drivers

pub mod potentiometer;

pub use potentiometer::{AdcReader, Potentiometer};
