//! Serial G-code protocol
//!
//! This crate turns the raw character stream arriving on the serial port
//! into structured actuator commands. It has two layers:
//!
//! - [`line::LineAssembler`] collects characters into trimmed, terminator
//!   delimited lines with a bounded buffer
//! - [`gcode::parse`] turns one line into a [`Command`]
//!
//! # Command surface
//!
//! ```text
//! G0 X<pos>            rapid move (absolute target or relative delta)
//! G1 X<pos> [F<rate>]  linear move with optional feedrate
//! G90                  absolute positioning
//! G91                  relative (incremental) positioning
//! ```
//!
//! Commands are case-insensitive and one per line. Lines end with `\n` or
//! `\r`; surrounding whitespace is ignored.

#![no_std]
#![deny(unsafe_code)]

pub mod gcode;
pub mod line;

pub use gcode::{extract_param, parse, Command, ModalState, PositioningMode};
pub use line::{Line, LineAssembler, MAX_LINE_LEN};
