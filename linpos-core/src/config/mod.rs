//! Configuration types
//!
//! Board-agnostic configuration structures plus the small TOML reader the
//! firmware uses for its embedded `machine.toml`.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
