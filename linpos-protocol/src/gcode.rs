//! G-code command parsing
//!
//! Only the subset needed to position a single linear axis is understood:
//! `G0`, `G1`, `G90` and `G91`, each with an optional `X` target and (for
//! `G1`) an optional `F` feedrate. Everything else is returned as
//! [`Command::Unrecognized`] so the caller can report it.
//!
//! Parsing never fails. Missing or malformed numbers fall back to a default
//! taken from the current modal state (see [`ModalState`]).

use crate::line::{Line, MAX_LINE_LEN};

/// Coordinate interpretation for move commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PositioningMode {
    /// Coordinates are destinations (G90)
    #[default]
    Absolute,
    /// Coordinates are deltas from the current target (G91)
    Relative,
}

impl PositioningMode {
    /// Check if this is relative (incremental) positioning
    pub fn is_relative(&self) -> bool {
        matches!(self, PositioningMode::Relative)
    }

    /// Mode from a G90/G91 style flag
    pub fn from_relative(relative: bool) -> Self {
        if relative {
            PositioningMode::Relative
        } else {
            PositioningMode::Absolute
        }
    }
}

/// Snapshot of the controller state that parameter defaults depend on
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModalState {
    /// Active positioning mode
    pub mode: PositioningMode,
    /// Current target position (percent)
    pub target: f32,
    /// Last stored feedrate
    pub feedrate: f32,
}

/// A parsed command line
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Rapid move to an absolute position (G0 in absolute mode)
    MoveAbsolute { x: f32 },
    /// Rapid move by a delta (G0 in relative mode)
    MoveRelative { x: f32 },
    /// Linear move with feedrate (G1); `x` is already an absolute destination
    MoveLinear { x: f32, feedrate: f32 },
    /// Switch positioning mode (G90 / G91)
    SetMode { relative: bool },
    /// Anything else, carrying the raw line text
    Unrecognized(Line),
}

/// G word of a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Word {
    Rapid,
    Linear,
    Absolute,
    Relative,
}

/// Extract the numeric parameter following `letter`
///
/// Finds the first occurrence of `letter` (either case) and parses the run
/// of digits, `.` and `-` right after it. Returns `default` if the letter is absent,
/// the run is empty, or the run is not a well-formed number.
pub fn extract_param(line: &str, letter: char, default: f32) -> f32 {
    let Some(idx) = line.find(|c: char| c.eq_ignore_ascii_case(&letter)) else {
        return default;
    };

    let rest = &line[idx + letter.len_utf8()..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .unwrap_or(rest.len());
    let run = &rest[..end];

    if run.is_empty() {
        return default;
    }

    run.parse::<f32>().unwrap_or(default)
}

/// Parse a command line against the current modal state
pub fn parse(line: &str, modal: &ModalState) -> Command {
    let line = line.trim();

    let Some(word) = command_word(line) else {
        return Command::Unrecognized(truncate(line));
    };

    let relative = modal.mode.is_relative();
    let x_default = if relative { 0.0 } else { modal.target };

    match word {
        Word::Rapid => {
            let x = extract_param(line, 'X', x_default);
            if relative {
                Command::MoveRelative { x }
            } else {
                Command::MoveAbsolute { x }
            }
        }
        Word::Linear => {
            let x = extract_param(line, 'X', x_default);
            let feedrate = extract_param(line, 'F', modal.feedrate);
            let x = if relative { modal.target + x } else { x };
            Command::MoveLinear { x, feedrate }
        }
        Word::Relative => Command::SetMode { relative: true },
        Word::Absolute => Command::SetMode { relative: false },
    }
}

/// Identify the leading G word (`G0`, `G00`, `G1`, `G01`, `G90`, `G91`)
fn command_word(line: &str) -> Option<Word> {
    let rest = line.strip_prefix(['G', 'g'])?;
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());

    // "G1.5" and friends are not plain G words
    if end == 0 || rest[end..].starts_with('.') {
        return None;
    }

    match rest[..end].parse::<u16>().ok()? {
        0 => Some(Word::Rapid),
        1 => Some(Word::Linear),
        91 => Some(Word::Relative),
        90 => Some(Word::Absolute),
        _ => None,
    }
}

fn truncate(line: &str) -> Line {
    let mut out = Line::new();
    for ch in line.chars() {
        if out.len() + ch.len_utf8() > MAX_LINE_LEN {
            break;
        }
        let _ = out.push(ch);
    }
    out
}
