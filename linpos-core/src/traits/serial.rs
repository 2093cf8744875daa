//! Serial link traits
//!
//! The command stream arrives through a [`CharSource`]; human-readable
//! status lines leave through a [`ReportSink`].

use crate::report::Report;

/// Pull-based, non-blocking character input
pub trait CharSource {
    /// Check if at least one character is waiting
    fn is_available(&mut self) -> bool;

    /// Take the next character, if any
    fn read_char(&mut self) -> Option<char>;

    /// Check (and clear) whether input was lost before the last character read
    ///
    /// Sources that can overrun return `true` once per gap so the partial
    /// line around it is discarded.
    fn take_gap(&mut self) -> bool {
        false
    }
}

/// Line-oriented status output
///
/// One report becomes one line of text. Implementations must not block.
pub trait ReportSink {
    fn report(&mut self, report: &Report);

    /// Check if `count` more reports can be queued without loss
    ///
    /// Input processing pauses while this is false, leaving the remaining
    /// characters in the source for a later tick.
    fn can_accept(&self, count: usize) -> bool {
        let _ = count;
        true
    }
}
