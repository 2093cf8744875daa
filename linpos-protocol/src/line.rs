//! Line assembly for the serial command stream
//!
//! Characters are fed one at a time. A line is complete when a `\n` or
//! `\r` arrives; the buffered text is trimmed and, if anything is left,
//! handed back to the caller.
//!
//! The buffer holds at most [`MAX_LINE_LEN`] bytes. A line that grows past
//! that is dropped along with everything up to the next terminator, so the
//! assembler always resynchronises on a line boundary.

use heapless::String;

/// Maximum length of a single command line in bytes
pub const MAX_LINE_LEN: usize = 96;

/// A complete, trimmed command line
pub type Line = String<MAX_LINE_LEN>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssembleState {
    /// Accumulating characters
    Collecting,
    /// Buffer overflowed, dropping input until the next terminator
    Discarding,
}

/// Accumulates streamed characters into complete lines
#[derive(Debug, Clone)]
pub struct LineAssembler {
    buffer: Line,
    state: AssembleState,
    overflowed: bool,
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl LineAssembler {
    /// Create an empty assembler
    pub const fn new() -> Self {
        Self {
            buffer: String::new(),
            state: AssembleState::Collecting,
            overflowed: false,
        }
    }

    /// Drop any partially received line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = AssembleState::Collecting;
    }

    /// Number of bytes currently buffered
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Drop the line in progress and everything up to the next terminator
    ///
    /// Used when input was lost mid-stream: the remains of two lines must not
    /// be joined. The discarded line raises the overflow flag like an
    /// over-long one.
    pub fn discard(&mut self) {
        self.buffer.clear();
        self.state = AssembleState::Discarding;
    }

    /// Feed a single character
    ///
    /// Returns `Some(line)` when a terminator completes a non-empty line.
    /// Blank lines and lines that overflowed the buffer produce `None`.
    pub fn feed(&mut self, ch: char) -> Option<Line> {
        if ch == '\n' || ch == '\r' {
            return self.terminate();
        }

        if self.state == AssembleState::Discarding {
            return None;
        }

        if self.buffer.push(ch).is_err() {
            self.buffer.clear();
            self.state = AssembleState::Discarding;
        }
        None
    }

    /// Check (and clear) whether a line was discarded since the last call
    ///
    /// The flag is raised when the terminator of an over-long line is seen,
    /// i.e. once per discarded line.
    pub fn take_overflow(&mut self) -> bool {
        core::mem::take(&mut self.overflowed)
    }

    fn terminate(&mut self) -> Option<Line> {
        if self.state == AssembleState::Discarding {
            self.overflowed = true;
            self.reset();
            return None;
        }

        let trimmed = self.buffer.trim();
        let line = if trimmed.is_empty() {
            None
        } else {
            // A trimmed slice always fits back into the same capacity
            Line::try_from(trimmed).ok()
        };

        self.buffer.clear();
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_str(assembler: &mut LineAssembler, input: &str) -> Option<Line> {
        let mut last = None;
        for ch in input.chars() {
            if let Some(line) = assembler.feed(ch) {
                last = Some(line);
            }
        }
        last
    }

    #[test]
    fn test_complete_line_on_newline() {
        let mut assembler = LineAssembler::new();
        assert_eq!(feed_str(&mut assembler, "G0 X10"), None);
        let line = assembler.feed('\n').unwrap();
        assert_eq!(line.as_str(), "G0 X10");
        assert_eq!(assembler.pending(), 0);
    }

    #[test]
    fn test_carriage_return_terminates() {
        let mut assembler = LineAssembler::new();
        let line = feed_str(&mut assembler, "G90\r").unwrap();
        assert_eq!(line.as_str(), "G90");
    }

    #[test]
    fn test_crlf_terminated_lines() {
        let mut assembler = LineAssembler::new();
        let mut lines = 0;
        for ch in "G91\r\nG90\r\n".chars() {
            if assembler.feed(ch).is_some() {
                lines += 1;
            }
        }
        assert_eq!(lines, 2);
    }

    #[test]
    fn test_trims_whitespace() {
        let mut assembler = LineAssembler::new();
        let line = feed_str(&mut assembler, "  \tG1 X5 F20  \n").unwrap();
        assert_eq!(line.as_str(), "G1 X5 F20");
    }

    #[test]
    fn test_blank_line_is_silent() {
        let mut assembler = LineAssembler::new();
        assert_eq!(feed_str(&mut assembler, "   \n"), None);
        assert_eq!(assembler.pending(), 0);
        assert!(!assembler.take_overflow());
    }

    #[test]
    fn test_overflow_discards_and_resyncs() {
        let mut assembler = LineAssembler::new();

        for _ in 0..MAX_LINE_LEN + 10 {
            assert_eq!(assembler.feed('X'), None);
        }
        assert_eq!(assembler.feed('\n'), None);
        assert!(assembler.take_overflow());
        // Flag is reported once
        assert!(!assembler.take_overflow());

        let line = feed_str(&mut assembler, "G0 X1\n").unwrap();
        assert_eq!(line.as_str(), "G0 X1");
    }

    #[test]
    fn test_discard_drops_until_terminator() {
        let mut assembler = LineAssembler::new();

        assert_eq!(feed_str(&mut assembler, "G0 X1"), None);
        assembler.discard();
        assert_eq!(feed_str(&mut assembler, "5\n"), None);
        assert!(assembler.take_overflow());

        let line = feed_str(&mut assembler, "G0 X7\n").unwrap();
        assert_eq!(line.as_str(), "G0 X7");
    }

    #[test]
    fn test_exact_capacity_fits() {
        let mut assembler = LineAssembler::new();
        for _ in 0..MAX_LINE_LEN {
            assembler.feed('A');
        }
        let line = assembler.feed('\n').unwrap();
        assert_eq!(line.len(), MAX_LINE_LEN);
        assert!(!assembler.take_overflow());
    }
}
