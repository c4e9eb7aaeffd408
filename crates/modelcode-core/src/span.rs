//! Positions inside a code string.

use std::fmt;

/// Where a token or error starts (1-based line, 1-based byte column) and
/// how many bytes of that line it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub line: u32,
    pub col: u32,
    pub len: u32,
}

impl Span {
    pub const fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// Zero-width position, used for the end of input.
    pub const fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, 0)
    }

    /// Cover both spans.
    ///
    /// Carets are drawn under a single line, so when the spans sit on
    /// different lines the earlier one is returned unchanged.
    pub fn merge(self, other: Span) -> Span {
        let (first, last) = if (other.line, other.col) < (self.line, self.col) {
            (other, self)
        } else {
            (self, other)
        };
        if first.line != last.line {
            return first;
        }
        let end = (first.col + first.len).max(last.col + last.len);
        Span::new(first.line, first.col, end - first.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
