//! Source location types
//!
//! Lines are 1-based, columns are 0-based byte columns (tree-sitter
//! convention). Byte offsets are kept alongside so code text can be sliced
//! straight out of the file source.

use std::fmt;
use std::sync::Arc;

/// Span in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    pub start_byte: usize,
    pub end_byte: usize,
}

impl Span {
    /// Create a new Span
    pub fn new(
        start_line: u32,
        start_col: u32,
        end_line: u32,
        end_col: u32,
        start_byte: usize,
        end_byte: usize,
    ) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
            start_byte,
            end_byte,
        }
    }

    /// Create a zero span (0:0-0:0)
    pub fn zero() -> Self {
        Self::new(0, 0, 0, 0, 0, 0)
    }

    /// Smallest span covering both `self` and `other`
    pub fn to(&self, other: &Span) -> Span {
        let (start_line, start_col, start_byte) = if self.start_byte <= other.start_byte {
            (self.start_line, self.start_col, self.start_byte)
        } else {
            (other.start_line, other.start_col, other.start_byte)
        };
        let (end_line, end_col, end_byte) = if self.end_byte >= other.end_byte {
            (self.end_line, self.end_col, self.end_byte)
        } else {
            (other.end_line, other.end_col, other.end_byte)
        };
        Span::new(start_line, start_col, end_line, end_col, start_byte, end_byte)
    }

    pub fn contains_line(&self, line: u32) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start_byte <= other.start_byte && other.end_byte <= self.end_byte
    }

    pub fn line_count(&self) -> u32 {
        if self.end_line >= self.start_line {
            self.end_line - self.start_line + 1
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_byte == self.end_byte
    }

    /// Slice the covered text out of `source`
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start_byte..self.end_byte).unwrap_or("")
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_line, self.start_col, self.end_line, self.end_col
        )
    }
}

/// File plus span, attached to every positioned graph node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub file: Arc<str>,
    pub span: Span,
}

impl Location {
    pub fn new(file: Arc<str>, span: Span) -> Self {
        Self { file, span }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.span)
    }
}
