//! Source-position types used for location tracking.
//!
//! janus scans line by line, so positions are line-oriented: a 1-based
//! line, a 1-based column, and byte offsets measured within that line.

use serde::Serialize;
use std::fmt;

/// A 1-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl LineCol {
    #[inline]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// The position of the very first byte of a source text.
    #[inline]
    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The extent of a token: its line/column plus the byte range it covers
/// within that line (`start` inclusive, `end` exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub line: u32,
    pub column: u32,
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub fn new(line: u32, column: u32, start: u32, end: u32) -> Self {
        debug_assert!(end >= start);
        Self { line, column, start, end }
    }

    /// Length of the spanned text in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn line_col(&self) -> LineCol {
        LineCol::new(self.line, self.column)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} [{}, {})", self.line, self.column, self.start, self.end)
    }
}
