//! Position tracking for tokens and AST nodes
//!
//! Stores the source location (line/column) of tokens and nodes for
//! diagnostics and for downstream metrics that report node extents.
//! Both coordinates are 1-based and both span endpoints are inclusive.

#[cfg(feature = "persistent-cache")]
use serde::{Deserialize, Serialize};

/// A span representing a range in source code (1-indexed, end inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "persistent-cache", derive(Serialize, Deserialize))]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// A position in source code (1-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "persistent-cache", derive(Serialize, Deserialize))]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start <= end, "span start {start} after end {end}");
        Self { start, end }
    }

    /// Create a span from line/column coordinates
    pub fn from_coords(
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> Self {
        Self::new(
            Position::new(start_line, start_col),
            Position::new(end_line, end_col),
        )
    }

    /// Span covering `self` through `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn start_line(&self) -> usize {
        self.start.line
    }

    pub fn start_column(&self) -> usize {
        self.start.column
    }

    pub fn end_line(&self) -> usize {
        self.end.line
    }

    pub fn end_column(&self) -> usize {
        self.end.column
    }

    /// Check if a position falls within this span
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    /// The first character of a file.
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
