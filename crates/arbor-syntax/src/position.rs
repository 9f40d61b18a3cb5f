//! Cursor points and node spans.
//!
//! Tree-sitter positions are zero-based and spans are half-open. For
//! user-facing messages we prefer one-based line and column numbers; the
//! conversion lives here so every crate reports positions the same way.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A zero-based cursor position: row, then column.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Point {
    /// Zero-based row (line) index.
    pub row: usize,
    /// Zero-based column index.
    pub col: usize,
}

impl Point {
    /// Creates a point from zero-based row and column indices.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns one-based `(line, column)` coordinates for display.
    #[must_use]
    pub const fn one_based(self) -> (usize, usize) {
        (self.row.saturating_add(1), self.col.saturating_add(1))
    }
}

impl From<tree_sitter::Point> for Point {
    fn from(point: tree_sitter::Point) -> Self {
        Self::new(point.row, point.column)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, column) = self.one_based();
        write!(f, "{line}:{column}")
    }
}

/// A half-open range `[start, end)` of a syntax node in row/column units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Span {
    /// Inclusive start position.
    pub start: Point,
    /// Exclusive end position.
    pub end: Point,
}

impl Span {
    /// Creates a span from start and end points.
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Returns whether the point lies within this span.
    ///
    /// The end boundary is exclusive, so a cursor sitting exactly on a
    /// node's end belongs to the enclosing node instead.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.start <= point && point < self.end
    }

    /// Returns whether `other` lies entirely within this span.
    ///
    /// Used to validate the parent-contains-child tree invariant.
    #[must_use]
    pub fn contains_span(&self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
