//! Text positions and spans
//!
//! Columns count UTF-16 code units, so a character outside the Basic
//! Multilingual Plane occupies two columns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in text (line, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TextPos {
    pub line: usize,
    pub col: usize,
}

impl TextPos {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Create a position at the start of a line
    pub const fn line_start(line: usize) -> Self {
        Self { line, col: 0 }
    }

    /// Create a position at (0, 0)
    pub const fn zero() -> Self {
        Self { line: 0, col: 0 }
    }
}

impl fmt::Display for TextPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.line, self.col)
    }
}

impl From<(usize, usize)> for TextPos {
    fn from((line, col): (usize, usize)) -> Self {
        Self { line, col }
    }
}

/// A range of text from start (inclusive) to end (exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: TextPos,
    pub end: TextPos,
}

impl TextRange {
    pub const fn new(start: TextPos, end: TextPos) -> Self {
        Self { start, end }
    }

    /// Range on one line from `start_col` to `end_col`
    pub const fn on_line(line: usize, start_col: usize, end_col: usize) -> Self {
        Self {
            start: TextPos::new(line, start_col),
            end: TextPos::new(line, end_col),
        }
    }

    /// Empty range at a position
    pub const fn collapsed(pos: TextPos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Same span with start and end ordered
    pub fn normalized(self) -> Self {
        if self.end < self.start {
            Self::new(self.end, self.start)
        } else {
            self
        }
    }

    /// Check if this range is empty (start == end)
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this range is on a single line
    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    /// Column distance between start and end, regardless of lines
    pub fn column_width(&self) -> isize {
        self.end.col as isize - self.start.col as isize
    }

    /// Check if a position is contained within this range
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Check if `line` lies within the lines touched by this range
    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.start.line && line <= self.end.line
    }

    /// Lines covered by this range
    pub fn to_line_range(&self) -> LineRange {
        LineRange::new(self.start.line, self.end.line)
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} -> {}]", self.start, self.end)
    }
}

/// Inclusive interval of line indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn single(line: usize) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.start && line <= self.end
    }

    pub fn overlaps(&self, other: &LineRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Number of lines in the interval
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Smallest interval covering both
    pub fn union(self, other: LineRange) -> LineRange {
        LineRange::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Union of two optional line intervals
pub fn union_lines(a: Option<LineRange>, b: Option<LineRange>) -> Option<LineRange> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
