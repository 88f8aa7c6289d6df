//! Error types for the text core
//!
//! Edit primitives never raise: every argument problem is reported as an
//! [`EditError`] and the document is left untouched. Degenerate states such
//! as empty or invalid moving ranges are not errors at all.

use thiserror::Error;

use crate::moving::{CursorId, RangeId};
use crate::text::TextRange;

/// Rejected edit or moving-object call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Line index does not exist in the document
    #[error("line {line} out of range (document has {count} lines)")]
    LineOutOfRange { line: usize, count: usize },

    /// Column is not usable on the given line
    #[error("column {col} out of range on line {line} (length {length})")]
    ColumnOutOfRange {
        line: usize,
        col: usize,
        length: usize,
    },

    /// Column points between the two halves of a surrogate pair
    #[error("column {col} on line {line} splits a surrogate pair")]
    SplitsSurrogatePair { line: usize, col: usize },

    /// Line interval is empty or reversed
    #[error("invalid line interval {from}..={to}")]
    InvalidLineInterval { from: usize, to: usize },

    /// Range end lies before its start
    #[error("range end lies before its start")]
    InvertedRange,

    /// Line-local text containing `\n`
    #[error("text for line {line} contains a line break")]
    LineBreakInText { line: usize },

    /// Line-local operation given a range crossing lines
    #[error("range {0} spans more than one line")]
    MultiLineRange(TextRange),

    /// Moving cursor handle was removed or never existed
    #[error("unknown moving cursor {0:?}")]
    UnknownCursor(CursorId),

    /// Moving range handle was removed or never existed
    #[error("unknown moving range {0:?}")]
    UnknownRange(RangeId),
}

/// Column problem on a single line, before the line index is known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ColumnError {
    #[error("column out of range (length {length})")]
    OutOfRange { length: usize },

    #[error("column splits a surrogate pair")]
    SplitsSurrogatePair,
}

impl ColumnError {
    /// Attach the line and column the failure happened at
    pub fn at(self, line: usize, col: usize) -> EditError {
        match self {
            ColumnError::OutOfRange { length } => EditError::ColumnOutOfRange { line, col, length },
            ColumnError::SplitsSurrogatePair => EditError::SplitsSurrogatePair { line, col },
        }
    }
}

/// Revision history failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// History before this revision was already discarded
    #[error("revision {requested} is no longer in history (oldest is {oldest})")]
    RevisionDiscarded { requested: u64, oldest: u64 },

    /// Revision lies in the future
    #[error("revision {requested} is newer than current revision {current}")]
    RevisionInFuture { requested: u64, current: u64 },

    /// Unlock without a matching lock
    #[error("revision {0} is not locked")]
    NotLocked(u64),
}

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config file extension: {0}")]
    UnsupportedFormat(String),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}
