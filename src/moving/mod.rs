//! Moving cursors and moving ranges
//!
//! Positions that follow the text they point at. The document owns every
//! moving object in an arena and hands out copyable ids; the structs here
//! are the per-object state plus the adjustment rules.
//!
//! ## Modules
//!
//! - `cursor`: one tracked position with its insert behavior
//! - `range`: a pair of tracked positions with expansion and emptiness policy
//! - `lookup`: line to range index (multiline index plus single-line cache)

pub mod cursor;
pub mod lookup;
pub mod range;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

use crate::document::Document;

pub use cursor::MovingCursor;
pub use lookup::RangeLookup;
pub use range::MovingRange;

/// Handle of a moving cursor owned by a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CursorId(pub u64);

/// Handle of a moving range owned by a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RangeId(pub u64);

/// View a range belongs to; `None` on a range means every view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViewId(pub u64);

impl fmt::Display for CursorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cursor#{}", self.0)
    }
}

impl fmt::Display for RangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "range#{}", self.0)
    }
}

/// What a cursor does when text is inserted exactly at its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InsertBehavior {
    /// Pushed forward: ends up after the inserted text
    #[default]
    StayOnInsert,
    /// Keeps its offset: ends up before the inserted text
    MoveOnInsert,
}

impl InsertBehavior {
    /// Whether an insert at the cursor's position carries it along
    pub fn advances(self) -> bool {
        self == InsertBehavior::StayOnInsert
    }
}

/// Boundary growth of a moving range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct InsertBehaviors {
    pub expand_left: bool,
    pub expand_right: bool,
}

impl InsertBehaviors {
    pub const DO_NOT_EXPAND: Self = Self {
        expand_left: false,
        expand_right: false,
    };
    pub const EXPAND_LEFT: Self = Self {
        expand_left: true,
        expand_right: false,
    };
    pub const EXPAND_RIGHT: Self = Self {
        expand_left: false,
        expand_right: true,
    };

    /// Behavior of the start cursor: only grows left when asked to
    pub fn start_behavior(self) -> InsertBehavior {
        if self.expand_left {
            InsertBehavior::MoveOnInsert
        } else {
            InsertBehavior::StayOnInsert
        }
    }

    /// Behavior of the end cursor: only grows right when asked to
    pub fn end_behavior(self) -> InsertBehavior {
        if self.expand_right {
            InsertBehavior::StayOnInsert
        } else {
            InsertBehavior::MoveOnInsert
        }
    }
}

impl BitOr for InsertBehaviors {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            expand_left: self.expand_left || rhs.expand_left,
            expand_right: self.expand_right || rhs.expand_right,
        }
    }
}

/// What happens to a range once its end reaches its start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmptyBehavior {
    /// Collapse to an empty range at the start
    #[default]
    AllowEmpty,
    /// Become invalid
    InvalidateIfEmpty,
}

/// Display attribute attached to a range
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub foreground: Option<u32>,
    pub background: Option<u32>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Listener told when a range ends up empty or invalid.
///
/// Called after the outermost edit session closes, or right after a direct
/// range mutation. The document is handed back so the listener may remove
/// the range or edit further.
pub trait RangeFeedback {
    fn range_empty(&self, _doc: &mut Document, _range: RangeId) {}

    fn range_invalid(&self, _doc: &mut Document, _range: RangeId) {}
}
