//! Moving cursor state

use serde::{Deserialize, Serialize};

use super::InsertBehavior;
use crate::history::HistoryEntry;
use crate::text::TextPos;

/// A position that follows the text around it.
///
/// `None` is the invalid state; edits never bring an invalid cursor back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovingCursor {
    position: Option<TextPos>,
    insert_behavior: InsertBehavior,
}

impl MovingCursor {
    pub fn new(position: Option<TextPos>, insert_behavior: InsertBehavior) -> Self {
        Self {
            position,
            insert_behavior,
        }
    }

    /// Current position, `None` when invalid
    pub fn to_cursor(&self) -> Option<TextPos> {
        self.position
    }

    pub fn line(&self) -> Option<usize> {
        self.position.map(|pos| pos.line)
    }

    pub fn column(&self) -> Option<usize> {
        self.position.map(|pos| pos.col)
    }

    pub fn is_valid(&self) -> bool {
        self.position.is_some()
    }

    pub fn insert_behavior(&self) -> InsertBehavior {
        self.insert_behavior
    }

    pub(crate) fn set_insert_behavior(&mut self, insert_behavior: InsertBehavior) {
        self.insert_behavior = insert_behavior;
    }

    pub(crate) fn set_position(&mut self, position: Option<TextPos>) {
        self.position = position;
    }

    /// Follow one primitive edit; returns whether the position changed
    pub(crate) fn apply(&mut self, entry: &HistoryEntry) -> bool {
        let Some(mut pos) = self.position else {
            return false;
        };
        let before = pos;
        entry.transform(&mut pos, self.insert_behavior.advances());
        self.position = Some(pos);
        pos != before
    }
}
