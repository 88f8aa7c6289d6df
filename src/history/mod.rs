//! Revision history
//!
//! Append-only log of primitive edits grouped per committed edit session.
//! A plain position captured at an older revision can be replayed forward
//! (or a current one replayed backward) without registering a moving cursor.
//! History is only retained while some revision is locked.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use crate::error::HistoryError;
use crate::moving::{EmptyBehavior, InsertBehavior, InsertBehaviors};
use crate::text::{TextPos, TextRange};

/// One primitive edit as seen by position tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryEntry {
    /// `length` columns inserted at `column` on a line `old_line_length` long
    InsertText {
        line: usize,
        column: usize,
        length: usize,
        old_line_length: usize,
    },
    /// `length` columns removed at `column`
    RemoveText {
        line: usize,
        column: usize,
        length: usize,
    },
    /// Line split at `column`
    WrapLine { line: usize, column: usize },
    /// `line` merged onto the end of `line - 1`, which was `old_line_length` long
    UnwrapLine { line: usize, old_line_length: usize },
}

impl HistoryEntry {
    /// Move `pos` from before this edit to after it.
    ///
    /// `advance` decides the tie when text appears exactly at `pos`.
    pub fn transform(&self, pos: &mut TextPos, advance: bool) {
        match *self {
            HistoryEntry::InsertText {
                line,
                column,
                length,
                old_line_length,
            } => {
                if pos.line != line || pos.col < column || (pos.col == column && !advance) {
                    return;
                }
                if pos.col <= old_line_length {
                    pos.col += length;
                } else if pos.col < old_line_length + length {
                    pos.col = old_line_length + length;
                }
            }
            HistoryEntry::RemoveText {
                line,
                column,
                length,
            } => {
                if pos.line != line || pos.col <= column {
                    return;
                }
                if pos.col <= column + length {
                    pos.col = column;
                } else {
                    pos.col -= length;
                }
            }
            HistoryEntry::WrapLine { line, column } => {
                if pos.line < line {
                    return;
                }
                if pos.line > line {
                    pos.line += 1;
                    return;
                }
                if pos.col < column || (pos.col == column && !advance) {
                    return;
                }
                pos.line += 1;
                pos.col -= column;
            }
            HistoryEntry::UnwrapLine {
                line,
                old_line_length,
            } => {
                if pos.line < line {
                    return;
                }
                if pos.line == line {
                    pos.col += old_line_length;
                }
                pos.line -= 1;
            }
        }
    }

    /// Move `pos` from after this edit back to before it
    pub fn reverse_transform(&self, pos: &mut TextPos, advance: bool) {
        match *self {
            HistoryEntry::InsertText {
                line,
                column,
                length,
                ..
            } => {
                if pos.line != line || pos.col <= column {
                    return;
                }
                if pos.col < column + length {
                    pos.col = column;
                } else {
                    pos.col -= length;
                }
            }
            HistoryEntry::RemoveText {
                line,
                column,
                length,
            } => {
                if pos.line != line || pos.col < column || (pos.col == column && !advance) {
                    return;
                }
                pos.col += length;
            }
            HistoryEntry::WrapLine { line, column } => {
                if pos.line <= line {
                    return;
                }
                if pos.line == line + 1 {
                    pos.col += column;
                }
                pos.line -= 1;
            }
            HistoryEntry::UnwrapLine {
                line,
                old_line_length,
            } => {
                if pos.line + 1 < line {
                    return;
                }
                if pos.line + 1 == line {
                    if pos.col < old_line_length || (pos.col == old_line_length && !advance) {
                        return;
                    }
                    pos.col -= old_line_length;
                }
                pos.line += 1;
            }
        }
    }
}

/// Entries of one committed edit session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct HistoryGroup {
    /// Revision this group produced
    revision: u64,
    entries: Vec<HistoryEntry>,
}

/// Revision counter plus the retained edit log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextHistory {
    revision: u64,
    /// Oldest revision positions can still be transformed from
    first_revision: u64,
    groups: VecDeque<HistoryGroup>,
    locks: BTreeMap<u64, usize>,
    max_groups: usize,
}

impl TextHistory {
    pub fn new(max_groups: usize) -> Self {
        Self {
            revision: 0,
            first_revision: 0,
            groups: VecDeque::new(),
            locks: BTreeMap::new(),
            max_groups,
        }
    }

    /// Current revision
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Oldest revision still reachable by transforms
    pub fn oldest_revision(&self) -> u64 {
        self.first_revision
    }

    pub fn is_locked(&self, revision: u64) -> bool {
        self.locks.contains_key(&revision)
    }

    pub fn set_max_groups(&mut self, max_groups: usize) {
        self.max_groups = max_groups;
        self.collect_garbage();
    }

    /// Append one session's edits and advance the revision
    pub fn commit(&mut self, entries: Vec<HistoryEntry>) -> u64 {
        self.revision += 1;
        self.groups.push_back(HistoryGroup {
            revision: self.revision,
            entries,
        });
        self.collect_garbage();
        self.revision
    }

    /// Keep history from `revision` on alive until unlocked
    pub fn lock_revision(&mut self, revision: u64) -> Result<(), HistoryError> {
        self.check_revision(revision)?;
        *self.locks.entry(revision).or_insert(0) += 1;
        Ok(())
    }

    /// Release one lock taken with [`TextHistory::lock_revision`]
    pub fn unlock_revision(&mut self, revision: u64) -> Result<(), HistoryError> {
        let Some(count) = self.locks.get_mut(&revision) else {
            log::warn!("unlock of revision {} which is not locked", revision);
            return Err(HistoryError::NotLocked(revision));
        };
        *count -= 1;
        if *count == 0 {
            self.locks.remove(&revision);
        }
        self.collect_garbage();
        Ok(())
    }

    fn check_revision(&self, revision: u64) -> Result<(), HistoryError> {
        if revision > self.revision {
            return Err(HistoryError::RevisionInFuture {
                requested: revision,
                current: self.revision,
            });
        }
        if revision < self.first_revision {
            return Err(HistoryError::RevisionDiscarded {
                requested: revision,
                oldest: self.first_revision,
            });
        }
        Ok(())
    }

    fn collect_garbage(&mut self) {
        let needed_from = self
            .locks
            .keys()
            .next()
            .copied()
            .unwrap_or(self.revision);
        while self
            .groups
            .front()
            .is_some_and(|group| group.revision <= needed_from)
        {
            self.groups.pop_front();
        }
        while self.groups.len() > self.max_groups {
            if let Some(dropped) = self.groups.pop_front() {
                log::warn!(
                    "history bound of {} groups reached, dropping revision {} while still locked",
                    self.max_groups,
                    dropped.revision
                );
            }
        }
        self.first_revision = self
            .groups
            .front()
            .map_or(self.revision, |group| group.revision - 1);
    }

    /// Entries between two revisions, oldest first
    fn entries_between(&self, from: u64, to: u64) -> impl DoubleEndedIterator<Item = &HistoryEntry> {
        self.groups
            .iter()
            .filter(move |group| group.revision > from && group.revision <= to)
            .flat_map(|group| group.entries.iter())
    }

    /// Replay a plain position from revision `from` to revision `to`
    pub fn transform_cursor(
        &self,
        pos: TextPos,
        behavior: InsertBehavior,
        from: u64,
        to: u64,
    ) -> Result<TextPos, HistoryError> {
        self.check_revision(from)?;
        self.check_revision(to)?;
        let advance = behavior.advances();
        let mut pos = pos;
        if from < to {
            for entry in self.entries_between(from, to) {
                entry.transform(&mut pos, advance);
            }
        } else {
            for entry in self.entries_between(to, from).rev() {
                entry.reverse_transform(&mut pos, advance);
            }
        }
        Ok(pos)
    }

    /// Replay a plain range; `None` when it became invalid on the way
    pub fn transform_range(
        &self,
        range: TextRange,
        behaviors: InsertBehaviors,
        empty_behavior: EmptyBehavior,
        from: u64,
        to: u64,
    ) -> Result<Option<TextRange>, HistoryError> {
        self.check_revision(from)?;
        self.check_revision(to)?;
        let invalidate_if_empty = empty_behavior == EmptyBehavior::InvalidateIfEmpty;
        if invalidate_if_empty && range.end <= range.start {
            return Ok(None);
        }

        let start_advance = behaviors.start_behavior().advances();
        let end_advance = behaviors.end_behavior().advances();
        let mut start = range.start;
        let mut end = range.end;

        let mut step = |entry: &HistoryEntry, forward: bool| -> bool {
            if forward {
                entry.transform(&mut start, start_advance);
                entry.transform(&mut end, end_advance);
            } else {
                entry.reverse_transform(&mut start, start_advance);
                entry.reverse_transform(&mut end, end_advance);
            }
            if end <= start {
                if invalidate_if_empty {
                    return false;
                }
                end = start;
            }
            true
        };

        if from < to {
            for entry in self.entries_between(from, to) {
                if !step(entry, true) {
                    return Ok(None);
                }
            }
        } else {
            for entry in self.entries_between(to, from).rev() {
                if !step(entry, false) {
                    return Ok(None);
                }
            }
        }
        Ok(Some(TextRange::new(start, end)))
    }
}

impl Default for TextHistory {
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(entry: HistoryEntry, line: usize, col: usize, advance: bool) -> TextPos {
        let mut pos = TextPos::new(line, col);
        entry.transform(&mut pos, advance);
        pos
    }

    #[test]
    fn test_insert_transform_respects_tie_break() {
        let insert = HistoryEntry::InsertText {
            line: 0,
            column: 3,
            length: 2,
            old_line_length: 5,
        };
        assert_eq!(moved(insert, 0, 2, true), TextPos::new(0, 2));
        assert_eq!(moved(insert, 0, 3, false), TextPos::new(0, 3));
        assert_eq!(moved(insert, 0, 3, true), TextPos::new(0, 5));
        assert_eq!(moved(insert, 0, 4, false), TextPos::new(0, 6));
        assert_eq!(moved(insert, 1, 4, true), TextPos::new(1, 4));
    }

    #[test]
    fn test_remove_transform_collapses_into_gap() {
        let remove = HistoryEntry::RemoveText {
            line: 2,
            column: 1,
            length: 3,
        };
        assert_eq!(moved(remove, 2, 1, true), TextPos::new(2, 1));
        assert_eq!(moved(remove, 2, 3, true), TextPos::new(2, 1));
        assert_eq!(moved(remove, 2, 4, true), TextPos::new(2, 1));
        assert_eq!(moved(remove, 2, 6, true), TextPos::new(2, 3));
    }

    #[test]
    fn test_wrap_and_unwrap_transforms() {
        let wrap = HistoryEntry::WrapLine { line: 1, column: 4 };
        assert_eq!(moved(wrap, 0, 9, true), TextPos::new(0, 9));
        assert_eq!(moved(wrap, 1, 6, false), TextPos::new(2, 2));
        assert_eq!(moved(wrap, 1, 4, false), TextPos::new(1, 4));
        assert_eq!(moved(wrap, 1, 4, true), TextPos::new(2, 0));
        assert_eq!(moved(wrap, 3, 0, true), TextPos::new(4, 0));

        let unwrap = HistoryEntry::UnwrapLine {
            line: 1,
            old_line_length: 3,
        };
        assert_eq!(moved(unwrap, 1, 1, true), TextPos::new(0, 4));
        assert_eq!(moved(unwrap, 0, 2, true), TextPos::new(0, 2));
        assert_eq!(moved(unwrap, 5, 2, true), TextPos::new(4, 2));
    }

    #[test]
    fn test_reverse_transform_undoes_forward() {
        let entries = [
            HistoryEntry::InsertText {
                line: 0,
                column: 1,
                length: 4,
                old_line_length: 6,
            },
            HistoryEntry::WrapLine { line: 0, column: 2 },
            HistoryEntry::UnwrapLine {
                line: 2,
                old_line_length: 7,
            },
        ];
        let original = TextPos::new(0, 5);
        let mut pos = original;
        for entry in &entries {
            entry.transform(&mut pos, false);
        }
        assert_ne!(pos, original);
        for entry in entries.iter().rev() {
            entry.reverse_transform(&mut pos, false);
        }
        assert_eq!(pos, original);
    }

    #[test]
    fn test_history_is_dropped_without_locks() {
        let mut history = TextHistory::default();
        history.commit(vec![HistoryEntry::WrapLine { line: 0, column: 0 }]);
        assert_eq!(history.revision(), 1);
        assert_eq!(history.oldest_revision(), 1);
        assert_eq!(
            history.transform_cursor(TextPos::zero(), InsertBehavior::StayOnInsert, 0, 1),
            Err(HistoryError::RevisionDiscarded {
                requested: 0,
                oldest: 1
            })
        );
    }

    #[test]
    fn test_locked_revision_can_be_transformed() {
        let mut history = TextHistory::default();
        history.lock_revision(0).unwrap();
        history.commit(vec![HistoryEntry::WrapLine { line: 0, column: 2 }]);
        history.commit(vec![HistoryEntry::InsertText {
            line: 1,
            column: 0,
            length: 3,
            old_line_length: 4,
        }]);

        let pos = history
            .transform_cursor(TextPos::new(0, 3), InsertBehavior::MoveOnInsert, 0, 2)
            .unwrap();
        assert_eq!(pos, TextPos::new(1, 4));

        let back = history
            .transform_cursor(pos, InsertBehavior::MoveOnInsert, 2, 0)
            .unwrap();
        assert_eq!(back, TextPos::new(0, 3));

        history.unlock_revision(0).unwrap();
        assert_eq!(history.oldest_revision(), 2);
        assert_eq!(history.unlock_revision(0), Err(HistoryError::NotLocked(0)));
    }

    #[test]
    fn test_future_revision_is_rejected() {
        let mut history = TextHistory::default();
        assert_eq!(
            history.lock_revision(3),
            Err(HistoryError::RevisionInFuture {
                requested: 3,
                current: 0
            })
        );
    }

    #[test]
    fn test_range_transform_invalidates_when_emptied() {
        let mut history = TextHistory::default();
        history.lock_revision(0).unwrap();
        history.commit(vec![HistoryEntry::RemoveText {
            line: 0,
            column: 1,
            length: 4,
        }]);
        let range = TextRange::on_line(0, 2, 4);

        let invalid = history
            .transform_range(
                range,
                InsertBehaviors::DO_NOT_EXPAND,
                EmptyBehavior::InvalidateIfEmpty,
                0,
                1,
            )
            .unwrap();
        assert_eq!(invalid, None);

        let collapsed = history
            .transform_range(
                range,
                InsertBehaviors::DO_NOT_EXPAND,
                EmptyBehavior::AllowEmpty,
                0,
                1,
            )
            .unwrap();
        assert_eq!(collapsed, Some(TextRange::collapsed(TextPos::new(0, 1))));
    }

    #[test]
    fn test_bound_drops_oldest_locked_group() {
        let mut history = TextHistory::new(1);
        history.lock_revision(0).unwrap();
        history.commit(vec![HistoryEntry::WrapLine { line: 0, column: 0 }]);
        history.commit(vec![HistoryEntry::WrapLine { line: 0, column: 0 }]);
        assert_eq!(history.oldest_revision(), 1);
        assert!(history
            .transform_cursor(TextPos::zero(), InsertBehavior::StayOnInsert, 0, 2)
            .is_err());
    }
}
