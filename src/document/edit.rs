//! Edit sessions and primitive edits
//!
//! Every primitive validates its arguments before touching anything, runs
//! inside an (implicit) edit session, mutates the line store, moves every
//! live cursor and range, records a history entry and an inverse command,
//! and reports the edit to observers. Only the outermost `edit_end`
//! commits a revision, announces the touched lines and delivers range
//! feedback.

use std::collections::BTreeSet;

use super::Document;
use crate::error::EditError;
use crate::history::HistoryEntry;
use crate::moving::RangeId;
use crate::text::line::utf16_len;
use crate::text::{union_lines, LineRange, TextPos, TextRange};
use crate::undo::{EditCommand, EditGroup};

/// Nesting state plus what the current outermost session accumulated
#[derive(Debug, Default)]
pub(crate) struct EditSession {
    depth: usize,
    saved_depths: Vec<usize>,
    pending: PendingEdit,
}

#[derive(Debug, Default)]
struct PendingEdit {
    touched: Option<LineRange>,
    entries: Vec<HistoryEntry>,
    commands: Vec<EditCommand>,
    changed_ranges: BTreeSet<RangeId>,
}

impl EditSession {
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }
}

impl Document {
    /// Open an edit session; sessions nest
    pub fn edit_start(&mut self) {
        self.session.depth += 1;
    }

    /// Close an edit session.
    ///
    /// # Panics
    ///
    /// Panics when no session is open.
    pub fn edit_end(&mut self) {
        assert!(
            self.session.depth > 0,
            "edit_end called without a matching edit_start"
        );

        if self.session.depth == 1 && self.config.word_wrap {
            if let Some(lines) = self.session.pending.touched {
                if let Err(err) = self.wrap_text(lines.start, lines.end) {
                    log::error!("static word wrap of lines {}..={} failed: {}", lines.start, lines.end, err);
                }
            }
        }

        self.session.depth -= 1;
        if self.session.depth > 0 {
            return;
        }

        let pending = std::mem::take(&mut self.session.pending);
        if pending.commands.is_empty() {
            return;
        }

        let revision = self.history.commit(pending.entries);
        let group = EditGroup::new(revision, pending.commands);
        if let Some(lines) = pending.touched {
            log::trace!(
                "edit session committed revision {} touching lines {}..={}",
                revision,
                lines.start,
                lines.end
            );
            self.notify(|observer| observer.lines_touched(lines));
        }
        self.notify(|observer| observer.edit_group_committed(revision, &group));

        self.deliver_feedback(pending.changed_ranges);
    }

    /// Whether an edit session is open
    pub fn is_editing(&self) -> bool {
        self.session.depth > 0
    }

    /// Remember the current session depth
    pub fn push_edit_state(&mut self) {
        self.session.saved_depths.push(self.session.depth);
    }

    /// Open or close sessions until the depth saved by the matching
    /// [`Document::push_edit_state`] is reached
    pub fn pop_edit_state(&mut self) {
        let Some(saved) = self.session.saved_depths.pop() else {
            return;
        };
        while self.session.depth > saved {
            self.edit_end();
        }
        while self.session.depth < saved {
            self.edit_start();
        }
    }

    pub(crate) fn in_session<T>(
        &mut self,
        edit: impl FnOnce(&mut Self) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        self.edit_start();
        let result = edit(self);
        self.edit_end();
        result
    }

    /// Insert line-local `text` at (`line`, `col`), padding with spaces past
    /// the end of the line
    pub fn edit_insert_text(&mut self, line: usize, col: usize, text: &str) -> Result<(), EditError> {
        log::debug!("edit_insert_text line={} col={} text={:?}", line, col, text);
        let length = self.check_line(line).inspect_err(rejected)?;
        if text.contains('\n') {
            return Err(EditError::LineBreakInText { line }).inspect_err(rejected);
        }
        if text.is_empty() {
            return Ok(());
        }
        let (col, text) = if col > length {
            (length, format!("{}{}", " ".repeat(col - length), text))
        } else {
            (col, text.to_string())
        };

        self.in_session(|doc| {
            doc.buffer
                .insert_text(TextPos::new(line, col), &text)
                .inspect_err(rejected)?;
            let inserted = utf16_len(&text);
            doc.apply_entry(HistoryEntry::InsertText {
                line,
                column: col,
                length: inserted,
                old_line_length: length,
            });
            doc.touch_lines(LineRange::single(line));
            let range = TextRange::on_line(line, col, col + inserted);
            doc.notify(|observer| observer.text_inserted(range));
            doc.record(EditCommand::InsertText { line, col, text });
            Ok(())
        })
    }

    /// Remove up to `len` columns at (`line`, `col`)
    pub fn edit_remove_text(&mut self, line: usize, col: usize, len: usize) -> Result<(), EditError> {
        log::debug!("edit_remove_text line={} col={} len={}", line, col, len);
        let length = self.check_line(line).inspect_err(rejected)?;
        if length == 0 {
            return Err(EditError::ColumnOutOfRange { line, col, length }).inspect_err(rejected);
        }
        if len == 0 {
            return Ok(());
        }
        if col >= length {
            return Err(EditError::ColumnOutOfRange { line, col, length }).inspect_err(rejected);
        }
        let len = len.min(length - col);

        self.in_session(|doc| {
            let range = TextRange::on_line(line, col, col + len);
            let removed = doc.buffer.remove_text(range).inspect_err(rejected)?;
            doc.apply_entry(HistoryEntry::RemoveText {
                line,
                column: col,
                length: len,
            });
            doc.touch_lines(LineRange::single(line));
            doc.notify(|observer| observer.text_removed(range, &removed));
            doc.record(EditCommand::RemoveText {
                line,
                col,
                text: removed,
            });
            Ok(())
        })
    }

    /// Split `line` at `col`.
    ///
    /// The tail becomes a new line when `force_new_line` is set or `line` is
    /// the last line; otherwise it is prepended to the following line.
    /// Returns whether a line was added.
    pub fn edit_wrap_line(&mut self, line: usize, col: usize, force_new_line: bool) -> Result<bool, EditError> {
        log::debug!(
            "edit_wrap_line line={} col={} force_new_line={}",
            line,
            col,
            force_new_line
        );
        let length = self.check_line(line).inspect_err(rejected)?;
        let col = col.min(length);
        let next_length = self.buffer.line_length(line + 1);
        let new_line_added = force_new_line || next_length.is_none();
        let tail = length - col;

        self.in_session(|doc| {
            doc.buffer
                .wrap_line(TextPos::new(line, col))
                .inspect_err(rejected)?;
            doc.apply_entry(HistoryEntry::WrapLine { line, column: col });
            doc.line_inserted_after(line);
            if new_line_added {
                doc.shift_marks_for_wrap(line, col);
            } else {
                // the tail now sits at line + 1, in front of the old next line
                doc.buffer.unwrap_line(line + 2)?;
                doc.apply_entry(HistoryEntry::UnwrapLine {
                    line: line + 2,
                    old_line_length: tail,
                });
                doc.line_removed(line + 2);
            }
            doc.touch_lines(LineRange::new(line, line + 1));
            let range = TextRange::new(TextPos::new(line, col), TextPos::line_start(line + 1));
            doc.notify(|observer| observer.text_inserted(range));
            if !new_line_added && next_length == Some(0) {
                // an empty next line was replaced by the tail
                doc.record(EditCommand::WrapLine {
                    line,
                    col,
                    len: tail,
                    new_line_added: true,
                });
                doc.record(EditCommand::RemoveLine {
                    line: line + 2,
                    text: String::new(),
                });
            } else {
                doc.record(EditCommand::WrapLine {
                    line,
                    col,
                    len: tail,
                    new_line_added,
                });
            }
            Ok(new_line_added)
        })
    }

    /// Merge `line + 1` onto the end of `line`.
    ///
    /// With `remove_line` the whole next line is merged. Without it only the
    /// first `expected_length` columns of the next line are joined and the
    /// rest stays behind as `line + 1`; a next line no longer than
    /// `expected_length` is merged whole.
    pub fn edit_unwrap_line(
        &mut self,
        line: usize,
        remove_line: bool,
        expected_length: usize,
    ) -> Result<(), EditError> {
        log::debug!(
            "edit_unwrap_line line={} remove_line={} expected_length={}",
            line,
            remove_line,
            expected_length
        );
        let length = self.check_line(line).inspect_err(rejected)?;
        let next_length = self.check_line(line + 1).inspect_err(rejected)?;
        let partial = !remove_line && next_length > expected_length;
        if (remove_line && next_length != expected_length)
            || (!remove_line && next_length < expected_length)
        {
            log::warn!(
                "unwrapping line {}: expected {} columns on the next line, found {}",
                line,
                expected_length,
                next_length
            );
        }
        let joined = if partial { expected_length } else { next_length };

        self.in_session(|doc| {
            if partial {
                // split off the part that stays behind first
                let split = TextPos::new(line + 1, joined);
                doc.buffer.wrap_line(split).inspect_err(rejected)?;
                doc.apply_entry(HistoryEntry::WrapLine {
                    line: line + 1,
                    column: joined,
                });
                doc.line_inserted_after(line + 1);
                doc.shift_marks_for_wrap(line + 1, joined);
                let range = TextRange::new(split, TextPos::line_start(line + 2));
                doc.notify(|observer| observer.text_inserted(range));
            }

            doc.buffer.unwrap_line(line + 1).inspect_err(rejected)?;
            doc.apply_entry(HistoryEntry::UnwrapLine {
                line: line + 1,
                old_line_length: length,
            });
            doc.line_removed(line + 1);
            doc.shift_marks_for_unwrap(line);
            let touched = if partial {
                LineRange::new(line, line + 1)
            } else {
                LineRange::single(line)
            };
            doc.touch_lines(touched);
            let range = TextRange::new(TextPos::new(line, length), TextPos::line_start(line + 1));
            doc.notify(|observer| observer.text_removed(range, "\n"));
            doc.record(EditCommand::UnwrapLine {
                line,
                length,
                next_length: joined,
                remove_line: !partial,
            });
            Ok(())
        })
    }

    /// Insert a new line holding `text` so that it becomes line `line`
    pub fn edit_insert_line(&mut self, line: usize, text: &str) -> Result<(), EditError> {
        log::debug!("edit_insert_line line={} text={:?}", line, text);
        let count = self.buffer.count();
        if line > count {
            return Err(EditError::LineOutOfRange { line, count }).inspect_err(rejected);
        }
        if text.contains('\n') {
            return Err(EditError::LineBreakInText { line }).inspect_err(rejected);
        }

        self.in_session(|doc| {
            let split = if line > 0 {
                TextPos::new(line - 1, doc.buffer.line_length(line - 1).unwrap_or(0))
            } else {
                TextPos::zero()
            };
            doc.buffer.wrap_line(split)?;
            doc.apply_entry(HistoryEntry::WrapLine {
                line: split.line,
                column: split.col,
            });
            doc.line_inserted_after(split.line);

            let length = utf16_len(text);
            if length > 0 {
                doc.buffer.insert_text(TextPos::line_start(line), text)?;
                doc.apply_entry(HistoryEntry::InsertText {
                    line,
                    column: 0,
                    length,
                    old_line_length: 0,
                });
            }
            doc.shift_marks_for_inserted_line(line);
            doc.touch_lines(LineRange::new(split.line, line));

            let range = if line > 0 {
                TextRange::new(split, TextPos::new(line, length))
            } else {
                TextRange::new(TextPos::zero(), TextPos::line_start(1))
            };
            doc.notify(|observer| observer.text_inserted(range));
            doc.record(EditCommand::InsertLine {
                line,
                text: text.to_string(),
            });
            Ok(())
        })
    }

    pub fn edit_remove_line(&mut self, line: usize) -> Result<(), EditError> {
        self.edit_remove_lines(line, line)
    }

    /// Remove lines `from..=to`. Removing the only line clears its text.
    pub fn edit_remove_lines(&mut self, from: usize, to: usize) -> Result<(), EditError> {
        log::debug!("edit_remove_lines from={} to={}", from, to);
        if to < from {
            return Err(EditError::InvalidLineInterval { from, to }).inspect_err(rejected);
        }
        self.check_line(to).inspect_err(rejected)?;
        if self.buffer.count() == 1 {
            return match self.buffer.line_length(0) {
                Some(length) if length > 0 => self.edit_remove_text(0, 0, length),
                _ => Ok(()),
            };
        }

        self.in_session(|doc| {
            for line in (from..=to).rev() {
                doc.remove_one_line(line)?;
            }
            doc.remove_marks_for_lines(from, to);
            Ok(())
        })
    }

    fn remove_one_line(&mut self, line: usize) -> Result<(), EditError> {
        let text = self.buffer.line_text(line).unwrap_or("").to_string();
        let length = utf16_len(&text);

        if line + 1 < self.buffer.count() {
            // pull the next line up, then drop the removed text in front of it
            self.buffer.unwrap_line(line + 1)?;
            self.apply_entry(HistoryEntry::UnwrapLine {
                line: line + 1,
                old_line_length: length,
            });
            self.line_removed(line + 1);
            if length > 0 {
                self.buffer.remove_text(TextRange::on_line(line, 0, length))?;
                self.apply_entry(HistoryEntry::RemoveText {
                    line,
                    column: 0,
                    length,
                });
            }
            self.touch_lines(LineRange::single(line));
            let range = TextRange::new(TextPos::line_start(line), TextPos::line_start(line + 1));
            let removed = format!("{}\n", text);
            self.notify(|observer| observer.text_removed(range, &removed));
            self.record(EditCommand::RemoveLine { line, text });
        } else if line > 0 {
            let previous = self.buffer.line_length(line - 1).unwrap_or(0);
            self.buffer.unwrap_line(line)?;
            self.apply_entry(HistoryEntry::UnwrapLine {
                line,
                old_line_length: previous,
            });
            self.line_removed(line);
            if length > 0 {
                self.buffer
                    .remove_text(TextRange::on_line(line - 1, previous, previous + length))?;
                self.apply_entry(HistoryEntry::RemoveText {
                    line: line - 1,
                    column: previous,
                    length,
                });
            }
            self.touch_lines(LineRange::single(line - 1));
            let range = TextRange::new(TextPos::new(line - 1, previous), TextPos::new(line, length));
            let removed = format!("\n{}", text);
            self.notify(|observer| observer.text_removed(range, &removed));
            self.record(EditCommand::RemoveLine { line, text });
        } else if length > 0 {
            // last remaining line keeps existing, only its text goes
            let range = TextRange::on_line(0, 0, length);
            self.buffer.remove_text(range)?;
            self.apply_entry(HistoryEntry::RemoveText {
                line: 0,
                column: 0,
                length,
            });
            self.touch_lines(LineRange::single(0));
            self.notify(|observer| observer.text_removed(range, &text));
            self.record(EditCommand::RemoveText {
                line: 0,
                col: 0,
                text,
            });
        }
        Ok(())
    }

    /// Flag `line` as produced by static word wrap
    pub fn edit_mark_line_auto_wrapped(&mut self, line: usize, auto_wrapped: bool) -> Result<(), EditError> {
        log::debug!(
            "edit_mark_line_auto_wrapped line={} auto_wrapped={}",
            line,
            auto_wrapped
        );
        let count = self.buffer.count();
        let text_line = self
            .buffer
            .line_mut(line)
            .ok_or(EditError::LineOutOfRange { line, count })
            .inspect_err(rejected)?;
        let previous = text_line.is_auto_wrapped();
        text_line.set_auto_wrapped(auto_wrapped);
        self.in_session(|doc| {
            doc.record(EditCommand::MarkLineAutoWrapped {
                line,
                auto_wrapped,
                previous,
            });
            Ok(())
        })
    }

    /// Move every live cursor and range across one primitive edit
    fn apply_entry(&mut self, entry: HistoryEntry) {
        for cursor in self.cursors.values_mut() {
            cursor.apply(&entry);
        }
        for (&id, range) in self.ranges.iter_mut() {
            let old_lines = range.to_line_range();
            if range.apply(&entry) {
                self.lookup.sync(id, old_lines, range.to_line_range());
                self.session.pending.changed_ranges.insert(id);
            }
        }
        self.session.pending.entries.push(entry);
    }

    fn record(&mut self, command: EditCommand) {
        self.session.pending.commands.push(command);
    }

    fn touch_lines(&mut self, lines: LineRange) {
        let pending = &mut self.session.pending;
        pending.touched = union_lines(pending.touched, Some(lines));
    }

    /// A new line appeared right below `line`
    fn line_inserted_after(&mut self, line: usize) {
        if let Some(touched) = self.session.pending.touched.as_mut() {
            if touched.start > line {
                touched.start += 1;
            }
            if touched.end > line {
                touched.end += 1;
            }
        }
    }

    /// `line` was merged into the line above
    fn line_removed(&mut self, line: usize) {
        if let Some(touched) = self.session.pending.touched.as_mut() {
            if touched.start >= line {
                touched.start -= 1;
            }
            if touched.end >= line {
                touched.end -= 1;
            }
        }
    }
}

fn rejected(err: &EditError) {
    log::debug!("edit rejected: {}", err);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moving::InsertBehavior;

    #[test]
    fn test_nested_sessions_commit_once() {
        let mut doc = Document::from_text("abc");
        doc.edit_start();
        doc.edit_start();
        doc.edit_insert_text(0, 0, "x").unwrap();
        doc.edit_end();
        assert!(doc.is_editing());
        doc.edit_insert_text(0, 0, "y").unwrap();
        assert_eq!(doc.revision(), 0);
        doc.edit_end();
        assert!(!doc.is_editing());
        assert_eq!(doc.revision(), 1);
        assert_eq!(doc.text(), "yxabc");
    }

    #[test]
    fn test_rejected_or_empty_edits_keep_revision() {
        let mut doc = Document::from_text("abc");
        assert!(doc.edit_insert_text(4, 0, "x").is_err());
        assert!(doc.edit_insert_text(0, 0, "a\nb").is_err());
        doc.edit_insert_text(0, 1, "").unwrap();
        doc.edit_remove_text(0, 1, 0).unwrap();
        assert_eq!(doc.revision(), 0);
        assert_eq!(doc.text(), "abc");
    }

    #[test]
    #[should_panic(expected = "without a matching edit_start")]
    fn test_unbalanced_edit_end_panics() {
        let mut doc = Document::new();
        doc.edit_end();
    }

    #[test]
    fn test_push_pop_edit_state() {
        let mut doc = Document::from_text("abc");
        doc.push_edit_state();
        doc.edit_start();
        doc.edit_start();
        doc.edit_insert_text(0, 3, "d").unwrap();
        doc.pop_edit_state();
        assert!(!doc.is_editing());
        assert_eq!(doc.revision(), 1);
    }

    #[test]
    fn test_insert_pads_past_line_end() {
        let mut doc = Document::from_text("ab");
        doc.edit_insert_text(0, 5, "x").unwrap();
        assert_eq!(doc.line_text(0), Some("ab   x"));
    }

    #[test]
    fn test_remove_clamps_and_rejects_bad_column() {
        let mut doc = Document::from_text("abcdef");
        doc.edit_remove_text(0, 4, 10).unwrap();
        assert_eq!(doc.line_text(0), Some("abcd"));
        assert_eq!(
            doc.edit_remove_text(0, 4, 1),
            Err(EditError::ColumnOutOfRange {
                line: 0,
                col: 4,
                length: 4
            })
        );
        let mut empty = Document::new();
        assert!(empty.edit_remove_text(0, 0, 1).is_err());
    }

    #[test]
    fn test_wrap_adds_line_at_end_or_when_forced() {
        let mut doc = Document::from_text("hello world\nnext");
        assert!(doc.edit_wrap_line(0, 5, true).unwrap());
        assert_eq!(doc.text(), "hello\n world\nnext");
        assert!(doc.edit_wrap_line(2, 2, false).unwrap());
        assert_eq!(doc.text(), "hello\n world\nne\nxt");
    }

    #[test]
    fn test_wrap_prepends_onto_existing_next_line() {
        let mut doc = Document::from_text("one two\nthree");
        let cursor = doc.new_moving_cursor(TextPos::new(1, 2), InsertBehavior::MoveOnInsert);
        assert!(!doc.edit_wrap_line(0, 4, false).unwrap());
        assert_eq!(doc.text(), "one \ntwothree");
        assert_eq!(doc.cursor_position(cursor), Some(TextPos::new(1, 5)));
    }

    #[test]
    fn test_unwrap_without_remove_joins_expected_length() {
        let mut doc = Document::from_text("foo\nbarbaz\nend");
        let joined = doc.new_moving_cursor(TextPos::new(1, 1), InsertBehavior::StayOnInsert);
        let left = doc.new_moving_cursor(TextPos::new(1, 4), InsertBehavior::StayOnInsert);
        let below = doc.new_moving_cursor(TextPos::new(2, 1), InsertBehavior::StayOnInsert);
        doc.add_mark(2, 0x1);

        doc.edit_unwrap_line(0, false, 3).unwrap();

        assert_eq!(doc.text(), "foobar\nbaz\nend");
        assert_eq!(doc.cursor_position(joined), Some(TextPos::new(0, 4)));
        assert_eq!(doc.cursor_position(left), Some(TextPos::new(1, 1)));
        assert_eq!(doc.cursor_position(below), Some(TextPos::new(2, 1)));
        assert_eq!(doc.mark(2), 0x1);

        // the whole line goes when asked to remove it
        doc.edit_unwrap_line(0, true, 3).unwrap();
        assert_eq!(doc.text(), "foobarbaz\nend");
    }

    #[test]
    fn test_remove_on_empty_line_is_rejected() {
        let mut doc = Document::from_text("\nabc");
        assert_eq!(
            doc.edit_remove_text(0, 0, 0),
            Err(EditError::ColumnOutOfRange {
                line: 0,
                col: 0,
                length: 0
            })
        );
        assert_eq!(doc.edit_remove_text(1, 0, 0), Ok(()));
        assert_eq!(doc.revision(), 0);
    }

    #[test]
    fn test_unwrap_merges_next_line() {
        let mut doc = Document::from_text("foo\nbar");
        let cursor = doc.new_moving_cursor(TextPos::new(1, 1), InsertBehavior::StayOnInsert);
        doc.edit_unwrap_line(0, false, 3).unwrap();
        assert_eq!(doc.text(), "foobar");
        assert_eq!(doc.cursor_position(cursor), Some(TextPos::new(0, 4)));
        assert!(doc.edit_unwrap_line(0, true, 0).is_err());
    }

    #[test]
    fn test_insert_and_remove_lines_move_cursors() {
        let mut doc = Document::from_text("a\nb\nc");
        let on_c = doc.new_moving_cursor(TextPos::new(2, 1), InsertBehavior::StayOnInsert);
        doc.edit_insert_line(1, "new").unwrap();
        assert_eq!(doc.text(), "a\nnew\nb\nc");
        assert_eq!(doc.cursor_position(on_c), Some(TextPos::new(3, 1)));

        let on_b = doc.new_moving_cursor(TextPos::new(2, 1), InsertBehavior::StayOnInsert);
        doc.edit_remove_lines(1, 2).unwrap();
        assert_eq!(doc.text(), "a\nc");
        assert_eq!(doc.cursor_position(on_b), Some(TextPos::new(1, 0)));
        assert_eq!(doc.cursor_position(on_c), Some(TextPos::new(1, 1)));
    }

    #[test]
    fn test_insert_line_at_top_and_bottom() {
        let mut doc = Document::from_text("mid");
        doc.edit_insert_line(0, "top").unwrap();
        doc.edit_insert_line(2, "bottom").unwrap();
        assert_eq!(doc.text(), "top\nmid\nbottom");
        assert!(doc.edit_insert_line(5, "x").is_err());
    }

    #[test]
    fn test_remove_last_line_merges_upward() {
        let mut doc = Document::from_text("a\nbc");
        let cursor = doc.new_moving_cursor(TextPos::new(1, 2), InsertBehavior::StayOnInsert);
        doc.edit_remove_line(1).unwrap();
        assert_eq!(doc.text(), "a");
        assert_eq!(doc.cursor_position(cursor), Some(TextPos::new(0, 1)));
    }

    #[test]
    fn test_removing_every_line_leaves_one_empty_line() {
        let mut doc = Document::from_text("a\nb\nc");
        doc.edit_remove_lines(0, 2).unwrap();
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.text(), "");

        let mut single = Document::from_text("only");
        single.edit_remove_line(0).unwrap();
        assert_eq!(single.text(), "");
        assert!(single.edit_remove_lines(1, 0).is_err());
    }

    #[test]
    fn test_mark_line_auto_wrapped() {
        let mut doc = Document::from_text("a\nb");
        doc.edit_mark_line_auto_wrapped(1, true).unwrap();
        assert!(doc.is_line_auto_wrapped(1));
        assert!(doc.edit_mark_line_auto_wrapped(2, true).is_err());
    }
}
