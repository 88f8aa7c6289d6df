//! Per-line marks
//!
//! A mark is a bit set on a line (bookmark, breakpoint, ...). Mark types are
//! caller-defined bits; `0` means no mark. Marks follow their line through
//! wraps, unwraps and line insertion and removal.

use std::collections::BTreeMap;

use super::Document;

impl Document {
    /// Mark bits on `line`, `0` when unmarked
    pub fn mark(&self, line: usize) -> u32 {
        self.marks.get(&line).copied().unwrap_or(0)
    }

    pub fn marks(&self) -> &BTreeMap<usize, u32> {
        &self.marks
    }

    /// Replace the mark bits of `line`
    pub fn set_mark(&mut self, line: usize, mark_type: u32) {
        if line >= self.buffer.count() {
            return;
        }
        self.marks.remove(&line);
        if mark_type != 0 {
            self.marks.insert(line, mark_type);
        }
        self.notify(|observer| observer.marks_changed());
    }

    /// Set the bits of `mark_type` on `line`
    pub fn add_mark(&mut self, line: usize, mark_type: u32) {
        if line >= self.buffer.count() || mark_type == 0 {
            return;
        }
        let bits = self.marks.entry(line).or_insert(0);
        if *bits & mark_type == mark_type {
            return;
        }
        *bits |= mark_type;
        self.notify(|observer| observer.marks_changed());
    }

    /// Clear the bits of `mark_type` on `line`
    pub fn remove_mark(&mut self, line: usize, mark_type: u32) {
        let Some(bits) = self.marks.get_mut(&line) else {
            return;
        };
        if *bits & mark_type == 0 {
            return;
        }
        *bits &= !mark_type;
        if *bits == 0 {
            self.marks.remove(&line);
        }
        self.notify(|observer| observer.marks_changed());
    }

    /// Remove every mark on `line`
    pub fn clear_mark(&mut self, line: usize) {
        if self.marks.remove(&line).is_some() {
            self.notify(|observer| observer.marks_changed());
        }
    }

    pub fn clear_marks(&mut self) {
        if self.marks.is_empty() {
            return;
        }
        self.marks.clear();
        self.notify(|observer| observer.marks_changed());
    }

    /// `line` split at `col`: marks below move down, a split at column 0
    /// carries the line's own mark along
    pub(crate) fn shift_marks_for_wrap(&mut self, line: usize, col: usize) {
        self.renumber_marks(|mark_line| {
            if mark_line > line || (col == 0 && mark_line == line) {
                Some(mark_line + 1)
            } else {
                Some(mark_line)
            }
        });
    }

    /// `line + 1` merged into `line`: its marks join those of `line`
    pub(crate) fn shift_marks_for_unwrap(&mut self, line: usize) {
        self.renumber_marks(|mark_line| {
            if mark_line > line {
                Some(mark_line - 1)
            } else {
                Some(mark_line)
            }
        });
    }

    /// New line inserted at `line`
    pub(crate) fn shift_marks_for_inserted_line(&mut self, line: usize) {
        self.renumber_marks(|mark_line| {
            if mark_line >= line {
                Some(mark_line + 1)
            } else {
                Some(mark_line)
            }
        });
    }

    /// Lines `from..=to` removed
    pub(crate) fn remove_marks_for_lines(&mut self, from: usize, to: usize) {
        let removed = to - from + 1;
        self.renumber_marks(|mark_line| {
            if mark_line < from {
                Some(mark_line)
            } else if mark_line <= to {
                None
            } else {
                Some(mark_line - removed)
            }
        });
    }

    /// Move every mark through `renumber`; marks landing on the same line
    /// are merged, `None` drops the mark
    fn renumber_marks(&mut self, renumber: impl Fn(usize) -> Option<usize>) {
        if self.marks.is_empty() {
            return;
        }
        let old = std::mem::take(&mut self.marks);
        let mut changed = false;
        for (line, bits) in old {
            match renumber(line) {
                Some(new_line) => {
                    changed |= new_line != line;
                    *self.marks.entry(new_line).or_insert(0) |= bits;
                }
                None => changed = true,
            }
        }
        if changed {
            self.notify(|observer| observer.marks_changed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOKMARK: u32 = 0x1;
    const BREAKPOINT: u32 = 0x2;

    #[test]
    fn test_mark_bits() {
        let mut doc = Document::from_text("a\nb\nc");
        doc.add_mark(1, BOOKMARK);
        doc.add_mark(1, BREAKPOINT);
        assert_eq!(doc.mark(1), BOOKMARK | BREAKPOINT);
        doc.remove_mark(1, BOOKMARK);
        assert_eq!(doc.mark(1), BREAKPOINT);
        doc.set_mark(2, BOOKMARK);
        doc.add_mark(7, BOOKMARK);
        assert_eq!(doc.marks().len(), 2);
        doc.clear_mark(1);
        assert_eq!(doc.mark(1), 0);
        doc.clear_marks();
        assert!(doc.marks().is_empty());
    }

    #[test]
    fn test_marks_follow_wrap_and_unwrap() {
        let mut doc = Document::from_text("abc\ndef\nghi");
        doc.add_mark(0, BOOKMARK);
        doc.add_mark(1, BREAKPOINT);
        doc.edit_wrap_line(0, 1, true).unwrap();
        assert_eq!(doc.mark(0), BOOKMARK);
        assert_eq!(doc.mark(2), BREAKPOINT);

        doc.edit_wrap_line(2, 0, true).unwrap();
        assert_eq!(doc.mark(2), 0);
        assert_eq!(doc.mark(3), BREAKPOINT);

        doc.edit_unwrap_line(2, false, 3).unwrap();
        assert_eq!(doc.mark(2), BREAKPOINT);
        doc.edit_unwrap_line(1, false, 3).unwrap();
        assert_eq!(doc.mark(1), BREAKPOINT);
    }

    #[test]
    fn test_marks_follow_line_insert_and_remove() {
        let mut doc = Document::from_text("a\nb\nc\nd");
        doc.add_mark(1, BOOKMARK);
        doc.add_mark(3, BREAKPOINT);
        doc.edit_insert_line(0, "top").unwrap();
        assert_eq!(doc.mark(2), BOOKMARK);
        assert_eq!(doc.mark(4), BREAKPOINT);

        doc.edit_remove_lines(1, 2).unwrap();
        assert_eq!(doc.marks().len(), 1);
        assert_eq!(doc.mark(2), BREAKPOINT);
    }
}
