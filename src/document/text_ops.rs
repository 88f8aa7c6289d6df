//! High level text operations and text queries
//!
//! Everything here is composed from the edit primitives inside one edit
//! session, so cursors, ranges, marks and history see only primitive edits.
//! Block mode works on tab-expanded (virtual) columns: a block spans the
//! same virtual columns on every line it covers.

use super::Document;
use crate::config::RemoveSpaces;
use crate::error::{ColumnError, EditError};
use crate::text::line::{self, utf16_len};
use crate::text::{TextPos, TextRange};

impl Document {
    /// Insert `text`, which may span lines.
    ///
    /// Missing lines up to `pos.line` are created first. In block mode each
    /// further line of `text` goes into the next document line at the same
    /// virtual column instead of splitting the current line.
    pub fn insert_text(&mut self, pos: TextPos, text: &str, block: bool) -> Result<(), EditError> {
        if text.is_empty() {
            return Ok(());
        }
        if !block {
            if let Some(current) = self.buffer.line_text(pos.line) {
                if let Err(ColumnError::SplitsSurrogatePair) = line::byte_index(current, pos.col) {
                    return Err(EditError::SplitsSurrogatePair {
                        line: pos.line,
                        col: pos.col,
                    });
                }
            }
        }

        self.in_session(|doc| {
            while doc.buffer.count() <= pos.line {
                let count = doc.buffer.count();
                doc.edit_insert_line(count, "")?;
            }

            let virtual_column = doc.virtual_column_or_raw(pos);
            let mut line = pos.line;
            let mut col = pos.col;
            let mut segments = text.split('\n').peekable();
            while let Some(segment) = segments.next() {
                if !segment.is_empty() {
                    doc.edit_insert_text(line, col, segment)?;
                }
                if segments.peek().is_none() {
                    break;
                }
                if !block {
                    doc.edit_wrap_line(line, col + utf16_len(segment), true)?;
                    col = 0;
                }
                line += 1;
                if block {
                    if line == doc.buffer.count() {
                        doc.edit_insert_line(line, "")?;
                    }
                    col = doc.block_column(line, virtual_column);
                }
            }
            Ok(())
        })
    }

    /// Insert each of `lines` as separate document lines starting at `pos`
    pub fn insert_text_lines<S: AsRef<str>>(
        &mut self,
        pos: TextPos,
        lines: &[S],
        block: bool,
    ) -> Result<(), EditError> {
        let joined = lines
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("\n");
        self.insert_text(pos, &joined, block)
    }

    /// Remove `range`. A range running past the last line is cut at the
    /// document end. In block mode the virtual column interval of `range`
    /// is removed from every covered line.
    pub fn remove_text(&mut self, range: TextRange, block: bool) -> Result<(), EditError> {
        if range.end < range.start {
            return Err(EditError::InvertedRange);
        }
        let count = self.buffer.count();
        if range.start.line >= count {
            return Err(EditError::LineOutOfRange {
                line: range.start.line,
                count,
            });
        }

        self.in_session(|doc| {
            if block {
                doc.remove_block(range)
            } else {
                doc.remove_stream(range)
            }
        })
    }

    fn remove_stream(&mut self, mut range: TextRange) -> Result<(), EditError> {
        let last = self.buffer.count() - 1;
        if range.end.line > last {
            range.end = TextPos::line_start(last + 1);
        }
        if range.is_single_line() {
            return self.remove_clamped(
                range.start.line,
                range.start.col,
                range.end.col - range.start.col,
            );
        }

        let mut from = range.start.line;
        let to = range.end.line;
        if to <= last {
            self.remove_clamped(to, 0, range.end.col)?;
        }
        // a range starting at column 0 takes the line break above it along
        if range.start.col == 0 && from > 0 {
            from -= 1;
        }
        if to >= from + 2 {
            self.edit_remove_lines(from + 1, to - 1)?;
        }
        if range.start.col > 0 || range.start.line == 0 {
            let length = self.buffer.line_length(from).unwrap_or(0);
            self.remove_clamped(from, range.start.col, length.saturating_sub(range.start.col))?;
            if let Some(next_length) = self.buffer.line_length(from + 1) {
                self.edit_unwrap_line(from, true, next_length)?;
            }
        }
        Ok(())
    }

    fn remove_block(&mut self, range: TextRange) -> Result<(), EditError> {
        let first = self.virtual_column_or_raw(range.start);
        let second = self.virtual_column_or_raw(range.end);
        let last = range.end.line.min(self.buffer.count() - 1);
        for line in (range.start.line..=last).rev() {
            let a = self.block_column(line, first);
            let b = self.block_column(line, second);
            self.remove_clamped(line, a.min(b), a.abs_diff(b))?;
        }
        Ok(())
    }

    /// Remove `range` and insert `text` at its start
    pub fn replace_text(&mut self, range: TextRange, text: &str, block: bool) -> Result<(), EditError> {
        self.in_session(|doc| {
            doc.remove_text(range, block)?;
            doc.insert_text(range.start, text, block)
        })
    }

    /// Replace the whole document. Moving content is invalidated; marks
    /// are restored on lines that still exist.
    pub fn set_text(&mut self, text: &str) -> Result<(), EditError> {
        let saved_marks = self.marks.clone();
        self.in_session(|doc| {
            doc.clear()?;
            doc.insert_text(TextPos::zero(), text, false)
        })?;
        for (line, mark_type) in saved_marks {
            self.set_mark(line, mark_type);
        }
        Ok(())
    }

    /// Drop all text, marks and moving content, leaving one empty line
    pub fn clear(&mut self) -> Result<(), EditError> {
        self.clear_marks();
        self.invalidate_moving_content();
        let last = self.buffer.count() - 1;
        self.edit_remove_lines(0, last)
    }

    pub fn insert_line(&mut self, line: usize, text: &str) -> Result<(), EditError> {
        self.edit_insert_line(line, text)
    }

    /// Insert `lines` so the first becomes line `line`
    pub fn insert_lines<S: AsRef<str>>(&mut self, line: usize, lines: &[S]) -> Result<(), EditError> {
        let count = self.buffer.count();
        if line > count {
            return Err(EditError::LineOutOfRange { line, count });
        }
        self.in_session(|doc| {
            for (offset, text) in lines.iter().enumerate() {
                doc.edit_insert_line(line + offset, text.as_ref())?;
            }
            Ok(())
        })
    }

    pub fn remove_line(&mut self, line: usize) -> Result<(), EditError> {
        self.edit_remove_line(line)
    }

    /// Join lines `first..=last` into `first`, leaving exactly one space
    /// at each seam. Stops at the first empty line.
    pub fn join_lines(&mut self, first: usize, last: usize) -> Result<(), EditError> {
        self.in_session(|doc| {
            for _ in first..last {
                let (Some(current), Some(next)) = (
                    doc.buffer.line_text(first).map(str::to_string),
                    doc.buffer.line_text(first + 1).map(str::to_string),
                ) else {
                    break;
                };
                if current.is_empty() || next.is_empty() {
                    break;
                }

                match line::first_char(&next) {
                    Some(indent) => {
                        if indent > 0 {
                            doc.edit_remove_text(first + 1, 0, indent)?;
                        }
                        if !current.ends_with(char::is_whitespace) {
                            doc.edit_insert_text(first + 1, 0, " ")?;
                        }
                    }
                    None => doc.edit_remove_text(first + 1, 0, utf16_len(&next))?,
                }
                let next_length = doc.buffer.line_length(first + 1).unwrap_or(0);
                doc.edit_unwrap_line(first, true, next_length)?;
            }
            Ok(())
        })
    }

    /// Static word wrap of lines `start..=end` at the configured column.
    ///
    /// Breaks after the last space before the wrap column, or at the column
    /// itself when there is none. A tail moves onto the next line when that
    /// line was itself produced by wrapping; otherwise it becomes a new line.
    pub fn wrap_text(&mut self, start: usize, end: usize) -> Result<(), EditError> {
        let wrap_at = self.config.word_wrap_at;
        let tab_width = self.config.tab_width;
        if wrap_at == 0 {
            return Ok(());
        }

        self.in_session(|doc| {
            let mut end = end;
            let mut line = start;
            while line <= end && line < doc.buffer.count() {
                let text = doc.buffer.line_text(line).unwrap_or("").to_string();
                if text.is_empty() {
                    break;
                }
                if line::virtual_length(&text, tab_width) > wrap_at {
                    let split = break_column(&text, wrap_at, tab_width);
                    if doc.is_line_auto_wrapped(line + 1) {
                        let next = doc.buffer.line_text(line + 1).unwrap_or("");
                        let next_starts_word = next.chars().next().is_some_and(|ch| !ch.is_whitespace());
                        if next_starts_word && !text.ends_with(char::is_whitespace) {
                            doc.edit_insert_text(line + 1, 0, " ")?;
                        }
                        doc.edit_wrap_line(line, split, false)?;
                    } else {
                        doc.edit_wrap_line(line, split, true)?;
                    }
                    doc.edit_mark_line_auto_wrapped(line + 1, true)?;
                    end += 1;
                }
                line += 1;
            }
            Ok(())
        })
    }

    /// Strip trailing whitespace according to the `remove_spaces` setting.
    /// Static word wrap is suspended meanwhile.
    pub fn remove_trailing_spaces(&mut self) -> Result<(), EditError> {
        let policy = self.config.remove_spaces;
        if policy == RemoveSpaces::None {
            return Ok(());
        }
        let word_wrap = self.config.word_wrap;
        self.config.word_wrap = false;

        let result = self.in_session(|doc| {
            for line in 0..doc.buffer.count() {
                if policy != RemoveSpaces::All && !doc.is_line_touched(line) {
                    continue;
                }
                let text = doc.buffer.line_text(line).unwrap_or("");
                let keep = line::last_char(text).map_or(0, |last| last + 1);
                let trailing = utf16_len(text) - keep;
                if trailing > 0 {
                    doc.edit_remove_text(line, keep, trailing)?;
                }
            }
            Ok(())
        });

        self.config.word_wrap = word_wrap;
        result
    }

    /// Text covered by `range`, lines joined with `\n`.
    ///
    /// An inverted range yields an empty string. In block mode every line
    /// contributes the virtual column interval of `range`.
    pub fn text_in_range(&self, range: TextRange, block: bool) -> String {
        self.text_lines(range, block).join("\n")
    }

    /// Like [`Document::text_in_range`], one entry per covered line
    pub fn text_lines(&self, range: TextRange, block: bool) -> Vec<String> {
        if range.end < range.start {
            log::warn!("text requested for invalid range {}", range);
            return Vec::new();
        }

        if range.is_single_line() {
            return match self.buffer.line_text(range.start.line) {
                Some(text) if !text.is_empty() => vec![line::mid(
                    text,
                    range.start.col,
                    range.end.col - range.start.col,
                )],
                _ => Vec::new(),
            };
        }

        let last = range.end.line.min(self.buffer.count() - 1);
        let mut lines = Vec::new();
        for index in range.start.line..=last {
            let text = self.buffer.line_text(index).unwrap_or("");
            let part = if block {
                let on_line = self.range_on_line(range, index);
                line::mid(text, on_line.start.col, on_line.end.col - on_line.start.col)
            } else if index == range.start.line {
                line::mid(text, range.start.col, usize::MAX)
            } else if index == range.end.line {
                line::mid(text, 0, range.end.col)
            } else {
                text.to_string()
            };
            lines.push(part);
        }
        lines
    }

    /// Raw column span on `line` matching the virtual columns of `range`,
    /// ordered left to right
    pub fn range_on_line(&self, range: TextRange, line: usize) -> TextRange {
        let a = self.block_column(line, self.virtual_column_or_raw(range.start));
        let b = self.block_column(line, self.virtual_column_or_raw(range.end));
        TextRange::on_line(line, a.min(b), a.max(b))
    }

    fn virtual_column_or_raw(&self, pos: TextPos) -> usize {
        self.to_virtual_column(pos).unwrap_or(pos.col)
    }

    /// Raw column of `virtual_column` on `line`, moved off the inside of a
    /// surrogate pair
    fn block_column(&self, line: usize, virtual_column: usize) -> usize {
        match self.buffer.line_text(line) {
            Some(text) if !text.is_empty() => {
                let col = line::from_virtual_column(text, virtual_column, self.config.tab_width);
                match line::byte_index(text, col) {
                    Err(ColumnError::SplitsSurrogatePair) => col + 1,
                    _ => col,
                }
            }
            _ => virtual_column,
        }
    }

    /// Remove up to `len` columns; nothing when `col` lies at or past the
    /// line end
    fn remove_clamped(&mut self, line: usize, col: usize, len: usize) -> Result<(), EditError> {
        match self.buffer.line_length(line) {
            Some(length) if col < length && len > 0 => self.edit_remove_text(line, col, len),
            _ => Ok(()),
        }
    }
}

/// Column to split an over-long line at
fn break_column(text: &str, wrap_at: usize, tab_width: usize) -> usize {
    let units: Vec<u16> = text.encode_utf16().collect();
    let is_space = |unit: u16| char::from_u32(u32::from(unit)).is_some_and(char::is_whitespace);
    let last = units.len() - 1;

    let mut x = 0;
    let mut z = 0;
    while z < units.len() {
        if units[z] == u16::from(b'\t') {
            x += line::tab_advance(x, tab_width);
        } else {
            x += 1;
        }
        if x > wrap_at {
            break;
        }
        z += 1;
    }
    let limit = z.min(last);

    // a space at the very end is not worth wrapping for
    let mut search = limit;
    if search == last && is_space(units[search]) && search > 0 {
        search -= 1;
    }
    let split = match (0..=search).rev().find(|&i| is_space(units[i])) {
        // keep the space on the first line
        Some(space) => space + 1,
        None => limit,
    };

    match line::byte_index(text, split) {
        Err(ColumnError::SplitsSurrogatePair) => split + 1,
        _ => split,
    }
}
