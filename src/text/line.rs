//! A single line of text with run-length highlighting attributes
//!
//! Columns are UTF-16 code units. All column helpers in this module are
//! pure functions of `(text, column, tab_width)` so block editing, word wrap
//! and paste can share them.

use serde::{Deserialize, Serialize};

use crate::error::ColumnError;

/// Attribute value meaning "no highlighting"
pub const NO_ATTRIBUTE: u16 = 0;

/// One highlighting span: `length` columns starting at `offset`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeRun {
    pub offset: usize,
    pub length: usize,
    pub attribute: u16,
}

impl AttributeRun {
    pub const fn new(offset: usize, length: usize, attribute: u16) -> Self {
        Self {
            offset,
            length,
            attribute,
        }
    }

    /// First column after the run
    pub const fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Text line plus cached attribute runs and bookkeeping flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLine {
    text: String,
    attributes: Vec<AttributeRun>,
    modified: bool,
    saved: bool,
    auto_wrapped: bool,
}

impl TextLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in UTF-16 code units
    pub fn len(&self) -> usize {
        utf16_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn is_auto_wrapped(&self) -> bool {
        self.auto_wrapped
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    pub fn set_saved(&mut self, saved: bool) {
        self.saved = saved;
    }

    pub fn set_auto_wrapped(&mut self, auto_wrapped: bool) {
        self.auto_wrapped = auto_wrapped;
    }

    /// Modified lines become saved
    pub fn mark_as_saved(&mut self) {
        if self.modified {
            self.modified = false;
            self.saved = true;
        }
    }

    pub fn attributes(&self) -> &[AttributeRun] {
        &self.attributes
    }

    /// Append a run, merging with the last one when contiguous and equal.
    ///
    /// Runs are expected in ascending offset order, the way a highlighter
    /// produces them.
    pub fn add_attribute(&mut self, run: AttributeRun) {
        if run.length == 0 {
            return;
        }
        if let Some(last) = self.attributes.last_mut() {
            if last.attribute == run.attribute && last.end() == run.offset {
                last.length += run.length;
                return;
            }
        }
        self.attributes.push(run);
    }

    /// Replace all runs
    pub fn set_attributes(&mut self, mut runs: Vec<AttributeRun>) {
        runs.sort_by_key(|run| run.offset);
        self.attributes = normalize_runs(runs);
    }

    pub fn clear_attributes(&mut self) {
        self.attributes.clear();
    }

    /// Attribute at `col`, [`NO_ATTRIBUTE`] when no run covers it
    pub fn attribute_at(&self, col: usize) -> u16 {
        let idx = self.attributes.partition_point(|run| run.end() <= col);
        match self.attributes.get(idx) {
            Some(run) if run.offset <= col && col < run.end() => run.attribute,
            _ => NO_ATTRIBUTE,
        }
    }

    /// Insert `text` at `col`.
    ///
    /// A run strictly containing `col` grows over untagged text or text
    /// tagged with its own value; differently tagged text splits it.
    pub fn insert_text(
        &mut self,
        col: usize,
        text: &str,
        attribute: Option<u16>,
    ) -> Result<(), ColumnError> {
        let byte = byte_index(&self.text, col)?;
        if text.is_empty() {
            return Ok(());
        }
        let len = utf16_len(text);
        self.text.insert_str(byte, text);

        let mut pending = attribute.map(|value| AttributeRun::new(col, len, value));
        let mut runs = Vec::with_capacity(self.attributes.len() + 2);
        for run in self.attributes.drain(..) {
            if run.end() <= col {
                runs.push(run);
            } else if run.offset >= col {
                if let Some(inserted) = pending.take() {
                    runs.push(inserted);
                }
                runs.push(AttributeRun::new(run.offset + len, run.length, run.attribute));
            } else {
                match pending.take() {
                    Some(inserted) if inserted.attribute != run.attribute => {
                        runs.push(AttributeRun::new(run.offset, col - run.offset, run.attribute));
                        runs.push(inserted);
                        runs.push(AttributeRun::new(col + len, run.end() - col, run.attribute));
                    }
                    _ => runs.push(AttributeRun::new(run.offset, run.length + len, run.attribute)),
                }
            }
        }
        if let Some(inserted) = pending {
            runs.push(inserted);
        }
        self.attributes = normalize_runs(runs);
        Ok(())
    }

    /// Remove `len` columns starting at `col`, returning the removed text
    pub fn remove_text(&mut self, col: usize, len: usize) -> Result<String, ColumnError> {
        let start = byte_index(&self.text, col)?;
        let end = byte_index(&self.text, col + len)?;
        let removed: String = self.text.drain(start..end).collect();

        let cut_end = col + len;
        let mut runs = Vec::with_capacity(self.attributes.len());
        for run in self.attributes.drain(..) {
            if run.end() <= col {
                runs.push(run);
            } else if run.offset >= cut_end {
                runs.push(AttributeRun::new(run.offset - len, run.length, run.attribute));
            } else {
                let before = col.saturating_sub(run.offset);
                let after = run.end().saturating_sub(cut_end);
                if before + after > 0 {
                    runs.push(AttributeRun::new(
                        run.offset.min(col),
                        before + after,
                        run.attribute,
                    ));
                }
            }
        }
        self.attributes = normalize_runs(runs);
        Ok(removed)
    }

    /// Split at `col`; the returned line holds the tail and its runs
    pub fn split_off(&mut self, col: usize) -> Result<TextLine, ColumnError> {
        let byte = byte_index(&self.text, col)?;
        let tail_text = self.text.split_off(byte);

        let mut head = Vec::new();
        let mut tail = Vec::new();
        for run in self.attributes.drain(..) {
            if run.end() <= col {
                head.push(run);
            } else if run.offset >= col {
                tail.push(AttributeRun::new(run.offset - col, run.length, run.attribute));
            } else {
                head.push(AttributeRun::new(run.offset, col - run.offset, run.attribute));
                tail.push(AttributeRun::new(0, run.end() - col, run.attribute));
            }
        }
        self.attributes = head;

        Ok(TextLine {
            text: tail_text,
            attributes: tail,
            ..TextLine::default()
        })
    }

    /// Concatenate `other` onto this line, merging runs across the seam
    pub fn append(&mut self, other: TextLine) {
        let shift = self.len();
        self.text.push_str(&other.text);
        let mut runs = std::mem::take(&mut self.attributes);
        runs.extend(
            other
                .attributes
                .into_iter()
                .map(|run| AttributeRun::new(run.offset + shift, run.length, run.attribute)),
        );
        self.attributes = normalize_runs(runs);
    }
}

/// Drop empty runs and merge contiguous runs of equal value
fn normalize_runs(runs: Vec<AttributeRun>) -> Vec<AttributeRun> {
    let mut out: Vec<AttributeRun> = Vec::with_capacity(runs.len());
    for run in runs.into_iter().filter(|run| run.length > 0) {
        match out.last_mut() {
            Some(last) if last.attribute == run.attribute && last.end() == run.offset => {
                last.length += run.length;
            }
            _ => out.push(run),
        }
    }
    out
}

/// Length of `text` in UTF-16 code units
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Byte offset of UTF-16 column `col`
pub fn byte_index(text: &str, col: usize) -> Result<usize, ColumnError> {
    let mut units = 0;
    for (byte, ch) in text.char_indices() {
        if units == col {
            return Ok(byte);
        }
        units += ch.len_utf16();
        if units > col {
            return Err(ColumnError::SplitsSurrogatePair);
        }
    }
    if units == col {
        Ok(text.len())
    } else {
        Err(ColumnError::OutOfRange { length: units })
    }
}

/// `len` columns of `text` starting at `start`, clamped to the text.
///
/// A bound falling inside a surrogate pair yields a replacement character.
pub fn mid(text: &str, start: usize, len: usize) -> String {
    let units: Vec<u16> = text.encode_utf16().collect();
    let start = start.min(units.len());
    let end = start.saturating_add(len).min(units.len());
    String::from_utf16_lossy(&units[start..end])
}

fn is_space_unit(unit: u16) -> bool {
    char::from_u32(u32::from(unit)).is_some_and(char::is_whitespace)
}

const TAB: u16 = b'\t' as u16;

/// Columns a tab at virtual column `x` advances by; a zero width counts as one
pub(crate) fn tab_advance(x: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    tab_width - (x % tab_width)
}

/// First non-whitespace column
pub fn first_char(text: &str) -> Option<usize> {
    next_non_space_char(text, 0)
}

/// Last non-whitespace column
pub fn last_char(text: &str) -> Option<usize> {
    previous_non_space_char(text, usize::MAX)
}

pub fn next_non_space_char(text: &str, pos: usize) -> Option<usize> {
    text.encode_utf16()
        .enumerate()
        .skip(pos)
        .find(|&(_, unit)| !is_space_unit(unit))
        .map(|(i, _)| i)
}

/// Searches backwards from `pos` (clamped to the last column)
pub fn previous_non_space_char(text: &str, pos: usize) -> Option<usize> {
    let units: Vec<u16> = text.encode_utf16().collect();
    if units.is_empty() {
        return None;
    }
    let from = pos.min(units.len() - 1);
    (0..=from).rev().find(|&i| !is_space_unit(units[i]))
}

/// Whitespace prefix; the whole text when it is blank
pub fn leading_whitespace(text: &str) -> &str {
    match text.char_indices().find(|(_, ch)| !ch.is_whitespace()) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Width of the leading whitespace with tabs expanded
pub fn indent_depth(text: &str, tab_width: usize) -> usize {
    let mut depth = 0;
    for unit in text.encode_utf16() {
        if !is_space_unit(unit) {
            return depth;
        }
        if unit == TAB {
            depth += tab_advance(depth, tab_width);
        } else {
            depth += 1;
        }
    }
    depth
}

/// Whether `pattern` occurs in `text` exactly at `column`
pub fn matches_at(text: &str, column: usize, pattern: &str) -> bool {
    let units: Vec<u16> = text.encode_utf16().collect();
    let pattern: Vec<u16> = pattern.encode_utf16().collect();
    column
        .checked_add(pattern.len())
        .is_some_and(|end| end <= units.len() && units[column..end] == pattern[..])
}

/// Raw column to tab-expanded column; columns past the end count one each
pub fn to_virtual_column(text: &str, column: usize, tab_width: usize) -> usize {
    let mut x = 0;
    let mut seen = 0;
    for unit in text.encode_utf16().take(column) {
        if unit == TAB {
            x += tab_advance(x, tab_width);
        } else {
            x += 1;
        }
        seen += 1;
    }
    x + column - seen
}

/// Tab-expanded column to raw column.
///
/// A virtual column inside a tab maps to the tab itself.
pub fn from_virtual_column(text: &str, column: usize, tab_width: usize) -> usize {
    let mut x = 0;
    let mut z = 0;
    for unit in text.encode_utf16().take(column) {
        let diff = if unit == TAB { tab_advance(x, tab_width) } else { 1 };
        if x + diff > column {
            break;
        }
        x += diff;
        z += 1;
    }
    z + column.saturating_sub(x)
}

/// Width of the whole line with tabs expanded
pub fn virtual_length(text: &str, tab_width: usize) -> usize {
    text.encode_utf16().fold(0, |x, unit| {
        if unit == TAB {
            x + tab_advance(x, tab_width)
        } else {
            x + 1
        }
    })
}
