//! Line store
//!
//! Ordered sequence of [`TextLine`]s. Only the four primitive mutations live
//! here; everything else (cursor adjustment, history, notification) is the
//! document's job.

use serde::{Deserialize, Serialize};

use super::cursor::{TextPos, TextRange};
use super::line::TextLine;
use crate::error::EditError;

/// Document text as lines. Never empty: a blank document has one empty line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStore {
    lines: Vec<TextLine>,
}

impl LineStore {
    /// Create a store holding one empty line
    pub fn new() -> Self {
        Self {
            lines: vec![TextLine::default()],
        }
    }

    /// Create a store from text, splitting on `\n`
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(TextLine::new).collect(),
        }
    }

    /// Create a store from lines
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<TextLine> = lines.into_iter().map(TextLine::new).collect();
        if lines.is_empty() {
            Self::new()
        } else {
            Self { lines }
        }
    }

    /// Number of lines
    pub fn count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, line: usize) -> Option<&TextLine> {
        self.lines.get(line)
    }

    pub fn line_mut(&mut self, line: usize) -> Option<&mut TextLine> {
        self.lines.get_mut(line)
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    pub fn line_text(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(TextLine::text)
    }

    /// Line length in UTF-16 code units
    pub fn line_length(&self, line: usize) -> Option<usize> {
        self.lines.get(line).map(TextLine::len)
    }

    /// Whole text joined with `\n`
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(TextLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Sum of all line lengths
    pub fn total_characters(&self) -> usize {
        self.lines.iter().map(TextLine::len).sum()
    }

    fn checked_line_mut(&mut self, line: usize) -> Result<&mut TextLine, EditError> {
        let count = self.lines.len();
        self.lines
            .get_mut(line)
            .ok_or(EditError::LineOutOfRange { line, count })
    }

    /// Insert line-local text at `pos`
    pub fn insert_text(&mut self, pos: TextPos, text: &str) -> Result<(), EditError> {
        self.insert_text_tagged(pos, text, None)
    }

    /// Insert line-local text at `pos`, tagging it with `attribute`
    pub fn insert_text_with_attribute(
        &mut self,
        pos: TextPos,
        text: &str,
        attribute: u16,
    ) -> Result<(), EditError> {
        self.insert_text_tagged(pos, text, Some(attribute))
    }

    fn insert_text_tagged(
        &mut self,
        pos: TextPos,
        text: &str,
        attribute: Option<u16>,
    ) -> Result<(), EditError> {
        let line = self.checked_line_mut(pos.line)?;
        line.insert_text(pos.col, text, attribute)
            .map_err(|err| err.at(pos.line, pos.col))?;
        if !text.is_empty() {
            line.set_modified(true);
        }
        Ok(())
    }

    /// Remove a single-line range, returning the removed text
    pub fn remove_text(&mut self, range: TextRange) -> Result<String, EditError> {
        if !range.is_single_line() {
            return Err(EditError::MultiLineRange(range));
        }
        if range.end.col < range.start.col {
            return Err(EditError::InvertedRange);
        }
        let line = self.checked_line_mut(range.start.line)?;
        let removed = line
            .remove_text(range.start.col, range.end.col - range.start.col)
            .map_err(|err| err.at(range.start.line, range.end.col))?;
        if !removed.is_empty() {
            line.set_modified(true);
        }
        Ok(removed)
    }

    /// Split the line at `pos`; the tail becomes a new line below
    pub fn wrap_line(&mut self, pos: TextPos) -> Result<(), EditError> {
        let line = self.checked_line_mut(pos.line)?;
        let mut tail = line
            .split_off(pos.col)
            .map_err(|err| err.at(pos.line, pos.col))?;
        line.set_modified(true);
        tail.set_modified(true);
        self.lines.insert(pos.line + 1, tail);
        Ok(())
    }

    /// Merge `line` into `line - 1`, returning the previous length of `line - 1`
    pub fn unwrap_line(&mut self, line: usize) -> Result<usize, EditError> {
        let count = self.lines.len();
        if line == 0 || line >= count {
            return Err(EditError::LineOutOfRange { line, count });
        }
        let merged = self.lines.remove(line);
        let target = &mut self.lines[line - 1];
        let old_length = target.len();
        target.append(merged);
        target.set_modified(true);
        Ok(old_length)
    }

    /// Every modified line becomes saved
    pub fn mark_as_saved(&mut self) {
        for line in &mut self.lines {
            line.mark_as_saved();
        }
    }
}

impl Default for LineStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::line::AttributeRun;

    #[test]
    fn test_store_creation() {
        let store = LineStore::from_text("hello\nworld\n");
        assert_eq!(store.count(), 3);
        assert_eq!(store.line_text(1), Some("world"));
        assert_eq!(store.line_text(2), Some(""));
        assert_eq!(store.text(), "hello\nworld\n");

        let empty = LineStore::from_lines(Vec::<String>::new());
        assert_eq!(empty.count(), 1);
        assert_eq!(empty.line_length(0), Some(0));
    }

    #[test]
    fn test_insert_and_remove_text() {
        let mut store = LineStore::from_text("hello");
        store.insert_text(TextPos::new(0, 5), "!").unwrap();
        assert_eq!(store.line_text(0), Some("hello!"));
        assert!(store.line(0).unwrap().is_modified());

        let removed = store.remove_text(TextRange::on_line(0, 1, 3)).unwrap();
        assert_eq!(removed, "el");
        assert_eq!(store.line_text(0), Some("hlo!"));
    }

    #[test]
    fn test_rejected_edits_leave_text_alone() {
        let mut store = LineStore::from_text("abc");
        assert_eq!(
            store.insert_text(TextPos::new(3, 0), "x"),
            Err(EditError::LineOutOfRange { line: 3, count: 1 })
        );
        assert_eq!(
            store.insert_text(TextPos::new(0, 7), "x"),
            Err(EditError::ColumnOutOfRange {
                line: 0,
                col: 7,
                length: 3
            })
        );
        let multi = TextRange::new(TextPos::new(0, 0), TextPos::new(1, 0));
        assert_eq!(store.remove_text(multi), Err(EditError::MultiLineRange(multi)));
        assert_eq!(store.line_text(0), Some("abc"));
        assert!(!store.line(0).unwrap().is_modified());
    }

    #[test]
    fn test_wrap_then_unwrap_restores_line() {
        let mut store = LineStore::from_text("hello world");
        store
            .line_mut(0)
            .unwrap()
            .set_attributes(vec![AttributeRun::new(0, 5, 1), AttributeRun::new(6, 5, 2)]);
        let before = store.line(0).unwrap().clone();

        store.wrap_line(TextPos::new(0, 3)).unwrap();
        assert_eq!(store.count(), 2);
        assert_eq!(store.line_text(0), Some("hel"));
        assert_eq!(store.line_text(1), Some("lo world"));

        let old_length = store.unwrap_line(1).unwrap();
        assert_eq!(old_length, 3);
        assert_eq!(store.count(), 1);
        assert_eq!(store.line(0).unwrap().text(), before.text());
        assert_eq!(store.line(0).unwrap().attributes(), before.attributes());
    }

    #[test]
    fn test_unwrap_first_line_is_rejected() {
        let mut store = LineStore::from_text("a\nb");
        assert!(store.unwrap_line(0).is_err());
        assert!(store.unwrap_line(2).is_err());
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_mark_as_saved() {
        let mut store = LineStore::from_text("a\nb");
        store.insert_text(TextPos::new(1, 0), "x").unwrap();
        store.mark_as_saved();
        let line = store.line(1).unwrap();
        assert!(!line.is_modified());
        assert!(line.is_saved());
        assert!(!store.line(0).unwrap().is_saved());
    }
}
