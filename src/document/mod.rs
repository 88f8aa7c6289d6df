//! Edit coordinator
//!
//! [`Document`] owns the line store, every moving cursor and range, the
//! revision history and the marks. All text changes go through its edit
//! primitives so positions, lookups and notifications stay in step.
//!
//! ## Modules
//!
//! - `edit`: edit sessions and the primitive edits
//! - `text_ops`: multi-line and block-mode operations plus text queries
//! - `moving`: factories and setters for moving cursors and ranges, history
//! - `marks`: per-line bookmark bits
//! - `notify`: observer trait and fan-out

mod edit;
mod marks;
mod moving;
mod notify;
mod text_ops;

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::config::DocumentConfig;
use crate::error::EditError;
use crate::history::TextHistory;
use crate::moving::{CursorId, MovingCursor, MovingRange, RangeId, RangeLookup};
use crate::text::line::{self, AttributeRun};
use crate::text::{LineStore, TextLine, TextPos};

use edit::EditSession;
pub use notify::BufferObserver;

/// Text document with moving cursors, moving ranges and history
pub struct Document {
    config: DocumentConfig,
    buffer: LineStore,
    history: TextHistory,
    cursors: BTreeMap<CursorId, MovingCursor>,
    ranges: BTreeMap<RangeId, MovingRange>,
    lookup: RangeLookup,
    next_cursor_id: u64,
    next_range_id: u64,
    session: EditSession,
    marks: BTreeMap<usize, u32>,
    observers: Vec<Rc<dyn BufferObserver>>,
    last_saved_revision: u64,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    pub fn with_config(config: DocumentConfig) -> Self {
        Self::from_store(LineStore::new(), config)
    }

    /// Create a document holding `text`, split on `\n`
    pub fn from_text(text: &str) -> Self {
        Self::from_store(LineStore::from_text(text), DocumentConfig::default())
    }

    pub fn from_text_with_config(text: &str, config: DocumentConfig) -> Self {
        Self::from_store(LineStore::from_text(text), config)
    }

    fn from_store(buffer: LineStore, config: DocumentConfig) -> Self {
        Self {
            history: TextHistory::new(config.max_locked_history),
            config,
            buffer,
            cursors: BTreeMap::new(),
            ranges: BTreeMap::new(),
            lookup: RangeLookup::new(),
            next_cursor_id: 1,
            next_range_id: 1,
            session: EditSession::default(),
            marks: BTreeMap::new(),
            observers: Vec::new(),
            last_saved_revision: 0,
        }
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DocumentConfig) {
        self.history.set_max_groups(config.max_locked_history);
        self.config = config;
    }

    pub fn set_word_wrap(&mut self, word_wrap: bool) {
        self.config.word_wrap = word_wrap;
    }

    /// The underlying line store
    pub fn buffer(&self) -> &LineStore {
        &self.buffer
    }

    pub fn line_count(&self) -> usize {
        self.buffer.count()
    }

    pub fn line(&self, line: usize) -> Option<&TextLine> {
        self.buffer.line(line)
    }

    pub fn line_text(&self, line: usize) -> Option<&str> {
        self.buffer.line_text(line)
    }

    pub fn line_length(&self, line: usize) -> Option<usize> {
        self.buffer.line_length(line)
    }

    /// Whole document text joined with `\n`
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn total_characters(&self) -> usize {
        self.buffer.total_characters()
    }

    /// Position after the last character
    pub fn document_end(&self) -> TextPos {
        let last = self.buffer.count() - 1;
        TextPos::new(last, self.buffer.line_length(last).unwrap_or(0))
    }

    /// Character starting at `pos`.
    ///
    /// `None` past the end of the line or on the low half of a surrogate pair.
    pub fn character_at(&self, pos: TextPos) -> Option<char> {
        let text = self.buffer.line_text(pos.line)?;
        let byte = line::byte_index(text, pos.col).ok()?;
        text[byte..].chars().next()
    }

    /// Position inside the document and not between surrogate halves
    pub fn is_valid_text_position(&self, pos: TextPos) -> bool {
        self.buffer
            .line_text(pos.line)
            .is_some_and(|text| line::byte_index(text, pos.col).is_ok())
    }

    /// Tab-expanded column of `pos`
    pub fn to_virtual_column(&self, pos: TextPos) -> Option<usize> {
        let text = self.buffer.line_text(pos.line)?;
        Some(line::to_virtual_column(text, pos.col, self.config.tab_width))
    }

    /// Raw column of a tab-expanded column on `line`
    pub fn from_virtual_column(&self, line: usize, virtual_column: usize) -> Option<usize> {
        let text = self.buffer.line_text(line)?;
        Some(line::from_virtual_column(
            text,
            virtual_column,
            self.config.tab_width,
        ))
    }

    pub fn is_line_modified(&self, line: usize) -> bool {
        self.buffer.line(line).is_some_and(TextLine::is_modified)
    }

    pub fn is_line_saved(&self, line: usize) -> bool {
        self.buffer.line(line).is_some_and(TextLine::is_saved)
    }

    /// Modified or saved since load
    pub fn is_line_touched(&self, line: usize) -> bool {
        self.is_line_modified(line) || self.is_line_saved(line)
    }

    pub fn is_line_auto_wrapped(&self, line: usize) -> bool {
        self.buffer.line(line).is_some_and(TextLine::is_auto_wrapped)
    }

    /// Modified lines become saved; remembers the revision
    pub fn mark_saved(&mut self) {
        self.buffer.mark_as_saved();
        self.last_saved_revision = self.history.revision();
        log::debug!("document saved at revision {}", self.last_saved_revision);
    }

    pub fn revision(&self) -> u64 {
        self.history.revision()
    }

    pub fn last_saved_revision(&self) -> u64 {
        self.last_saved_revision
    }

    /// Replace the highlighting runs cached on `line`
    pub fn set_line_attributes(
        &mut self,
        line: usize,
        runs: Vec<AttributeRun>,
    ) -> Result<(), EditError> {
        let count = self.buffer.count();
        let text_line = self
            .buffer
            .line_mut(line)
            .ok_or(EditError::LineOutOfRange { line, count })?;
        text_line.set_attributes(runs);
        Ok(())
    }

    fn check_line(&self, line: usize) -> Result<usize, EditError> {
        self.buffer.line_length(line).ok_or(EditError::LineOutOfRange {
            line,
            count: self.buffer.count(),
        })
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("lines", &self.buffer.count())
            .field("revision", &self.history.revision())
            .field("cursors", &self.cursors.len())
            .field("ranges", &self.ranges.len())
            .field("edit_depth", &self.session.depth())
            .field("observers", &self.observers.len())
            .finish()
    }
}
