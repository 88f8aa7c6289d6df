//! Text storage core for a programmable text editor
//!
//! Holds a document as a sequence of lines, applies edits atomically inside
//! edit sessions, and keeps externally held moving cursors and moving ranges
//! anchored to the same logical text across every edit.
//!
//! ## Modules
//!
//! - `text`: positions, lines with attribute runs, the line store
//! - `moving`: moving cursor and moving range state, line to range lookup
//! - `history`: revision log and position transforms between revisions
//! - `undo`: reversible edit commands grouped per edit session
//! - `document`: the edit coordinator tying it all together
//! - `config`: document settings loaded from YAML or JSON
//! - `error`: error types
//!
//! ```
//! use editor_text_core::{Document, EmptyBehavior, InsertBehaviors, TextPos, TextRange};
//!
//! let mut doc = Document::from_text("abcde");
//! let range = doc.new_moving_range(
//!     TextRange::on_line(0, 1, 3),
//!     InsertBehaviors::EXPAND_RIGHT,
//!     EmptyBehavior::AllowEmpty,
//! );
//! doc.insert_text(TextPos::new(0, 3), "XYZ", false).unwrap();
//! assert_eq!(doc.range_span(range), Some(TextRange::on_line(0, 1, 6)));
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod moving;
pub mod text;
pub mod undo;

// Re-export commonly used types
pub use config::{DocumentConfig, RemoveSpaces};
pub use document::{BufferObserver, Document};
pub use error::{ColumnError, ConfigError, EditError, HistoryError};
pub use history::{HistoryEntry, TextHistory};
pub use moving::{
    Attribute, CursorId, EmptyBehavior, InsertBehavior, InsertBehaviors, MovingCursor,
    MovingRange, RangeFeedback, RangeId, ViewId,
};
pub use text::{AttributeRun, LineRange, LineStore, TextLine, TextPos, TextRange};
pub use undo::{EditCommand, EditGroup};
