//! Text storage layer
//!
//! Plain text with no knowledge of cursors, ranges or history.
//!
//! ## Modules
//!
//! - `cursor`: text positions, ranges and line intervals
//! - `line`: one line with attribute runs, plus virtual-column helpers
//! - `buffer`: the line store and its primitive mutations

pub mod buffer;
pub mod cursor;
pub mod line;

// Re-exports for convenience
pub use buffer::LineStore;
pub use cursor::{union_lines, LineRange, TextPos, TextRange};
pub use line::{AttributeRun, TextLine, NO_ATTRIBUTE};
