//! Reversible edit commands
//!
//! Every edit primitive records one [`EditCommand`]; the commands of an
//! outermost edit session form an [`EditGroup`] handed to observers on
//! commit. An undo manager living outside the core keeps the groups and
//! replays them through [`EditGroup::undo`] / [`EditGroup::redo`].

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::EditError;

/// Represents a reversible edit command
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditCommand {
    /// Text inserted into one line
    InsertText {
        line: usize,
        col: usize,
        text: String,
    },
    /// Text removed from one line
    RemoveText {
        line: usize,
        col: usize,
        text: String,
    },
    /// Line split at `col`, moving a tail of `len` columns down.
    ///
    /// Without `new_line_added` the tail was prepended to the following line.
    WrapLine {
        line: usize,
        col: usize,
        len: usize,
        new_line_added: bool,
    },
    /// `next_length` columns of `line + 1` joined onto `line`, which was
    /// `length` long. Without `remove_line` the rest of `line + 1` stayed.
    UnwrapLine {
        line: usize,
        length: usize,
        next_length: usize,
        remove_line: bool,
    },
    InsertLine {
        line: usize,
        text: String,
    },
    RemoveLine {
        line: usize,
        text: String,
    },
    MarkLineAutoWrapped {
        line: usize,
        auto_wrapped: bool,
        previous: bool,
    },
    /// Commands applied in order
    Batch {
        commands: Vec<EditCommand>,
    },
}

impl EditCommand {
    /// Execute this command on the document
    pub fn execute(&self, doc: &mut Document) -> Result<(), EditError> {
        match self {
            EditCommand::InsertText { line, col, text } => doc.edit_insert_text(*line, *col, text),
            EditCommand::RemoveText { line, col, text } => {
                doc.edit_remove_text(*line, *col, crate::text::line::utf16_len(text))
            }
            EditCommand::WrapLine {
                line,
                col,
                new_line_added,
                ..
            } => doc.edit_wrap_line(*line, *col, *new_line_added).map(|_| ()),
            EditCommand::UnwrapLine {
                line,
                next_length,
                remove_line,
                ..
            } => doc.edit_unwrap_line(*line, *remove_line, *next_length),
            EditCommand::InsertLine { line, text } => doc.edit_insert_line(*line, text),
            EditCommand::RemoveLine { line, .. } => doc.edit_remove_line(*line),
            EditCommand::MarkLineAutoWrapped {
                line, auto_wrapped, ..
            } => doc.edit_mark_line_auto_wrapped(*line, *auto_wrapped),
            EditCommand::Batch { commands } => {
                doc.edit_start();
                let result = commands.iter().try_for_each(|cmd| cmd.execute(doc));
                doc.edit_end();
                result
            }
        }
    }

    /// Undo this command (reverse the operation)
    pub fn undo(&self, doc: &mut Document) -> Result<(), EditError> {
        self.inverse().execute(doc)
    }

    /// Command that reverts this one
    pub fn inverse(&self) -> EditCommand {
        match self {
            EditCommand::InsertText { line, col, text } => EditCommand::RemoveText {
                line: *line,
                col: *col,
                text: text.clone(),
            },
            EditCommand::RemoveText { line, col, text } => EditCommand::InsertText {
                line: *line,
                col: *col,
                text: text.clone(),
            },
            EditCommand::WrapLine {
                line,
                col,
                len,
                new_line_added,
            } => EditCommand::UnwrapLine {
                line: *line,
                length: *col,
                next_length: *len,
                remove_line: *new_line_added,
            },
            EditCommand::UnwrapLine {
                line,
                length,
                next_length,
                remove_line,
            } => EditCommand::WrapLine {
                line: *line,
                col: *length,
                len: *next_length,
                new_line_added: *remove_line,
            },
            EditCommand::InsertLine { line, text } => EditCommand::RemoveLine {
                line: *line,
                text: text.clone(),
            },
            EditCommand::RemoveLine { line, text } => EditCommand::InsertLine {
                line: *line,
                text: text.clone(),
            },
            EditCommand::MarkLineAutoWrapped {
                line,
                auto_wrapped,
                previous,
            } => EditCommand::MarkLineAutoWrapped {
                line: *line,
                auto_wrapped: *previous,
                previous: *auto_wrapped,
            },
            EditCommand::Batch { commands } => EditCommand::Batch {
                commands: commands.iter().rev().map(EditCommand::inverse).collect(),
            },
        }
    }

    /// Get the first line this command touches
    pub fn affected_line(&self) -> usize {
        match self {
            EditCommand::InsertText { line, .. }
            | EditCommand::RemoveText { line, .. }
            | EditCommand::WrapLine { line, .. }
            | EditCommand::UnwrapLine { line, .. }
            | EditCommand::InsertLine { line, .. }
            | EditCommand::RemoveLine { line, .. }
            | EditCommand::MarkLineAutoWrapped { line, .. } => *line,
            EditCommand::Batch { commands } => commands
                .iter()
                .map(EditCommand::affected_line)
                .min()
                .unwrap_or(0),
        }
    }
}

/// Commands of one committed edit session
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditGroup {
    /// Revision the session produced
    pub revision: u64,
    pub commands: Vec<EditCommand>,
}

impl EditGroup {
    pub fn new(revision: u64, commands: Vec<EditCommand>) -> Self {
        Self { revision, commands }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Revert the whole group as one edit session
    pub fn undo(&self, doc: &mut Document) -> Result<(), EditError> {
        doc.edit_start();
        let result = self.commands.iter().rev().try_for_each(|cmd| cmd.undo(doc));
        doc.edit_end();
        result
    }

    /// Re-apply the whole group as one edit session
    pub fn redo(&self, doc: &mut Document) -> Result<(), EditError> {
        doc.edit_start();
        let result = self.commands.iter().try_for_each(|cmd| cmd.execute(doc));
        doc.edit_end();
        result
    }
}
