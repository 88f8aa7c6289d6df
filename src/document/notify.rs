//! Observer fan-out
//!
//! Observers are called synchronously, in registration order, from a
//! snapshot of the observer list.

use std::rc::Rc;

use super::Document;
use crate::moving::ViewId;
use crate::text::{LineRange, TextRange};
use crate::undo::EditGroup;

/// Collaborator interested in document changes. Every method defaults to
/// doing nothing.
pub trait BufferObserver {
    /// After each primitive that inserted text, with the current range
    fn text_inserted(&self, _range: TextRange) {}

    /// After each primitive that removed text, with where it used to start
    fn text_removed(&self, _range: TextRange, _text: &str) {}

    /// Once per outermost edit session, the union of touched lines
    fn lines_touched(&self, _lines: LineRange) {}

    /// A moving range with attribute or feedback changed; repaint `lines`
    /// in `view`, or in every view for `None`
    fn range_changed(&self, _view: Option<ViewId>, _lines: LineRange, _has_attribute: bool) {}

    /// An outermost edit session committed
    fn edit_group_committed(&self, _revision: u64, _group: &EditGroup) {}

    fn marks_changed(&self) {}

    /// Every moving cursor and range is about to become invalid
    fn about_to_invalidate_moving_content(&self) {}
}

impl Document {
    pub fn add_observer(&mut self, observer: Rc<dyn BufferObserver>) {
        self.observers.push(observer);
    }

    /// Returns whether the observer was registered
    pub fn remove_observer(&mut self, observer: &Rc<dyn BufferObserver>) -> bool {
        let before = self.observers.len();
        self.observers.retain(|known| !Rc::ptr_eq(known, observer));
        self.observers.len() != before
    }

    pub(crate) fn notify(&self, event: impl Fn(&dyn BufferObserver)) {
        let observers = self.observers.clone();
        for observer in &observers {
            event(observer.as_ref());
        }
    }

    pub(crate) fn notify_range_changed(
        &self,
        view: Option<ViewId>,
        lines: Option<LineRange>,
        has_attribute: bool,
    ) {
        if let Some(lines) = lines {
            self.notify(|observer| observer.range_changed(view, lines, has_attribute));
        }
    }
}
