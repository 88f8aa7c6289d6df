//! Moving range state

use std::fmt;
use std::rc::Rc;

use super::cursor::MovingCursor;
use super::{Attribute, EmptyBehavior, InsertBehaviors, RangeFeedback, ViewId};
use crate::history::HistoryEntry;
use crate::text::{LineRange, TextPos, TextRange};

/// A span whose two ends follow the text.
///
/// Owned by the document; callers mutate it through the document's moving
/// range API so lookup registration and notifications stay consistent.
#[derive(Clone)]
pub struct MovingRange {
    start: MovingCursor,
    end: MovingCursor,
    insert_behaviors: InsertBehaviors,
    empty_behavior: EmptyBehavior,
    attribute: Option<Rc<Attribute>>,
    view: Option<ViewId>,
    z_depth: f64,
    attribute_only_for_views: bool,
    feedback: Option<Rc<dyn RangeFeedback>>,
}

impl MovingRange {
    pub(crate) fn new(
        range: TextRange,
        insert_behaviors: InsertBehaviors,
        empty_behavior: EmptyBehavior,
    ) -> Self {
        let mut moving = Self {
            start: MovingCursor::new(Some(range.start), insert_behaviors.start_behavior()),
            end: MovingCursor::new(Some(range.end), insert_behaviors.end_behavior()),
            insert_behaviors,
            empty_behavior,
            attribute: None,
            view: None,
            z_depth: 0.0,
            attribute_only_for_views: false,
            feedback: None,
        };
        moving.check_validity();
        moving
    }

    pub fn start(&self) -> Option<TextPos> {
        self.start.to_cursor()
    }

    pub fn end(&self) -> Option<TextPos> {
        self.end.to_cursor()
    }

    pub fn start_cursor(&self) -> &MovingCursor {
        &self.start
    }

    pub fn end_cursor(&self) -> &MovingCursor {
        &self.end
    }

    /// Current span, `None` when invalid
    pub fn to_range(&self) -> Option<TextRange> {
        Some(TextRange::new(self.start()?, self.end()?))
    }

    /// Lines covered, `None` when invalid
    pub fn to_line_range(&self) -> Option<LineRange> {
        self.to_range().map(|range| range.to_line_range())
    }

    pub fn spans_multiple_lines(&self) -> bool {
        self.to_range().is_some_and(|range| !range.is_single_line())
    }

    pub fn is_valid(&self) -> bool {
        self.start.is_valid() && self.end.is_valid()
    }

    /// Invalid ranges count as empty too
    pub fn is_empty(&self) -> bool {
        self.to_range().map_or(true, |range| range.is_empty())
    }

    pub fn insert_behaviors(&self) -> InsertBehaviors {
        self.insert_behaviors
    }

    pub fn empty_behavior(&self) -> EmptyBehavior {
        self.empty_behavior
    }

    pub fn attribute(&self) -> Option<&Rc<Attribute>> {
        self.attribute.as_ref()
    }

    pub fn view(&self) -> Option<ViewId> {
        self.view
    }

    pub fn z_depth(&self) -> f64 {
        self.z_depth
    }

    pub fn attribute_only_for_views(&self) -> bool {
        self.attribute_only_for_views
    }

    pub fn feedback(&self) -> Option<&Rc<dyn RangeFeedback>> {
        self.feedback.as_ref()
    }

    /// Attribute or feedback present, so changes are worth announcing
    pub(crate) fn is_observed(&self) -> bool {
        self.attribute.is_some() || self.feedback.is_some()
    }

    /// Move both ends, then apply the empty policy
    pub(crate) fn set_positions(&mut self, range: Option<TextRange>) {
        self.start.set_position(range.map(|r| r.start));
        self.end.set_position(range.map(|r| r.end));
        self.check_validity();
    }

    /// Invalidate when either end is invalid or the span is empty under
    /// [`EmptyBehavior::InvalidateIfEmpty`]; pull `end` up to `start` otherwise.
    pub(crate) fn check_validity(&mut self) {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => {
                if self.empty_behavior == EmptyBehavior::InvalidateIfEmpty && end <= start {
                    self.invalidate();
                } else if end < start {
                    self.end.set_position(Some(start));
                }
            }
            _ => self.invalidate(),
        }
    }

    fn invalidate(&mut self) {
        self.start.set_position(None);
        self.end.set_position(None);
    }

    /// Follow one primitive edit; returns whether the span changed
    pub(crate) fn apply(&mut self, entry: &HistoryEntry) -> bool {
        let before = self.to_range();
        let start_moved = self.start.apply(entry);
        let end_moved = self.end.apply(entry);
        if start_moved || end_moved {
            self.check_validity();
        }
        self.to_range() != before
    }

    pub(crate) fn set_insert_behaviors(&mut self, insert_behaviors: InsertBehaviors) {
        self.insert_behaviors = insert_behaviors;
        self.start
            .set_insert_behavior(insert_behaviors.start_behavior());
        self.end.set_insert_behavior(insert_behaviors.end_behavior());
    }

    pub(crate) fn set_empty_behavior(&mut self, empty_behavior: EmptyBehavior) {
        self.empty_behavior = empty_behavior;
    }

    pub(crate) fn set_attribute(&mut self, attribute: Option<Rc<Attribute>>) {
        self.attribute = attribute;
    }

    pub(crate) fn set_view(&mut self, view: Option<ViewId>) {
        self.view = view;
    }

    pub(crate) fn set_z_depth(&mut self, z_depth: f64) {
        self.z_depth = z_depth;
    }

    pub(crate) fn set_attribute_only_for_views(&mut self, only_for_views: bool) {
        self.attribute_only_for_views = only_for_views;
    }

    pub(crate) fn set_feedback(&mut self, feedback: Option<Rc<dyn RangeFeedback>>) {
        self.feedback = feedback;
    }
}

impl fmt::Debug for MovingRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MovingRange")
            .field("range", &self.to_range())
            .field("insert_behaviors", &self.insert_behaviors)
            .field("empty_behavior", &self.empty_behavior)
            .field("attribute", &self.attribute)
            .field("view", &self.view)
            .field("z_depth", &self.z_depth)
            .field("attribute_only_for_views", &self.attribute_only_for_views)
            .field("has_feedback", &self.feedback.is_some())
            .finish()
    }
}

/// Identity comparison for shared attributes
pub(crate) fn same_attribute(a: Option<&Rc<Attribute>>, b: Option<&Rc<Attribute>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Identity comparison for shared feedback listeners
pub(crate) fn same_feedback(
    a: Option<&Rc<dyn RangeFeedback>>,
    b: Option<&Rc<dyn RangeFeedback>>,
) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_at(line: usize, column: usize, length: usize, old: usize) -> HistoryEntry {
        HistoryEntry::InsertText {
            line,
            column,
            length,
            old_line_length: old,
        }
    }

    #[test]
    fn test_default_range_does_not_grow_at_boundaries() {
        let mut range = MovingRange::new(
            TextRange::on_line(0, 1, 3),
            InsertBehaviors::DO_NOT_EXPAND,
            EmptyBehavior::AllowEmpty,
        );
        range.apply(&insert_at(0, 3, 2, 5));
        assert_eq!(range.to_range(), Some(TextRange::on_line(0, 1, 3)));
        range.apply(&insert_at(0, 1, 2, 7));
        assert_eq!(range.to_range(), Some(TextRange::on_line(0, 3, 5)));
    }

    #[test]
    fn test_expanding_range_grows_at_boundaries() {
        let mut range = MovingRange::new(
            TextRange::on_line(0, 1, 3),
            InsertBehaviors::EXPAND_LEFT | InsertBehaviors::EXPAND_RIGHT,
            EmptyBehavior::AllowEmpty,
        );
        range.apply(&insert_at(0, 3, 2, 5));
        range.apply(&insert_at(0, 1, 2, 7));
        assert_eq!(range.to_range(), Some(TextRange::on_line(0, 1, 7)));
    }

    #[test]
    fn test_inverted_input_collapses_or_invalidates() {
        let inverted = TextRange::new(TextPos::new(1, 4), TextPos::new(0, 2));

        let collapsed = MovingRange::new(
            inverted,
            InsertBehaviors::DO_NOT_EXPAND,
            EmptyBehavior::AllowEmpty,
        );
        assert!(collapsed.is_valid());
        assert!(collapsed.is_empty());
        assert_eq!(collapsed.end(), Some(TextPos::new(1, 4)));

        let invalid = MovingRange::new(
            inverted,
            InsertBehaviors::DO_NOT_EXPAND,
            EmptyBehavior::InvalidateIfEmpty,
        );
        assert!(!invalid.is_valid());
        assert_eq!(invalid.to_line_range(), None);
    }

    #[test]
    fn test_removal_invalidates_when_configured() {
        let mut range = MovingRange::new(
            TextRange::on_line(0, 2, 4),
            InsertBehaviors::DO_NOT_EXPAND,
            EmptyBehavior::InvalidateIfEmpty,
        );
        let changed = range.apply(&HistoryEntry::RemoveText {
            line: 0,
            column: 1,
            length: 5,
        });
        assert!(changed);
        assert!(!range.is_valid());
        assert!(!range.start_cursor().is_valid());
        assert!(!range.end_cursor().is_valid());
    }

    #[test]
    fn test_spans_multiple_lines() {
        let mut range = MovingRange::new(
            TextRange::new(TextPos::new(0, 2), TextPos::new(1, 1)),
            InsertBehaviors::DO_NOT_EXPAND,
            EmptyBehavior::AllowEmpty,
        );
        assert!(range.spans_multiple_lines());
        range.apply(&HistoryEntry::UnwrapLine {
            line: 1,
            old_line_length: 5,
        });
        assert!(!range.spans_multiple_lines());
        assert_eq!(range.to_range(), Some(TextRange::on_line(0, 2, 6)));
    }

    #[test]
    fn test_attribute_identity() {
        let a = Rc::new(Attribute::new("error"));
        let b = Rc::new(Attribute::new("error"));
        assert!(same_attribute(Some(&a), Some(&a.clone())));
        assert!(!same_attribute(Some(&a), Some(&b)));
        assert!(same_attribute(None, None));
    }
}
