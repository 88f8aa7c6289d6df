//! Moving cursor and moving range API
//!
//! The document keeps every moving object in an arena keyed by id. Direct
//! mutations go through here so the range lookup, repaint notifications and
//! feedback stay in step with positions. Edits move objects in `edit.rs`.

use std::collections::BTreeSet;
use std::rc::Rc;

use super::Document;
use crate::error::{EditError, HistoryError};
use crate::moving::range::{same_attribute, same_feedback};
use crate::moving::{
    Attribute, CursorId, EmptyBehavior, InsertBehavior, InsertBehaviors, MovingCursor,
    MovingRange, RangeFeedback, RangeId, ViewId,
};
use crate::text::{union_lines, TextPos, TextRange};

impl Document {
    // ------------------------------------------------------------------
    // Cursors
    // ------------------------------------------------------------------

    /// Start tracking `pos`
    pub fn new_moving_cursor(&mut self, pos: TextPos, insert_behavior: InsertBehavior) -> CursorId {
        let id = CursorId(self.next_cursor_id);
        self.next_cursor_id += 1;
        self.cursors
            .insert(id, MovingCursor::new(Some(pos), insert_behavior));
        id
    }

    pub fn moving_cursor(&self, id: CursorId) -> Option<&MovingCursor> {
        self.cursors.get(&id)
    }

    /// Current position; `None` when invalid or unknown
    pub fn cursor_position(&self, id: CursorId) -> Option<TextPos> {
        self.cursors.get(&id).and_then(MovingCursor::to_cursor)
    }

    /// Move a cursor; `None` invalidates it
    pub fn set_cursor_position(&mut self, id: CursorId, pos: Option<TextPos>) -> Result<(), EditError> {
        let cursor = self.cursor_mut(id)?;
        cursor.set_position(pos);
        Ok(())
    }

    pub fn set_cursor_insert_behavior(
        &mut self,
        id: CursorId,
        insert_behavior: InsertBehavior,
    ) -> Result<(), EditError> {
        let cursor = self.cursor_mut(id)?;
        cursor.set_insert_behavior(insert_behavior);
        Ok(())
    }

    /// Stop tracking a cursor; returns whether it existed
    pub fn remove_moving_cursor(&mut self, id: CursorId) -> bool {
        self.cursors.remove(&id).is_some()
    }

    pub fn moving_cursor_count(&self) -> usize {
        self.cursors.len()
    }

    fn cursor_mut(&mut self, id: CursorId) -> Result<&mut MovingCursor, EditError> {
        self.cursors.get_mut(&id).ok_or_else(|| {
            log::warn!("unknown moving cursor {}", id);
            EditError::UnknownCursor(id)
        })
    }

    // ------------------------------------------------------------------
    // Ranges
    // ------------------------------------------------------------------

    /// Start tracking `range`.
    ///
    /// An inverted range collapses to its start, or is invalid from the
    /// start under [`EmptyBehavior::InvalidateIfEmpty`].
    pub fn new_moving_range(
        &mut self,
        range: TextRange,
        insert_behaviors: InsertBehaviors,
        empty_behavior: EmptyBehavior,
    ) -> RangeId {
        let id = RangeId(self.next_range_id);
        self.next_range_id += 1;
        let moving = MovingRange::new(range, insert_behaviors, empty_behavior);
        self.lookup.sync(id, None, moving.to_line_range());
        self.ranges.insert(id, moving);
        id
    }

    pub fn moving_range(&self, id: RangeId) -> Option<&MovingRange> {
        self.ranges.get(&id)
    }

    /// Current span; `None` when invalid or unknown
    pub fn range_span(&self, id: RangeId) -> Option<TextRange> {
        self.ranges.get(&id).and_then(MovingRange::to_range)
    }

    pub fn moving_range_count(&self) -> usize {
        self.ranges.len()
    }

    /// Ids of every live range, ascending
    pub fn moving_range_ids(&self) -> Vec<RangeId> {
        self.ranges.keys().copied().collect()
    }

    /// Move both ends of a range
    pub fn set_range(&mut self, id: RangeId, range: TextRange) -> Result<(), EditError> {
        self.set_range_inner(id, Some(range))
    }

    /// Make a range invalid
    pub fn invalidate_range(&mut self, id: RangeId) -> Result<(), EditError> {
        self.set_range_inner(id, None)
    }

    /// Move a range and replace its attribute with one repaint
    pub fn set_range_with_attribute(
        &mut self,
        id: RangeId,
        range: TextRange,
        attribute: Option<Rc<Attribute>>,
    ) -> Result<(), EditError> {
        self.range_ref(id)?;
        self.set_range_attribute(id, attribute)?;
        self.set_range_inner(id, Some(range))
    }

    pub fn set_range_with_attribute_and_z_depth(
        &mut self,
        id: RangeId,
        range: TextRange,
        attribute: Option<Rc<Attribute>>,
        z_depth: f64,
    ) -> Result<(), EditError> {
        self.range_ref(id)?;
        self.set_range_z_depth(id, z_depth)?;
        self.set_range_with_attribute(id, range, attribute)
    }

    /// Move a range: resync the lookup, repaint old and new lines if the
    /// range is observed, then fire feedback last since the listener may
    /// remove the range
    fn set_range_inner(&mut self, id: RangeId, range: Option<TextRange>) -> Result<(), EditError> {
        let moving = self.range_mut(id)?;
        let old_range = moving.to_range();
        if old_range == range {
            return Ok(());
        }
        let old_lines = moving.to_line_range();
        moving.set_positions(range);
        let new_lines = moving.to_line_range();
        let observed = moving.is_observed();
        let view = moving.view();
        let has_attribute = moving.attribute().is_some();

        self.lookup.sync(id, old_lines, new_lines);
        if observed {
            self.notify_range_changed(view, union_lines(old_lines, new_lines), has_attribute);
        }
        self.fire_feedback(id);
        Ok(())
    }

    pub fn set_range_insert_behaviors(
        &mut self,
        id: RangeId,
        insert_behaviors: InsertBehaviors,
    ) -> Result<(), EditError> {
        let moving = self.range_mut(id)?;
        if moving.insert_behaviors() == insert_behaviors {
            return Ok(());
        }
        moving.set_insert_behaviors(insert_behaviors);
        self.notify_observed(id);
        Ok(())
    }

    /// Switching to [`EmptyBehavior::InvalidateIfEmpty`] invalidates an
    /// empty range right away
    pub fn set_range_empty_behavior(
        &mut self,
        id: RangeId,
        empty_behavior: EmptyBehavior,
    ) -> Result<(), EditError> {
        let moving = self.range_mut(id)?;
        if moving.empty_behavior() == empty_behavior {
            return Ok(());
        }
        moving.set_empty_behavior(empty_behavior);
        if empty_behavior == EmptyBehavior::InvalidateIfEmpty && moving.is_valid() && moving.is_empty() {
            self.set_range_inner(id, None)?;
        }
        Ok(())
    }

    /// Replace the attribute; attributes compare by identity
    pub fn set_range_attribute(
        &mut self,
        id: RangeId,
        attribute: Option<Rc<Attribute>>,
    ) -> Result<(), EditError> {
        let moving = self.range_mut(id)?;
        if same_attribute(moving.attribute(), attribute.as_ref()) {
            return Ok(());
        }
        moving.set_attribute(attribute);
        let view = moving.view();
        let lines = moving.to_line_range();
        // repaint even when the attribute went away
        self.notify_range_changed(view, lines, true);
        Ok(())
    }

    pub fn set_range_feedback(
        &mut self,
        id: RangeId,
        feedback: Option<Rc<dyn RangeFeedback>>,
    ) -> Result<(), EditError> {
        let moving = self.range_mut(id)?;
        if same_feedback(moving.feedback(), feedback.as_ref()) {
            return Ok(());
        }
        moving.set_feedback(feedback);
        let view = moving.view();
        let lines = moving.to_line_range();
        let has_attribute = moving.attribute().is_some();
        self.notify_range_changed(view, lines, has_attribute);
        Ok(())
    }

    /// Restrict a range to one view, or `None` for every view. Both the
    /// old and the new view get repainted.
    pub fn set_range_view(&mut self, id: RangeId, view: Option<ViewId>) -> Result<(), EditError> {
        let moving = self.range_mut(id)?;
        let old_view = moving.view();
        if old_view == view {
            return Ok(());
        }
        moving.set_view(view);
        if moving.is_observed() {
            let lines = moving.to_line_range();
            let has_attribute = moving.attribute().is_some();
            self.notify_range_changed(old_view, lines, has_attribute);
            self.notify_range_changed(view, lines, has_attribute);
        }
        Ok(())
    }

    pub fn set_range_z_depth(&mut self, id: RangeId, z_depth: f64) -> Result<(), EditError> {
        let moving = self.range_mut(id)?;
        if moving.z_depth() == z_depth {
            return Ok(());
        }
        moving.set_z_depth(z_depth);
        if moving.attribute().is_some() {
            let view = moving.view();
            let lines = moving.to_line_range();
            self.notify_range_changed(view, lines, true);
        }
        Ok(())
    }

    pub fn set_range_attribute_only_for_views(
        &mut self,
        id: RangeId,
        only_for_views: bool,
    ) -> Result<(), EditError> {
        let moving = self.range_mut(id)?;
        moving.set_attribute_only_for_views(only_for_views);
        Ok(())
    }

    /// Stop tracking a range. No feedback fires; its lines are repainted if
    /// it carried an attribute.
    pub fn remove_moving_range(&mut self, id: RangeId) -> bool {
        let Some(moving) = self.ranges.remove(&id) else {
            return false;
        };
        let lines = moving.to_line_range();
        self.lookup.sync(id, lines, None);
        if moving.attribute().is_some() {
            self.notify_range_changed(moving.view(), lines, true);
        }
        true
    }

    /// Every valid range touching `line`, ascending by id
    pub fn ranges_for_line(&self, line: usize) -> Vec<RangeId> {
        self.lookup.ranges_for_line(line)
    }

    /// Valid ranges spanning two or more lines that include `line`
    pub fn multiline_ranges_for_line(&self, line: usize) -> Vec<RangeId> {
        self.lookup.multiline_ranges_for_line(line)
    }

    /// Whether `id` is currently registered in the multiline index
    pub fn is_multiline_range(&self, id: RangeId) -> bool {
        self.lookup.is_multiline(id)
    }

    /// Invalidate every moving cursor and range, announcing it first
    pub fn invalidate_moving_content(&mut self) {
        self.notify(|observer| observer.about_to_invalidate_moving_content());
        for cursor in self.cursors.values_mut() {
            cursor.set_position(None);
        }
        let ids: Vec<RangeId> = self.ranges.keys().copied().collect();
        for id in ids {
            // a feedback listener may have removed it meanwhile
            if self.ranges.contains_key(&id) {
                if let Err(err) = self.set_range_inner(id, None) {
                    log::warn!("failed to invalidate moving range {}: {}", id, err);
                }
            }
        }
    }

    /// Tell the listener of `id` whether the range ended up invalid or empty
    pub(crate) fn fire_feedback(&mut self, id: RangeId) {
        let Some(moving) = self.ranges.get(&id) else {
            return;
        };
        let Some(feedback) = moving.feedback().cloned() else {
            return;
        };
        let valid = moving.is_valid();
        let empty = moving.is_empty();
        if !valid {
            feedback.range_invalid(self, id);
        } else if empty {
            feedback.range_empty(self, id);
        }
    }

    pub(crate) fn deliver_feedback(&mut self, ids: BTreeSet<RangeId>) {
        for id in ids {
            self.fire_feedback(id);
        }
    }

    fn notify_observed(&self, id: RangeId) {
        if let Some(moving) = self.ranges.get(&id) {
            if moving.is_observed() {
                self.notify_range_changed(
                    moving.view(),
                    moving.to_line_range(),
                    moving.attribute().is_some(),
                );
            }
        }
    }

    fn range_ref(&self, id: RangeId) -> Result<&MovingRange, EditError> {
        self.ranges.get(&id).ok_or_else(|| {
            log::warn!("unknown moving range {}", id);
            EditError::UnknownRange(id)
        })
    }

    fn range_mut(&mut self, id: RangeId) -> Result<&mut MovingRange, EditError> {
        self.ranges.get_mut(&id).ok_or_else(|| {
            log::warn!("unknown moving range {}", id);
            EditError::UnknownRange(id)
        })
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Keep history from `revision` on available for transforms
    pub fn lock_revision(&mut self, revision: u64) -> Result<(), HistoryError> {
        self.history.lock_revision(revision)
    }

    pub fn unlock_revision(&mut self, revision: u64) -> Result<(), HistoryError> {
        self.history.unlock_revision(revision)
    }

    /// Oldest revision positions can still be transformed from
    pub fn oldest_revision(&self) -> u64 {
        self.history.oldest_revision()
    }

    /// Map a plain position between two revisions, either direction
    pub fn transform_cursor(
        &self,
        pos: TextPos,
        insert_behavior: InsertBehavior,
        from_revision: u64,
        to_revision: u64,
    ) -> Result<TextPos, HistoryError> {
        self.history
            .transform_cursor(pos, insert_behavior, from_revision, to_revision)
    }

    /// Map a plain range between two revisions; `Ok(None)` when it became
    /// invalid on the way
    pub fn transform_range(
        &self,
        range: TextRange,
        insert_behaviors: InsertBehaviors,
        empty_behavior: EmptyBehavior,
        from_revision: u64,
        to_revision: u64,
    ) -> Result<Option<TextRange>, HistoryError> {
        self.history.transform_range(
            range,
            insert_behaviors,
            empty_behavior,
            from_revision,
            to_revision,
        )
    }
}
