//! Line to moving range lookup
//!
//! Multiline ranges live in an index ordered by start line; single-line
//! ranges are cached per line. A range sits in exactly one of the two while
//! valid and in neither while invalid.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::RangeId;
use crate::text::LineRange;

#[derive(Debug, Clone, Default)]
pub struct RangeLookup {
    /// (start line, id) of every valid range spanning two or more lines
    multiline: BTreeSet<(usize, RangeId)>,
    multiline_spans: HashMap<RangeId, LineRange>,
    /// line -> valid ranges confined to that line
    single_line: BTreeMap<usize, BTreeSet<RangeId>>,
}

impl RangeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `id` from its `old` registration to `new`
    pub fn sync(&mut self, id: RangeId, old: Option<LineRange>, new: Option<LineRange>) {
        if old == new {
            return;
        }
        if let Some(old) = old {
            self.remove(id, old);
        }
        if let Some(new) = new {
            self.insert(id, new);
        }
    }

    fn insert(&mut self, id: RangeId, span: LineRange) {
        if span.start == span.end {
            self.single_line.entry(span.start).or_default().insert(id);
        } else {
            self.multiline.insert((span.start, id));
            self.multiline_spans.insert(id, span);
        }
    }

    fn remove(&mut self, id: RangeId, span: LineRange) {
        if span.start == span.end {
            if let Some(ids) = self.single_line.get_mut(&span.start) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.single_line.remove(&span.start);
                }
            }
        } else {
            self.multiline.remove(&(span.start, id));
            self.multiline_spans.remove(&id);
        }
    }

    /// Whether `id` is registered as a multiline range
    pub fn is_multiline(&self, id: RangeId) -> bool {
        self.multiline_spans.contains_key(&id)
    }

    pub fn multiline_count(&self) -> usize {
        self.multiline_spans.len()
    }

    /// Multiline ranges whose line span contains `line`.
    ///
    /// Walks every multiline range starting at or before `line`.
    pub fn multiline_ranges_for_line(&self, line: usize) -> Vec<RangeId> {
        let upper = (line, RangeId(u64::MAX));
        let mut ids: Vec<RangeId> = self
            .multiline
            .range(..=upper)
            .filter(|(_, id)| {
                self.multiline_spans
                    .get(id)
                    .is_some_and(|span| span.end >= line)
            })
            .map(|&(_, id)| id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Single-line ranges on `line`
    pub fn single_line_ranges_for_line(&self, line: usize) -> Vec<RangeId> {
        self.single_line
            .get(&line)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Every range touching `line`, ascending by id
    pub fn ranges_for_line(&self, line: usize) -> Vec<RangeId> {
        let mut ids = self.multiline_ranges_for_line(line);
        ids.extend(self.single_line_ranges_for_line(line));
        ids.sort_unstable();
        ids
    }

    pub fn clear(&mut self) {
        self.multiline.clear();
        self.multiline_spans.clear();
        self.single_line.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiline_membership_follows_span() {
        let mut lookup = RangeLookup::new();
        let id = RangeId(1);
        lookup.sync(id, None, Some(LineRange::new(2, 5)));
        assert!(lookup.is_multiline(id));
        assert_eq!(lookup.multiline_ranges_for_line(4), vec![id]);
        assert!(lookup.multiline_ranges_for_line(6).is_empty());
        assert!(lookup.multiline_ranges_for_line(1).is_empty());

        lookup.sync(id, Some(LineRange::new(2, 5)), Some(LineRange::single(3)));
        assert!(!lookup.is_multiline(id));
        assert_eq!(lookup.single_line_ranges_for_line(3), vec![id]);

        lookup.sync(id, Some(LineRange::single(3)), None);
        assert!(lookup.ranges_for_line(3).is_empty());
        assert_eq!(lookup.multiline_count(), 0);
    }

    #[test]
    fn test_ranges_for_line_merges_both_kinds() {
        let mut lookup = RangeLookup::new();
        lookup.sync(RangeId(3), None, Some(LineRange::single(7)));
        lookup.sync(RangeId(1), None, Some(LineRange::new(0, 9)));
        lookup.sync(RangeId(2), None, Some(LineRange::new(7, 8)));
        lookup.sync(RangeId(4), None, Some(LineRange::single(6)));
        assert_eq!(
            lookup.ranges_for_line(7),
            vec![RangeId(1), RangeId(2), RangeId(3)]
        );
    }
}
