//! Occurrence index - the live, position-ordered set of edit regions
//!
//! Membership only changes through the methods here. Every mutating method
//! either fully succeeds or leaves the set (and the incremental-search outer
//! bound) exactly as it was.

use std::ops::Range;

use super::error::MultiEditError;
use super::pattern::Pattern;
use super::region::{BoundaryClaim, Region, RegionId, Span, Tracked};
use super::scope::Scope;
use crate::model::{Document, TextChange};

/// Upper bound on candidates rejected by the indent/trailing policy in one
/// incremental step, after which the step reports `NoMoreMatches`
pub const MAX_CANDIDATE_SKIPS: usize = 10_000;

/// Search direction for incremental discovery and navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// What a toggle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggled {
    /// The region at the position was un-claimed
    Removed(Region),
    /// A pattern match covering the position was claimed
    Added(RegionId),
    /// A zero-width marker was placed at the position
    Marker(RegionId),
}

#[derive(Debug, Clone)]
pub struct OccurrenceIndex {
    /// Sorted by `(start, end)`; never overlapping
    regions: Vec<Region>,
    next_id: u64,
    /// Min start / max end of every region claimed by discovery
    outer: Option<Span>,
    /// Reject whitespace matches lying in indentation or trailing blanks
    skip_indent_and_trailing: bool,
}

impl OccurrenceIndex {
    pub fn new(skip_indent_and_trailing: bool) -> Self {
        Self {
            regions: Vec::new(),
            next_id: 1,
            outer: None,
            skip_indent_and_trailing,
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Start offsets of every region, in position order
    pub fn starts(&self) -> Vec<usize> {
        self.regions.iter().map(Region::start).collect()
    }

    pub fn outer_bound(&self) -> Option<Span> {
        self.outer
    }

    /// Region whose text (or empty position) covers `pos`
    pub fn region_at(&self, pos: usize) -> Option<&Region> {
        self.regions.iter().find(|r| r.span.contains(pos))
    }

    /// Region covering `pos` or ending exactly at it; a covering region wins
    pub fn region_touching(&self, pos: usize) -> Option<&Region> {
        self.region_at(pos)
            .or_else(|| self.regions.iter().find(|r| r.span.touches(pos)))
    }

    fn is_claimed(&self, span: &Span) -> bool {
        self.regions.iter().any(|r| r.span.overlaps(span))
    }

    /// Claim a span. Fails when it leaves the document or overlaps a region.
    pub fn insert(
        &mut self,
        document: &Document,
        span: Span,
        is_marker: bool,
    ) -> Result<RegionId, MultiEditError> {
        if span.end > document.len_chars() || self.is_claimed(&span) {
            return Err(MultiEditError::FailedRegionCreation {
                start: span.start,
                end: span.end,
            });
        }
        let id = RegionId(self.next_id);
        self.next_id += 1;
        let at = self
            .regions
            .partition_point(|r| (r.span.start, r.span.end) <= (span.start, span.end));
        self.regions.insert(at, Region {
            id,
            span,
            is_marker,
        });
        tracing::trace!(target: "occurrences", %id, start = span.start, end = span.end, is_marker, "claimed");
        Ok(id)
    }

    pub fn remove(&mut self, id: RegionId) -> Option<Region> {
        let idx = self.regions.iter().position(|r| r.id == id)?;
        Some(self.regions.remove(idx))
    }

    /// Claim the initial region of a session and start the outer bound there
    pub fn seed(&mut self, document: &Document, span: Span) -> Result<RegionId, MultiEditError> {
        let id = self.insert(document, span, false)?;
        self.extend_outer(span);
        Ok(id)
    }

    fn extend_outer(&mut self, span: Span) {
        self.outer = Some(match self.outer {
            Some(outer) => Span::new(outer.start.min(span.start), outer.end.max(span.end)),
            None => span,
        });
    }

    /// Whether the policy rejects a whitespace match at `span`
    fn rejects(&self, document: &Document, pattern: &Pattern, span: &Span) -> bool {
        self.skip_indent_and_trailing
            && pattern.is_whitespace()
            && is_indent_or_trailing(document, span)
    }

    /// Claim every unclaimed match of `pattern` in `scope`.
    ///
    /// Returns the new region ids in position order. Matches overlapping an
    /// existing region are skipped, never merged.
    pub fn discover_all(
        &mut self,
        document: &Document,
        pattern: &Pattern,
        scope: &Scope,
    ) -> Result<Vec<RegionId>, MultiEditError> {
        let candidates: Vec<Span> = pattern
            .find_all(document, scope.range())
            .into_iter()
            .filter(|span| !self.rejects(document, pattern, span))
            .filter(|span| !self.is_claimed(span))
            .collect();

        let mut ids = Vec::with_capacity(candidates.len());
        for span in candidates {
            ids.push(self.insert(document, span, false)?);
            self.extend_outer(span);
        }
        tracing::debug!(
            target: "occurrences",
            pattern = %pattern.literal_text,
            found = ids.len(),
            total = self.regions.len(),
            "discover all"
        );
        Ok(ids)
    }

    /// Claim the next unclaimed match beyond the outer bound.
    ///
    /// Forward scans from the outer end towards the scope end, backward from
    /// the outer start towards the scope start. On `NoMoreMatches` nothing
    /// changes, including the outer bound.
    pub fn discover_next(
        &mut self,
        document: &Document,
        pattern: &Pattern,
        direction: Direction,
        scope: &Scope,
    ) -> Result<RegionId, MultiEditError> {
        let outer = self.outer.unwrap_or(match direction {
            Direction::Forward => Span::at(scope.start),
            Direction::Backward => Span::at(scope.end),
        });

        let mut candidates = match direction {
            Direction::Forward => {
                pattern.find_all(document, outer.end.max(scope.start)..scope.end)
            }
            Direction::Backward => {
                pattern.find_all(document, scope.start..outer.start.min(scope.end))
            }
        };
        if direction == Direction::Backward {
            candidates.reverse();
        }

        let mut skipped = 0;
        let found = candidates.into_iter().find(|span| {
            if skipped >= MAX_CANDIDATE_SKIPS {
                return false;
            }
            if self.is_claimed(span) {
                return false;
            }
            if self.rejects(document, pattern, span) {
                skipped += 1;
                return false;
            }
            true
        });

        let Some(span) = found else {
            tracing::debug!(target: "occurrences", ?direction, skipped, "no more matches");
            return Err(MultiEditError::NoMoreMatches);
        };
        let id = self.insert(document, span, false)?;
        self.extend_outer(span);
        tracing::debug!(target: "occurrences", ?direction, %id, start = span.start, "discover next");
        Ok(id)
    }

    /// Un-claim the region at `pos`, or claim something there.
    ///
    /// With no region at `pos`, a pattern match covering `pos` inside
    /// `scope` is claimed when it is free; otherwise a marker is placed.
    /// Toggling the same position twice restores the previous membership.
    pub fn toggle(
        &mut self,
        document: &Document,
        pos: usize,
        pattern: Option<&Pattern>,
        scope: &Scope,
    ) -> Result<Toggled, MultiEditError> {
        let hit = self.region_at(pos).map(|r| r.id);
        if let Some(region) = hit.and_then(|id| self.remove(id)) {
            tracing::debug!(target: "occurrences", id = %region.id, "toggled off");
            return Ok(Toggled::Removed(region));
        }

        let covering = pattern
            .and_then(|p| p.match_covering(document, pos, scope.range()))
            .filter(|span| !self.is_claimed(span));
        if let Some(span) = covering {
            let id = self.insert(document, span, false)?;
            tracing::debug!(target: "occurrences", %id, "toggled on");
            return Ok(Toggled::Added(id));
        }

        let id = self.insert(document, Span::at(pos), true)?;
        tracing::debug!(target: "occurrences", %id, pos, "marker placed");
        Ok(Toggled::Marker(id))
    }

    /// Drop every region not entirely inside `range`; returns how many went
    pub fn restrict(&mut self, range: Range<usize>) -> usize {
        let before = self.regions.len();
        self.regions.retain(|r| r.span.within(&range));
        let removed = before - self.regions.len();
        tracing::debug!(target: "occurrences", start = range.start, end = range.end, removed, "restricted");
        removed
    }

    /// Empty the set and forget the outer bound
    pub fn clear(&mut self) {
        self.regions.clear();
        self.outer = None;
    }

    /// Map every region through a document change.
    ///
    /// `origin` is the region the edit was made in, if any. Returns the
    /// regions that no longer exist: collapsed non-markers, and any region
    /// that ends up sharing text with one before it.
    pub fn track_change(&mut self, change: &TextChange, origin: Option<RegionId>) -> Vec<Region> {
        if change.is_noop() {
            return Vec::new();
        }

        let ends: Vec<(RegionId, usize)> = self.regions.iter().map(|r| (r.id, r.end())).collect();
        let mut dropped = Vec::new();
        let mut kept = Vec::with_capacity(self.regions.len());

        for mut region in self.regions.drain(..) {
            let claim = match origin {
                Some(id) if id == region.id => BoundaryClaim::Origin,
                Some(_) => BoundaryClaim::Bystander,
                None => BoundaryClaim::Unowned {
                    start_free: !ends
                        .iter()
                        .any(|&(id, end)| id != region.id && end == change.start),
                },
            };
            match region.span.track(change, claim) {
                Tracked::Collapsed if !region.is_marker => dropped.push(region),
                _ => kept.push(region),
            }
        }

        kept.sort_by_key(|r| (r.span.start, r.span.end));
        for region in kept {
            let clashes = self
                .regions
                .last()
                .is_some_and(|prev| prev.span.overlaps(&region.span));
            if clashes {
                dropped.push(region);
            } else {
                self.regions.push(region);
            }
        }

        if let Some(outer) = self.outer.as_mut() {
            outer.track(change, BoundaryClaim::Unowned { start_free: true });
        }

        for region in &dropped {
            tracing::debug!(target: "occurrences", id = %region.id, "region collapsed");
        }
        dropped
    }
}

impl Default for OccurrenceIndex {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Whether `span` lies wholly in its line's leading indentation or wholly
/// after the line's last non-blank char
pub fn is_indent_or_trailing(document: &Document, span: &Span) -> bool {
    let line = document.line_of(span.start);
    let line_start = document.line_start(line);
    let first = line_start + document.first_non_whitespace_column(line);
    let last = line_start + document.last_non_whitespace_column(line);
    span.end <= first || span.start >= last
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multiedit::pattern::{derive, DeriveOptions, Seed};

    fn setup(text: &str, seed_at: usize) -> (Document, Pattern, OccurrenceIndex, Scope) {
        let doc = Document::with_text(text);
        let (pattern, span) = derive(&doc, Seed::Point(seed_at), &DeriveOptions::default()).unwrap();
        let mut index = OccurrenceIndex::new(true);
        index.seed(&doc, span).unwrap();
        let scope = Scope::whole(&doc);
        (doc, pattern, index, scope)
    }

    fn assert_disjoint(index: &OccurrenceIndex) {
        for pair in index.regions().windows(2) {
            assert!(!pair[0].span.overlaps(&pair[1].span), "{:?}", pair);
            assert!(pair[0].start() <= pair[1].start());
        }
    }

    // ========================================================================
    // discover_all
    // ========================================================================

    #[test]
    fn test_discover_all_word() {
        let doc = Document::with_text("foo bar foo baz foo");
        let (pattern, _) = derive(&doc, Seed::Point(0), &DeriveOptions::default()).unwrap();
        let mut index = OccurrenceIndex::new(true);
        let ids = index.discover_all(&doc, &pattern, &Scope::whole(&doc)).unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(index.starts(), vec![0, 8, 16]);
        assert!(index.iter().all(|r| r.text(&doc) == "foo"));
        assert_eq!(index.outer_bound(), Some(Span::new(0, 19)));
    }

    #[test]
    fn test_discover_all_skips_claimed() {
        let (doc, pattern, mut index, scope) = setup("foo bar foo baz foo", 9);
        let ids = index.discover_all(&doc, &pattern, &scope).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(index.starts(), vec![0, 8, 16]);
        assert_disjoint(&index);
    }

    #[test]
    fn test_discover_all_respects_scope() {
        let (doc, pattern, mut index, _) = setup("foo bar foo baz foo", 9);
        index.discover_all(&doc, &pattern, &Scope::new(4, 15)).unwrap();
        assert_eq!(index.starts(), vec![8]);
    }

    #[test]
    fn test_whitespace_indent_and_trailing_skipped() {
        let text = "  a  b\n  c  d  ";
        let (doc, pattern, mut index, scope) = setup(text, 3);
        assert!(pattern.is_whitespace());
        index.discover_all(&doc, &pattern, &scope).unwrap();
        assert_eq!(index.starts(), vec![3, 10]);
    }

    #[test]
    fn test_whitespace_policy_disabled() {
        let doc = Document::with_text("  a  b\n  c");
        let (pattern, span) = derive(&doc, Seed::Point(3), &DeriveOptions::default()).unwrap();
        let mut index = OccurrenceIndex::new(false);
        index.seed(&doc, span).unwrap();
        index.discover_all(&doc, &pattern, &Scope::whole(&doc)).unwrap();
        assert_eq!(index.starts(), vec![0, 3, 7]);
    }

    // ========================================================================
    // discover_next
    // ========================================================================

    #[test]
    fn test_discover_next_exhausts_after_three() {
        let (doc, pattern, mut index, scope) = setup("foo bar foo baz foo", 0);
        index.discover_next(&doc, &pattern, Direction::Forward, &scope).unwrap();
        index.discover_next(&doc, &pattern, Direction::Forward, &scope).unwrap();
        let outer = index.outer_bound();
        assert_eq!(
            index.discover_next(&doc, &pattern, Direction::Forward, &scope),
            Err(MultiEditError::NoMoreMatches)
        );
        assert_eq!(index.len(), 3);
        assert_eq!(index.outer_bound(), outer);
    }

    #[test]
    fn test_forward_then_backward_never_reselects() {
        let (doc, pattern, mut index, scope) = setup("foo bar foo baz foo", 8);
        let fwd = index.discover_next(&doc, &pattern, Direction::Forward, &scope).unwrap();
        assert_eq!(index.get(fwd).map(Region::start), Some(16));
        let back = index.discover_next(&doc, &pattern, Direction::Backward, &scope).unwrap();
        assert_eq!(index.get(back).map(Region::start), Some(0));
        assert_eq!(index.starts(), vec![0, 8, 16]);
        assert_eq!(
            index.discover_next(&doc, &pattern, Direction::Backward, &scope),
            Err(MultiEditError::NoMoreMatches)
        );
        assert_disjoint(&index);
    }

    #[test]
    fn test_discover_next_walks_past_claimed_regions() {
        let (doc, pattern, mut index, scope) = setup("foo foo foo foo", 0);
        // Claim the third occurrence out of band; next must skip it
        index.insert(&doc, Span::new(8, 11), false).unwrap();
        index.discover_next(&doc, &pattern, Direction::Forward, &scope).unwrap();
        index.discover_next(&doc, &pattern, Direction::Forward, &scope).unwrap();
        assert_eq!(index.starts(), vec![0, 4, 8, 12]);
    }

    #[test]
    fn test_discover_next_whitespace_at_scope_edge_terminates() {
        let (doc, pattern, mut index, scope) = setup("a  b\n  \n  ", 1);
        assert_eq!(
            index.discover_next(&doc, &pattern, Direction::Forward, &scope),
            Err(MultiEditError::NoMoreMatches)
        );
        assert_eq!(index.len(), 1);
    }

    // ========================================================================
    // toggle / restrict / clear
    // ========================================================================

    #[test]
    fn test_toggle_is_its_own_inverse_on_region() {
        let (doc, pattern, mut index, scope) = setup("foo bar foo baz foo", 0);
        index.discover_all(&doc, &pattern, &scope).unwrap();
        let before = index.starts();

        assert!(matches!(
            index.toggle(&doc, 9, Some(&pattern), &scope).unwrap(),
            Toggled::Removed(_)
        ));
        assert_eq!(index.starts(), vec![0, 16]);
        assert!(matches!(
            index.toggle(&doc, 9, Some(&pattern), &scope).unwrap(),
            Toggled::Added(_)
        ));
        assert_eq!(index.starts(), before);
    }

    #[test]
    fn test_toggle_is_its_own_inverse_on_marker() {
        let (doc, pattern, mut index, scope) = setup("foo bar foo", 0);
        let before = index.starts();
        assert!(matches!(
            index.toggle(&doc, 5, Some(&pattern), &scope).unwrap(),
            Toggled::Marker(_)
        ));
        assert_eq!(index.region_at(5).map(|r| r.is_marker), Some(true));
        assert!(matches!(
            index.toggle(&doc, 5, Some(&pattern), &scope).unwrap(),
            Toggled::Removed(_)
        ));
        assert_eq!(index.starts(), before);
    }

    #[test]
    fn test_restrict_is_idempotent() {
        let (doc, pattern, mut index, scope) = setup("foo bar foo baz foo", 0);
        index.discover_all(&doc, &pattern, &scope).unwrap();
        assert_eq!(index.restrict(4..19), 1);
        let once = index.starts();
        assert_eq!(index.restrict(4..19), 0);
        assert_eq!(index.starts(), once);
        assert_eq!(once, vec![8, 16]);
    }

    #[test]
    fn test_clear_resets_outer_bound() {
        let (_, _, mut index, _) = setup("foo", 0);
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.outer_bound(), None);
    }

    #[test]
    fn test_insert_rejects_overlap_and_out_of_bounds() {
        let (doc, _, mut index, _) = setup("foo bar", 0);
        assert_eq!(
            index.insert(&doc, Span::new(2, 5), false),
            Err(MultiEditError::FailedRegionCreation { start: 2, end: 5 })
        );
        assert!(index.insert(&doc, Span::new(5, 40), false).is_err());
        assert!(index.insert(&doc, Span::new(3, 4), false).is_ok());
    }

    // ========================================================================
    // track_change
    // ========================================================================

    #[test]
    fn test_track_change_unowned_insert_shifts_later_regions() {
        let (doc, pattern, mut index, scope) = setup("foo bar foo", 0);
        index.discover_all(&doc, &pattern, &scope).unwrap();
        index.track_change(&TextChange::insertion(4, 2), None);
        assert_eq!(index.starts(), vec![0, 10]);
    }

    #[test]
    fn test_track_change_drops_swallowed_region() {
        let (doc, pattern, mut index, scope) = setup("foo bar foo", 0);
        index.discover_all(&doc, &pattern, &scope).unwrap();
        let dropped = index.track_change(&TextChange::deletion(7..11), None);
        assert_eq!(dropped.len(), 1);
        assert_eq!(index.starts(), vec![0]);
    }

    #[test]
    fn test_track_change_keeps_collapsed_marker() {
        let doc = Document::with_text("ab cd");
        let mut index = OccurrenceIndex::new(true);
        let id = index.insert(&doc, Span::new(3, 4), true).unwrap();
        let dropped = index.track_change(&TextChange::deletion(2..5), None);
        assert!(dropped.is_empty());
        assert_eq!(index.get(id).map(|r| r.span), Some(Span::at(2)));
    }

    #[test]
    fn test_track_change_earlier_touching_region_wins_boundary() {
        let doc = Document::with_text("abcd");
        let mut index = OccurrenceIndex::new(true);
        let left = index.insert(&doc, Span::new(0, 2), false).unwrap();
        let right = index.insert(&doc, Span::new(2, 4), false).unwrap();
        index.track_change(&TextChange::insertion(2, 1), None);
        assert_eq!(index.get(left).map(|r| r.span), Some(Span::new(0, 3)));
        assert_eq!(index.get(right).map(|r| r.span), Some(Span::new(3, 5)));
        assert_disjoint(&index);
    }
}
