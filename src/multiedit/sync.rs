//! Synchronized editing - one edit, replayed into every live region
//!
//! Each region is a tracked span, so applying the same relative edit to
//! every region in turn (with that region as the origin for boundary
//! claims) leaves all of them holding the same text. Every function returns
//! the document changes it made, in application order, so the caller can
//! feed them to any other span trackers.

use super::error::MultiEditError;
use super::occurrences::OccurrenceIndex;
use super::region::RegionId;
use crate::model::{Document, TextChange};

/// An edit expressed relative to the start of the region it happens in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionEdit {
    /// Chars from the region start
    pub offset: usize,
    /// Chars removed at `offset`
    pub removed: usize,
    /// Text inserted at `offset` after the removal
    pub text: String,
}

impl RegionEdit {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            offset,
            removed: 0,
            text: text.into(),
        }
    }

    pub fn delete(offset: usize, removed: usize) -> Self {
        Self {
            offset,
            removed,
            text: String::new(),
        }
    }

    /// Offset just past the inserted text, relative to the region start
    pub fn cursor_after(&self) -> usize {
        self.offset + self.text.chars().count()
    }
}

fn ids(index: &OccurrenceIndex) -> Vec<RegionId> {
    index.iter().map(|r| r.id).collect()
}

/// Replace `range` of region `id` and track the change with `id` as origin
fn replace_in(
    document: &mut Document,
    index: &mut OccurrenceIndex,
    id: RegionId,
    range: std::ops::Range<usize>,
    text: &str,
    changes: &mut Vec<TextChange>,
) {
    let change = document.replace(range, text);
    if change.is_noop() {
        return;
    }
    index.track_change(&change, Some(id));
    changes.push(change);
}

/// Apply `edit` at the same relative offset in every region.
///
/// Regions shorter than the edit offset take it at their end; removal is
/// clipped to each region's text.
pub fn apply_in_region(
    document: &mut Document,
    index: &mut OccurrenceIndex,
    origin: RegionId,
    edit: &RegionEdit,
) -> Result<Vec<TextChange>, MultiEditError> {
    let origin_len = index.get(origin).ok_or(MultiEditError::Inactive)?.len();
    if edit.offset + edit.removed > origin_len {
        let start = index.get(origin).map_or(0, |r| r.start());
        return Err(MultiEditError::FailedRegionCreation {
            start: start + edit.offset,
            end: start + edit.offset + edit.removed,
        });
    }

    let mut changes = Vec::new();
    for id in ids(index) {
        let Some(region) = index.get(id) else {
            continue;
        };
        let offset = edit.offset.min(region.len());
        let removed = edit.removed.min(region.len() - offset);
        let at = region.start() + offset;
        replace_in(document, index, id, at..at + removed, &edit.text, &mut changes);
    }

    tracing::debug!(
        target: "sync",
        %origin,
        offset = edit.offset,
        removed = edit.removed,
        inserted = %edit.text,
        regions = index.len(),
        "mirrored edit"
    );
    Ok(changes)
}

/// Marker glyph visibility after region `edited` changed: shown while the
/// edited region is empty, hidden once it holds text
pub fn on_region_content_changed(index: &OccurrenceIndex, edited: RegionId) -> bool {
    let visible = index.get(edited).map_or(true, |r| r.is_empty());
    tracing::trace!(target: "sync", %edited, visible, "marker visibility");
    visible
}

/// Empty every region, keeping the regions themselves
pub fn delete_all_occurrence_contents(
    document: &mut Document,
    index: &mut OccurrenceIndex,
) -> Vec<TextChange> {
    let mut changes = Vec::new();
    for id in ids(index) {
        if let Some(range) = index.get(id).map(|r| r.span.range()) {
            replace_in(document, index, id, range, "", &mut changes);
        }
    }
    tracing::debug!(target: "sync", regions = index.len(), "emptied all regions");
    changes
}

/// Empty every region, then insert `text` into each
pub fn replace_all_with_yanked_text(
    document: &mut Document,
    index: &mut OccurrenceIndex,
    text: &str,
) -> Vec<TextChange> {
    let mut changes = delete_all_occurrence_contents(document, index);
    for id in ids(index) {
        if let Some(start) = index.get(id).map(|r| r.start()) {
            replace_in(document, index, id, start..start, text, &mut changes);
        }
    }
    changes
}

/// Rewrite each region's text through `f` (case transforms and the like)
pub fn map_all(
    document: &mut Document,
    index: &mut OccurrenceIndex,
    f: impl Fn(&str) -> String,
) -> Vec<TextChange> {
    let mut changes = Vec::new();
    for id in ids(index) {
        let Some(region) = index.get(id) else {
            continue;
        };
        let range = region.span.range();
        let old = region.text(document);
        let new = f(&old);
        if new != old {
            replace_in(document, index, id, range, &new, &mut changes);
        }
    }
    changes
}
