//! Session state machine - which multi-edit operations are legal, and where
//! focus sits between regions
//!
//! ```text
//!   Inactive --start--> Active --enter_insert--> InsertFocused
//!      ^                  |  ^                         |
//!      +------abort-------+  +-------exit_insert-------+
//! ```
//!
//! `abort` is legal from both live states. The session owns everything the
//! engine mutates: pattern, scope, region set, outer bound, focus and the
//! marker glyph flag.

use std::ops::Range;

use super::error::MultiEditError;
use super::occurrences::{Direction, OccurrenceIndex, Toggled};
use super::pattern::{derive, DeriveOptions, Pattern, Seed};
use super::region::{Region, RegionId, Span};
use super::scope::Scope;
use super::sync::{self, RegionEdit};
use crate::model::{Document, TextChange};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Inactive,
    /// Regions selected, keystrokes are navigation and commands
    Active,
    /// Typing into the current region, mirrored to all others
    InsertFocused,
}

/// The ways of entering insertion from `Active`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertEntry {
    /// Before the region
    Insert,
    /// After the region
    Append,
    /// New line after every region
    OpenBelow,
    /// New line before every region
    OpenAbove,
    /// Replace from the cursor to each region's end
    Change,
    /// Replace each region's whole text
    Substitute,
}

/// Where the cursor should go after an operation, and what it changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub cursor: usize,
    pub changes: Vec<TextChange>,
}

#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    pattern: Option<Pattern>,
    scope: Option<Scope>,
    index: OccurrenceIndex,
    current: Option<RegionId>,
    /// Shared marker glyph flag: shown while markers hold no text
    markers_visible: bool,
    /// One-shot: skip the history snapshot when this session ends
    no_recall: bool,
    skip_indent_and_trailing: bool,
}

impl Session {
    pub fn new(skip_indent_and_trailing: bool) -> Self {
        Self {
            state: SessionState::Inactive,
            pattern: None,
            scope: None,
            index: OccurrenceIndex::new(skip_indent_and_trailing),
            current: None,
            markers_visible: true,
            no_recall: false,
            skip_indent_and_trailing,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != SessionState::Inactive
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn scope(&self) -> Option<Scope> {
        self.scope
    }

    pub fn index(&self) -> &OccurrenceIndex {
        &self.index
    }

    pub fn regions(&self) -> &[Region] {
        self.index.regions()
    }

    pub fn current(&self) -> Option<&Region> {
        self.current.and_then(|id| self.index.get(id))
    }

    pub fn markers_visible(&self) -> bool {
        self.markers_visible
    }

    /// Whether the host should draw the marker glyph for `region`
    pub fn shows_marker(&self, region: &Region) -> bool {
        region.is_marker && self.markers_visible
    }

    fn require_active(&self) -> Result<(), MultiEditError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(MultiEditError::Inactive)
        }
    }

    // ========================================================================
    // Starting
    // ========================================================================

    /// Build the next session state off to the side and commit it only once
    /// everything succeeded
    fn begin(
        &mut self,
        document: &Document,
        pattern: Option<Pattern>,
        seed: Option<Span>,
        scope: Scope,
        discover: bool,
        no_recall: bool,
    ) -> Result<usize, MultiEditError> {
        let mut index = OccurrenceIndex::new(self.skip_indent_and_trailing);
        if let Some(span) = seed {
            index.seed(document, span)?;
        }
        if let Some(pattern) = pattern.as_ref().filter(|_| discover) {
            index.discover_all(document, pattern, &scope)?;
        }
        if index.is_empty() {
            return Err(MultiEditError::NoMatchable);
        }

        self.current = seed.and_then(|span| index.region_at(span.start)).map(|r| r.id);
        self.index = index;
        self.pattern = pattern;
        self.scope = Some(scope);
        self.state = SessionState::Active;
        self.no_recall = no_recall;
        self.markers_visible = true;

        tracing::info!(
            target: "session",
            regions = self.index.len(),
            scope_start = scope.start,
            scope_end = scope.end,
            no_recall,
            "session started"
        );
        Ok(self.index.len())
    }

    /// Match-all start: derive from `seed`, then claim every match in scope
    pub fn start_all(
        &mut self,
        document: &Document,
        seed: Seed,
        scope: Scope,
        options: &DeriveOptions,
        no_recall: bool,
    ) -> Result<usize, MultiEditError> {
        let (pattern, span) = derive(document, seed, options)?;
        let seed = scope.contains(&span).then_some(span);
        self.begin(document, Some(pattern), seed, scope, true, no_recall)
    }

    /// Match-all start from an already built pattern (ex-style regexp)
    pub fn start_pattern(
        &mut self,
        document: &Document,
        pattern: Pattern,
        scope: Scope,
        no_recall: bool,
    ) -> Result<usize, MultiEditError> {
        self.begin(document, Some(pattern), None, scope, true, no_recall)
    }

    /// Incremental start: only the match under the seed is claimed
    pub fn start_seed(
        &mut self,
        document: &Document,
        seed: Seed,
        scope: Scope,
        options: &DeriveOptions,
    ) -> Result<usize, MultiEditError> {
        let (pattern, span) = derive(document, seed, options)?;
        if !scope.contains(&span) {
            return Err(MultiEditError::InvalidScope(
                "match at point lies outside the scope".into(),
            ));
        }
        self.begin(document, Some(pattern), Some(span), scope, false, false)
    }

    /// Reopen the last session: match at `seed` over the whole document,
    /// then keep only regions starting on a recorded anchor
    pub fn restore(
        &mut self,
        document: &Document,
        seed: Seed,
        options: &DeriveOptions,
        anchors: &[usize],
    ) -> Result<usize, MultiEditError> {
        let mut fresh = Session::new(self.skip_indent_and_trailing);
        fresh
            .start_all(document, seed, Scope::whole(document), options, false)
            .map_err(|e| match e {
                MultiEditError::NoMatchable => e,
                _ => MultiEditError::NoHistory,
            })?;

        let stale: Vec<RegionId> = fresh
            .index
            .iter()
            .filter(|r| anchors.binary_search(&r.start()).is_err())
            .map(|r| r.id)
            .collect();
        for id in stale {
            fresh.index.remove(id);
        }
        if fresh.index.is_empty() {
            return Err(MultiEditError::NoHistory);
        }
        if fresh.current().is_none() {
            fresh.current = None;
        }

        *self = fresh;
        tracing::info!(target: "session", regions = self.index.len(), "session restored");
        Ok(self.index.len())
    }

    // ========================================================================
    // Region set
    // ========================================================================

    /// Claim the next match beyond the outer bound; it becomes current
    pub fn discover_next(
        &mut self,
        document: &Document,
        direction: Direction,
    ) -> Result<&Region, MultiEditError> {
        self.require_active()?;
        let (Some(pattern), Some(scope)) = (self.pattern.as_ref(), self.scope) else {
            return Err(MultiEditError::NoMoreMatches);
        };
        let id = self.index.discover_next(document, pattern, direction, &scope)?;
        self.current = Some(id);
        self.index.get(id).ok_or(MultiEditError::NoMoreMatches)
    }

    /// Toggle the region at `pos` (see [`OccurrenceIndex::toggle`])
    pub fn toggle(&mut self, document: &Document, pos: usize) -> Result<Toggled, MultiEditError> {
        self.require_active()?;
        let scope = self.scope.unwrap_or_else(|| Scope::whole(document));
        let toggled = self
            .index
            .toggle(document, pos, self.pattern.as_ref(), &scope)?;
        self.refocus(pos);
        Ok(toggled)
    }

    /// Place or remove a marker at `pos` without consulting the pattern,
    /// opening a marker-only session when none is live
    pub fn toggle_marker(&mut self, document: &Document, pos: usize) -> Result<Toggled, MultiEditError> {
        if !self.is_active() {
            self.begin_markers(document, pos)?;
            let id = self.current.ok_or(MultiEditError::FailedRegionCreation {
                start: pos,
                end: pos,
            })?;
            return Ok(Toggled::Marker(id));
        }
        let scope = self.scope.unwrap_or_else(|| Scope::whole(document));
        let toggled = self.index.toggle(document, pos, None, &scope)?;
        self.refocus(pos);
        Ok(toggled)
    }

    fn begin_markers(&mut self, document: &Document, pos: usize) -> Result<(), MultiEditError> {
        let mut index = OccurrenceIndex::new(self.skip_indent_and_trailing);
        let id = index.insert(document, Span::at(pos), true)?;
        self.index = index;
        self.pattern = None;
        self.scope = Some(Scope::whole(document));
        self.current = Some(id);
        self.state = SessionState::Active;
        self.no_recall = false;
        self.markers_visible = true;
        tracing::info!(target: "session", pos, "marker session started");
        Ok(())
    }

    /// Keep only regions inside `range`
    pub fn restrict(&mut self, range: Range<usize>) -> Result<usize, MultiEditError> {
        self.require_active()?;
        let removed = self.index.restrict(range);
        if self.current().is_none() {
            self.current = None;
        }
        Ok(removed)
    }

    /// Re-derive the current region from a cursor offset
    pub fn refocus(&mut self, cursor: usize) -> Option<RegionId> {
        self.current = self.index.region_touching(cursor).map(|r| r.id);
        self.current
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Focus the first region starting after `cursor`; returns its start
    pub fn next(&mut self, cursor: usize) -> Result<usize, MultiEditError> {
        self.navigate(cursor, Direction::Forward)
    }

    /// Focus the last region starting before the one at `cursor` (or before
    /// `cursor` itself); returns its start
    pub fn prev(&mut self, cursor: usize) -> Result<usize, MultiEditError> {
        self.navigate(cursor, Direction::Backward)
    }

    fn navigate(&mut self, cursor: usize, direction: Direction) -> Result<usize, MultiEditError> {
        self.require_active()?;
        let target = match direction {
            Direction::Forward => self.index.iter().find(|r| r.start() > cursor),
            Direction::Backward => {
                let reference = self
                    .index
                    .region_touching(cursor)
                    .map_or(cursor, Region::start);
                self.index.iter().rev().find(|r| r.start() < reference)
            }
        };
        let (id, start) = target
            .map(|r| (r.id, r.start()))
            .ok_or(MultiEditError::NoMoreOccurrences)?;
        self.current = Some(id);
        tracing::debug!(target: "session", ?direction, %id, start, "focus moved");
        Ok(start)
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Enter `InsertFocused`, preparing every region for `entry`.
    ///
    /// The current region is re-derived from `cursor` first. Without a
    /// region there the entry behaves as in plain editing: line start,
    /// line end, a plain new line, or no deletion.
    pub fn enter_insert(
        &mut self,
        document: &mut Document,
        cursor: usize,
        entry: InsertEntry,
    ) -> Result<Outcome, MultiEditError> {
        self.require_active()?;
        let Some(id) = self.refocus(cursor) else {
            let outcome = self.enter_insert_plain(document, cursor, entry);
            self.state = SessionState::InsertFocused;
            return Ok(outcome);
        };
        let region = self.index.get(id).cloned().ok_or(MultiEditError::Inactive)?;

        let (edit, offset) = match entry {
            InsertEntry::Insert => (None, 0),
            InsertEntry::Append => (None, region.len()),
            InsertEntry::OpenBelow => (Some(RegionEdit::insert(region.len(), "\n")), region.len() + 1),
            InsertEntry::OpenAbove => (Some(RegionEdit::insert(0, "\n")), 0),
            InsertEntry::Change => {
                let rel = cursor.saturating_sub(region.start()).min(region.len());
                (Some(RegionEdit::delete(rel, region.len() - rel)), rel)
            }
            InsertEntry::Substitute => (Some(RegionEdit::delete(0, region.len())), 0),
        };

        let changes = match edit {
            Some(edit) => sync::apply_in_region(document, &mut self.index, id, &edit)?,
            None => Vec::new(),
        };
        let start = self.index.get(id).map_or(region.start(), Region::start);
        self.markers_visible = sync::on_region_content_changed(&self.index, id);
        self.state = SessionState::InsertFocused;
        tracing::debug!(target: "session", ?entry, %id, "insert entered");
        Ok(Outcome {
            cursor: start + offset,
            changes,
        })
    }

    fn enter_insert_plain(&mut self, document: &mut Document, cursor: usize, entry: InsertEntry) -> Outcome {
        let line = document.line_of(cursor);
        let line_start = document.line_start(line);
        match entry {
            InsertEntry::Insert => Outcome {
                cursor: line_start + document.first_non_whitespace_column(line),
                changes: Vec::new(),
            },
            InsertEntry::Append => Outcome {
                cursor: document.line_range(line).end,
                changes: Vec::new(),
            },
            InsertEntry::OpenBelow => {
                let at = document.line_range(line).end;
                let change = self.plain_edit(document, at..at, "\n");
                Outcome {
                    cursor: at + 1,
                    changes: vec![change],
                }
            }
            InsertEntry::OpenAbove => {
                let change = self.plain_edit(document, line_start..line_start, "\n");
                Outcome {
                    cursor: line_start,
                    changes: vec![change],
                }
            }
            InsertEntry::Change | InsertEntry::Substitute => Outcome {
                cursor,
                changes: Vec::new(),
            },
        }
    }

    /// Leave `InsertFocused`, resynchronizing marker glyphs
    pub fn exit_insert(&mut self) {
        if self.state == SessionState::InsertFocused {
            self.state = SessionState::Active;
        }
        self.markers_visible = self
            .index
            .iter()
            .filter(|r| r.is_marker)
            .all(Region::is_empty);
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Region an edit of `range` falls inside, preferring the current one
    fn region_for_edit(&self, range: &Range<usize>) -> Option<RegionId> {
        let fits = |r: &&Region| r.start() <= range.start && range.end <= r.end();
        self.current()
            .filter(fits)
            .or_else(|| self.index.iter().find(fits))
            .map(|r| r.id)
    }

    fn plain_edit(&mut self, document: &mut Document, range: Range<usize>, text: &str) -> TextChange {
        let change = document.replace(range, text);
        self.index.track_change(&change, None);
        if self.current().is_none() {
            self.current = None;
        }
        change
    }

    /// Replace `range` with `text`. Inside a region the edit is mirrored to
    /// every region; elsewhere it is a plain edit the regions track.
    pub fn edit(
        &mut self,
        document: &mut Document,
        range: Range<usize>,
        text: &str,
    ) -> Result<Outcome, MultiEditError> {
        self.require_active()?;
        let Some(id) = self.region_for_edit(&range) else {
            let change = self.plain_edit(document, range, text);
            return Ok(Outcome {
                cursor: change.start + change.inserted,
                changes: vec![change],
            });
        };

        let start = self.index.get(id).map_or(range.start, Region::start);
        let edit = RegionEdit {
            offset: range.start - start,
            removed: range.end - range.start,
            text: text.to_string(),
        };
        let changes = sync::apply_in_region(document, &mut self.index, id, &edit)?;
        self.current = Some(id);
        self.markers_visible = sync::on_region_content_changed(&self.index, id);
        let start = self.index.get(id).map_or(start, Region::start);
        Ok(Outcome {
            cursor: start + edit.cursor_after(),
            changes,
        })
    }

    /// Empty every region
    pub fn delete_all(&mut self, document: &mut Document) -> Result<Vec<TextChange>, MultiEditError> {
        self.require_active()?;
        let changes = sync::delete_all_occurrence_contents(document, &mut self.index);
        self.markers_visible = true;
        Ok(changes)
    }

    /// Replace every region's text with `text`
    pub fn paste(&mut self, document: &mut Document, text: &str) -> Result<Vec<TextChange>, MultiEditError> {
        self.require_active()?;
        let changes = sync::replace_all_with_yanked_text(document, &mut self.index, text);
        self.markers_visible = text.is_empty();
        Ok(changes)
    }

    /// Rewrite every region through `f`
    pub fn map_all(
        &mut self,
        document: &mut Document,
        f: impl Fn(&str) -> String,
    ) -> Result<Vec<TextChange>, MultiEditError> {
        self.require_active()?;
        Ok(sync::map_all(document, &mut self.index, f))
    }

    /// Track a change made outside the session's own operations
    pub fn track_change(&mut self, change: &TextChange) {
        if self.is_active() {
            self.index.track_change(change, None);
            if self.current().is_none() {
                self.current = None;
            }
        }
    }

    // ========================================================================
    // Ending
    // ========================================================================

    /// End the session. Returns the region starts to record in history,
    /// or `None` when nothing should be recorded (inactive, or no-recall).
    pub fn abort(&mut self) -> Option<Vec<usize>> {
        if !self.is_active() {
            return None;
        }
        let anchors = (!self.no_recall).then(|| self.index.starts());
        tracing::info!(
            target: "session",
            regions = self.index.len(),
            recorded = anchors.is_some(),
            "session ended"
        );

        self.state = SessionState::Inactive;
        self.pattern = None;
        self.scope = None;
        self.index.clear();
        self.current = None;
        self.markers_visible = true;
        self.no_recall = false;
        anchors
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(true)
    }
}
