//! Regions - live tracked spans owned by a multi-edit session
//!
//! A region is not a snapshot of text: its span is re-mapped through every
//! [`TextChange`] applied to the document, which is what keeps all regions
//! pointing at "the same" occurrence while text grows and shrinks around
//! and inside them.
//!
//! # Tracking rules
//!
//! A change replaces `removed` chars at `start` with `inserted` chars. It is
//! applied to a span `[s, e)` in two phases.
//!
//! Deletion of `[start, start + removed)`: each endpoint `x` maps to `x` when
//! `x <= start`, to `x - removed` when `x >= start + removed`, and to `start`
//! otherwise.
//!
//! Insertion of `inserted` chars at `p = start`:
//! - `p < s`: the span shifts right
//! - `s < p < e`: the span grows
//! - `p > e`: the span is unchanged
//! - `p == s` or `p == e`: decided by [`BoundaryClaim`]. The origin region
//!   (the one the edit was typed in) grows; bystanders shift when `p == s`
//!   and stay when `p == e`. Unowned changes grow a span at its end, and at
//!   its start only when no other region ends at `p`.
//!
//! A non-empty span whose whole text is removed by a deletion reaching past
//! either of its boundaries reports [`Tracked::Collapsed`]. Removing exactly
//! the span's own text keeps it alive as an empty span.

use std::fmt;
use std::ops::Range;

use crate::model::{Document, TextChange};

/// Stable identity of a region within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(pub u64);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Who owns insertions landing exactly on a span boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryClaim {
    /// The edit was made in this span
    Origin,
    /// The edit was made in some other region
    Bystander,
    /// The edit belongs to no region
    Unowned {
        /// No other region ends where this one starts
        start_free: bool,
    },
}

/// Result of mapping a span through a change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tracked {
    Kept,
    /// The span's text was swallowed by a deletion reaching past it
    Collapsed,
}

/// A half-open char range `[start, end)` that follows document edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} after end {}", start, end);
        Self { start, end }
    }

    /// Zero-width span at a position
    pub fn at(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether `pos` addresses this span: inside its text, or on it if empty
    pub fn contains(&self, pos: usize) -> bool {
        if self.is_empty() {
            pos == self.start
        } else {
            self.start <= pos && pos < self.end
        }
    }

    /// Like [`Span::contains`] but also true at the end boundary, where a
    /// cursor sits after typing into the span
    pub fn touches(&self, pos: usize) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Whether two spans claim any common text (or the same empty point)
    pub fn overlaps(&self, other: &Span) -> bool {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => self.start == other.start,
            (true, false) => other.start < self.start && self.start < other.end,
            (false, true) => self.start < other.start && other.start < self.end,
            (false, false) => self.start < other.end && other.start < self.end,
        }
    }

    /// Whether this span lies entirely inside `range`
    pub fn within(&self, range: &Range<usize>) -> bool {
        range.start <= self.start && self.end <= range.end
    }

    /// Map this span through a change. See the module docs for the rules.
    pub fn track(&mut self, change: &TextChange, claim: BoundaryClaim) -> Tracked {
        let del_start = change.start;
        let del_end = change.removed_end();

        let swallowed = change.removed > 0
            && !self.is_empty()
            && del_start <= self.start
            && del_end >= self.end
            && (del_start < self.start || del_end > self.end);

        let map = |x: usize| {
            if x <= del_start {
                x
            } else if x >= del_end {
                x - change.removed
            } else {
                del_start
            }
        };
        self.start = map(self.start);
        self.end = map(self.end);

        if swallowed {
            return Tracked::Collapsed;
        }
        if change.inserted == 0 {
            return Tracked::Kept;
        }

        let p = change.start;
        let n = change.inserted;
        if p < self.start {
            self.start += n;
            self.end += n;
        } else if p > self.end {
            // after the span
        } else if p > self.start && p < self.end {
            self.end += n;
        } else {
            let grow = match claim {
                BoundaryClaim::Origin => true,
                BoundaryClaim::Bystander => false,
                BoundaryClaim::Unowned { start_free } => {
                    if p == self.start {
                        start_free
                    } else {
                        true
                    }
                }
            };
            if grow {
                self.end += n;
            } else if p == self.start {
                self.start += n;
                self.end += n;
            }
        }
        Tracked::Kept
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// One edit region: an exclusively owned span of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub id: RegionId,
    pub span: Span,
    /// Created as a zero-width insertion point rather than from a match
    pub is_marker: bool,
}

impl Region {
    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Current text of the region
    pub fn text(&self, document: &Document) -> String {
        document.slice(self.span.range())
    }
}
