//! History store - region anchors of the last finished session
//!
//! Anchors behave like buffer markers: they follow later edits, so a
//! restore after more typing still lands on the same occurrences.

use crate::model::TextChange;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStore {
    anchors: Option<Vec<usize>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the snapshot with the start offsets of a finished session
    pub fn record(&mut self, mut anchors: Vec<usize>) {
        anchors.sort_unstable();
        anchors.dedup();
        tracing::debug!(target: "session", count = anchors.len(), "history recorded");
        self.anchors = Some(anchors);
    }

    pub fn snapshot(&self) -> Option<&[usize]> {
        self.anchors.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.as_ref().map_or(true, Vec::is_empty)
    }

    /// Shift every anchor through a document change
    pub fn track_change(&mut self, change: &TextChange) {
        if let Some(anchors) = self.anchors.as_mut() {
            for anchor in anchors.iter_mut() {
                *anchor = change.map_offset(*anchor);
            }
            anchors.dedup();
        }
    }

    pub fn clear(&mut self) {
        self.anchors = None;
    }
}
