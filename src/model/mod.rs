//! Application model - the complete state a multi-edit host carries
//!
//! This module contains all the state types following the Elm Architecture pattern.

pub mod document;
pub mod editor;

pub use document::{Document, TextChange};
pub use editor::{Cursor, EditorState, Position, ScrollRevealMode, Selection, Viewport};

use std::ops::Range;

use crate::config::MultieditConfig;
use crate::multiedit::{DeriveOptions, HistoryStore, Region, Seed, Session};

/// The complete application model
#[derive(Debug)]
pub struct AppModel {
    /// The document being edited
    pub document: Document,
    /// Host cursor, selection and viewport
    pub editor: EditorState,
    /// The multi-edit session (inactive when no regions are live)
    pub session: Session,
    /// Anchors of the last finished session on this document
    pub history: HistoryStore,
    /// Persisted matching policy
    pub config: MultieditConfig,
}

impl AppModel {
    pub fn new(document: Document, config: MultieditConfig) -> Self {
        Self {
            document,
            editor: EditorState::new(),
            session: Session::new(config.ignore_indent_and_trailing),
            history: HistoryStore::new(),
            config,
        }
    }

    /// Scratch model over `text` with default configuration
    pub fn with_text(text: &str) -> Self {
        Self::new(Document::with_text(text), MultieditConfig::default())
    }

    pub fn derive_options(&self) -> DeriveOptions {
        DeriveOptions::from(&self.config)
    }

    pub fn cursor_offset(&self) -> usize {
        self.editor.cursor_offset(&self.document)
    }

    /// Move the host cursor, revealing it (centered when following matches)
    pub fn set_cursor_offset(&mut self, offset: usize, centered: bool) {
        self.editor.set_cursor_from_offset(&self.document, offset);
        let mode = if centered {
            ScrollRevealMode::Centered
        } else {
            ScrollRevealMode::Minimal
        };
        self.editor.ensure_cursor_visible_with_mode(&self.document, mode);
    }

    /// The host selection as a char range, if it is not empty
    pub fn selection_range(&self) -> Option<Range<usize>> {
        let selection = self.editor.selection;
        (!selection.is_empty()).then(|| selection.to_range(&self.document))
    }

    /// What a session start should derive its pattern from
    pub fn seed(&self) -> Seed {
        match self.selection_range() {
            Some(range) => Seed::Selection(range),
            None => Seed::Point(self.cursor_offset()),
        }
    }

    /// Feed document changes made by session operations to the history
    /// anchors. Session regions have already tracked them.
    pub fn record_changes(&mut self, changes: &[TextChange]) {
        for change in changes {
            self.history.track_change(change);
        }
    }

    /// Apply an edit outside of any session operation and broadcast it
    pub fn apply_edit(&mut self, range: Range<usize>, text: &str) -> TextChange {
        let change = self.document.replace(range, text);
        self.session.track_change(&change);
        self.history.track_change(&change);
        change
    }

    /// Regions with their display positions, for hosts and the CLI
    pub fn region_positions(&self) -> Vec<(Position, &Region)> {
        self.session
            .regions()
            .iter()
            .map(|r| {
                let (line, column) = self.document.offset_to_cursor(r.start());
                (Position::new(line, column), r)
            })
            .collect()
    }

    /// End any live session, recording history unless the session opted out
    pub fn end_session(&mut self) -> bool {
        let was_active = self.session.is_active();
        if let Some(anchors) = self.session.abort() {
            self.history.record(anchors);
        }
        was_active
    }
}
