//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types. A key-dispatch
//! layer maps keys onto them; nothing here knows about keys.

use crate::multiedit::{InsertEntry, ScopeSpec};

/// Host cursor and selection messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMsg {
    /// Set cursor to a specific position (clears selection)
    SetCursorPosition { line: usize, column: usize },
    /// Extend selection from the cursor to a position
    ExtendSelectionToPosition { line: usize, column: usize },
    /// Collapse the selection onto the cursor
    ClearSelection,
}

/// Document messages (text editing at the host cursor)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentMsg {
    /// Insert a character at cursor
    InsertChar(char),
    /// Insert text at cursor
    InsertText(String),
    /// Insert a newline at cursor
    InsertNewline,
    /// Delete character before cursor (Backspace)
    DeleteBackward,
    /// Delete character at cursor (Delete)
    DeleteForward,
}

/// Multi-edit session messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMsg {
    /// Claim every occurrence of the seed at point (or the selection)
    MatchAll {
        /// Skip recording this session in history when it ends
        no_recall: bool,
        /// Scope override; the configured default scope otherwise
        scope: Option<ScopeSpec>,
    },
    /// Start with the match at point, then claim the next one forward
    MatchAndNext,
    /// Start with the match at point, then claim the next one backward
    MatchAndPrev,
    /// Restrict to the selection if there is one, else toggle at the cursor
    ToggleOrRestrict,
    /// Place or remove a marker region at the cursor
    ToggleMarkerHere,
    /// Jump to the next region
    Next,
    /// Jump to the previous region
    Prev,
    /// Enter insertion in every region
    EnterInsert(InsertEntry),
    /// Leave insertion
    ExitInsert,
    /// Empty every region
    DeleteAll,
    /// Replace every region with yanked text
    Paste(String),
    UpcaseAll,
    DowncaseAll,
    /// End the session
    Abort,
    /// The host forced itself back to its base mode; always ends the session
    ForceNormal,
    /// Reopen the last session from history
    Restore,
    /// Ex-style start over an optional line range (0-indexed, inclusive)
    ExMatch {
        lines: Option<(usize, usize)>,
        /// Regexp to match; the seed at point when absent
        regexp: Option<String>,
        /// Match `regexp` as literal text
        literal: bool,
        /// Leave this session out of history
        no_recall: bool,
    },
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Editor messages (cursor, selection)
    Editor(EditorMsg),
    /// Document messages (text editing)
    Document(DocumentMsg),
    /// Multi-edit session messages
    Session(SessionMsg),
}

// Convenience constructors for common messages
impl Msg {
    /// Create an insert character message
    pub fn insert_char(ch: char) -> Self {
        Msg::Document(DocumentMsg::InsertChar(ch))
    }

    /// Create a set-cursor message
    pub fn cursor_to(line: usize, column: usize) -> Self {
        Msg::Editor(EditorMsg::SetCursorPosition { line, column })
    }

    /// Create a plain match-all message using the configured scope
    pub fn match_all() -> Self {
        Msg::Session(SessionMsg::MatchAll {
            no_recall: false,
            scope: None,
        })
    }
}
