//! Editor state - host cursor, selection and viewport

use super::document::Document;

/// Strategy for revealing the cursor when it's outside the viewport
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollRevealMode {
    /// Minimal scroll: move viewport just enough to bring cursor into safe zone
    #[default]
    Minimal,
    /// Centered: place cursor in the middle of the viewport
    Centered,
}

/// A position in the document (line and column)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed)
    pub column: usize,
}

impl Position {
    /// Create a new position
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A text selection with anchor (start) and head (cursor end)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// Where the selection started (fixed point)
    pub anchor: Position,
    /// Where the cursor is (moving point)
    pub head: Position,
}

impl Selection {
    /// Create a new empty selection at a position
    pub fn new(pos: Position) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    /// Create a selection from anchor to head
    pub fn from_anchor_head(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    /// Check if selection is empty (cursor without selection)
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Get the start of the selection (smaller position)
    pub fn start(&self) -> Position {
        self.anchor.min(self.head)
    }

    /// Get the end of the selection (larger position)
    pub fn end(&self) -> Position {
        self.anchor.max(self.head)
    }

    /// Selection as a char range in `document`
    pub fn to_range(&self, document: &Document) -> std::ops::Range<usize> {
        let start = self.start();
        let end = self.end();
        document.cursor_to_offset(start.line, start.column)
            ..document.cursor_to_offset(end.line, end.column)
    }
}

/// Cursor position in the document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed)
    pub column: usize,
}

impl Cursor {
    /// Create a cursor at a specific position
    pub fn at(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Convert to Position
    pub fn to_position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// Viewport state - what portion of the document is visible
#[derive(Debug, Clone)]
pub struct Viewport {
    /// First visible line (0-indexed)
    pub top_line: usize,
    /// Number of lines that fit in the viewport
    pub visible_lines: usize,
}

impl Viewport {
    /// Create a new viewport with the given height
    pub fn new(visible_lines: usize) -> Self {
        Self {
            top_line: 0,
            visible_lines,
        }
    }

    /// Last visible line (exclusive)
    pub fn bottom_line(&self) -> usize {
        self.top_line + self.visible_lines
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(25)
    }
}

/// Editor state - the host's single cursor, its selection and the viewport.
///
/// Multi-edit regions live in the session; this is only the point that
/// keystrokes are delivered to.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub cursor: Cursor,
    /// Visual-mode selection (empty when there is none)
    pub selection: Selection,
    pub viewport: Viewport,
    /// Number of lines of padding to maintain above/below cursor when scrolling
    pub scroll_padding: usize,
}

impl EditorState {
    /// Create a new editor state with default settings
    pub fn new() -> Self {
        Self {
            cursor: Cursor::default(),
            selection: Selection::default(),
            viewport: Viewport::default(),
            scroll_padding: 1,
        }
    }

    /// Create an editor state with specific viewport height
    pub fn with_viewport(visible_lines: usize) -> Self {
        Self {
            viewport: Viewport::new(visible_lines),
            ..Self::new()
        }
    }

    /// Collapse the selection onto the cursor
    pub fn clear_selection(&mut self) {
        self.selection = Selection::new(self.cursor.to_position());
    }

    /// Set cursor position from char offset (clears selection)
    pub fn set_cursor_from_offset(&mut self, document: &Document, offset: usize) {
        let (line, column) = document.offset_to_cursor(offset);
        self.cursor = Cursor::at(line, column);
        self.clear_selection();
    }

    /// Char offset of the cursor
    pub fn cursor_offset(&self, document: &Document) -> usize {
        document.cursor_to_offset(self.cursor.line, self.cursor.column)
    }

    /// Ensure the cursor is visible within the viewport with padding (minimal scroll)
    pub fn ensure_cursor_visible(&mut self, document: &Document) {
        self.ensure_cursor_visible_with_mode(document, ScrollRevealMode::Minimal);
    }

    /// Ensure the cursor is visible using the specified reveal strategy
    ///
    /// - `Minimal`: scroll just enough to bring cursor into safe zone
    /// - `Centered`: place cursor in center of viewport (used when following matches)
    pub fn ensure_cursor_visible_with_mode(&mut self, document: &Document, mode: ScrollRevealMode) {
        let line = self.cursor.line;
        let padding = self.scroll_padding;
        let total_lines = document.line_count();

        if total_lines <= self.viewport.visible_lines || self.viewport.visible_lines == 0 {
            self.viewport.top_line = 0;
            return;
        }

        let max_top = total_lines.saturating_sub(self.viewport.visible_lines);
        let safe_top = self.viewport.top_line + padding;
        let safe_bottom = self.viewport.top_line
            + self
                .viewport
                .visible_lines
                .saturating_sub(padding)
                .saturating_sub(1);

        let off_above = line < safe_top;
        let off_below = line > safe_bottom;

        let top = match mode {
            ScrollRevealMode::Minimal if off_above => line.saturating_sub(padding),
            ScrollRevealMode::Minimal if off_below => {
                (line + padding + 1).saturating_sub(self.viewport.visible_lines)
            }
            ScrollRevealMode::Minimal => return,
            ScrollRevealMode::Centered => line.saturating_sub(self.viewport.visible_lines / 2),
        };
        self.viewport.top_line = top.min(max_top);
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}
