//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use multiedit::config::MultieditConfig;
use multiedit::model::{AppModel, Cursor, Document, EditorState, Position, Selection};
use multiedit::multiedit::Session;

/// Create a test model with given text and cursor position
pub fn test_model(text: &str, line: usize, column: usize) -> AppModel {
    test_model_with_config(text, line, column, MultieditConfig::default())
}

/// Create a test model with a custom configuration
pub fn test_model_with_config(
    text: &str,
    line: usize,
    column: usize,
    config: MultieditConfig,
) -> AppModel {
    let mut editor = EditorState::with_viewport(25);
    editor.cursor = Cursor::at(line, column);
    editor.selection = Selection::new(Position::new(line, column));

    AppModel {
        document: Document::with_text(text),
        editor,
        session: Session::new(config.ignore_indent_and_trailing),
        history: Default::default(),
        config,
    }
}

/// Create a test model with given text and a selection (anchor to head)
/// The cursor will be at the head position
pub fn test_model_with_selection(
    text: &str,
    anchor_line: usize,
    anchor_col: usize,
    head_line: usize,
    head_col: usize,
) -> AppModel {
    let mut model = test_model(text, head_line, head_col);
    model.editor.selection = Selection::from_anchor_head(
        Position::new(anchor_line, anchor_col),
        Position::new(head_line, head_col),
    );
    model
}

/// Helper to get buffer content as string
pub fn buffer_to_string(model: &AppModel) -> String {
    model.document.text()
}

/// Start offsets of every live region
pub fn region_starts(model: &AppModel) -> Vec<usize> {
    model.session.index().starts()
}

/// Text of every live region, in document order
pub fn region_texts(model: &AppModel) -> Vec<String> {
    model
        .session
        .regions()
        .iter()
        .map(|r| r.text(&model.document))
        .collect()
}

/// Cursor as (line, column)
pub fn cursor(model: &AppModel) -> (usize, usize) {
    (model.editor.cursor.line, model.editor.cursor.column)
}
