//! Document update functions for text editing at the host cursor
//!
//! While a session is live, edits inside a region are mirrored into every
//! region; edits anywhere else are plain edits the regions track.

use std::ops::Range;

use crate::commands::Cmd;
use crate::messages::DocumentMsg;
use crate::model::AppModel;
use crate::multiedit::MultiEditError;

/// Handle document messages (text editing)
pub fn update_document(model: &mut AppModel, msg: DocumentMsg) -> Result<Option<Cmd>, MultiEditError> {
    let cursor = model.cursor_offset();
    let len = model.document.len_chars();
    let selection = model.selection_range();

    let (range, text): (Range<usize>, String) = match msg {
        DocumentMsg::InsertChar(ch) => (selection.unwrap_or(cursor..cursor), ch.to_string()),
        DocumentMsg::InsertText(text) => (selection.unwrap_or(cursor..cursor), text),
        DocumentMsg::InsertNewline => (selection.unwrap_or(cursor..cursor), "\n".to_string()),
        DocumentMsg::DeleteBackward => match selection {
            Some(range) => (range, String::new()),
            None if cursor > 0 => (cursor - 1..cursor, String::new()),
            None => return Ok(None),
        },
        DocumentMsg::DeleteForward => match selection {
            Some(range) => (range, String::new()),
            None if cursor < len => (cursor..cursor + 1, String::new()),
            None => return Ok(None),
        },
    };

    let new_cursor = if model.session.is_active() {
        let outcome = model.session.edit(&mut model.document, range, &text)?;
        model.record_changes(&outcome.changes);
        outcome.cursor
    } else {
        let change = model.apply_edit(range, &text);
        change.start + change.inserted
    };

    model.set_cursor_offset(new_cursor, false);
    Ok(Some(Cmd::Redraw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cursor, Position, Selection};

    #[test]
    fn test_plain_typing_without_session() {
        let mut model = AppModel::with_text("ab");
        model.editor.cursor = Cursor::at(0, 1);
        update_document(&mut model, DocumentMsg::InsertChar('x')).unwrap();
        assert_eq!(model.document.text(), "axb");
        assert_eq!(model.editor.cursor, Cursor::at(0, 2));
    }

    #[test]
    fn test_backspace_at_document_start_is_noop() {
        let mut model = AppModel::with_text("ab");
        assert_eq!(update_document(&mut model, DocumentMsg::DeleteBackward).unwrap(), None);
        assert_eq!(model.document.text(), "ab");
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut model = AppModel::with_text("hello world");
        model.editor.selection =
            Selection::from_anchor_head(Position::new(0, 0), Position::new(0, 5));
        model.editor.cursor = Cursor::at(0, 5);
        update_document(&mut model, DocumentMsg::InsertText("bye".into())).unwrap();
        assert_eq!(model.document.text(), "bye world");
        assert_eq!(model.editor.cursor, Cursor::at(0, 3));
    }
}
