//! Editor update functions for the host cursor and selection

use crate::commands::Cmd;
use crate::messages::EditorMsg;
use crate::model::{AppModel, Cursor, Position, Selection};

/// Handle editor messages (cursor placement, selection)
pub fn update_editor(model: &mut AppModel, msg: EditorMsg) -> Option<Cmd> {
    match msg {
        EditorMsg::SetCursorPosition { line, column } => {
            let offset = model.document.cursor_to_offset(line, column);
            model.set_cursor_offset(offset, false);
            if model.session.is_active() {
                model.session.refocus(offset);
            }
        }

        EditorMsg::ExtendSelectionToPosition { line, column } => {
            let offset = model.document.cursor_to_offset(line, column);
            let (line, column) = model.document.offset_to_cursor(offset);
            let anchor = model.editor.selection.anchor;
            let anchor = if model.editor.selection.is_empty() {
                model.editor.cursor.to_position()
            } else {
                anchor
            };
            model.editor.cursor = Cursor::at(line, column);
            model.editor.selection = Selection::from_anchor_head(anchor, Position::new(line, column));
            model.editor.ensure_cursor_visible(&model.document);
        }

        EditorMsg::ClearSelection => model.editor.clear_selection(),
    }
    Some(Cmd::Redraw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_selection_keeps_anchor() {
        let mut model = AppModel::with_text("hello world");
        update_editor(&mut model, EditorMsg::SetCursorPosition { line: 0, column: 2 });
        update_editor(&mut model, EditorMsg::ExtendSelectionToPosition { line: 0, column: 5 });
        update_editor(&mut model, EditorMsg::ExtendSelectionToPosition { line: 0, column: 7 });
        assert_eq!(model.selection_range(), Some(2..7));
        update_editor(&mut model, EditorMsg::ClearSelection);
        assert_eq!(model.selection_range(), None);
    }

    #[test]
    fn test_cursor_position_is_clamped() {
        let mut model = AppModel::with_text("ab\ncd");
        update_editor(&mut model, EditorMsg::SetCursorPosition { line: 0, column: 40 });
        assert_eq!(model.editor.cursor, Cursor::at(0, 2));
    }
}
