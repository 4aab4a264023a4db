//! Session lifecycle - navigation, toggling, markers, insertion, abort and restore

mod common;

use common::{
    buffer_to_string, cursor, region_starts, test_model, test_model_with_selection,
};
use multiedit::messages::{DocumentMsg, EditorMsg, Msg, SessionMsg};
use multiedit::model::AppModel;
use multiedit::multiedit::{InsertEntry, MultiEditError, SessionState};
use multiedit::update::{try_update, update};

fn session(msg: SessionMsg) -> Msg {
    Msg::Session(msg)
}

fn started(text: &str, line: usize, column: usize) -> AppModel {
    let mut model = test_model(text, line, column);
    update(&mut model, Msg::match_all());
    model
}

// ========================================================================
// Navigation
// ========================================================================

#[test]
fn test_next_and_prev_walk_regions() {
    let mut model = started("foo bar foo baz foo", 0, 1);

    update(&mut model, session(SessionMsg::Next));
    assert_eq!(cursor(&model), (0, 8));
    update(&mut model, session(SessionMsg::Next));
    assert_eq!(cursor(&model), (0, 16));
    assert_eq!(
        try_update(&mut model, session(SessionMsg::Next)),
        Err(MultiEditError::NoMoreOccurrences)
    );
    assert_eq!(cursor(&model), (0, 16));

    update(&mut model, session(SessionMsg::Prev));
    assert_eq!(cursor(&model), (0, 8));
    update(&mut model, session(SessionMsg::Prev));
    assert_eq!(cursor(&model), (0, 0));
    assert_eq!(
        try_update(&mut model, session(SessionMsg::Prev)),
        Err(MultiEditError::NoMoreOccurrences)
    );
}

#[test]
fn test_prev_from_inside_region_skips_that_region() {
    let mut model = started("foo bar foo", 0, 1);
    update(&mut model, Msg::cursor_to(0, 10));
    update(&mut model, session(SessionMsg::Prev));
    assert_eq!(cursor(&model), (0, 0));
    assert_eq!(model.session.current().map(|r| r.start()), Some(0));
}

#[test]
fn test_navigation_needs_a_session() {
    let mut model = test_model("foo", 0, 0);
    assert_eq!(
        try_update(&mut model, session(SessionMsg::Next)),
        Err(MultiEditError::Inactive)
    );
}

// ========================================================================
// Toggle and restrict
// ========================================================================

#[test]
fn test_toggle_is_its_own_inverse() {
    let mut model = started("foo bar foo baz foo", 0, 1);
    update(&mut model, Msg::cursor_to(0, 9));

    update(&mut model, session(SessionMsg::ToggleOrRestrict));
    assert_eq!(region_starts(&model), vec![0, 16]);

    let cmd = update(&mut model, session(SessionMsg::ToggleOrRestrict)).unwrap();
    assert_eq!(region_starts(&model), vec![0, 8, 16]);
    assert_eq!(cmd.messages(), vec!["3 matches for \"foo\""]);
}

#[test]
fn test_toggle_off_pattern_places_marker() {
    let mut model = started("foo bar foo", 0, 1);
    update(&mut model, Msg::cursor_to(0, 5));
    update(&mut model, session(SessionMsg::ToggleOrRestrict));

    assert_eq!(region_starts(&model), vec![0, 5, 8]);
    let marker = &model.session.regions()[1];
    assert!(marker.is_marker);
    assert!(marker.is_empty());
}

#[test]
fn test_selection_restricts_live_set() {
    let mut model = started("foo bar foo baz foo", 0, 1);
    update(&mut model, Msg::cursor_to(0, 0));
    update(
        &mut model,
        Msg::Editor(EditorMsg::ExtendSelectionToPosition { line: 0, column: 11 }),
    );
    update(&mut model, session(SessionMsg::ToggleOrRestrict));

    assert_eq!(region_starts(&model), vec![0, 8]);
    assert!(model.editor.selection.is_empty());
}

#[test]
fn test_toggle_without_session() {
    let mut model = test_model_with_selection("foo foo", 0, 0, 0, 3);
    assert_eq!(
        try_update(&mut model, session(SessionMsg::ToggleOrRestrict)),
        Err(MultiEditError::Inactive)
    );
}

// ========================================================================
// Markers
// ========================================================================

#[test]
fn test_marker_session_mirrors_typing() {
    let mut model = test_model("abc\ndef", 0, 3);
    update(&mut model, session(SessionMsg::ToggleMarkerHere));
    assert_eq!(model.session.state(), SessionState::Active);
    update(&mut model, Msg::cursor_to(1, 3));
    update(&mut model, session(SessionMsg::ToggleMarkerHere));
    assert_eq!(region_starts(&model), vec![3, 7]);
    assert!(model.session.markers_visible());

    update(&mut model, Msg::insert_char('!'));
    assert_eq!(buffer_to_string(&model), "abc!\ndef!");
    assert_eq!(cursor(&model), (1, 4));
    assert!(!model.session.markers_visible());
}

#[test]
fn test_toggle_marker_twice_removes_it() {
    let mut model = test_model("abc", 0, 1);
    update(&mut model, session(SessionMsg::ToggleMarkerHere));
    update(&mut model, Msg::cursor_to(0, 3));
    update(&mut model, session(SessionMsg::ToggleMarkerHere));
    update(&mut model, session(SessionMsg::ToggleMarkerHere));
    assert_eq!(region_starts(&model), vec![1]);
}

// ========================================================================
// Insertion entries
// ========================================================================

#[test]
fn test_append_then_type() {
    let mut model = started("foo bar foo", 0, 1);
    update(&mut model, session(SessionMsg::EnterInsert(InsertEntry::Append)));
    assert_eq!(cursor(&model), (0, 3));
    assert_eq!(model.session.state(), SessionState::InsertFocused);

    update(&mut model, Msg::insert_char('s'));
    assert_eq!(buffer_to_string(&model), "foos bar foos");

    update(&mut model, session(SessionMsg::ExitInsert));
    assert_eq!(model.session.state(), SessionState::Active);
}

#[test]
fn test_substitute_empties_regions() {
    let mut model = started("foo bar foo", 0, 1);
    update(&mut model, session(SessionMsg::EnterInsert(InsertEntry::Substitute)));
    assert_eq!(buffer_to_string(&model), " bar ");
    assert_eq!(cursor(&model), (0, 0));

    update(&mut model, Msg::Document(DocumentMsg::InsertText("baz".into())));
    assert_eq!(buffer_to_string(&model), "baz bar baz");
}

#[test]
fn test_change_deletes_from_cursor_to_region_end() {
    let mut model = started("foo bar foo", 0, 1);
    update(&mut model, session(SessionMsg::EnterInsert(InsertEntry::Change)));
    assert_eq!(buffer_to_string(&model), "f bar f");
    assert_eq!(cursor(&model), (0, 1));
}

#[test]
fn test_open_below_mirrors_newline() {
    let mut model = started("foo bar foo", 0, 1);
    update(&mut model, session(SessionMsg::EnterInsert(InsertEntry::OpenBelow)));
    assert_eq!(buffer_to_string(&model), "foo\n bar foo\n");
    assert_eq!(cursor(&model), (1, 0));
}

#[test]
fn test_insert_outside_regions_falls_back_to_line_start() {
    let mut model = started("  foo bar foo", 0, 3);
    update(&mut model, Msg::cursor_to(0, 7));
    update(&mut model, session(SessionMsg::EnterInsert(InsertEntry::Insert)));
    assert_eq!(cursor(&model), (0, 2));
    assert_eq!(buffer_to_string(&model), "  foo bar foo");
}

// ========================================================================
// Abort, history and restore
// ========================================================================

#[test]
fn test_abort_records_history() {
    let mut model = started("foo bar foo", 0, 1);
    update(&mut model, session(SessionMsg::Abort));

    assert!(!model.session.is_active());
    assert!(model.session.regions().is_empty());
    assert_eq!(model.history.snapshot(), Some(&[0, 8][..]));
}

#[test]
fn test_abort_without_session_is_quiet() {
    let mut model = test_model("foo", 0, 0);
    assert_eq!(update(&mut model, session(SessionMsg::Abort)), None);
}

#[test]
fn test_force_normal_ends_insert_focused_session() {
    let mut model = started("foo bar foo", 0, 1);
    update(&mut model, session(SessionMsg::EnterInsert(InsertEntry::Append)));
    update(&mut model, session(SessionMsg::ForceNormal));
    assert_eq!(model.session.state(), SessionState::Inactive);
    assert!(model.history.snapshot().is_some());
}

#[test]
fn test_restore_after_unrelated_edit() {
    let mut model = started("foo bar foo", 0, 1);
    update(&mut model, session(SessionMsg::Abort));
    update(&mut model, Msg::cursor_to(0, 4));
    update(&mut model, Msg::insert_char('x'));
    assert_eq!(buffer_to_string(&model), "foo xbar foo");

    update(&mut model, Msg::cursor_to(0, 1));
    update(&mut model, session(SessionMsg::Restore));
    assert_eq!(region_starts(&model), vec![0, 9]);
}

#[test]
fn test_restore_ignores_new_occurrences() {
    let mut model = started("foo bar foo", 0, 1);
    update(&mut model, session(SessionMsg::Abort));
    update(&mut model, Msg::cursor_to(0, 11));
    update(&mut model, Msg::Document(DocumentMsg::InsertText(" foo".into())));

    update(&mut model, Msg::cursor_to(0, 1));
    update(&mut model, session(SessionMsg::Restore));
    assert_eq!(region_starts(&model), vec![0, 8]);
}

#[test]
fn test_no_recall_session_leaves_no_history() {
    let mut model = test_model("foo bar foo", 0, 1);
    update(
        &mut model,
        session(SessionMsg::MatchAll {
            no_recall: true,
            scope: None,
        }),
    );
    update(&mut model, session(SessionMsg::Abort));

    assert_eq!(
        try_update(&mut model, session(SessionMsg::Restore)),
        Err(MultiEditError::NoHistory)
    );
}

#[test]
fn test_ex_match_no_recall_leaves_no_history() {
    let mut model = test_model("foo bar foo", 0, 1);
    update(
        &mut model,
        session(SessionMsg::ExMatch {
            lines: None,
            regexp: Some("fo+".into()),
            literal: false,
            no_recall: true,
        }),
    );
    assert_eq!(region_starts(&model), vec![0, 8]);
    update(&mut model, session(SessionMsg::Abort));

    assert_eq!(
        try_update(&mut model, session(SessionMsg::Restore)),
        Err(MultiEditError::NoHistory)
    );
}

#[test]
fn test_restore_on_blank_line_reports_nothing_to_match() {
    let mut model = started("foo\n\nfoo", 0, 1);
    update(&mut model, session(SessionMsg::Abort));
    assert!(model.history.snapshot().is_some());

    update(&mut model, Msg::cursor_to(1, 0));
    assert_eq!(
        try_update(&mut model, session(SessionMsg::Restore)),
        Err(MultiEditError::NoMatchable)
    );
    assert!(!model.session.is_active());
}
