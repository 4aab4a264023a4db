//! Session update functions - starting, growing, navigating and ending a
//! multi-edit session

use crate::commands::Cmd;
use crate::messages::SessionMsg;
use crate::model::{AppModel, TextChange};
use crate::multiedit::pattern::Constituent;
use crate::multiedit::scope::resolve as resolve_scope;
use crate::multiedit::{
    Direction, InsertEntry, MultiEditError, Pattern, Scope, Seed, SeedKind, Session, Toggled,
};

/// Handle session messages
pub fn update_session(model: &mut AppModel, msg: SessionMsg) -> Result<Option<Cmd>, MultiEditError> {
    match msg {
        SessionMsg::MatchAll { no_recall, scope } => {
            let spec = scope.unwrap_or(model.config.default_scope);
            let scope = resolve_scope(&model.document, &model.editor, spec)?;
            let mut fresh = new_session(model);
            fresh.start_all(
                &model.document,
                model.seed(),
                scope,
                &model.derive_options(),
                no_recall,
            )?;
            Ok(Some(commit(model, fresh)))
        }

        SessionMsg::MatchAndNext => match_and(model, Direction::Forward),
        SessionMsg::MatchAndPrev => match_and(model, Direction::Backward),

        SessionMsg::ToggleOrRestrict => {
            match model.selection_range() {
                Some(range) if model.session.is_active() => {
                    let removed = model.session.restrict(range)?;
                    model.editor.clear_selection();
                    tracing::debug!(target: "session", removed, "restricted to selection");
                }
                _ => {
                    let cursor = model.cursor_offset();
                    match model.session.toggle(&model.document, cursor)? {
                        Toggled::Removed(region) => {
                            tracing::debug!(target: "session", id = %region.id, "excluded")
                        }
                        Toggled::Added(id) | Toggled::Marker(id) => {
                            tracing::debug!(target: "session", %id, "included")
                        }
                    }
                }
            }
            Ok(Some(Cmd::batch(vec![Cmd::Redraw, count_message(model)])))
        }

        SessionMsg::ToggleMarkerHere => {
            let cursor = model.cursor_offset();
            model.session.toggle_marker(&model.document, cursor)?;
            Ok(Some(Cmd::Redraw))
        }

        SessionMsg::Next => navigate(model, Direction::Forward),
        SessionMsg::Prev => navigate(model, Direction::Backward),

        SessionMsg::EnterInsert(entry) => enter_insert(model, entry),

        SessionMsg::ExitInsert => {
            if model.session.is_active() {
                model.session.exit_insert();
            }
            Ok(Some(Cmd::Redraw))
        }

        SessionMsg::DeleteAll => {
            let changes = model.session.delete_all(&mut model.document)?;
            after_bulk_edit(model, &changes);
            Ok(Some(Cmd::Redraw))
        }

        SessionMsg::Paste(text) => {
            let changes = model.session.paste(&mut model.document, &text)?;
            after_bulk_edit(model, &changes);
            Ok(Some(Cmd::Redraw))
        }

        SessionMsg::UpcaseAll => {
            let changes = model.session.map_all(&mut model.document, str::to_uppercase)?;
            after_bulk_edit(model, &changes);
            Ok(Some(Cmd::Redraw))
        }

        SessionMsg::DowncaseAll => {
            let changes = model.session.map_all(&mut model.document, str::to_lowercase)?;
            after_bulk_edit(model, &changes);
            Ok(Some(Cmd::Redraw))
        }

        SessionMsg::Abort => {
            if model.end_session() {
                Ok(Some(Cmd::Redraw))
            } else {
                Ok(None)
            }
        }

        SessionMsg::ForceNormal => {
            model.end_session();
            Ok(Some(Cmd::Redraw))
        }

        SessionMsg::Restore => {
            if model.session.is_active() {
                return Ok(Some(Cmd::message("Multi-edit session already active")));
            }
            let anchors = model
                .history
                .snapshot()
                .map(<[usize]>::to_vec)
                .ok_or(MultiEditError::NoHistory)?;
            let seed = Seed::Point(model.cursor_offset());
            let options = model.derive_options();
            model
                .session
                .restore(&model.document, seed, &options, &anchors)?;
            Ok(Some(Cmd::batch(vec![Cmd::Redraw, count_message(model)])))
        }

        SessionMsg::ExMatch {
            lines,
            regexp,
            literal,
            no_recall,
        } => {
            let scope = match lines {
                Some((first, last)) => Scope::lines(&model.document, first, last)?,
                None => resolve_scope(&model.document, &model.editor, model.config.default_scope)?,
            };
            let mut fresh = new_session(model);
            match regexp {
                Some(source) => {
                    let case_sensitive = model.config.case_sensitive;
                    let pattern = if literal {
                        Pattern::literal(
                            &source,
                            SeedKind::Selection,
                            (false, false),
                            Constituent::Word,
                            case_sensitive,
                        )?
                    } else {
                        Pattern::regexp(&source, case_sensitive)?
                    };
                    fresh.start_pattern(&model.document, pattern, scope, no_recall)?;
                }
                None => {
                    fresh.start_all(
                        &model.document,
                        model.seed(),
                        scope,
                        &model.derive_options(),
                        no_recall,
                    )?;
                }
            }
            Ok(Some(commit(model, fresh)))
        }
    }
}

fn new_session(model: &AppModel) -> Session {
    Session::new(model.config.ignore_indent_and_trailing)
}

/// Replace any live session with a freshly started one
fn commit(model: &mut AppModel, fresh: Session) -> Cmd {
    model.end_session();
    model.session = fresh;
    model.editor.clear_selection();

    let history = match model.session.pattern() {
        Some(pattern) if model.config.store_in_search_history => {
            Cmd::PushSearchHistory(pattern.search_pattern())
        }
        _ => Cmd::None,
    };
    Cmd::batch(vec![Cmd::Redraw, count_message(model), history])
}

fn count_message(model: &AppModel) -> Cmd {
    let count = model.session.regions().len();
    let text = match model.session.pattern() {
        Some(pattern) if pattern.kind != SeedKind::Regexp => {
            format!("{} matches for \"{}\"", count, pattern.literal_text)
        }
        Some(pattern) => format!("{} matches for /{}/", count, pattern.literal_text),
        None => format!("{} regions", count),
    };
    Cmd::message(text)
}

/// Incremental start and growth: the first call only claims the match at
/// point, later calls claim the next one in `direction`
fn match_and(model: &mut AppModel, direction: Direction) -> Result<Option<Cmd>, MultiEditError> {
    if !model.session.is_active() {
        let spec = model.config.default_scope;
        let scope = resolve_scope(&model.document, &model.editor, spec)?;
        let mut fresh = new_session(model);
        fresh.start_seed(&model.document, model.seed(), scope, &model.derive_options())?;
        return Ok(Some(commit(model, fresh)));
    }

    let start = model
        .session
        .discover_next(&model.document, direction)?
        .start();
    if model.config.follow_matches {
        model.set_cursor_offset(start, true);
    }
    Ok(Some(Cmd::batch(vec![Cmd::Redraw, count_message(model)])))
}

fn navigate(model: &mut AppModel, direction: Direction) -> Result<Option<Cmd>, MultiEditError> {
    let cursor = model.cursor_offset();
    let start = match direction {
        Direction::Forward => model.session.next(cursor)?,
        Direction::Backward => model.session.prev(cursor)?,
    };
    model.set_cursor_offset(start, model.config.follow_matches);
    Ok(Some(Cmd::Redraw))
}

fn enter_insert(model: &mut AppModel, entry: InsertEntry) -> Result<Option<Cmd>, MultiEditError> {
    let cursor = model.cursor_offset();
    let outcome = model
        .session
        .enter_insert(&mut model.document, cursor, entry)?;
    model.record_changes(&outcome.changes);
    model.set_cursor_offset(outcome.cursor, false);
    Ok(Some(Cmd::Redraw))
}

/// Keep the host cursor inside the current region after a bulk edit
fn after_bulk_edit(model: &mut AppModel, changes: &[TextChange]) {
    model.record_changes(changes);
    let target = model
        .session
        .current()
        .map(|r| r.end())
        .unwrap_or_else(|| model.cursor_offset().min(model.document.len_chars()));
    model.set_cursor_offset(target, false);
}
