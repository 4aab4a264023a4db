//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod document;
mod editor;
mod session;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::AppModel;
use crate::multiedit::MultiEditError;

#[cfg(debug_assertions)]
use crate::tracing::RegionSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use document::update_document;
pub use editor::update_editor;
pub use session::update_session;

/// Main update function - dispatches to sub-handlers
///
/// Failed operations change nothing and come back as a status message.
/// In debug builds, this wraps with tracing instrumentation.
#[inline]
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    match try_update(model, msg) {
        Ok(cmd) => cmd,
        Err(e) => {
            if e.is_recoverable() {
                tracing::debug!(target: "session", error = %e, "operation exhausted");
            } else {
                tracing::warn!(target: "session", error = %e, "operation failed");
            }
            Some(Cmd::message(e.to_string()))
        }
    }
}

/// Like [`update`], but hands failures back to the caller
#[inline]
pub fn try_update(model: &mut AppModel, msg: Msg) -> Result<Option<Cmd>, MultiEditError> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut AppModel, msg: Msg) -> Result<Option<Cmd>, MultiEditError> {
    match msg {
        Msg::Editor(m) => Ok(editor::update_editor(model, m)),
        Msg::Document(m) => document::update_document(model, m),
        Msg::Session(m) => session::update_session(model, m),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after region state and logs diffs for debugging.
#[cfg(debug_assertions)]
fn update_traced(model: &mut AppModel, msg: Msg) -> Result<Option<Cmd>, MultiEditError> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    let before = RegionSnapshot::from_session(&model.session);
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(model, msg);

    let after = RegionSnapshot::from_session(&model.session);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "session", %diff, "state changed");
    }
    debug_assert!(
        after
            .regions
            .windows(2)
            .all(|pair| pair[0].start <= pair[1].start && pair[0].end <= pair[1].start),
        "regions overlap or are out of order after {}",
        msg_name
    );

    result
}

/// Get a display name for a message type
///
/// Uses Debug formatting to include variant names and arguments.
/// Example outputs:
/// - `Session::Next`
/// - `Document::InsertChar('x')`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Editor(m) => format!("Editor::{:?}", m),
        Msg::Document(m) => format!("Document::{:?}", m),
        Msg::Session(m) => format!("Session::{:?}", m),
    }
}
