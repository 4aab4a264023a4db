//! Incremental discovery - match-and-next / match-and-prev

mod common;

use common::{cursor, region_starts, test_model, test_model_with_config};
use multiedit::config::MultieditConfig;
use multiedit::messages::{Msg, SessionMsg};
use multiedit::multiedit::MultiEditError;
use multiedit::update::{try_update, update};

fn next() -> Msg {
    Msg::Session(SessionMsg::MatchAndNext)
}

fn prev() -> Msg {
    Msg::Session(SessionMsg::MatchAndPrev)
}

#[test]
fn test_first_call_only_claims_match_at_point() {
    let mut model = test_model("foo bar foo baz foo", 0, 9);
    let cmd = update(&mut model, next()).unwrap();

    assert_eq!(region_starts(&model), vec![8]);
    assert_eq!(cmd.messages(), vec!["1 matches for \"foo\""]);
}

#[test]
fn test_next_claims_following_match_and_follows_it() {
    let mut model = test_model("foo bar foo baz foo", 0, 9);
    update(&mut model, next());
    update(&mut model, next());

    assert_eq!(region_starts(&model), vec![8, 16]);
    assert_eq!(cursor(&model), (0, 16));
    assert_eq!(model.session.current().map(|r| r.start()), Some(16));
}

#[test]
fn test_next_does_not_wrap() {
    let mut model = test_model("foo bar foo baz foo", 0, 9);
    update(&mut model, next());
    update(&mut model, next());

    assert_eq!(try_update(&mut model, next()), Err(MultiEditError::NoMoreMatches));
    assert_eq!(region_starts(&model), vec![8, 16]);
}

#[test]
fn test_exhaustion_is_reported_not_fatal() {
    let mut model = test_model("foo bar", 0, 0);
    update(&mut model, next());
    let cmd = update(&mut model, next()).unwrap();
    assert_eq!(cmd.messages(), vec!["No more matches"]);
    assert!(model.session.is_active());
}

#[test]
fn test_prev_grows_backwards_from_outer_start() {
    let mut model = test_model("foo bar foo baz foo", 0, 9);
    update(&mut model, next());
    update(&mut model, next());
    update(&mut model, prev());

    assert_eq!(region_starts(&model), vec![0, 8, 16]);
    assert_eq!(cursor(&model), (0, 0));
    assert_eq!(try_update(&mut model, prev()), Err(MultiEditError::NoMoreMatches));
}

#[test]
fn test_excluded_match_stays_behind_outer_bound() {
    let mut model = test_model("foo foo foo foo", 0, 9);
    update(&mut model, next());
    update(&mut model, next());
    update(&mut model, Msg::cursor_to(0, 12));
    update(&mut model, Msg::Session(SessionMsg::ToggleOrRestrict));
    assert_eq!(region_starts(&model), vec![8]);

    assert_eq!(try_update(&mut model, next()), Err(MultiEditError::NoMoreMatches));
    update(&mut model, prev());
    assert_eq!(region_starts(&model), vec![4, 8]);
}

#[test]
fn test_cursor_stays_when_not_following() {
    let config = MultieditConfig {
        follow_matches: false,
        ..MultieditConfig::default()
    };
    let mut model = test_model_with_config("foo bar foo", 0, 1, config);
    update(&mut model, next());
    update(&mut model, next());

    assert_eq!(region_starts(&model), vec![0, 8]);
    assert_eq!(cursor(&model), (0, 1));
}

#[test]
fn test_first_call_with_nothing_at_point() {
    let mut model = test_model("foo\n\nfoo", 1, 0);
    assert_eq!(try_update(&mut model, next()), Err(MultiEditError::NoMatchable));
    assert!(!model.session.is_active());
}
