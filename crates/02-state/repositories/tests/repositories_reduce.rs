//! Behavior of the repositories slice reducer.

use reducer::{Action, Reducer};
use repositories::{add, RepositoriesReducer, ADD};
use serde_json::json;

#[test]
fn starts_empty() {
    let reducer = RepositoriesReducer::new();
    assert!(reducer.reduce_or_init(None, &Action::init()).is_empty());
    assert!(reducer.reduce_or_init(None, &Action::probe()).is_empty());
}

#[test]
fn add_appends_in_order() {
    let reducer = RepositoriesReducer::new();
    let state = reducer.reduce_or_init(None, &add("repo1"));
    let state = reducer.reduce(state, &add("repo2"));

    assert_eq!(state, vec!["repo1".to_string(), "repo2".to_string()]);
}

#[test]
fn duplicate_names_are_kept() {
    let reducer = RepositoriesReducer::new();
    let state = reducer.reduce(vec!["repo1".into()], &add("repo1"));
    assert_eq!(state, vec!["repo1".to_string(), "repo1".to_string()]);
}

#[test]
fn unrelated_actions_leave_state_unchanged() {
    let reducer = RepositoriesReducer::new();
    let state = vec!["repo1".to_string()];
    assert_eq!(reducer.reduce(state.clone(), &Action::new("NOOP")), state);
}

/// Malformed `ADD` payloads are ignored rather than stored.
#[test]
fn add_without_string_payload_is_ignored() {
    let _ = env_logger::builder().is_test(true).try_init();
    let reducer = RepositoriesReducer::new();
    let state = vec!["repo1".to_string()];

    assert_eq!(reducer.reduce(state.clone(), &Action::new(ADD)), state);
    assert_eq!(
        reducer.reduce(state.clone(), &Action::with_payload(ADD, json!({ "name": "x" }))),
        state
    );
}
