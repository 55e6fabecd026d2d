//! The `repositories` slice: an ordered list of repository names.
//!
//! The slice starts empty. `ADD` appends its string payload; every other
//! action leaves the list untouched.

use log::warn;
use reducer::{Action, Reducer};
use serde_json::Value;

/// Action type that appends a repository name.
pub const ADD: &str = "ADD";

/// State held under the `repositories` key.
pub type RepositoriesState = Vec<String>;

/// Builds an `ADD` action for `name`.
pub fn add(name: impl Into<String>) -> Action {
    let name: String = name.into();
    Action::with_payload(ADD, name)
}

/// Slice reducer for the repository list.
#[derive(Clone, Copy, Debug, Default)]
pub struct RepositoriesReducer;

impl RepositoriesReducer {
    pub fn new() -> Self {
        Self
    }
}

impl Reducer for RepositoriesReducer {
    type State = RepositoriesState;

    fn initial_state(&self) -> RepositoriesState {
        Vec::new()
    }

    fn reduce(&self, mut state: RepositoriesState, action: &Action) -> RepositoriesState {
        if !action.is(ADD) {
            return state;
        }

        match action.payload() {
            Some(Value::String(name)) => state.push(name.clone()),
            Some(other) => warn!("ignoring {ADD} with non-string payload {other}"),
            None => warn!("ignoring {ADD} without payload"),
        }
        state
    }
}
