//! Root state of the application and the reducer that produces it.
//!
//! The composite state is declared explicitly, one field per slice. Both the
//! typed [`RootReducer`] and the JSON [`reducer::CombinedReducer`] returned by
//! [`combined_reducer`] are built from the same slice list in [`SLICE_KEYS`],
//! so adding a slice means touching the struct, the reducer, and that list.

use reducer::{
    erase, Action, CombineResult, CombinedReducer, Reducer, SliceReducer, StateShape,
};
use repositories::{RepositoriesReducer, RepositoriesState};
use serde::{Deserialize, Serialize};

/// Key of the repositories slice.
pub const REPOSITORIES: &str = "repositories";

/// Slice keys of [`RootState`] in declaration order.
pub const SLICE_KEYS: [&str; 1] = [REPOSITORIES];

/// Whole-application state: one field per registered slice.
///
/// A missing field in serialized input is treated as an absent slice and
/// filled from that slice's initial value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootState {
    #[serde(default)]
    pub repositories: RepositoriesState,
}

impl RootState {
    /// Slice keys, matching the serialized field names.
    pub const KEYS: [&'static str; 1] = SLICE_KEYS;

    /// Shape descriptor of the composite state.
    pub fn shape() -> StateShape {
        StateShape::new(Self::KEYS)
    }
}

/// Reducer over [`RootState`] delegating each field to its slice reducer.
#[derive(Clone, Debug, Default)]
pub struct RootReducer {
    repositories: RepositoriesReducer,
}

impl RootReducer {
    /// Composes the root reducer from its slice reducers.
    pub fn new(repositories: RepositoriesReducer) -> Self {
        Self { repositories }
    }
}

impl Reducer for RootReducer {
    type State = RootState;

    fn initial_state(&self) -> RootState {
        RootState {
            repositories: self.repositories.initial_state(),
        }
    }

    fn reduce(&self, state: RootState, action: &Action) -> RootState {
        RootState {
            repositories: self.repositories.reduce(state.repositories, action),
        }
    }
}

/// Builds the application's root reducer.
pub fn root_reducer() -> RootReducer {
    RootReducer::new(RepositoriesReducer::new())
}

/// Slice reducers keyed by name, in [`SLICE_KEYS`] order.
pub fn slice_reducers() -> Vec<(&'static str, Box<dyn SliceReducer>)> {
    vec![(REPOSITORIES, erase(RepositoriesReducer::new()))]
}

/// Builds the JSON form of the root reducer from [`slice_reducers`].
pub fn combined_reducer() -> CombineResult<CombinedReducer> {
    reducer::combine_reducers(slice_reducers())
}
