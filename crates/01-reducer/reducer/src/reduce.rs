//! Typed reducer traits.

use crate::action::Action;
use std::convert::Infallible;
use std::error::Error;

/// Pure function from `(current state, action)` to the next state.
///
/// `initial_state` is the documented default a slice starts from when no
/// previous value exists. Implementations must be total over every action:
/// unknown action types return the state unchanged.
pub trait Reducer: Send + Sync {
    /// State owned by this reducer.
    type State;

    /// Returns the default value used when no state exists yet.
    fn initial_state(&self) -> Self::State;

    /// Computes the next state for `action`.
    fn reduce(&self, state: Self::State, action: &Action) -> Self::State;

    /// Reduces `state`, substituting the initial state when it is absent.
    fn reduce_or_init(&self, state: Option<Self::State>, action: &Action) -> Self::State {
        let state = state.unwrap_or_else(|| self.initial_state());
        self.reduce(state, action)
    }
}

/// Reducer whose evaluation may fail.
///
/// The store drives every reducer through this trait. Infallible [`Reducer`]
/// implementations get it for free; failures from fallible ones propagate to
/// the caller untouched.
pub trait TryReducer: Send + Sync {
    /// State owned by this reducer.
    type State;
    /// Failure raised while reducing.
    type Error: Error + Send + Sync + 'static;

    /// Computes the next state from an optional previous state.
    fn try_reduce(
        &self,
        state: Option<&Self::State>,
        action: &Action,
    ) -> Result<Self::State, Self::Error>;
}

impl<R> TryReducer for R
where
    R: Reducer,
    R::State: Clone,
{
    type State = R::State;
    type Error = Infallible;

    fn try_reduce(
        &self,
        state: Option<&Self::State>,
        action: &Action,
    ) -> Result<Self::State, Self::Error> {
        Ok(self.reduce_or_init(state.cloned(), action))
    }
}

/// Adapts an initial value and a closure into a [`Reducer`].
pub struct FnReducer<S, F> {
    initial: S,
    reduce: F,
}

impl<S, F> FnReducer<S, F>
where
    S: Clone + Send + Sync,
    F: Fn(S, &Action) -> S + Send + Sync,
{
    /// Builds a reducer that starts from `initial` and applies `reduce`.
    pub fn new(initial: S, reduce: F) -> Self {
        Self { initial, reduce }
    }
}

impl<S, F> Reducer for FnReducer<S, F>
where
    S: Clone + Send + Sync,
    F: Fn(S, &Action) -> S + Send + Sync,
{
    type State = S;

    fn initial_state(&self) -> S {
        self.initial.clone()
    }

    fn reduce(&self, state: S, action: &Action) -> S {
        (self.reduce)(state, action)
    }
}
