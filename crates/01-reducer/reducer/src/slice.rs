//! Object-safe slice reducers over JSON values.
//!
//! A [`crate::CombinedReducer`] holds slices of different state types under
//! one map, so each slice is erased to `Option<&Value> -> Value`. Typed
//! reducers are adapted with [`erase`]; closures implement the trait directly.

use crate::action::Action;
use crate::error::SliceError;
use crate::reduce::Reducer;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reducer for one named slice of a JSON composite state.
pub trait SliceReducer: Send + Sync {
    /// Computes the next slice value; `None` means the slice has no value yet.
    fn reduce_slice(&self, state: Option<&Value>, action: &Action) -> Result<Value, SliceError>;
}

impl<F> SliceReducer for F
where
    F: Fn(Option<&Value>, &Action) -> Result<Value, SliceError> + Send + Sync,
{
    fn reduce_slice(&self, state: Option<&Value>, action: &Action) -> Result<Value, SliceError> {
        self(state, action)
    }
}

/// JSON adapter around a typed [`Reducer`].
pub struct JsonSlice<R> {
    reducer: R,
}

impl<R> JsonSlice<R> {
    pub fn new(reducer: R) -> Self {
        Self { reducer }
    }

    /// Borrow the wrapped reducer.
    pub fn inner(&self) -> &R {
        &self.reducer
    }
}

impl<R> SliceReducer for JsonSlice<R>
where
    R: Reducer,
    R::State: Serialize + DeserializeOwned,
{
    fn reduce_slice(&self, state: Option<&Value>, action: &Action) -> Result<Value, SliceError> {
        let state = state
            .map(|value| <R::State as Deserialize>::deserialize(value).map_err(SliceError::Decode))
            .transpose()?;
        let next = self.reducer.reduce_or_init(state, action);
        serde_json::to_value(next).map_err(SliceError::Encode)
    }
}

/// Boxes a typed reducer as a JSON slice.
pub fn erase<R>(reducer: R) -> Box<dyn SliceReducer>
where
    R: Reducer + 'static,
    R::State: Serialize + DeserializeOwned,
{
    Box::new(JsonSlice::new(reducer))
}
