//! Composition of named slice reducers into one reducer over an object state.
//!
//! Each dispatch hands every registered slice its own sub-value (or nothing,
//! when the slice has no value yet) together with the same action. The
//! result is a fresh object holding exactly the registered keys. Keys in the
//! previous state that no slice owns are dropped and reported once.

use crate::action::{Action, INIT, PROBE_UNKNOWN_ACTION, REPLACE};
use crate::error::{CombineError, CombineResult, SliceError};
use crate::reduce::TryReducer;
use crate::shape::StateShape;
use crate::slice::SliceReducer;
use log::{debug, warn};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Reducer over a JSON object whose keys are owned by individual slices.
pub struct CombinedReducer {
    slices: Vec<(String, Box<dyn SliceReducer>)>,
    shape: StateShape,
    warned_keys: Mutex<HashSet<String>>,
}

impl CombinedReducer {
    /// Creates a builder with no slices registered.
    pub fn builder() -> CombinedReducerBuilder {
        CombinedReducerBuilder::new()
    }

    /// Slice keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slices.iter().map(|(key, _)| key.as_str())
    }

    /// Shape of the composite state produced by this reducer.
    pub fn shape(&self) -> &StateShape {
        &self.shape
    }

    /// Computes the next composite state.
    ///
    /// `None` means no state exists yet and every slice starts from its
    /// initial value. Slice failures are returned tagged with the slice key.
    pub fn reduce(&self, state: Option<&Value>, action: &Action) -> CombineResult<Value> {
        let previous = match state {
            None => None,
            Some(Value::Object(map)) => Some(map),
            Some(other) => {
                return Err(CombineError::NotAnObject {
                    expected: self.shape.to_string(),
                    found: kind_of(other),
                })
            }
        };

        if let Some(state) = state {
            if !action.is(REPLACE) {
                self.warn_unexpected_keys(state);
            }
        }

        let mut next = Map::new();
        for (key, slice) in &self.slices {
            let before = previous.and_then(|map| map.get(key));
            let after = slice
                .reduce_slice(before, action)
                .map_err(|source| CombineError::Slice {
                    key: key.clone(),
                    source,
                })?;
            next.insert(key.clone(), after);
        }

        Ok(Value::Object(next))
    }

    fn warn_unexpected_keys(&self, state: &Value) {
        let mut warned = self.warned_keys.lock();
        for key in self.shape.unexpected_keys(state) {
            if warned.contains(key) {
                continue;
            }
            warn!(
                "unexpected key `{key}` in previous state; expected one of [{}], ignoring it",
                self.shape
            );
            warned.insert(key.to_owned());
        }
    }
}

impl SliceReducer for CombinedReducer {
    fn reduce_slice(&self, state: Option<&Value>, action: &Action) -> Result<Value, SliceError> {
        self.reduce(state, action).map_err(SliceError::from)
    }
}

impl TryReducer for CombinedReducer {
    type State = Value;
    type Error = CombineError;

    fn try_reduce(&self, state: Option<&Value>, action: &Action) -> CombineResult<Value> {
        self.reduce(state, action)
    }
}

impl fmt::Debug for CombinedReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedReducer")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// Builder for assembling a [`CombinedReducer`] from named slices.
#[derive(Default)]
pub struct CombinedReducerBuilder {
    slices: Vec<(String, Box<dyn SliceReducer>)>,
}

impl CombinedReducerBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `slice` under `key`.
    pub fn slice(mut self, key: impl Into<String>, slice: Box<dyn SliceReducer>) -> Self {
        self.slices.push((key.into(), slice));
        self
    }

    /// Validates the mapping and builds the reducer.
    ///
    /// Keys must be non-empty and unique. Every slice is asked for its
    /// initial state under the init action and under an unknown action; a
    /// slice that fails either is rejected here rather than on first dispatch.
    pub fn build(self) -> CombineResult<CombinedReducer> {
        let mut seen = HashSet::with_capacity(self.slices.len());
        for (key, _) in &self.slices {
            if key.is_empty() {
                return Err(CombineError::EmptyKey);
            }
            if !seen.insert(key.as_str()) {
                return Err(CombineError::DuplicateKey(key.clone()));
            }
        }

        if self.slices.is_empty() {
            warn!("combining an empty set of slice reducers; state will always be an empty object");
        }

        for (key, slice) in &self.slices {
            assert_initial_state(key, &**slice, &Action::init(), INIT)?;
            assert_initial_state(key, &**slice, &Action::probe(), PROBE_UNKNOWN_ACTION)?;
        }

        let shape = StateShape::new(self.slices.iter().map(|(key, _)| key.clone()));
        debug!("combined reducer built with slices [{shape}]");

        Ok(CombinedReducer {
            slices: self.slices,
            shape,
            warned_keys: Mutex::new(HashSet::new()),
        })
    }
}

/// Combines `(key, slice)` pairs into a single reducer.
pub fn combine_reducers<I, K>(slices: I) -> CombineResult<CombinedReducer>
where
    I: IntoIterator<Item = (K, Box<dyn SliceReducer>)>,
    K: Into<String>,
{
    slices
        .into_iter()
        .fold(CombinedReducer::builder(), |builder, (key, slice)| {
            builder.slice(key, slice)
        })
        .build()
}

fn assert_initial_state(
    key: &str,
    slice: &dyn SliceReducer,
    action: &Action,
    label: &'static str,
) -> CombineResult<()> {
    slice
        .reduce_slice(None, action)
        .map(|_| ())
        .map_err(|source| CombineError::InitialState {
            key: key.to_owned(),
            action: label,
            source,
        })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
