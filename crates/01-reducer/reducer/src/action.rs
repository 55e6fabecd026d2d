//! Action descriptors carried from the dispatcher to every reducer.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Prefix reserved for actions emitted by the store itself.
pub const INTERNAL_PREFIX: &str = "@@store/";
/// Dispatched once when a store is created.
pub const INIT: &str = "@@store/INIT";
/// Dispatched after a reducer has been swapped out.
pub const REPLACE: &str = "@@store/REPLACE";
/// Used to check that slices handle action types they do not know.
pub const PROBE_UNKNOWN_ACTION: &str = "@@store/PROBE_UNKNOWN_ACTION";

/// External event descriptor: a type tag plus an optional payload.
///
/// Serialized as `{"type": "...", "payload": ...}` so action logs can be
/// written and replayed as plain JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
}

impl Action {
    /// Creates an action without a payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    /// Creates an action carrying `payload`.
    pub fn with_payload(kind: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(payload.into()),
        }
    }

    /// The store initialisation action.
    pub fn init() -> Self {
        Self::new(INIT)
    }

    /// The action dispatched after a reducer replacement.
    pub fn replace() -> Self {
        Self::new(REPLACE)
    }

    /// An action type no slice is expected to handle.
    pub fn probe() -> Self {
        Self::new(PROBE_UNKNOWN_ACTION)
    }

    /// Returns the type tag.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the payload, if any.
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Returns true for actions emitted by the store rather than the application.
    pub fn is_internal(&self) -> bool {
        self.kind.starts_with(INTERNAL_PREFIX)
    }

    /// Returns true when the type tag matches `kind`.
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Some(payload) => write!(f, "{} {}", self.kind, payload),
            None => f.write_str(&self.kind),
        }
    }
}
