//! Descriptor for the key set of a composite state.

use serde_json::Value;
use std::fmt;

/// Ordered list of slice keys making up a composite state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateShape {
    keys: Vec<String>,
}

impl StateShape {
    /// Builds a shape from slice keys in registration order.
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Slice keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Number of slices.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true when no slice is registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns true when `key` names a registered slice.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Returns true when `value` is an object whose key set is exactly this shape.
    pub fn matches(&self, value: &Value) -> bool {
        match value {
            Value::Object(map) => {
                map.len() == self.keys.len() && self.keys.iter().all(|k| map.contains_key(k))
            }
            _ => false,
        }
    }

    /// Keys present in `value` that this shape does not declare.
    pub fn unexpected_keys<'a>(&self, value: &'a Value) -> Vec<&'a str> {
        match value {
            Value::Object(map) => map
                .keys()
                .filter(|k| !self.contains(k))
                .map(String::as_str)
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for StateShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keys.join(", "))
    }
}
