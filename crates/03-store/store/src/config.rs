use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// Runtime knobs for a [`crate::Store`].
///
/// Every field has a default, so a JSON document only needs the fields it
/// overrides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Label used in log lines.
    pub name: String,
    /// Notify subscribers even when a dispatch leaves the state unchanged.
    pub notify_unchanged: bool,
    /// Log every dispatched action at debug level.
    pub log_actions: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "root".to_owned(),
            notify_unchanged: true,
            log_actions: false,
        }
    }
}

impl StoreConfig {
    /// Default configuration with a custom log label.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON, filling missing fields with defaults.
    pub fn from_json(text: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_notify_unchanged(mut self, enabled: bool) -> Self {
        self.notify_unchanged = enabled;
        self
    }

    pub fn with_log_actions(mut self, enabled: bool) -> Self {
        self.log_actions = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = StoreConfig::from_json(r#"{ "notify_unchanged": false }"#).unwrap();
        assert_eq!(config.name, "root");
        assert!(!config.notify_unchanged);
        assert!(!config.log_actions);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = StoreConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, crate::StoreError::Config(_)));
    }
}
