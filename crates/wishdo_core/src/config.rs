//! Store configuration.
//!
//! # Responsibility
//! - Hold the storage key and flush timing with their defaults.
//! - Parse host-supplied JSON overrides.
//!
//! # Invariants
//! - `storage_key` is never blank after `validate()`.
//! - `debounce_ms == 0` selects immediate writes.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const DEFAULT_STORAGE_KEY: &str = "TASKS_V2";
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// When the writer persists a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushPolicy {
    /// Write every snapshot as soon as it arrives.
    Immediate,
    /// Write the latest snapshot once no newer one arrived for the window.
    Debounced(Duration),
}

impl FlushPolicy {
    pub fn from_millis(millis: u64) -> Self {
        if millis == 0 {
            Self::Immediate
        } else {
            Self::Debounced(Duration::from_millis(millis))
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    BlankStorageKey,
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankStorageKey => write!(f, "storage_key must not be blank"),
            Self::Parse(err) => write!(f, "invalid store config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::BlankStorageKey => None,
            Self::Parse(err) => Some(err),
        }
    }
}

/// Settings for one task service instance.
///
/// Missing JSON fields take their default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub storage_key: String,
    pub debounce_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl StoreConfig {
    /// Parses and validates a JSON override object.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::BlankStorageKey);
        }
        Ok(())
    }

    pub fn flush_policy(&self) -> FlushPolicy {
        FlushPolicy::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, FlushPolicy, StoreConfig, DEFAULT_STORAGE_KEY};
    use std::time::Duration;

    #[test]
    fn defaults_match_reference_timing() {
        let config = StoreConfig::default();
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(
            config.flush_policy(),
            FlushPolicy::Debounced(Duration::from_millis(200))
        );
    }

    #[test]
    fn zero_debounce_means_immediate() {
        let config = StoreConfig::from_json(r#"{"debounce_ms": 0}"#).unwrap();
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.flush_policy(), FlushPolicy::Immediate);
    }

    #[test]
    fn blank_key_and_unknown_fields_are_rejected() {
        assert!(matches!(
            StoreConfig::from_json(r#"{"storage_key": "  "}"#),
            Err(ConfigError::BlankStorageKey)
        ));
        assert!(matches!(
            StoreConfig::from_json(r#"{"debounce": 5}"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
