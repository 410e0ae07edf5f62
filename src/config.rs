//! Bridge configuration.

use core::num::ParseIntError;

use serde::Deserialize;
use thiserror::Error;
use waterui_protocol_core::PolicyKind;
use waterui_protocol_core::mismatch::UnknownPolicy;

/// Environment variable selecting the mismatch policy (`throwing` or `logging`).
pub const MISMATCH_ENV: &str = "WATERUI_PROTOCOL_MISMATCH";
/// Environment variable bounding the host to guest event queue.
pub const EVENT_CAPACITY_ENV: &str = "WATERUI_PROTOCOL_EVENT_CAPACITY";

/// Errors raised while reading a [`BridgeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The mismatch policy name is not recognized.
    #[error("invalid WATERUI_PROTOCOL_MISMATCH: {0}")]
    Mismatch(#[from] UnknownPolicy),
    /// The event capacity is not a number.
    #[error("invalid WATERUI_PROTOCOL_EVENT_CAPACITY `{value}`: {source}")]
    EventCapacity {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        #[source]
        source: ParseIntError,
    },
    /// The event capacity is zero.
    #[error("WATERUI_PROTOCOL_EVENT_CAPACITY must be at least 1")]
    ZeroCapacity,
}

/// Settings shared by both ends of a bridge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// How both ends react to version skew.
    pub mismatch: PolicyKind,
    /// Bound of the event queue; `None` makes it unbounded.
    pub event_capacity: Option<usize>,
}

impl BridgeConfig {
    /// Creates the default configuration: throwing policy, unbounded events.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mismatch: PolicyKind::Throwing,
            event_capacity: None,
        }
    }

    /// Selects the mismatch policy.
    #[must_use]
    pub const fn mismatch(mut self, mismatch: PolicyKind) -> Self {
        self.mismatch = mismatch;
        self
    }

    /// Bounds the event queue.
    #[must_use]
    pub const fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = Some(capacity);
        self
    }

    /// Reads the configuration from [`MISMATCH_ENV`] and [`EVENT_CAPACITY_ENV`].
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::new();
        if let Some(mismatch) = lookup(MISMATCH_ENV) {
            config.mismatch = mismatch.parse()?;
        }
        if let Some(value) = lookup(EVENT_CAPACITY_ENV) {
            let capacity = value
                .trim()
                .parse::<usize>()
                .map_err(|source| ConfigError::EventCapacity {
                    value: value.clone(),
                    source,
                })?;
            if capacity == 0 {
                return Err(ConfigError::ZeroCapacity);
            }
            config.event_capacity = Some(capacity);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned())
        }
    }

    #[test]
    fn defaults_when_unset() {
        let config = BridgeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.mismatch, PolicyKind::Throwing);
        assert_eq!(config.event_capacity, None);
    }

    #[test]
    fn reads_variables() {
        let config = BridgeConfig::from_lookup(lookup(&[
            (MISMATCH_ENV, "logging"),
            (EVENT_CAPACITY_ENV, " 64 "),
        ]))
        .unwrap();
        assert_eq!(
            config,
            BridgeConfig::new()
                .mismatch(PolicyKind::Logging)
                .event_capacity(64)
        );
    }

    #[test]
    fn rejects_invalid_values() {
        let error = BridgeConfig::from_lookup(lookup(&[(MISMATCH_ENV, "lenient")])).unwrap_err();
        assert!(matches!(error, ConfigError::Mismatch(_)));
        assert!(error.to_string().starts_with("invalid WATERUI_PROTOCOL_MISMATCH"));

        let error =
            BridgeConfig::from_lookup(lookup(&[(EVENT_CAPACITY_ENV, "many")])).unwrap_err();
        assert!(matches!(error, ConfigError::EventCapacity { .. }));

        let error = BridgeConfig::from_lookup(lookup(&[(EVENT_CAPACITY_ENV, "0")])).unwrap_err();
        assert!(matches!(error, ConfigError::ZeroCapacity));
    }

    #[test]
    fn deserializes() {
        let config: BridgeConfig =
            serde_json::from_str(r#"{"mismatch":"logging","event_capacity":8}"#).unwrap();
        assert_eq!(config.mismatch, PolicyKind::Logging);
        assert_eq!(config.event_capacity, Some(8));

        let config: BridgeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BridgeConfig::new());
    }
}
