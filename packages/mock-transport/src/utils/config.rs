// packages/mock-transport/src/utils/config.rs
//! Transport configuration
//!
//! Values come from defaults, optionally overridden by `SENTRA_MOCK_*`
//! environment variables or a TOML document.

use crate::utils::errors::{Result, TransportError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable prefix for [`TransportConfig::load`]
pub const ENV_PREFIX: &str = "SENTRA_MOCK";

/// What the transport does with a request whose origin has no queues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnregisteredOriginPolicy {
    /// Fail with `OriginNotRegistered` and leave the audit log untouched
    #[default]
    Reject,

    /// Fail with `OriginNotRegistered` and append an unmatched audit record
    RecordUnmatched,
}

/// Configuration for a [`MockTransport`](crate::MockTransport)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Emit a debug line per request header
    pub log_requests: bool,

    /// Maximum body size to preview in logs (bytes)
    pub max_log_body_size: usize,

    /// Keep request bodies in audit records
    pub capture_request_bodies: bool,

    /// Handling of requests to origins with no registered queues
    pub unregistered_origin: UnregisteredOriginPolicy,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            log_requests: true,
            max_log_body_size: 10_000, // 10KB
            capture_request_bodies: true,
            unregistered_origin: UnregisteredOriginPolicy::Reject,
        }
    }
}

impl TransportConfig {
    /// Load configuration from `SENTRA_MOCK_*` environment variables
    pub fn load() -> Result<Self> {
        let config: Self = ::config::Config::builder()
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        debug!("Transport configuration loaded: {:?}", config);
        Ok(config)
    }

    /// Parse configuration from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = ::config::Config::builder()
            .add_source(::config::File::from_str(source, ::config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_log_body_size == 0 {
            return Err(TransportError::ConfigError(
                "max_log_body_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = TransportConfig::default();
        assert!(config.log_requests);
        assert!(config.capture_request_bodies);
        assert_eq!(config.unregistered_origin, UnregisteredOriginPolicy::Reject);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = TransportConfig::from_toml_str(
            r#"
            log_requests = false
            unregistered_origin = "record_unmatched"
            "#,
        )
        .unwrap();

        assert!(!config.log_requests);
        assert_eq!(
            config.unregistered_origin,
            UnregisteredOriginPolicy::RecordUnmatched
        );
        // Unset keys fall back to defaults
        assert_eq!(config.max_log_body_size, 10_000);
    }

    #[test]
    fn test_invalid_body_size() {
        let result = TransportConfig::from_toml_str("max_log_body_size = 0");
        assert!(matches!(result, Err(TransportError::ConfigError(_))));
    }

    #[test]
    fn test_unknown_policy() {
        let result = TransportConfig::from_toml_str(r#"unregistered_origin = "ignore""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_env() {
        // Only test in this binary that touches SENTRA_MOCK_* variables
        std::env::set_var("SENTRA_MOCK_LOG_REQUESTS", "false");
        std::env::set_var("SENTRA_MOCK_MAX_LOG_BODY_SIZE", "2048");
        std::env::set_var("SENTRA_MOCK_UNREGISTERED_ORIGIN", "record_unmatched");

        let loaded = TransportConfig::load();

        std::env::set_var("SENTRA_MOCK_MAX_LOG_BODY_SIZE", "0");
        let invalid = TransportConfig::load();

        for key in [
            "SENTRA_MOCK_LOG_REQUESTS",
            "SENTRA_MOCK_MAX_LOG_BODY_SIZE",
            "SENTRA_MOCK_UNREGISTERED_ORIGIN",
        ] {
            std::env::remove_var(key);
        }

        let config = loaded.unwrap();
        assert!(!config.log_requests);
        assert_eq!(config.max_log_body_size, 2048);
        assert!(config.capture_request_bodies);
        assert_eq!(
            config.unregistered_origin,
            UnregisteredOriginPolicy::RecordUnmatched
        );
        assert!(matches!(invalid, Err(TransportError::ConfigError(_))));
    }
}
