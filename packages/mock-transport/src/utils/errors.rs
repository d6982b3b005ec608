// packages/mock-transport/src/utils/errors.rs
//! Error types for the mock transport

use thiserror::Error;

/// Errors surfaced by the mock transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// No queues were ever registered for the request's origin
    #[error("origin is not registered: {origin}")]
    OriginNotRegistered { origin: String },

    /// The request URI has no scheme/authority and no `Host` header
    #[error("request has no origin: {uri}")]
    MissingOrigin { uri: String },

    /// The origin is known but no queue matched, or every matching queue is exhausted
    #[error("mock is not registered")]
    MockNotRegistered,

    /// A producer could not be built at setup time
    #[error("malformed producer configuration: {0}")]
    MalformedProducerConfiguration(String),

    /// A caller-supplied predicate returned an error
    #[error("matcher failed: {0:#}")]
    MatcherFailed(anyhow::Error),

    /// A response producer returned an error
    #[error("response producer failed: {0:#}")]
    ProducerFailed(anyhow::Error),

    #[error("failed to read request body: {0}")]
    BodyRead(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("export failed: {0}")]
    ExportFailed(String),
}

impl TransportError {
    /// Whether the error points at a broken test setup rather than a stray request
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Self::OriginNotRegistered { .. }
                | Self::MalformedProducerConfiguration(_)
                | Self::ConfigError(_)
        )
    }
}

impl From<::config::ConfigError> for TransportError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
