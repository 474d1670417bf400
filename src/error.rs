//! Error types for Roast.

use thiserror::Error;

/// Primary error type for all Roast operations.
///
/// There are exactly two kinds: configuration problems caught before any
/// I/O, and failures of the single outbound request. Neither is retried.
#[derive(Error, Debug)]
pub enum RoastError {
    /// A required configuration value is missing or unusable. Raised
    /// locally, before any network call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The outbound text-generation call failed: network, authentication,
    /// provider-side error, or timeout.
    #[error("Provider request failed: {message}")]
    Request {
        /// HTTP status, when the provider answered at all.
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RoastError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a request error with no HTTP status (connect failures,
    /// undecodable bodies).
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            status: None,
            message: message.into(),
            source: None,
        }
    }

    /// Create a request error for a non-success HTTP status.
    pub fn request_status(status: u16, message: impl Into<String>) -> Self {
        Self::Request {
            status: Some(status),
            message: message.into(),
            source: None,
        }
    }

    /// HTTP status carried by a request error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => *status,
            Self::Configuration(_) => None,
        }
    }

    /// Whether the error was raised before any network I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl From<reqwest::Error> for RoastError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for RoastError {
    fn from(err: serde_json::Error) -> Self {
        Self::Request {
            status: None,
            message: format!("undecodable provider response: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RoastError>;
