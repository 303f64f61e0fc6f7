//! Result and error types for the core library

use thiserror::Error;

/// Reason string the registry uses when a currency does not exist yet
pub const NOT_FOUND_REASON: &str = "Currency is not found";

/// Reason string the registry uses for a bad webhook URL or secret
pub const INVALID_CREDENTIALS_REASON: &str = "Invalid request credentials";

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    /// A required configuration input is absent
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    /// Feed or registry unreachable, or answered with a non-success status
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The feed document could not be parsed
    #[error("Feed malformed: {0}")]
    FeedMalformed(String),

    /// The registry is configured with a base currency this tool cannot sync against
    #[error("Base currency mismatch: expected {expected}, registry uses {actual}")]
    BaseCurrencyMismatch { expected: String, actual: String },

    /// The registry has no currency with this code
    #[error("Currency not found in registry: {0}")]
    RecordNotFound(String),

    /// Any other failure reported by the registry
    #[error("Registry error ({code}): {reason}")]
    Registry { code: String, reason: String },
}

impl Error {
    /// Create a configuration-missing error
    pub fn config_missing(msg: impl Into<String>) -> Self {
        Self::ConfigurationMissing(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a feed-malformed error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::FeedMalformed(msg.into())
    }

    /// Create a registry error from the code/reason pair of an RPC failure
    pub fn registry(code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Registry {
            code: code.into(),
            reason: reason.into(),
        }
    }

    /// Whether this is the "record not found" signal that drives create-or-skip
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecordNotFound(_))
    }

    /// Whether the registry rejected our credentials
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, Self::Registry { reason, .. } if reason == INVALID_CREDENTIALS_REASON)
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
