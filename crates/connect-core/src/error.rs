//! # Connect Error Types
//!
//! Typed error handling for the connect-checkout server.
//! Every gateway and domain operation returns `Result<T, ConnectError>`.

use thiserror::Error;

/// Core error type for all connect operations
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Configuration errors (missing keys, invalid base price)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid client input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Webhook body could not be read
    #[error("Webhook unreadable: {0}")]
    WebhookUnreadable(String),

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Webhook envelope or embedded object could not be decoded
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConnectError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ConnectError::Configuration(_) => 500,
            ConnectError::InvalidRequest(_) => 400,
            ConnectError::ProviderError { .. } => 500,
            ConnectError::NetworkError(_) => 500,
            ConnectError::WebhookUnreadable(_) => 400,
            ConnectError::WebhookVerificationFailed(_) => 400,
            ConnectError::WebhookParseError(_) => 400,
            ConnectError::Serialization(_) => 500,
            ConnectError::Internal(_) => 500,
        }
    }
}

/// Result type alias for connect operations
pub type ConnectResult<T> = Result<T, ConnectError>;
