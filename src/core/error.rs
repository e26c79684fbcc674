//! Error taxonomy for every call that crosses the backend boundary.

use thiserror::Error;
use tracing::debug;

/// Errors surfaced by the gateway and the workflows built on top of it.
///
/// The `Display` text of each variant is what the user gets to see, so it
/// never carries a raw status code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// Token missing from the session or rejected by the backend.
    #[error("{0}")]
    Auth(String),

    /// Non-success response, timeout or malformed body. Carries the
    /// server-supplied reason when there is one.
    #[error("{0}")]
    Backend(String),

    /// Transport failure. The detail is kept for logs only.
    #[error("Unable to reach the fund service")]
    Network(String),

    /// Rejected locally before any request was made.
    #[error("{0}")]
    Validation(String),
}

impl GatewayError {
    /// Only transport failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Network(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Auth(_) => "auth",
            GatewayError::Backend(_) => "backend",
            GatewayError::Network(_) => "network",
            GatewayError::Validation(_) => "validation",
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Backend("Request timed out".to_string())
        } else if e.is_decode() {
            debug!(error = %e, "Failed to decode backend response");
            GatewayError::Backend("Malformed response from backend".to_string())
        } else {
            GatewayError::Network(e.to_string())
        }
    }
}
