//! Bifrost error types

use std::fmt;
use std::time::Duration;

use crate::types::Capability;

/// Bifrost error types
#[derive(Debug, thiserror::Error)]
pub enum BifrostError {
    // Dispatch errors (raised locally, never reach a provider)
    #[error("{0} capability not available")]
    CapabilityUnavailable(Capability),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("empty response from model")]
    EmptyResponse,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Anything else a provider adapter wants to report.
    #[error("provider error: {0}")]
    Provider(String),

    /// Every provider in the chain failed. Failures are in attempt order.
    #[error("all {} providers failed ({} attempted); last error: {}", .capability, .failures.len(), last_failure(.failures))]
    FallbackExhausted {
        capability: Capability,
        failures: Vec<ProviderFailure>,
    },

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

fn last_failure(failures: &[ProviderFailure]) -> String {
    failures
        .last()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".to_string())
}

/// One provider's failure inside a fallback chain.
#[derive(Debug)]
pub struct ProviderFailure {
    /// Provider name as reported by the capability contract.
    pub provider: String,
    /// The error the provider call (after retries) ended with.
    pub error: BifrostError,
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider, self.error)
    }
}

impl BifrostError {
    /// Whether the error is worth retrying against the same provider.
    ///
    /// Rate limits, connection trouble, 5xx responses, broken streams and
    /// empty responses are transient. Everything else is permanent for that
    /// provider. An expired deadline is permanent too: the client moves on
    /// to the next provider instead of waiting out the deadline again.
    pub fn is_transient(&self) -> bool {
        match self {
            BifrostError::RateLimited { .. }
            | BifrostError::Http(_)
            | BifrostError::Stream(_)
            | BifrostError::EmptyResponse => true,
            BifrostError::Api { status, .. } => matches!(status, 500 | 502 | 503 | 504),
            _ => false,
        }
    }

    /// Provider-supplied retry hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            BifrostError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Whether the client should move on to the next provider in the chain.
    ///
    /// Malformed requests fail the same way everywhere, so they stop the chain.
    pub fn triggers_fallback(&self) -> bool {
        !matches!(
            self,
            BifrostError::InvalidInput(_) | BifrostError::CapabilityUnavailable(_)
        )
    }

    /// The last underlying error, unwrapping `FallbackExhausted`.
    pub fn last_error(&self) -> &BifrostError {
        match self {
            BifrostError::FallbackExhausted { failures, .. } => failures
                .last()
                .map(|f| f.error.last_error())
                .unwrap_or(self),
            other => other,
        }
    }
}

/// Result type alias for Bifrost operations
pub type Result<T> = std::result::Result<T, BifrostError>;
