//! Retry configuration and delay calculation.
//!
//! [`RetryConfig`] controls how often a single provider is re-tried on
//! transient errors before the client moves on to the next provider in the
//! fallback chain. All retrying goes through [`with_retry`].

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::telemetry;
use crate::{BifrostError, Result};

/// How one provider in a fallback chain is re-tried before the client gives up
/// on it.
///
/// The budget is per provider: a fallback starts with a fresh count. Waits
/// between attempts double from `initial_delay` up to `max_delay`, unless
/// the provider sent a rate-limit hint.
///
/// ```rust
/// # use bifrost::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(200));
/// assert_eq!(config.backoff(1), Duration::from_millis(400));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Calls made to one provider before falling back, first call included.
    /// `1` and `0` both mean a single call.
    pub max_attempts: u32,
    /// Wait after the first failed call.
    pub initial_delay: Duration,
    /// Upper bound for any computed wait.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    /// Three calls per provider, waits of 500ms then 1s, capped at 30s.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// One call per provider; failures go straight to the next fallback.
    pub fn disabled() -> Self {
        Self::default().max_attempts(1)
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Wait after failed attempt `attempt` (0 = the first call).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.max_delay.min(self.initial_delay.saturating_mul(factor))
    }

    /// Wait before the next call to the same provider. A `retry_after` hint
    /// from a rate-limited provider replaces the computed backoff.
    pub fn wait_before_retry(&self, attempt: u32, hint: Option<Duration>) -> Duration {
        match hint {
            Some(hint) => hint,
            None => self.backoff(attempt),
        }
    }
}

/// Call one provider until it succeeds, fails permanently or runs out of
/// attempts.
///
/// Only [`BifrostError::is_transient`] errors are re-tried; the final error
/// is handed back to the chain, which decides whether to fall back.
pub(crate) async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    provider_name: &str,
    operation: &'static str,
    f: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut last_err = None;
    for attempt in 0..max_attempts {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() => {
                if attempt + 1 < max_attempts {
                    metrics::counter!(telemetry::RETRIES_TOTAL,
                        "provider" => provider_name.to_owned(),
                        "operation" => operation,
                    )
                    .increment(1);
                    let delay = config.wait_before_retry(attempt, e.retry_after());
                    warn!(
                        provider = provider_name,
                        operation,
                        attempt = attempt + 1,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying after transient error"
                    );
                    tokio::time::sleep(delay).await;
                }
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| BifrostError::Provider("no attempt was made".to_string())))
}
