//! Fallback chain execution shared by every entry point.
//!
//! Providers are tried in priority order (primary first, then fallbacks in
//! the order they were configured). Each provider gets its own retry budget
//! and every single call gets its own deadline. An expired deadline is never
//! retried, so with a single provider the call ends within the timeout.
//!
//! ```text
//! client.embed(&request)
//!         │
//!         ▼
//!   primary embedder ──► retry transient errors, deadline per call
//!         │ failed or timed out
//!         ▼
//!   fallback #1      ──► same discipline
//!         │ failed
//!         ▼
//!   FallbackExhausted { failures: [primary, #1] }
//! ```
//!
//! `InvalidInput` stops the chain: a malformed request fails everywhere.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::providers::retry::{RetryConfig, with_retry};
use crate::providers::traits::{Embedder, Generator, Reranker};
use crate::telemetry;
use crate::types::{Capability, TokenUsage};
use crate::{BifrostError, ProviderFailure, Result};

/// Name lookup common to the three capability contracts.
pub(crate) trait Bound: Send + Sync {
    fn provider_name(&self) -> &str;
}

impl Bound for dyn Generator {
    fn provider_name(&self) -> &str {
        self.name()
    }
}

impl Bound for dyn Embedder {
    fn provider_name(&self) -> &str {
        self.name()
    }
}

impl Bound for dyn Reranker {
    fn provider_name(&self) -> &str {
        self.name()
    }
}

/// Per-call execution policy, copied out of the client configuration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Policy<'a> {
    pub timeout: Duration,
    pub retry: &'a RetryConfig,
}

/// Run `fut` under a deadline, mapping expiry to [`BifrostError::Timeout`].
///
/// Dropping the returned future releases the timer, so the deadline is
/// cleaned up on every exit path.
pub(crate) async fn with_deadline<Fut, T>(timeout: Duration, fut: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| BifrostError::Timeout(timeout))?
}

/// Walk `chain` until a provider succeeds.
///
/// Returns the winning provider's name alongside the value. A chain of one
/// propagates that provider's error unchanged; longer chains that fail
/// completely report [`BifrostError::FallbackExhausted`].
pub(crate) async fn run_chain<'c, P, I, T, F, Fut>(
    capability: Capability,
    operation: &'static str,
    chain: I,
    policy: Policy<'_>,
    call: F,
) -> Result<(String, T)>
where
    P: Bound + ?Sized + 'c,
    I: IntoIterator<Item = &'c Arc<P>>,
    F: Fn(Arc<P>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let start = Instant::now();
    let mut failures: Vec<ProviderFailure> = Vec::new();

    let chain: Vec<Arc<P>> = chain.into_iter().cloned().collect();
    for provider in &chain {
        let name = provider.provider_name().to_owned();

        if let Some(previous) = failures.last() {
            metrics::counter!(telemetry::FALLBACKS_TOTAL,
                "provider" => previous.provider.clone(),
                "operation" => operation,
            )
            .increment(1);
            warn!(
                failed = %previous.provider,
                next = %name,
                operation,
                error = %previous.error,
                "falling back to next provider"
            );
        }

        let outcome = with_retry(policy.retry, &name, operation, || {
            with_deadline(policy.timeout, call(Arc::clone(provider)))
        })
        .await;

        match outcome {
            Ok(value) => {
                record_request(operation, &name, start, true);
                return Ok((name, value));
            }
            Err(error) if error.triggers_fallback() => {
                failures.push(ProviderFailure {
                    provider: name,
                    error,
                });
            }
            Err(error) => {
                record_request(operation, &name, start, false);
                return Err(error);
            }
        }
    }

    let last = failures
        .last()
        .map(|f| f.provider.clone())
        .unwrap_or_else(|| "none".to_string());
    record_request(operation, &last, start, false);
    Err(exhausted(capability, failures))
}

fn exhausted(capability: Capability, mut failures: Vec<ProviderFailure>) -> BifrostError {
    match failures.len() {
        0 => BifrostError::CapabilityUnavailable(capability),
        1 => failures.remove(0).error,
        _ => BifrostError::FallbackExhausted {
            capability,
            failures,
        },
    }
}

// ============================================================================
// Metrics recording
// ============================================================================

/// Record request outcome metrics (counter + histogram).
fn record_request(operation: &'static str, provider: &str, start: Instant, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    let elapsed = start.elapsed().as_secs_f64();
    metrics::counter!(telemetry::REQUESTS_TOTAL,
        "provider" => provider.to_owned(),
        "operation" => operation,
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
        "provider" => provider.to_owned(),
        "operation" => operation,
    )
    .record(elapsed);
}

/// Record token usage metrics from a response.
pub(crate) fn record_token_usage(provider: &str, usage: &TokenUsage) {
    metrics::counter!(telemetry::TOKENS_TOTAL,
        "provider" => provider.to_owned(),
        "direction" => "prompt",
    )
    .increment(u64::from(usage.prompt_tokens));
    metrics::counter!(telemetry::TOKENS_TOTAL,
        "provider" => provider.to_owned(),
        "direction" => "completion",
    )
    .increment(u64::from(usage.completion_tokens));
}

/// First `max_chars` characters of `text`, with an ellipsis when cut.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_is_char_safe() {
        assert_eq!(preview("héllo wörld", 5), "héllo…");
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("", 3), "");
    }

    #[test]
    fn single_failure_is_returned_unchanged() {
        let err = exhausted(
            Capability::Generate,
            vec![ProviderFailure {
                provider: "p".into(),
                error: BifrostError::AuthenticationFailed,
            }],
        );
        assert!(matches!(err, BifrostError::AuthenticationFailed));
    }

    #[test]
    fn several_failures_are_aggregated_in_order() {
        let err = exhausted(
            Capability::Rerank,
            vec![
                ProviderFailure {
                    provider: "a".into(),
                    error: BifrostError::Http("reset".into()),
                },
                ProviderFailure {
                    provider: "b".into(),
                    error: BifrostError::EmptyResponse,
                },
            ],
        );
        match err {
            BifrostError::FallbackExhausted {
                capability,
                failures,
            } => {
                assert_eq!(capability, Capability::Rerank);
                let names: Vec<_> = failures.iter().map(|f| f.provider.as_str()).collect();
                assert_eq!(names, vec!["a", "b"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_maps_to_timeout_error() {
        let result: Result<()> = with_deadline(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(BifrostError::Timeout(d)) if d == Duration::from_millis(10)));
    }
}
