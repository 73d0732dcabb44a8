//! Metric names emitted by the dispatch client.
//!
//! One request is one call to a client entry point, however many providers
//! and attempts it took. Nothing is recorded for calls rejected before
//! dispatch (missing capability, invalid input). The library installs no
//! recorder, so these are no-ops until the host application sets one up.
//!
//! # Labels
//!
//! - `operation`: `generate`, `generate_stream`, `embed` or `rerank`
//! - `provider`: on requests and tokens, the provider that answered (or the
//!   last one tried when the whole chain failed); on retries, the provider
//!   being re-tried; on fallbacks, the provider that failed and was left
//! - `status`: `ok` or `error`
//! - `direction`: `prompt` or `completion`; completion is always 0 for
//!   embed and rerank, and streamed generations are not counted

/// Total requests dispatched through the client.
///
/// Labels: `provider`, `operation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "bifrost_requests_total";

/// Request duration in seconds, measured across the whole fallback chain.
///
/// Labels: `provider`, `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "bifrost_request_duration_seconds";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `provider`, `operation`.
pub const RETRIES_TOTAL: &str = "bifrost_retries_total";

/// Total fallbacks: a provider failed and the next one in the chain was tried.
///
/// Labels: `provider` (the one that failed), `operation`.
pub const FALLBACKS_TOTAL: &str = "bifrost_fallbacks_total";

/// Total tokens consumed.
///
/// Labels: `provider`, `direction` ("prompt" | "completion").
pub const TOKENS_TOTAL: &str = "bifrost_tokens_total";
