//! The dispatch client.
//!
//! [`Client`] holds one primary provider per capability plus ordered fallback
//! lists, and routes each typed request to the right one. Every entry point
//! follows the same shape:
//!
//! 1. capability check (`CapabilityUnavailable` without touching a provider)
//! 2. shallow preflight (`InvalidInput`)
//! 3. optional debug event
//! 4. primary, then fallbacks, each retried and deadline-scoped
//!
//! The client holds no per-call state, so a shared `&Client` can serve
//! concurrent calls from many tasks. Cancelling a call is dropping its
//! future; an outer `tokio::time::timeout` composes with the client's own.

mod builder;
mod dispatch;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument};

pub use builder::{ClientBuilder, DEFAULT_TIMEOUT};

use self::dispatch::{Policy, preview, record_token_usage, run_chain};
use crate::providers::retry::RetryConfig;
use crate::providers::traits::{Embedder, GenerationStream, Generator, Reranker};
use crate::types::{
    Capabilities, Capability, EmbeddingRequest, EmbeddingResponse, GenerationRequest,
    GenerationResponse, RerankRequest, RerankResponse,
};
use crate::{BifrostError, Result};

/// Characters of the first message kept in debug events.
const PREVIEW_CHARS: usize = 80;

/// Multi-capability client with fallback chains.
pub struct Client {
    generator: Arc<dyn Generator>,
    embedder: Option<Arc<dyn Embedder>>,
    reranker: Option<Arc<dyn Reranker>>,
    fallback_generators: Vec<Arc<dyn Generator>>,
    fallback_embedders: Vec<Arc<dyn Embedder>>,
    fallback_rerankers: Vec<Arc<dyn Reranker>>,
    retry: RetryConfig,
    timeout: Duration,
    debug: bool,
}

impl Client {
    /// Client with default settings around `generator`.
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self::builder(generator).build()
    }

    /// Create a builder around the mandatory primary generator.
    pub fn builder(generator: Arc<dyn Generator>) -> ClientBuilder {
        ClientBuilder::new(generator)
    }

    fn policy(&self) -> Policy<'_> {
        Policy {
            timeout: self.timeout,
            retry: &self.retry,
        }
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Non-streaming text generation.
    #[instrument(skip(self, request), fields(operation = "generate", model = %request.model))]
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        request.validate()?;
        if self.debug {
            info!(
                capability = %Capability::Generate,
                provider = self.generator.name(),
                model = %request.model,
                messages = request.messages.len(),
                preview = %first_message_preview(request),
                "generating response"
            );
        }

        let chain = std::iter::once(&self.generator).chain(&self.fallback_generators);
        let (provider, response) = run_chain(
            Capability::Generate,
            "generate",
            chain,
            self.policy(),
            |generator: Arc<dyn Generator>| async move { generator.generate(request).await },
        )
        .await?;

        record_token_usage(&provider, &response.usage);
        Ok(response)
    }

    /// Streaming text generation.
    ///
    /// Deadline, retry and fallback cover establishing the stream only; the
    /// returned stream is the provider's, passed through unchanged.
    #[instrument(skip(self, request), fields(operation = "generate_stream", model = %request.model))]
    pub async fn generate_stream(&self, request: &GenerationRequest) -> Result<GenerationStream> {
        request.validate()?;
        if self.debug {
            info!(
                capability = %Capability::Generate,
                provider = self.generator.name(),
                model = %request.model,
                messages = request.messages.len(),
                preview = %first_message_preview(request),
                "starting stream"
            );
        }

        let chain = std::iter::once(&self.generator).chain(&self.fallback_generators);
        let (_, stream) = run_chain(
            Capability::Generate,
            "generate_stream",
            chain,
            self.policy(),
            |generator: Arc<dyn Generator>| async move { generator.generate_stream(request).await },
        )
        .await?;

        Ok(stream)
    }

    /// Embed the request's inputs.
    #[instrument(skip(self, request), fields(operation = "embed", model = %request.model, batch_size = request.input.len()))]
    pub async fn embed(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse> {
        let Some(primary) = &self.embedder else {
            return Err(BifrostError::CapabilityUnavailable(Capability::Embed));
        };
        request.validate()?;
        if self.debug {
            info!(
                capability = %Capability::Embed,
                provider = primary.name(),
                model = %request.model,
                inputs = request.input.len(),
                preview = %request.input.first().map(|t| preview(t, PREVIEW_CHARS)).unwrap_or_default(),
                "embedding input"
            );
        }

        let chain = std::iter::once(primary).chain(&self.fallback_embedders);
        let (provider, response) = run_chain(
            Capability::Embed,
            "embed",
            chain,
            self.policy(),
            |embedder: Arc<dyn Embedder>| async move { embedder.embed(request).await },
        )
        .await?;

        record_token_usage(&provider, &response.usage);
        Ok(response)
    }

    /// Rerank the request's documents against its query.
    #[instrument(skip(self, request), fields(operation = "rerank", model = %request.model, documents = request.documents.len()))]
    pub async fn rerank(&self, request: &RerankRequest) -> Result<RerankResponse> {
        let Some(primary) = &self.reranker else {
            return Err(BifrostError::CapabilityUnavailable(Capability::Rerank));
        };
        request.validate()?;
        if self.debug {
            info!(
                capability = %Capability::Rerank,
                provider = primary.name(),
                model = %request.model,
                documents = request.documents.len(),
                top_n = request.top_n,
                preview = %preview(&request.query, PREVIEW_CHARS),
                "reranking documents"
            );
        }

        let chain = std::iter::once(primary).chain(&self.fallback_rerankers);
        let (provider, response) = run_chain(
            Capability::Rerank,
            "rerank",
            chain,
            self.policy(),
            |reranker: Arc<dyn Reranker>| async move { reranker.rerank(request).await },
        )
        .await?;

        record_token_usage(&provider, &response.usage);
        Ok(response)
    }

    // ========================================================================
    // Capability introspection
    // ========================================================================

    /// Always true: a client cannot be built without a generator.
    pub fn has_generator(&self) -> bool {
        true
    }

    /// Check if an embedder is bound.
    pub fn has_embedder(&self) -> bool {
        self.embedder.is_some()
    }

    /// Check if a reranker is bound.
    pub fn has_reranker(&self) -> bool {
        self.reranker.is_some()
    }

    /// Bound capabilities as a single report.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            generate: self.has_generator(),
            embed: self.has_embedder(),
            rerank: self.has_reranker(),
        }
    }

    /// Provider names per capability, primary first, then fallbacks.
    pub fn provider_names(&self) -> ProviderNames {
        ProviderNames {
            generate: std::iter::once(&self.generator)
                .chain(&self.fallback_generators)
                .map(|g| g.name().to_string())
                .collect(),
            embed: self
                .embedder
                .iter()
                .chain(&self.fallback_embedders)
                .map(|e| e.name().to_string())
                .collect(),
            rerank: self
                .reranker
                .iter()
                .chain(&self.fallback_rerankers)
                .map(|r| r.name().to_string())
                .collect(),
        }
    }

    // ========================================================================
    // Configuration accessors
    // ========================================================================

    /// The primary generator.
    pub fn generator(&self) -> &Arc<dyn Generator> {
        &self.generator
    }

    /// The bound embedder, if any.
    pub fn embedder(&self) -> Option<&Arc<dyn Embedder>> {
        self.embedder.as_ref()
    }

    /// The bound reranker, if any.
    pub fn reranker(&self) -> Option<&Arc<dyn Reranker>> {
        self.reranker.as_ref()
    }

    /// Attempts per provider on transient errors.
    pub fn retry_count(&self) -> u32 {
        self.retry.max_attempts
    }

    /// Full retry configuration.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Deadline applied to every provider call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether debug events are emitted.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Generator fallbacks in the order they are tried.
    pub fn fallback_generators(&self) -> &[Arc<dyn Generator>] {
        &self.fallback_generators
    }

    /// Embedder fallbacks in the order they are tried.
    pub fn fallback_embedders(&self) -> &[Arc<dyn Embedder>] {
        &self.fallback_embedders
    }

    /// Reranker fallbacks in the order they are tried.
    pub fn fallback_rerankers(&self) -> &[Arc<dyn Reranker>] {
        &self.fallback_rerankers
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("providers", &self.provider_names())
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .field("debug", &self.debug)
            .finish()
    }
}

fn first_message_preview(request: &GenerationRequest) -> String {
    request
        .messages
        .first()
        .map(|m| preview(&m.content, PREVIEW_CHARS))
        .unwrap_or_default()
}

/// Provider names per capability, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderNames {
    /// Generator names.
    pub generate: Vec<String>,
    /// Embedder names.
    pub embed: Vec<String>,
    /// Reranker names.
    pub rerank: Vec<String>,
}
