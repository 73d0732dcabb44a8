//! Capability contracts for provider adapters.
//!
//! Providers implement one trait per capability (`Generator`, `Embedder`,
//! `Reranker`) rather than a single "god trait". A provider that serves several
//! capabilities implements several traits, and advertises the extra ones
//! through [`Generator::as_embedder`] / [`Generator::as_reranker`] so the
//! client can bind it once.
//!
//! # Example
//!
//! ```ignore
//! #[async_trait]
//! impl Generator for MyProvider {
//!     fn name(&self) -> &str { "my-provider" }
//!     async fn generate(&self, req: &GenerationRequest) -> Result<GenerationResponse> { ... }
//!     async fn generate_stream(&self, req: &GenerationRequest) -> Result<GenerationStream> { ... }
//!
//!     fn as_embedder(self: Arc<Self>) -> Option<Arc<dyn Embedder>> {
//!         Some(self)
//!     }
//! }
//! ```

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::Stream;

use crate::Result;
use crate::types::{
    EmbeddingRequest, EmbeddingResponse, GenerationRequest, GenerationResponse, RerankRequest,
    RerankResponse,
};

/// Incremental generation fragments, in emission order.
///
/// Single consumer; ends when the producer closes it.
pub type GenerationStream = Pin<Box<dyn Stream<Item = Result<GenerationResponse>> + Send>>;

// ============================================================================
// Generator
// ============================================================================

/// Provider for text generation.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Non-streaming generation.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse>;

    /// Streaming generation. Resolves once the stream is established.
    async fn generate_stream(&self, request: &GenerationRequest) -> Result<GenerationStream>;

    /// This provider as an embedder, if it is one.
    ///
    /// Returns None by default. Providers that also embed should override
    /// this method to return `Some(self)`.
    fn as_embedder(self: Arc<Self>) -> Option<Arc<dyn Embedder>> {
        None
    }

    /// This provider as a reranker, if it is one.
    ///
    /// Returns None by default. Providers that also rerank should override
    /// this method to return `Some(self)`.
    fn as_reranker(self: Arc<Self>) -> Option<Arc<dyn Reranker>> {
        None
    }
}

// ============================================================================
// Embedder
// ============================================================================

/// Provider for text embeddings.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Embed every input of the request.
    async fn embed(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse>;
}

// ============================================================================
// Reranker
// ============================================================================

/// Provider for document reranking.
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Rank the request's documents against its query.
    async fn rerank(&self, request: &RerankRequest) -> Result<RerankResponse>;
}
