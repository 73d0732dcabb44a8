//! Bifrost - multi-capability dispatch client for LLM APIs
//!
//! This crate provides a single [`Client`] over provider adapters for text
//! generation, embeddings and document reranking. Providers implement the
//! capability traits ([`Generator`], [`Embedder`], [`Reranker`]); the client
//! detects which capabilities the primary provider offers, applies a deadline
//! to every call, retries transient failures and falls back through ordered
//! lists of alternate providers.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use bifrost::{Client, GenerationRequest, Message, MockProvider};
//!
//! #[tokio::main]
//! async fn main() -> bifrost::Result<()> {
//!     let client = Client::builder(Arc::new(MockProvider::new()))
//!         .timeout(Duration::from_secs(10))
//!         .build();
//!
//!     // The mock also embeds and reranks, so both were detected.
//!     assert!(client.has_embedder() && client.has_reranker());
//!
//!     let response = client
//!         .generate(&GenerationRequest::new(
//!             "test-model",
//!             vec![Message::user("Hello, world!")],
//!         ))
//!         .await?;
//!
//!     println!("{}", response.content().unwrap_or_default());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod providers;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use client::{Client, ClientBuilder, ProviderNames};
pub use config::ClientConfig;
pub use error::{BifrostError, ProviderFailure, Result};
pub use providers::{Embedder, GenerationStream, Generator, MockProvider, Reranker, RetryConfig};

// Re-export all types
pub use types::{
    Capabilities, Capability, Choice, Document, EmbedDatum, EmbeddingRequest, EmbeddingResponse,
    GenerationRequest, GenerationResponse, Message, RerankRequest, RerankResponse, RerankResult,
    Role, TokenUsage,
};
