//! Deterministic in-process provider.
//!
//! [`MockProvider`] implements all three capability contracts without any
//! network access. Output depends only on the request, which makes it useful
//! for tests and for wiring up an application before real credentials exist.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio_stream::wrappers::ReceiverStream;

use super::traits::{Embedder, GenerationStream, Generator, Reranker};
use crate::Result;
use crate::types::{
    Choice, EmbedDatum, EmbeddingRequest, EmbeddingResponse, GenerationRequest,
    GenerationResponse, Message, RerankRequest, RerankResponse, RerankResult, Role, TokenUsage,
};

/// Vector size used when a request leaves `dimensions` unset.
pub const DEFAULT_MOCK_DIMENSIONS: usize = 8;

/// Channel capacity between the stream producer task and the consumer.
const STREAM_BUFFER: usize = 16;

/// Provider that answers every capability deterministically.
#[derive(Debug)]
pub struct MockProvider {
    name: String,
    stream_chunks: Option<Vec<String>>,
    next_id: AtomicU64,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self::named("mock")
    }

    /// Create a mock with a custom provider name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stream_chunks: None,
            next_id: AtomicU64::new(1),
        }
    }

    /// Stream exactly these fragments instead of splitting the reply by word.
    pub fn with_stream_chunks<I, S>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stream_chunks = Some(chunks.into_iter().map(Into::into).collect());
        self
    }

    fn reply_to(messages: &[Message]) -> String {
        let prompt = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .or(messages.last())
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        format!("Mock response to: {prompt}")
    }

    fn response_id(&self) -> String {
        format!("mock-{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn completion(
        &self,
        id: String,
        object: &str,
        model: &str,
        content: String,
        finish_reason: &str,
        usage: TokenUsage,
    ) -> GenerationResponse {
        GenerationResponse {
            id,
            object: object.to_string(),
            created: unix_now(),
            model: model.to_string(),
            choices: vec![Choice {
                index: 0,
                message: Message::assistant(content),
                finish_reason: finish_reason.to_string(),
            }],
            usage,
        }
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

fn count_tokens(text: &str) -> u32 {
    words(text).count() as u32
}

/// Deterministic pseudo-embedding; every component lies in `(0, 1]`.
fn embed_text(text: &str, dimensions: usize) -> Vec<f64> {
    let seed = text
        .bytes()
        .fold(17u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)));
    (0..dimensions as u64)
        .map(|j| {
            let mixed = seed.wrapping_mul(j.wrapping_add(1)).wrapping_add(j * 7919);
            ((mixed % 1000) + 1) as f64 / 1000.0
        })
        .collect()
}

/// Query-term overlap with add-one smoothing, so scores are always positive.
fn relevance(query: &str, text: &str) -> f64 {
    let doc: std::collections::HashSet<String> = words(text).collect();
    let terms: Vec<String> = words(query).collect();
    let hits = terms.iter().filter(|t| doc.contains(*t)).count();
    (hits as f64 + 1.0) / (terms.len() as f64 + 2.0)
}

#[async_trait]
impl Generator for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let content = Self::reply_to(&request.messages);
        let prompt_tokens = request
            .messages
            .iter()
            .map(|m| count_tokens(&m.content))
            .sum();
        let usage = TokenUsage::new(prompt_tokens, count_tokens(&content));
        Ok(self.completion(
            self.response_id(),
            "chat.completion",
            &request.model,
            content,
            "stop",
            usage,
        ))
    }

    async fn generate_stream(&self, request: &GenerationRequest) -> Result<GenerationStream> {
        let chunks = match &self.stream_chunks {
            Some(chunks) => chunks.clone(),
            None => Self::reply_to(&request.messages)
                .split_whitespace()
                .map(|w| format!("{w} "))
                .collect(),
        };
        let id = self.response_id();
        let last = chunks.len().saturating_sub(1);
        let fragments: Vec<GenerationResponse> = chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| {
                let finish = if i == last { "stop" } else { "" };
                let usage = TokenUsage::new(0, count_tokens(&chunk));
                self.completion(
                    id.clone(),
                    "chat.completion.chunk",
                    &request.model,
                    chunk,
                    finish,
                    usage,
                )
            })
            .collect();

        let (tx, rx) = tokio::sync::mpsc::channel(STREAM_BUFFER);
        tokio::spawn(async move {
            for fragment in fragments {
                if tx.send(Ok(fragment)).await.is_err() {
                    break; // receiver dropped
                }
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    fn as_embedder(self: Arc<Self>) -> Option<Arc<dyn Embedder>> {
        Some(self)
    }

    fn as_reranker(self: Arc<Self>) -> Option<Arc<dyn Reranker>> {
        Some(self)
    }
}

#[async_trait]
impl Embedder for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn embed(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse> {
        let dimensions = request.dimensions.unwrap_or(DEFAULT_MOCK_DIMENSIONS);
        let data = request
            .input
            .iter()
            .enumerate()
            .map(|(index, text)| EmbedDatum {
                object: "embedding".to_string(),
                embedding: embed_text(text, dimensions),
                index,
            })
            .collect();
        let prompt_tokens = request.input.iter().map(|t| count_tokens(t).max(1)).sum();
        Ok(EmbeddingResponse {
            object: "list".to_string(),
            model: request.model.clone(),
            data,
            usage: TokenUsage::prompt_only(prompt_tokens),
        })
    }
}

#[async_trait]
impl Reranker for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn rerank(&self, request: &RerankRequest) -> Result<RerankResponse> {
        let results = request
            .documents
            .iter()
            .enumerate()
            .map(|(index, document)| RerankResult {
                document: document.clone(),
                index,
                relevance_score: relevance(&request.query, &document.text),
            })
            .collect();
        let prompt_tokens = count_tokens(&request.query).max(1)
            + request
                .documents
                .iter()
                .map(|d| count_tokens(&d.text))
                .sum::<u32>();
        Ok(RerankResponse {
            object: "list".to_string(),
            model: request.model.clone(),
            results: RerankResponse::rank(results, request.top_n),
            usage: TokenUsage::prompt_only(prompt_tokens),
        })
    }
}
