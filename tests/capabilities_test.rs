//! Capability auto-detection and explicit overrides.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use bifrost::{
    BifrostError, Capability, Client, Document, EmbedDatum, Embedder, EmbeddingRequest,
    EmbeddingResponse, GenerationRequest, GenerationResponse, GenerationStream, Generator,
    MockProvider, RerankRequest, Reranker, Result, TokenUsage,
};

/// Generator that implements nothing else and counts every call.
#[derive(Default)]
struct GenerateOnly {
    calls: AtomicU32,
}

#[async_trait]
impl Generator for GenerateOnly {
    fn name(&self) -> &str {
        "generate-only"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<GenerationResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(BifrostError::Provider("not used".into()))
    }

    async fn generate_stream(&self, _request: &GenerationRequest) -> Result<GenerationStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(BifrostError::Provider("not used".into()))
    }
}

/// Generator that also implements `Embedder` but does not advertise it.
struct SilentEmbedder;

#[async_trait]
impl Generator for SilentEmbedder {
    fn name(&self) -> &str {
        "silent"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<GenerationResponse> {
        Err(BifrostError::EmptyResponse)
    }

    async fn generate_stream(&self, _request: &GenerationRequest) -> Result<GenerationStream> {
        Err(BifrostError::EmptyResponse)
    }
}

#[async_trait]
impl Embedder for SilentEmbedder {
    fn name(&self) -> &str {
        "silent"
    }

    async fn embed(&self, _request: &EmbeddingRequest) -> Result<EmbeddingResponse> {
        Err(BifrostError::EmptyResponse)
    }
}

/// Dedicated embedder returning a fixed vector.
struct FixedEmbedder;

#[async_trait]
impl Embedder for FixedEmbedder {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn embed(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse> {
        Ok(EmbeddingResponse {
            object: "list".into(),
            model: request.model.clone(),
            data: request
                .input
                .iter()
                .enumerate()
                .map(|(index, _)| EmbedDatum {
                    object: "embedding".into(),
                    embedding: vec![42.0],
                    index,
                })
                .collect(),
            usage: TokenUsage::prompt_only(1),
        })
    }
}

#[tokio::test]
async fn generator_only_primary_has_no_embedder() {
    let primary = Arc::new(GenerateOnly::default());
    let client = Client::new(primary.clone());

    assert!(client.has_generator());
    assert!(!client.has_embedder());
    assert!(!client.has_reranker());

    let err = client
        .embed(&EmbeddingRequest::new("m", ["text"]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BifrostError::CapabilityUnavailable(Capability::Embed)
    ));

    let err = client
        .rerank(&RerankRequest::new("m", "q", vec![Document::new("1", "d")]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BifrostError::CapabilityUnavailable(Capability::Rerank)
    ));

    assert_eq!(primary.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn multi_capability_primary_is_detected() {
    let client = Client::new(Arc::new(MockProvider::new()));
    assert!(client.has_generator());
    assert!(client.has_embedder());
    assert!(client.has_reranker());

    let caps = client.capabilities();
    assert!(caps.supports(Capability::Generate));
    assert!(caps.supports(Capability::Embed));
    assert!(caps.supports(Capability::Rerank));
}

#[test]
fn detection_uses_the_advertised_query_only() {
    let client = Client::new(Arc::new(SilentEmbedder));
    assert!(!client.has_embedder());
}

#[test]
fn detected_embedder_is_the_primary_itself() {
    let mock = Arc::new(MockProvider::new());
    let client = Client::new(mock.clone());
    let embedder = client.embedder().unwrap();
    let as_embedder: Arc<dyn Embedder> = mock;
    assert!(Arc::ptr_eq(embedder, &as_embedder));
}

#[tokio::test]
async fn explicit_embedder_overrides_detected_one() {
    let client = Client::builder(Arc::new(MockProvider::new()))
        .embedder(Arc::new(FixedEmbedder))
        .build();

    let resp = client
        .embed(&EmbeddingRequest::new("m", ["a", "b"]))
        .await
        .unwrap();
    assert_eq!(resp.data.len(), 2);
    assert_eq!(resp.data[0].embedding, vec![42.0]);
    assert_eq!(client.provider_names().embed, vec!["fixed"]);
}

#[test]
fn explicit_embedder_adds_capability_to_generator_only_primary() {
    let client = Client::builder(Arc::new(GenerateOnly::default()))
        .embedder(Arc::new(FixedEmbedder))
        .reranker(Arc::new(MockProvider::named("rerank")) as Arc<dyn Reranker>)
        .build();
    assert!(client.has_embedder());
    assert!(client.has_reranker());
}
