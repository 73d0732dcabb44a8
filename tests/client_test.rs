//! End-to-end behaviour of the dispatch client against the mock provider.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;

use bifrost::{
    BifrostError, Capability, Client, Document, EmbeddingRequest, GenerationRequest, Generator,
    Message, MockProvider, RerankRequest,
};

fn hello_request() -> GenerationRequest {
    GenerationRequest::new("test-model", vec![Message::user("Hello, world!")])
        .max_tokens(100)
        .temperature(0.7)
}

#[tokio::test]
async fn generate_returns_content_and_usage() {
    let client = Client::new(Arc::new(MockProvider::new()));
    assert!(client.has_generator());

    let resp = client.generate(&hello_request()).await.unwrap();

    assert!(!resp.choices.is_empty());
    assert!(!resp.choices[0].message.content.is_empty());
    assert!(resp.usage.total_tokens > 0);
}

#[tokio::test]
async fn generate_stream_yields_fragments() {
    let client = Client::new(Arc::new(MockProvider::new()));

    let stream = client
        .generate_stream(&hello_request().stream(true))
        .await
        .unwrap();
    let responses: Vec<_> = stream.collect().await;

    assert!(!responses.is_empty());
    for resp in responses {
        let resp = resp.unwrap();
        assert!(!resp.choices.is_empty());
        assert!(!resp.choices[0].message.content.is_empty());
    }
}

#[tokio::test]
async fn embed_returns_vectors() {
    let client = Client::new(Arc::new(MockProvider::new()));
    assert!(client.has_embedder());

    let req = EmbeddingRequest::new("test-model", ["Hello, world!"]).dimensions(1536);
    let resp = client.embed(&req).await.unwrap();

    assert_eq!(resp.data.len(), 1);
    assert_eq!(resp.data[0].embedding.len(), 1536);
    assert!(resp.usage.total_tokens > 0);
}

#[tokio::test]
async fn rerank_returns_sorted_positive_scores() {
    let client = Client::new(Arc::new(MockProvider::new()));
    assert!(client.has_reranker());

    let req = RerankRequest::new(
        "test-model",
        "What is the capital of France?",
        vec![
            Document::new("1", "Paris is the capital of France."),
            Document::new("2", "London is the capital of England."),
        ],
    )
    .top_n(2)
    .return_documents(true);

    let resp = client.rerank(&req).await.unwrap();

    assert_eq!(resp.results.len(), 2);
    assert!(resp.results.iter().all(|r| r.relevance_score > 0.0));
    assert!(resp.results[0].relevance_score >= resp.results[1].relevance_score);
    assert_eq!(resp.results[0].document.id, "1");
    assert!(resp.usage.total_tokens > 0);
}

#[tokio::test]
async fn rerank_top_n_limits_results() {
    let client = Client::new(Arc::new(MockProvider::new()));
    let req = RerankRequest::new(
        "m",
        "rust",
        vec![
            Document::new("a", "rust is a language"),
            Document::new("b", "go is a language"),
            Document::new("c", "rust never sleeps"),
        ],
    )
    .top_n(1);

    let resp = client.rerank(&req).await.unwrap();
    assert_eq!(resp.results.len(), 1);
}

#[tokio::test]
async fn empty_conversation_is_rejected_before_dispatch() {
    let client = Client::new(Arc::new(MockProvider::new()));
    let err = client
        .generate(&GenerationRequest::new("m", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, BifrostError::InvalidInput(_)));
}

// ============================================================================
// Configuration accessors
// ============================================================================

#[test]
fn retry_count_round_trips_and_defaults_to_three() {
    let client = Client::builder(Arc::new(MockProvider::new()))
        .retry_count(3)
        .build();
    assert_eq!(client.retry_count(), 3);

    let client = Client::new(Arc::new(MockProvider::new()));
    assert_eq!(client.retry_count(), 3);

    let client = Client::builder(Arc::new(MockProvider::new()))
        .retry_count(7)
        .build();
    assert_eq!(client.retry_count(), 7);
}

#[test]
fn timeout_round_trips_and_defaults_to_thirty_seconds() {
    let client = Client::builder(Arc::new(MockProvider::new()))
        .timeout(Duration::from_secs(10))
        .build();
    assert_eq!(client.timeout(), Duration::from_secs(10));

    let client = Client::new(Arc::new(MockProvider::new()));
    assert_eq!(client.timeout(), Duration::from_secs(30));
}

#[test]
fn debug_flag_round_trips() {
    let client = Client::builder(Arc::new(MockProvider::new()))
        .debug(true)
        .build();
    assert!(client.debug());
    assert!(!Client::new(Arc::new(MockProvider::new())).debug());
}

#[test]
fn fallback_generators_preserve_identity() {
    let primary = Arc::new(MockProvider::named("primary"));
    let backup: Arc<dyn Generator> = Arc::new(MockProvider::named("backup"));

    let client = Client::builder(primary)
        .fallback_generators(vec![backup.clone()])
        .build();

    assert_eq!(client.fallback_generators().len(), 1);
    assert!(Arc::ptr_eq(&client.fallback_generators()[0], &backup));
    assert!(client.fallback_embedders().is_empty());
    assert!(client.fallback_rerankers().is_empty());
}

#[test]
fn provider_names_list_primary_then_fallbacks() {
    let client = Client::builder(Arc::new(MockProvider::named("one")))
        .fallback_generator(Arc::new(MockProvider::named("two")))
        .fallback_generator(Arc::new(MockProvider::named("three")))
        .fallback_embedder(Arc::new(MockProvider::named("embed-backup")))
        .build();

    let names = client.provider_names();
    assert_eq!(names.generate, vec!["one", "two", "three"]);
    assert_eq!(names.embed, vec!["one", "embed-backup"]);
    assert_eq!(names.rerank, vec!["one"]);
}

#[test]
fn capability_unavailable_error_names_the_role() {
    let err = BifrostError::CapabilityUnavailable(Capability::Embed);
    assert_eq!(err.to_string(), "embedder capability not available");
}
