//! Types for document reranking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::TokenUsage;
use crate::{BifrostError, Result};

/// A document to be ranked against a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A rerank request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankRequest {
    pub model: String,
    pub query: String,
    pub documents: Vec<Document>,
    /// Number of results to keep (`None` = all).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_n: Option<usize>,
    #[serde(default)]
    pub return_documents: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub provider_params: HashMap<String, serde_json::Value>,
}

impl RerankRequest {
    pub fn new(model: impl Into<String>, query: impl Into<String>, documents: Vec<Document>) -> Self {
        Self {
            model: model.into(),
            query: query.into(),
            documents,
            top_n: None,
            return_documents: false,
            user: None,
            provider_params: HashMap::new(),
        }
    }

    /// Keep only the `n` best results.
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    /// Ask the provider to echo documents back in results.
    pub fn return_documents(mut self, enabled: bool) -> Self {
        self.return_documents = enabled;
        self
    }

    /// Set the end-user identifier.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Add a provider-specific parameter.
    pub fn provider_param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.provider_params.insert(key.into(), value);
        self
    }

    /// Shallow preflight check: there must be documents to rank.
    pub fn validate(&self) -> Result<()> {
        if self.documents.is_empty() {
            return Err(BifrostError::InvalidInput(
                "rerank request has no documents".to_string(),
            ));
        }
        Ok(())
    }
}

/// One ranked document. `index` is its position in the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankResult {
    pub document: Document,
    pub index: usize,
    pub relevance_score: f64,
}

/// Response from a rerank request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankResponse {
    pub object: String,
    pub model: String,
    /// Sorted by `relevance_score`, best first.
    pub results: Vec<RerankResult>,
    #[serde(default)]
    pub usage: TokenUsage,
}

impl RerankResponse {
    /// Sort results best-first and truncate to `top_n`.
    ///
    /// Provider adapters use this to uphold the ordering invariant when the
    /// upstream API returns results in input order.
    pub fn rank(mut results: Vec<RerankResult>, top_n: Option<usize>) -> Vec<RerankResult> {
        results.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        if let Some(n) = top_n {
            results.truncate(n);
        }
        results
    }
}
