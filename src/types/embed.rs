//! Types for text embeddings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::TokenUsage;
use crate::{BifrostError, Result};

/// An embedding request over one or more inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    pub model: String,
    /// Texts to embed. Must not be empty.
    pub input: Vec<String>,
    /// Requested vector size (`None` = provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub provider_params: HashMap<String, serde_json::Value>,
}

impl EmbeddingRequest {
    pub fn new<I, S>(model: impl Into<String>, input: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            model: model.into(),
            input: input.into_iter().map(Into::into).collect(),
            dimensions: None,
            user: None,
            provider_params: HashMap::new(),
        }
    }

    /// Set the requested dimensions.
    pub fn dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
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

    /// Shallow preflight check: there must be something to embed.
    pub fn validate(&self) -> Result<()> {
        if self.input.is_empty() {
            return Err(BifrostError::InvalidInput(
                "embedding request has no input".to_string(),
            ));
        }
        Ok(())
    }
}

/// A single embedding vector. `index` is the position of its input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedDatum {
    pub object: String,
    pub embedding: Vec<f64>,
    pub index: usize,
}

/// Response from an embedding request; `data` mirrors `input` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    pub object: String,
    pub model: String,
    pub data: Vec<EmbedDatum>,
    #[serde(default)]
    pub usage: TokenUsage,
}
