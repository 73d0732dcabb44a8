//! Capability identifiers and capability reporting

use std::fmt;

use serde::{Deserialize, Serialize};

/// An independently bindable function group a provider may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Generate,
    Embed,
    Rerank,
}

impl Capability {
    /// Name of the role that serves this capability ("generator", ...).
    pub fn role(&self) -> &'static str {
        match self {
            Capability::Generate => "generator",
            Capability::Embed => "embedder",
            Capability::Rerank => "reranker",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role())
    }
}

/// What capabilities a client has bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Text generation (always bound on a built client).
    pub generate: bool,
    /// Text embeddings.
    pub embed: bool,
    /// Document reranking.
    pub rerank: bool,
}

impl Capabilities {
    /// Whether the given capability is present.
    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Generate => self.generate,
            Capability::Embed => self.embed,
            Capability::Rerank => self.rerank,
        }
    }
}
