//! Public types for the Bifrost API.

mod capabilities;
mod embed;
mod generate;
mod message;
mod rerank;
mod usage;

pub use capabilities::{Capabilities, Capability};
pub use embed::{EmbedDatum, EmbeddingRequest, EmbeddingResponse};
pub use generate::{Choice, GenerationRequest, GenerationResponse};
pub use message::{Message, Role};
pub use rerank::{Document, RerankRequest, RerankResponse, RerankResult};
pub use usage::TokenUsage;
