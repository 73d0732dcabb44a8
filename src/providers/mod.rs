//! Capability contracts, retry policy and the built-in mock provider.

pub mod mock;
pub mod retry;
pub mod traits;

pub use mock::MockProvider;
pub use retry::RetryConfig;
pub use traits::{Embedder, GenerationStream, Generator, Reranker};
