//! Token usage accounting

use serde::{Deserialize, Serialize};

/// Token usage statistics.
///
/// `completion_tokens` is only tracked for generation; embedding and rerank
/// responses leave it at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Usage with `total_tokens = prompt_tokens + completion_tokens`.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }

    /// Usage for prompt-only operations (embedding, rerank).
    pub fn prompt_only(prompt_tokens: u32) -> Self {
        Self::new(prompt_tokens, 0)
    }
}
