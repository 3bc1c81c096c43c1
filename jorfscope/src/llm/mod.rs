use anyhow::Result;

/// Core trait for LLM providers (remote today, a local adapter stays possible)
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate one completion for a system + user prompt pair
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse>;
}

/// Request structure for LLM generation
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// Fixed system role instruction; empty means "no system message"
    pub system: String,
    pub prompt: String,
    pub max_tokens: Option<usize>,
    pub temperature: Option<f32>,
    pub timeout_seconds: Option<u64>,
}

/// Response from LLM generation
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub usage: UsageMetadata,
    pub model: String,
}

/// Token usage metadata
#[derive(Debug, Clone, Default)]
pub struct UsageMetadata {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

pub mod remote;
