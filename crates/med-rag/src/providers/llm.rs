//! LLM provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for stateless text completion
///
/// Implementations:
/// - `OpenAiLlm`: OpenAI-compatible /v1/chat/completions endpoint
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a fully built prompt into answer text
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
