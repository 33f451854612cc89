//! Embedding provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for turning query text into a fixed-length vector
///
/// Implementations:
/// - `OpenAiEmbedder`: OpenAI-compatible /v1/embeddings endpoint
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate the embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embedding dimensions (must match the vector index)
    fn dimensions(&self) -> usize;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
