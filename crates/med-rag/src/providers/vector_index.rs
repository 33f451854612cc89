//! Vector index provider trait

use async_trait::async_trait;

use crate::error::Result;

/// One ranked match from the vector index
#[derive(Debug, Clone)]
pub struct VectorMatch {
    /// Index-assigned record id
    pub id: String,
    /// Index similarity score (higher is better)
    pub score: f32,
    /// Text stored with the vector
    pub text: String,
    /// Source path recorded at indexing time, when present
    pub source: Option<String>,
}

/// Trait for top-k similarity queries against a remote vector index
///
/// Implementations:
/// - `PineconeClient`: Pinecone-style HTTP query endpoint
#[async_trait]
pub trait VectorIndexProvider: Send + Sync {
    /// Query the index for the nearest neighbors of a vector
    async fn query(&self, vector: &[f32], top_k: usize, namespace: &str) -> Result<Vec<VectorMatch>>;

    /// Check if the index is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
