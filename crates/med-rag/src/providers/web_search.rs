//! Web search provider trait

use async_trait::async_trait;

use crate::error::Result;

/// One ranked web search result with extracted page text
#[derive(Debug, Clone)]
pub struct WebSearchHit {
    pub title: String,
    pub url: String,
    pub content: String,
}

/// Trait for search-with-content web lookups
///
/// Implementations:
/// - `ExaClient`: Exa-style search API
#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    /// Run a search returning ranked results with page text
    async fn search_with_content(&self, query: &str, num_results: usize) -> Result<Vec<WebSearchHit>>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
