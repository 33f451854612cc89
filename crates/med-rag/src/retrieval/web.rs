//! Web retrieval through the search provider

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::WebSearchConfig;
use crate::domain;
use crate::error::{Error, Result};
use crate::providers::WebSearchProvider;
use crate::retrieval::Retriever;
use crate::types::{EvidenceItem, Origin};

/// Retrieves medical evidence from the open web.
///
/// The medical-keyword guard runs again here, before any network call:
/// a query with no medical vocabulary is rejected as out-of-domain rather
/// than searched, so the web source never spends a request on it.
pub struct WebRetriever {
    client: Arc<dyn WebSearchProvider>,
    config: WebSearchConfig,
}

impl WebRetriever {
    pub fn new(client: Arc<dyn WebSearchProvider>, config: WebSearchConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Retriever for WebRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<EvidenceItem>> {
        if !domain::contains_medical_keyword(query) {
            return Err(Error::OutOfDomain);
        }

        let search_query = format!("{} {}", query, self.config.query_suffix);
        let hits = self.client.search_with_content(&search_query, k).await?;

        let items = hits
            .into_iter()
            .filter(|hit| !hit.content.trim().is_empty())
            .map(|hit| {
                let text = truncate_chars(&hit.content, self.config.content_max_chars);
                let label = extract_domain(&hit.url);
                // Rank order stands in for relevance; the provider gives no score
                EvidenceItem::new(&hit.url, Origin::Web, text, None, label)
            })
            .collect();

        Ok(items)
    }

    fn origin(&self) -> Origin {
        Origin::Web
    }

    fn name(&self) -> &str {
        "web-search"
    }
}

/// First `max_chars` characters, never splitting a multi-byte sequence
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}

/// Host portion of a URL with any leading "www." removed
fn extract_domain(url: &str) -> String {
    let after_scheme = url.split("//").nth(1).unwrap_or(url);
    let host = after_scheme.split('/').next().unwrap_or(after_scheme);
    host.strip_prefix("www.").unwrap_or(host).to_string()
}
