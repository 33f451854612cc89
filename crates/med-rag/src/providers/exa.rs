//! Exa-style web search client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::WebSearchConfig;
use crate::error::{Error, Result};
use crate::providers::{WebSearchHit, WebSearchProvider};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest {
    query: String,
    num_results: usize,
    contents: ContentsSpec,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    include_domains: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    exclude_domains: Vec<String>,
}

#[derive(Serialize)]
struct ContentsSpec {
    text: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: Option<String>,
    url: String,
    #[serde(default)]
    text: Option<String>,
}

/// HTTP client for an Exa-style search-with-content API
pub struct ExaClient {
    client: Client,
    config: WebSearchConfig,
    api_key: Option<String>,
}

impl ExaClient {
    pub fn new(config: &WebSearchConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .expect("Failed to create HTTP client");

        let api_key = match std::env::var(&config.api_key_env) {
            Ok(key) if !key.is_empty() => Some(key),
            _ => {
                tracing::debug!(
                    "No API key in {}, search requests go out unauthenticated",
                    config.api_key_env
                );
                None
            }
        };

        Self {
            client,
            api_key,
            config: config.clone(),
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("x-api-key", key),
            None => request,
        }
    }
}

#[async_trait]
impl WebSearchProvider for ExaClient {
    async fn search_with_content(&self, query: &str, num_results: usize) -> Result<Vec<WebSearchHit>> {
        let url = format!("{}/search", self.config.base_url);

        let request = SearchRequest {
            query: query.to_string(),
            num_results,
            contents: ContentsSpec { text: true },
            include_domains: self.config.include_domains.clone(),
            exclude_domains: self.config.exclude_domains.clone(),
        };

        let response = self
            .authorized(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::web_search(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::web_search(format!(
                "Search failed: HTTP {}",
                response.status()
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::web_search(format!("Failed to parse search response: {}", e)))?;

        let hits = parsed
            .results
            .into_iter()
            .map(|r| WebSearchHit {
                title: r.title.unwrap_or_default(),
                content: r.text.unwrap_or_default(),
                url: r.url,
            })
            .collect();

        Ok(hits)
    }

    fn name(&self) -> &str {
        "exa"
    }
}
