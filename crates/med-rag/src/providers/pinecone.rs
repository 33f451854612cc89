//! Pinecone-style vector index client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::config::VectorIndexConfig;
use crate::error::{Error, Result};
use crate::providers::{VectorIndexProvider, VectorMatch};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    vector: Vec<f32>,
    top_k: usize,
    namespace: String,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<IndexMatch>,
}

#[derive(Deserialize)]
struct IndexMatch {
    id: String,
    score: f32,
    #[serde(default)]
    metadata: Option<HashMap<String, serde_json::Value>>,
}

/// HTTP client for a Pinecone-style index host
pub struct PineconeClient {
    client: Client,
    config: VectorIndexConfig,
    api_key: Option<String>,
}

impl PineconeClient {
    pub fn new(config: &VectorIndexConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .expect("Failed to create HTTP client");

        let api_key = match std::env::var(&config.api_key_env) {
            Ok(key) if !key.is_empty() => Some(key),
            _ => {
                tracing::debug!(
                    "No API key in {}, index requests go out unauthenticated",
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
            Some(key) => request.header("Api-Key", key),
            None => request,
        }
    }
}

#[async_trait]
impl VectorIndexProvider for PineconeClient {
    async fn query(&self, vector: &[f32], top_k: usize, namespace: &str) -> Result<Vec<VectorMatch>> {
        let url = format!("{}/query", self.config.base_url);

        let request = QueryRequest {
            vector: vector.to_vec(),
            top_k,
            namespace: namespace.to_string(),
            include_metadata: true,
        };

        let response = self
            .authorized(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::vector_index(format!("Index query failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::vector_index(format!(
                "Index query failed: HTTP {}",
                response.status()
            )));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| Error::vector_index(format!("Failed to parse index response: {}", e)))?;

        let matches = parsed
            .matches
            .into_iter()
            .map(|m| {
                let metadata = m.metadata.unwrap_or_default();
                let text = metadata
                    .get("text")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                let source = metadata
                    .get("source")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string());

                VectorMatch {
                    id: m.id,
                    score: m.score,
                    text,
                    source,
                }
            })
            .collect();

        Ok(matches)
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/describe_index_stats", self.config.base_url);

        match self
            .authorized(self.client.post(&url))
            .json(&serde_json::json!({}))
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "pinecone"
    }
}
