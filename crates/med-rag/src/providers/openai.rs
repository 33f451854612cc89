//! OpenAI-compatible clients for embeddings and chat completion

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, LlmProvider};

#[derive(Serialize)]
struct EmbeddingsRequest {
    model: String,
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

fn read_api_key(env_var: &str) -> Option<String> {
    match std::env::var(env_var) {
        Ok(key) if !key.is_empty() => Some(key),
        _ => {
            tracing::debug!("No API key in {}, requests go out unauthenticated", env_var);
            None
        }
    }
}

/// Embedding client for an OpenAI-compatible /v1/embeddings endpoint
pub struct OpenAiEmbedder {
    client: Client,
    config: EmbeddingConfig,
    api_key: Option<String>,
}

impl OpenAiEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key: read_api_key(&config.api_key_env),
            config: config.clone(),
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/v1/embeddings", self.config.base_url);

        let request = EmbeddingsRequest {
            model: self.config.model.clone(),
            input: text.to_string(),
            dimensions: Some(self.config.dimensions),
        };

        let response = self
            .authorized(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::embedding(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::embedding(format!(
                "Embedding failed: HTTP {}",
                response.status()
            )));
        }

        let parsed: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("Failed to parse embedding response: {}", e)))?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| Error::embedding("Embedding response contained no vectors"))
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/v1/models", self.config.base_url);

        match self.authorized(self.client.get(&url)).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "openai-embeddings"
    }
}

/// Chat completion client for an OpenAI-compatible endpoint, with retry
pub struct OpenAiLlm {
    client: Client,
    config: LlmConfig,
    api_key: Option<String>,
    max_retries: u32,
}

impl OpenAiLlm {
    pub fn new(config: &LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key: read_api_key(&config.api_key_env),
            max_retries: config.max_retries,
            config: config.clone(),
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            "LLM request failed (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            self.max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::synthesis("Unknown error")))
    }
}

#[async_trait]
impl LlmProvider for OpenAiLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let prompt = prompt.to_string();

        tracing::info!("Generating answer with model: {}", self.config.model);

        self.retry_request(|| {
            let url = url.clone();
            let prompt = prompt.clone();

            async move {
                let request = ChatRequest {
                    model: self.config.model.clone(),
                    messages: vec![ChatMessage {
                        role: "user",
                        content: prompt,
                    }],
                    temperature: self.config.temperature,
                    max_tokens: self.config.max_tokens,
                };

                let response = self
                    .authorized(self.client.post(&url))
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| Error::synthesis(format!("Completion request failed: {}", e)))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::synthesis(format!(
                        "Completion failed: HTTP {} - {}",
                        status, body
                    )));
                }

                let parsed: ChatResponse = response.json().await.map_err(|e| {
                    Error::synthesis(format!("Failed to parse completion response: {}", e))
                })?;

                parsed
                    .choices
                    .into_iter()
                    .next()
                    .map(|c| c.message.content)
                    .ok_or_else(|| Error::synthesis("Completion response contained no choices"))
            }
        })
        .await
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/v1/models", self.config.base_url);

        match self.authorized(self.client.get(&url)).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "openai-chat"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
