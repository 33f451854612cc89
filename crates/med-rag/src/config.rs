//! Configuration for the medical RAG service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Embedding service configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Vector index configuration
    #[serde(default)]
    pub vector_index: VectorIndexConfig,
    /// Web search configuration
    #[serde(default)]
    pub web_search: WebSearchConfig,
    /// Dataset registry configuration
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Session configuration
    #[serde(default)]
    pub session: SessionConfig,
    /// Retrieval/aggregation configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&raw)
            .map_err(|e| Error::config(format!("cannot parse {}: {}", path.display(), e)))
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

/// Embedding service configuration (OpenAI-compatible endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Service base URL
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions (must match the vector index)
    pub dimensions: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 384, // matches the index the original corpus was built with
            timeout_secs: 30,
        }
    }
}

/// LLM configuration (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Service base URL
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Generation model name
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum tokens per answer
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.4,
            max_tokens: 500,
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

/// Vector index configuration (Pinecone-style query API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndexConfig {
    /// Index host URL (the per-index query endpoint)
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Index name (informational, the host already identifies the index)
    pub index: String,
    /// Namespace to query
    pub namespace: String,
    /// Number of matches to request
    pub top_k: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for VectorIndexConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            api_key_env: "PINECONE_API_KEY".to_string(),
            index: "medicalbot".to_string(),
            namespace: "default".to_string(),
            top_k: 3,
            timeout_secs: 10,
        }
    }
}

/// Web search configuration (Exa-style search API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchConfig {
    /// Service base URL
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Number of results to request
    pub max_results: usize,
    /// Per-result content budget in characters
    pub content_max_chars: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Suffix appended to every outbound query to keep results on-topic
    pub query_suffix: String,
    /// Domains the search is steered towards
    pub include_domains: Vec<String>,
    /// Domains excluded from results
    pub exclude_domains: Vec<String>,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.exa.ai".to_string(),
            api_key_env: "EXA_API_KEY".to_string(),
            max_results: 3,
            content_max_chars: 500,
            timeout_secs: 10,
            query_suffix: "medical health information".to_string(),
            include_domains: vec![
                "mayoclinic.org".to_string(),
                "webmd.com".to_string(),
                "medlineplus.gov".to_string(),
                "healthline.com".to_string(),
                "nih.gov".to_string(),
                "cdc.gov".to_string(),
                "who.int".to_string(),
                "nhs.uk".to_string(),
                "ncbi.nlm.nih.gov".to_string(),
            ],
            exclude_domains: vec![
                "facebook.com".to_string(),
                "twitter.com".to_string(),
                "instagram.com".to_string(),
                "tiktok.com".to_string(),
                "youtube.com".to_string(),
            ],
        }
    }
}

/// Dataset registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Directory for dataset files and durable registry state
    pub data_dir: PathBuf,
    /// CSV column treated as the document text when present
    pub text_column: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            text_column: "text".to_string(),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Exchanges kept per session (oldest evicted first)
    pub window_size: usize,
    /// Idle seconds before a session expires
    pub ttl_secs: u64,
    /// Maximum concurrent sessions (oldest evicted past this)
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            window_size: 5,
            ttl_secs: 1800, // 30 minutes
            max_sessions: 1000,
        }
    }
}

/// Retrieval and aggregation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Results kept by the local dataset search
    pub local_top_k: usize,
    /// Per-source timeout in seconds (a timeout counts as that source failing)
    pub source_timeout_secs: u64,
    /// Combined evidence text budget in characters
    pub context_char_budget: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            local_top_k: 10,
            source_timeout_secs: 5,
            context_char_budget: 6000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RagConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.vector_index.namespace, "default");
        assert_eq!(config.session.window_size, 5);
        assert_eq!(config.retrieval.local_top_k, 10);
    }

    #[test]
    fn test_partial_toml() {
        let parsed: RagConfig = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9090
            enable_cors = false

            [llm]
            base_url = "http://localhost:11434"
            api_key_env = "LLM_API_KEY"
            model = "llama3.2:3b"
            temperature = 0.2
            max_tokens = 256
            timeout_secs = 120
            max_retries = 1
            "#,
        )
        .unwrap();

        assert_eq!(parsed.server.port, 9090);
        assert_eq!(parsed.llm.model, "llama3.2:3b");
        // Unlisted sections fall back to defaults
        assert_eq!(parsed.vector_index.index, "medicalbot");
        assert_eq!(parsed.web_search.content_max_chars, 500);
    }
}
