//! Shared application state

use std::sync::Arc;
use std::time::Duration;

use crate::config::RagConfig;
use crate::datasets::DatasetRegistry;
use crate::error::Result;
use crate::generation::AnswerSynthesizer;
use crate::providers::{
    EmbeddingProvider, ExaClient, LlmProvider, OpenAiEmbedder, OpenAiLlm, PineconeClient,
    VectorIndexProvider, WebSearchProvider,
};
use crate::retrieval::{Aggregator, LocalRetriever, VectorRetriever, WebRetriever};
use crate::session::SessionManager;

/// Application state shared across requests
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    registry: Arc<DatasetRegistry>,
    sessions: SessionManager,
    llm: Arc<dyn LlmProvider>,
    aggregator: Aggregator,
    synthesizer: AnswerSynthesizer,
}

impl AppState {
    /// Build state with the real remote providers
    pub fn new(config: RagConfig) -> Result<Self> {
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(OpenAiEmbedder::new(&config.embedding));
        let index: Arc<dyn VectorIndexProvider> = Arc::new(PineconeClient::new(&config.vector_index));
        let web: Arc<dyn WebSearchProvider> = Arc::new(ExaClient::new(&config.web_search));
        let llm: Arc<dyn LlmProvider> = Arc::new(OpenAiLlm::new(&config.llm));

        Self::with_providers(config, embedder, index, web, llm)
    }

    /// Build state with explicit providers. Tests inject stubs here.
    pub fn with_providers(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        web: Arc<dyn WebSearchProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Result<Self> {
        let registry = Arc::new(DatasetRegistry::new(&config.registry)?);
        let sessions = SessionManager::new(&config.session);

        let vector_retriever = Arc::new(VectorRetriever::new(
            embedder,
            index,
            config.vector_index.namespace.clone(),
        ));
        let local_retriever = Arc::new(LocalRetriever::new(registry.clone()));
        let web_retriever = Arc::new(WebRetriever::new(web, config.web_search.clone()));

        // Registration order is merge priority: vector, then local, then web
        let aggregator = Aggregator::new(
            Duration::from_secs(config.retrieval.source_timeout_secs),
            config.retrieval.context_char_budget,
        )
        .with_source(vector_retriever, config.vector_index.top_k)
        .with_source(local_retriever, config.retrieval.local_top_k)
        .with_source(web_retriever, config.web_search.max_results);

        let synthesizer = AnswerSynthesizer::new(llm.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                registry,
                sessions,
                llm,
                aggregator,
                synthesizer,
            }),
        })
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &Arc<DatasetRegistry> {
        &self.inner.registry
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }

    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.inner.aggregator
    }

    pub fn synthesizer(&self) -> &AnswerSynthesizer {
        &self.inner.synthesizer
    }
}
