//! Dataset management endpoints

use axum::{extract::State, Json};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{DatasetListResponse, IngestRequest, IngestResponse};

/// GET /api/datasets - List every ingestion entry
pub async fn list_datasets(State(state): State<AppState>) -> Json<DatasetListResponse> {
    Json(DatasetListResponse::new(state.registry().list()))
}

/// POST /api/datasets/ingest - Ingest a dataset file
pub async fn ingest_dataset(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>> {
    tracing::info!("Ingest request for '{}'", request.file_path);

    let registry = state.registry().clone();
    let metadata =
        tokio::task::spawn_blocking(move || registry.ingest(&request.file_path, request.format))
            .await
            .map_err(|e| Error::internal(format!("Ingestion task failed: {}", e)))??;

    Ok(Json(IngestResponse::new(metadata)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RagConfig;
    use crate::providers::{
        EmbeddingProvider, LlmProvider, VectorIndexProvider, VectorMatch, WebSearchHit,
        WebSearchProvider,
    };
    use crate::types::DatasetFormat;
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::Arc;

    struct NoopEmbedder;

    #[async_trait]
    impl EmbeddingProvider for NoopEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![])
        }

        fn dimensions(&self) -> usize {
            0
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "noop"
        }
    }

    struct NoopIndex;

    #[async_trait]
    impl VectorIndexProvider for NoopIndex {
        async fn query(
            &self,
            _vector: &[f32],
            _top_k: usize,
            _namespace: &str,
        ) -> Result<Vec<VectorMatch>> {
            Ok(vec![])
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "noop"
        }
    }

    struct NoopWeb;

    #[async_trait]
    impl WebSearchProvider for NoopWeb {
        async fn search_with_content(
            &self,
            _query: &str,
            _num_results: usize,
        ) -> Result<Vec<WebSearchHit>> {
            Ok(vec![])
        }

        fn name(&self) -> &str {
            "noop"
        }
    }

    struct NoopLlm;

    #[async_trait]
    impl LlmProvider for NoopLlm {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok(String::new())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "noop"
        }

        fn model(&self) -> &str {
            "noop"
        }
    }

    fn test_state(dir: &tempfile::TempDir) -> AppState {
        let mut config = RagConfig::default();
        config.registry.data_dir = dir.path().to_path_buf();

        AppState::with_providers(
            config,
            Arc::new(NoopEmbedder),
            Arc::new(NoopIndex),
            Arc::new(NoopWeb),
            Arc::new(NoopLlm),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_ingest_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let path = dir.path().join("flu_facts.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(br#"[{"text": "Flu is seasonal."}]"#).unwrap();

        let Json(ingested) = ingest_dataset(
            State(state.clone()),
            Json(IngestRequest {
                file_path: "flu_facts.json".to_string(),
                format: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(ingested.dataset.name, "flu_facts");
        assert_eq!(ingested.dataset.format, DatasetFormat::Json);
        assert!(ingested.message.contains("1 records"));

        let Json(listing) = list_datasets(State(state)).await;
        assert_eq!(listing.count, 1);
        assert_eq!(listing.datasets[0].name, "flu_facts");
    }

    #[tokio::test]
    async fn test_ingest_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let result = ingest_dataset(
            State(state),
            Json(IngestRequest {
                file_path: "missing.json".to_string(),
                format: None,
            }),
        )
        .await;

        assert!(matches!(result, Err(Error::DatasetNotFound(_))));
    }
}
