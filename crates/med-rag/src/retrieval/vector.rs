//! Vector index retrieval backed by an embedding model

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::providers::{EmbeddingProvider, VectorIndexProvider};
use crate::retrieval::Retriever;
use crate::types::{EvidenceItem, Origin};

/// Retrieves from the remote vector index: embeds the query, then asks the
/// index for the nearest neighbors. Embedding or index failures surface as
/// errors rather than an empty result, so degraded answers are visible to
/// the aggregator.
pub struct VectorRetriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    namespace: String,
}

impl VectorRetriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            embedder,
            index,
            namespace: namespace.into(),
        }
    }
}

#[async_trait]
impl Retriever for VectorRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<EvidenceItem>> {
        let vector = self.embedder.embed(query).await?;
        let matches = self.index.query(&vector, k, &self.namespace).await?;

        let items = matches
            .into_iter()
            .filter(|m| !m.text.trim().is_empty())
            .map(|m| {
                let identity = m.source.clone().unwrap_or_else(|| m.id.clone());
                let label = display_label(&identity);
                EvidenceItem::new(&identity, Origin::Vector, m.text, Some(m.score), label)
            })
            .collect();

        Ok(items)
    }

    fn origin(&self) -> Origin {
        Origin::Vector
    }

    fn name(&self) -> &str {
        "vector-index"
    }
}

/// File name portion of a source path, or the path itself when it has none
fn display_label(identity: &str) -> String {
    Path::new(identity)
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
        .unwrap_or_else(|| identity.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::providers::VectorMatch;

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.1; 4])
        }

        fn dimensions(&self) -> usize {
            4
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct StubIndex {
        matches: Vec<VectorMatch>,
    }

    #[async_trait]
    impl VectorIndexProvider for StubIndex {
        async fn query(
            &self,
            _vector: &[f32],
            _top_k: usize,
            _namespace: &str,
        ) -> Result<Vec<VectorMatch>> {
            Ok(self.matches.clone())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct FailingIndex;

    #[async_trait]
    impl VectorIndexProvider for FailingIndex {
        async fn query(
            &self,
            _vector: &[f32],
            _top_k: usize,
            _namespace: &str,
        ) -> Result<Vec<VectorMatch>> {
            Err(Error::vector_index("connection refused"))
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(false)
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_matches_become_evidence() {
        let index = StubIndex {
            matches: vec![VectorMatch {
                id: "chunk-1".to_string(),
                score: 0.92,
                text: "The flu is caused by influenza viruses.".to_string(),
                source: Some("Data/medical_book.pdf".to_string()),
            }],
        };
        let retriever =
            VectorRetriever::new(Arc::new(FixedEmbedder), Arc::new(index), "default");

        let items = retriever.retrieve("what causes the flu", 3).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].origin, Origin::Vector);
        assert_eq!(items[0].source_identity, "data/medical_book.pdf");
        assert_eq!(items[0].display_label, "medical_book.pdf");
        assert_eq!(items[0].relevance_score, Some(0.92));
    }

    #[tokio::test]
    async fn test_index_failure_is_an_error() {
        let retriever =
            VectorRetriever::new(Arc::new(FixedEmbedder), Arc::new(FailingIndex), "default");

        let err = retriever.retrieve("what causes the flu", 3).await.unwrap_err();
        assert!(matches!(err, Error::VectorIndex(_)));
    }

    #[tokio::test]
    async fn test_empty_text_matches_are_dropped() {
        let index = StubIndex {
            matches: vec![VectorMatch {
                id: "chunk-2".to_string(),
                score: 0.5,
                text: "   ".to_string(),
                source: None,
            }],
        };
        let retriever =
            VectorRetriever::new(Arc::new(FixedEmbedder), Arc::new(index), "default");

        let items = retriever.retrieve("anything medical", 3).await.unwrap();
        assert!(items.is_empty());
    }
}
