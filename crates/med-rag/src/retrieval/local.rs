//! Retrieval over locally ingested datasets

use async_trait::async_trait;
use std::sync::Arc;

use crate::datasets::DatasetRegistry;
use crate::error::Result;
use crate::retrieval::Retriever;
use crate::types::{EvidenceItem, Origin};

/// Searches the dataset registry in memory. No network is involved, so
/// this retriever cannot fail; an empty registry just yields no items.
pub struct LocalRetriever {
    registry: Arc<DatasetRegistry>,
}

impl LocalRetriever {
    pub fn new(registry: Arc<DatasetRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Retriever for LocalRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<EvidenceItem>> {
        let mut items = self.registry.search(query, None);
        items.truncate(k);
        Ok(items)
    }

    fn origin(&self) -> Origin {
        Origin::Local
    }

    fn name(&self) -> &str {
        "local-datasets"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;
    use std::io::Write;

    fn seeded_registry(dir: &tempfile::TempDir) -> Arc<DatasetRegistry> {
        let config = RegistryConfig {
            data_dir: dir.path().to_path_buf(),
            text_column: "text".to_string(),
        };
        let registry = DatasetRegistry::new(&config).unwrap();

        let path = dir.path().join("flu_facts.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(
            br#"[
                {"text": "Influenza spreads through respiratory droplets."},
                {"text": "Flu vaccines are updated every year."}
            ]"#,
        )
        .unwrap();
        registry.ingest("flu_facts.json", None).unwrap();

        Arc::new(registry)
    }

    #[tokio::test]
    async fn test_retrieve_matches_registry_search() {
        let dir = tempfile::tempdir().unwrap();
        let retriever = LocalRetriever::new(seeded_registry(&dir));

        let items = retriever.retrieve("influenza droplets", 10).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].origin, Origin::Local);
        assert_eq!(items[0].display_label, "flu_facts");
    }

    #[tokio::test]
    async fn test_k_truncates_results() {
        let dir = tempfile::tempdir().unwrap();
        let retriever = LocalRetriever::new(seeded_registry(&dir));

        let items = retriever.retrieve("flu", 1).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_registry_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = RegistryConfig {
            data_dir: dir.path().to_path_buf(),
            text_column: "text".to_string(),
        };
        let retriever = LocalRetriever::new(Arc::new(DatasetRegistry::new(&config).unwrap()));

        let items = retriever.retrieve("anything", 10).await.unwrap();
        assert!(items.is_empty());
    }
}
