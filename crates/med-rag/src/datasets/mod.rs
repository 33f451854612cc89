//! Dataset registry: ingestion, listing, and term-overlap search

pub mod extract;

use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cmp::Ordering;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::types::{DatasetFormat, DatasetMetadata, EvidenceItem, IngestedDocument, Origin};

const DATASETS_FILE: &str = "datasets.json";
const DOCUMENTS_FILE: &str = "documents.json";

/// Upper bound on results returned by a registry search
const SEARCH_TOP_K: usize = 10;

/// Durable store of ingested datasets and their extracted documents.
///
/// The registry is append-only: re-ingesting the same file adds a new
/// metadata entry rather than replacing the old one. Both backing files
/// are rewritten atomically (temp file then rename) so a crash never
/// leaves a partially written registry on disk.
pub struct DatasetRegistry {
    data_dir: PathBuf,
    text_column: String,
    datasets_path: PathBuf,
    documents_path: PathBuf,
    datasets: RwLock<Vec<DatasetMetadata>>,
    documents: RwLock<Vec<IngestedDocument>>,
    // Serializes ingestion so concurrent requests cannot interleave writes
    ingest_lock: Mutex<()>,
}

impl DatasetRegistry {
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let data_dir = config.data_dir.clone();
        std::fs::create_dir_all(&data_dir)?;

        let datasets_path = data_dir.join(DATASETS_FILE);
        let documents_path = data_dir.join(DOCUMENTS_FILE);

        let datasets: Vec<DatasetMetadata> = load_json_vec(&datasets_path);
        let documents: Vec<IngestedDocument> = load_json_vec(&documents_path);

        if !datasets.is_empty() {
            tracing::info!(
                "Loaded {} dataset entries and {} documents from {}",
                datasets.len(),
                documents.len(),
                data_dir.display()
            );
        }

        Ok(Self {
            data_dir,
            text_column: config.text_column.clone(),
            datasets_path,
            documents_path,
            datasets: RwLock::new(datasets),
            documents: RwLock::new(documents),
            ingest_lock: Mutex::new(()),
        })
    }

    /// Ingest a dataset file: resolve, extract, append, persist.
    pub fn ingest(
        &self,
        file_path: &str,
        format_hint: Option<DatasetFormat>,
    ) -> Result<DatasetMetadata> {
        let _guard = self.ingest_lock.lock();

        let resolved = self.resolve_path(file_path)?;
        let format = format_hint
            .or_else(|| DatasetFormat::from_path(&resolved))
            .ok_or_else(|| {
                let ext = resolved
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("none");
                Error::UnsupportedFormat(ext.to_string())
            })?;

        let extracted = extract::extract(&resolved, format, &self.text_column)?;
        let metadata = DatasetMetadata::new(&resolved, format, extracted.len());

        {
            self.datasets.write().push(metadata.clone());
            self.documents.write().extend(extracted);
        }

        self.persist()?;

        tracing::info!(
            "Ingested dataset '{}' ({} format, {} records) from {}",
            metadata.name,
            metadata.format,
            metadata.record_count,
            resolved.display()
        );

        Ok(metadata)
    }

    /// Every ingestion entry, oldest first
    pub fn list(&self) -> Vec<DatasetMetadata> {
        self.datasets.read().clone()
    }

    pub fn dataset_count(&self) -> usize {
        self.datasets.read().len()
    }

    pub fn document_count(&self) -> usize {
        self.documents.read().len()
    }

    /// Term-overlap search over extracted documents.
    ///
    /// Each document scores matching_terms / total_query_terms against the
    /// lowercased query; only documents with at least one match are
    /// returned, best first, capped at ten. `dataset_scope` restricts the
    /// search to datasets whose name contains the given substring.
    pub fn search(&self, query: &str, dataset_scope: Option<&str>) -> Vec<EvidenceItem> {
        let terms: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(|t| t.to_string())
            .collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let scope = dataset_scope.map(|s| s.to_lowercase());
        let documents = self.documents.read();

        let mut scored: Vec<(f32, &IngestedDocument)> = documents
            .iter()
            .filter(|doc| match &scope {
                Some(scope) => doc.dataset.to_lowercase().contains(scope),
                None => true,
            })
            .filter_map(|doc| {
                let content = doc.content.to_lowercase();
                let matching = terms.iter().filter(|t| content.contains(t.as_str())).count();
                if matching == 0 {
                    return None;
                }
                Some((matching as f32 / terms.len() as f32, doc))
            })
            .collect();

        // Stable sort keeps ingestion order among equal scores
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        scored
            .into_iter()
            .take(SEARCH_TOP_K)
            .map(|(score, doc)| {
                EvidenceItem::new(
                    &doc.source_path,
                    Origin::Local,
                    doc.content.clone(),
                    Some(score),
                    doc.dataset.clone(),
                )
            })
            .collect()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Resolve a user-supplied path: absolute as-is, otherwise relative to
    /// the data directory first, then the working directory.
    fn resolve_path(&self, raw: &str) -> Result<PathBuf> {
        let direct = PathBuf::from(raw);
        if direct.is_absolute() {
            if direct.is_file() {
                return Ok(direct);
            }
            return Err(Error::DatasetNotFound(raw.to_string()));
        }

        let in_data_dir = self.data_dir.join(raw);
        if in_data_dir.is_file() {
            return Ok(in_data_dir);
        }
        if direct.is_file() {
            return Ok(direct);
        }

        Err(Error::DatasetNotFound(raw.to_string()))
    }

    fn persist(&self) -> Result<()> {
        write_json_atomic(&self.datasets_path, &*self.datasets.read())?;
        write_json_atomic(&self.documents_path, &*self.documents.read())?;
        Ok(())
    }
}

fn load_json_vec<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    if !path.exists() {
        return Vec::new();
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", path.display(), e);
                Vec::new()
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Write serialized JSON to a sibling temp file, then rename into place.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let json = serde_json::to_string_pretty(value)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(json.as_bytes())?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_in(dir: &tempfile::TempDir) -> DatasetRegistry {
        let config = RegistryConfig {
            data_dir: dir.path().to_path_buf(),
            text_column: "text".to_string(),
        };
        DatasetRegistry::new(&config).unwrap()
    }

    fn write_dataset(dir: &tempfile::TempDir, name: &str, contents: &str) -> String {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        name.to_string()
    }

    const FLU_JSON: &str = r#"[
        {"question": "What causes the flu?", "answer": "Influenza viruses spread by droplets."},
        {"question": "What helps flu recovery?", "answer": "Rest and hydration."}
    ]"#;

    #[test]
    fn test_ingest_json_records_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_in(&dir);
        let name = write_dataset(&dir, "flu_facts.json", FLU_JSON);

        let metadata = registry.ingest(&name, None).unwrap();
        assert_eq!(metadata.name, "flu_facts");
        assert_eq!(metadata.format, DatasetFormat::Json);
        assert_eq!(metadata.record_count, 2);

        assert_eq!(registry.dataset_count(), 1);
        assert_eq!(registry.document_count(), 2);
    }

    #[test]
    fn test_reingest_appends_second_entry() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_in(&dir);
        let name = write_dataset(&dir, "flu_facts.json", FLU_JSON);

        let first = registry.ingest(&name, None).unwrap();
        let second = registry.ingest(&name, None).unwrap();

        assert_eq!(first.record_count, second.record_count);
        assert_eq!(registry.dataset_count(), 2);
        assert_eq!(registry.document_count(), 4);
    }

    #[test]
    fn test_ingest_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_in(&dir);

        let err = registry.ingest("nonexistent.json", None).unwrap_err();
        assert!(matches!(err, Error::DatasetNotFound(_)));
        assert_eq!(registry.dataset_count(), 0);
    }

    #[test]
    fn test_ingest_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_in(&dir);
        let name = write_dataset(&dir, "notes.txt", "plain text");

        let err = registry.ingest(&name, None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_format_hint_overrides_extension() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_in(&dir);
        let name = write_dataset(&dir, "payload.txt", r#"[{"text": "Hidden JSON."}]"#);

        let metadata = registry.ingest(&name, Some(DatasetFormat::Json)).unwrap();
        assert_eq!(metadata.format, DatasetFormat::Json);
        assert_eq!(metadata.record_count, 1);
    }

    #[test]
    fn test_registry_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let name = write_dataset(&dir, "flu_facts.json", FLU_JSON);

        {
            let registry = registry_in(&dir);
            registry.ingest(&name, None).unwrap();
        }

        let reopened = registry_in(&dir);
        assert_eq!(reopened.dataset_count(), 1);
        assert_eq!(reopened.document_count(), 2);
        assert_eq!(reopened.list()[0].name, "flu_facts");
    }

    #[test]
    fn test_search_scores_by_term_fraction() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_in(&dir);
        let name = write_dataset(
            &dir,
            "mixed.json",
            r#"[
                {"text": "Influenza viruses cause fever and fatigue."},
                {"text": "Fever can be treated with paracetamol."},
                {"text": "Broken bones need a cast."}
            ]"#,
        );
        registry.ingest(&name, None).unwrap();

        let results = registry.search("influenza fever", None);
        assert_eq!(results.len(), 2);
        // Both terms match the first document, one matches the second
        assert_eq!(results[0].relevance_score, Some(1.0));
        assert_eq!(results[1].relevance_score, Some(0.5));
        assert!(results[0].text.contains("Influenza"));
    }

    #[test]
    fn test_search_scope_filters_by_dataset_name() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_in(&dir);
        let flu = write_dataset(&dir, "flu_facts.json", r#"[{"text": "Flu causes fever."}]"#);
        let burns = write_dataset(&dir, "burn_care.json", r#"[{"text": "Cool burns with water, never ice. Fever may follow."}]"#);
        registry.ingest(&flu, None).unwrap();
        registry.ingest(&burns, None).unwrap();

        let all = registry.search("fever", None);
        assert_eq!(all.len(), 2);

        let scoped = registry.search("fever", Some("burn"));
        assert_eq!(scoped.len(), 1);
        assert!(scoped[0].text.contains("burns"));
    }

    #[test]
    fn test_search_empty_query() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_in(&dir);
        assert!(registry.search("   ", None).is_empty());
    }

    #[test]
    fn test_search_caps_results() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_in(&dir);

        let rows: Vec<String> = (0..15)
            .map(|i| format!(r#"{{"text": "Entry {} mentions fever."}}"#, i))
            .collect();
        let name = write_dataset(&dir, "many.json", &format!("[{}]", rows.join(",")));
        registry.ingest(&name, None).unwrap();

        let results = registry.search("fever", None);
        assert_eq!(results.len(), SEARCH_TOP_K);
    }

    #[test]
    fn test_atomic_write_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        write_json_atomic(&path, &vec!["a", "b"]).unwrap();
        write_json_atomic(&path, &vec!["c"]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, vec!["c"]);
    }
}
