//! Dataset registry records

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

/// Supported dataset file formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    Json,
    Csv,
    Pdf,
}

impl DatasetFormat {
    /// Detect format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Detect format from a file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for DatasetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in the append-only dataset registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// Dataset name (file stem)
    pub name: String,
    /// Resolved path the dataset was ingested from
    pub source_path: String,
    /// File format
    pub format: DatasetFormat,
    /// Number of documents extracted
    pub record_count: usize,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

impl DatasetMetadata {
    pub fn new(source_path: &Path, format: DatasetFormat, record_count: usize) -> Self {
        let name = source_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("dataset")
            .to_string();

        Self {
            name,
            source_path: source_path.to_string_lossy().to_string(),
            format,
            record_count,
            ingested_at: chrono::Utc::now(),
        }
    }
}

/// A searchable document extracted from a dataset file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestedDocument {
    /// Unique document ID
    pub id: Uuid,
    /// Dataset the document came from
    pub dataset: String,
    /// Path of the file the document was extracted from
    pub source_path: String,
    /// Extracted text
    pub content: String,
    /// Extractor-specific metadata (row numbers, field names)
    #[serde(default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl IngestedDocument {
    pub fn new(dataset: impl Into<String>, source_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            dataset: dataset.into(),
            source_path: source_path.into(),
            content: content.into(),
            extra: HashMap::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
