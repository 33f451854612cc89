//! Response types with source attribution

use serde::{Deserialize, Serialize};

use crate::types::{DatasetMetadata, EvidenceItem, EvidenceSet, Origin, SourceBreakdown};

/// One attributed source in an answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    /// Filename, dataset name, or web domain
    pub label: String,
    /// Which retrieval source it came from
    pub origin: Origin,
    /// Relevance in 0..1 where the source reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f32>,
}

impl From<&EvidenceItem> for SourceRef {
    fn from(item: &EvidenceItem) -> Self {
        Self {
            label: item.display_label.clone(),
            origin: item.origin,
            relevance: item.relevance_score,
        }
    }
}

/// Answer to a question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// The answer text (with attribution footer when evidence was used)
    pub answer: String,
    /// Sources backing the answer, in evidence order
    pub sources: Vec<SourceRef>,
    /// Per-origin evidence counts
    pub source_breakdown: SourceBreakdown,
}

impl AskResponse {
    /// Response backed by an evidence set
    pub fn from_evidence(answer: impl Into<String>, evidence: &EvidenceSet) -> Self {
        Self {
            answer: answer.into(),
            sources: evidence.items.iter().map(SourceRef::from).collect(),
            source_breakdown: evidence.breakdown(),
        }
    }

    /// Fixed-text response with no evidence (small talk, refusals,
    /// command replies)
    pub fn canned(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: Vec::new(),
            source_breakdown: SourceBreakdown::default(),
        }
    }
}

/// Result of a dataset ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub success: bool,
    /// The registry entry that was appended
    pub dataset: DatasetMetadata,
    pub message: String,
}

impl IngestResponse {
    pub fn new(dataset: DatasetMetadata) -> Self {
        let message = format!(
            "Ingested dataset '{}' ({} format, {} records)",
            dataset.name, dataset.format, dataset.record_count
        );
        Self {
            success: true,
            dataset,
            message,
        }
    }
}

/// Registry listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetListResponse {
    pub datasets: Vec<DatasetMetadata>,
    pub count: usize,
}

impl DatasetListResponse {
    pub fn new(datasets: Vec<DatasetMetadata>) -> Self {
        let count = datasets.len();
        Self { datasets, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_response_has_no_sources() {
        let resp = AskResponse::canned("Hello! How can I help you with a medical question today?");
        assert!(resp.sources.is_empty());
        assert_eq!(resp.source_breakdown, SourceBreakdown::default());
        assert_eq!(resp.source_breakdown.total, 0);
    }

    #[test]
    fn test_from_evidence_builds_sources_and_breakdown() {
        let evidence = EvidenceSet::new(vec![
            EvidenceItem::new("a.pdf", Origin::Vector, "x", Some(0.92), "a.pdf"),
            EvidenceItem::new("https://cdc.gov/flu", Origin::Web, "y", None, "cdc.gov"),
        ]);

        let resp = AskResponse::from_evidence("Influenza is a viral infection.", &evidence);
        assert_eq!(resp.sources.len(), 2);
        assert_eq!(resp.sources[0].label, "a.pdf");
        assert_eq!(resp.sources[0].relevance, Some(0.92));
        assert!(resp.sources[1].relevance.is_none());
        assert_eq!(resp.source_breakdown.rag_count, 1);
        assert_eq!(resp.source_breakdown.web_count, 1);
        assert_eq!(resp.source_breakdown.total, 2);
    }

    #[test]
    fn test_relevance_omitted_from_json_when_absent() {
        let source = SourceRef {
            label: "who.int".to_string(),
            origin: Origin::Web,
            relevance: None,
        };
        let json = serde_json::to_string(&source).unwrap();
        assert!(!json.contains("relevance"));
        assert!(json.contains("\"origin\":\"web\""));
    }
}
