//! Core types for the medical RAG service

pub mod dataset;
pub mod evidence;
pub mod query;
pub mod response;

pub use dataset::{DatasetFormat, DatasetMetadata, IngestedDocument};
pub use evidence::{normalize_identity, EvidenceItem, EvidenceSet, Origin, SourceBreakdown};
pub use query::{AskRequest, IngestRequest};
pub use response::{AskResponse, DatasetListResponse, IngestResponse, SourceRef};
