//! Evidence retrieval from vector, local, and web sources

pub mod aggregate;
pub mod local;
pub mod vector;
pub mod web;

pub use aggregate::{Aggregator, RetrievalOutcome, INSUFFICIENT_EVIDENCE_REPLY};
pub use local::LocalRetriever;
pub use vector::VectorRetriever;
pub use web::WebRetriever;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{EvidenceItem, Origin};

/// A single evidence source. Implementations fetch up to `k` items for a
/// query; a failure is returned as an error, never silently swallowed, so
/// the aggregator can decide how to degrade.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<EvidenceItem>>;

    /// Which origin this retriever's items carry
    fn origin(&self) -> Origin;

    /// Source name for logging
    fn name(&self) -> &str;
}
