//! Concurrent fan-out over evidence sources with merge and dedup

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Error;
use crate::retrieval::Retriever;
use crate::types::{EvidenceItem, EvidenceSet};

/// Reply used when every source came back empty for an in-domain query
pub const INSUFFICIENT_EVIDENCE_REPLY: &str =
    "I could not find information about that in my medical sources. \
     Please try rephrasing or ask about another medical topic.";

/// What aggregation produced for a query
#[derive(Debug)]
pub enum RetrievalOutcome {
    /// Usable evidence, merged and deduplicated
    Evidence(EvidenceSet),
    /// The web guard rejected the query and no other source had anything
    OutOfDomain,
    /// In-domain query, but no source returned evidence
    InsufficientEvidence,
}

enum SourceReport {
    Items(Vec<EvidenceItem>),
    DomainRejected,
    Failed,
}

struct RetrieverSource {
    retriever: Arc<dyn Retriever>,
    top_k: usize,
}

/// Runs every registered retriever concurrently, each under its own
/// timeout, and merges the survivors in registration order. A failed or
/// timed-out source degrades the answer instead of aborting it.
pub struct Aggregator {
    sources: Vec<RetrieverSource>,
    source_timeout: Duration,
    context_char_budget: usize,
}

impl Aggregator {
    pub fn new(source_timeout: Duration, context_char_budget: usize) -> Self {
        Self {
            sources: Vec::new(),
            source_timeout,
            context_char_budget,
        }
    }

    /// Register a source. Registration order is merge priority: items from
    /// earlier sources win identity collisions against later ones.
    pub fn with_source(mut self, retriever: Arc<dyn Retriever>, top_k: usize) -> Self {
        self.sources.push(RetrieverSource { retriever, top_k });
        self
    }

    pub async fn aggregate(&self, query: &str) -> RetrievalOutcome {
        let reports = futures::future::join_all(self.sources.iter().map(|source| {
            let retriever = Arc::clone(&source.retriever);
            let top_k = source.top_k;
            let timeout = self.source_timeout;
            let query = query.to_string();

            async move {
                match tokio::time::timeout(timeout, retriever.retrieve(&query, top_k)).await {
                    Ok(Ok(items)) => {
                        tracing::debug!("{} returned {} items", retriever.name(), items.len());
                        SourceReport::Items(items)
                    }
                    Ok(Err(Error::OutOfDomain)) => {
                        tracing::debug!("{} rejected query as out-of-domain", retriever.name());
                        SourceReport::DomainRejected
                    }
                    Ok(Err(e)) => {
                        tracing::warn!("{} failed, continuing without it: {}", retriever.name(), e);
                        SourceReport::Failed
                    }
                    Err(_) => {
                        tracing::warn!(
                            "{} timed out after {:?}, continuing without it",
                            retriever.name(),
                            timeout
                        );
                        SourceReport::Failed
                    }
                }
            }
        }))
        .await;

        let mut merged: Vec<EvidenceItem> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut domain_rejected = false;

        for report in reports {
            match report {
                SourceReport::Items(items) => {
                    for item in items {
                        if seen.insert(item.source_identity.clone()) {
                            merged.push(item);
                        }
                    }
                }
                SourceReport::DomainRejected => domain_rejected = true,
                SourceReport::Failed => {}
            }
        }

        if merged.is_empty() {
            if domain_rejected {
                return RetrievalOutcome::OutOfDomain;
            }
            return RetrievalOutcome::InsufficientEvidence;
        }

        let items = self.apply_char_budget(merged);
        RetrievalOutcome::Evidence(EvidenceSet { items })
    }

    /// Trim the merged list to the context budget by dropping items from
    /// the end. The first item is always kept, even if it alone exceeds
    /// the budget, so a valid answer is never starved of all context.
    fn apply_char_budget(&self, items: Vec<EvidenceItem>) -> Vec<EvidenceItem> {
        let mut kept = Vec::with_capacity(items.len());
        let mut total = 0usize;

        for item in items {
            let chars = item.text.chars().count();
            if !kept.is_empty() && total + chars > self.context_char_budget {
                break;
            }
            total += chars;
            kept.push(item);
        }

        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::types::Origin;
    use async_trait::async_trait;

    struct StubRetriever {
        origin: Origin,
        items: Vec<EvidenceItem>,
    }

    impl StubRetriever {
        fn with_items(origin: Origin, items: Vec<EvidenceItem>) -> Arc<Self> {
            Arc::new(Self { origin, items })
        }
    }

    #[async_trait]
    impl Retriever for StubRetriever {
        async fn retrieve(&self, _query: &str, _k: usize) -> Result<Vec<EvidenceItem>> {
            Ok(self.items.clone())
        }

        fn origin(&self) -> Origin {
            self.origin
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct FailingRetriever;

    #[async_trait]
    impl Retriever for FailingRetriever {
        async fn retrieve(&self, _query: &str, _k: usize) -> Result<Vec<EvidenceItem>> {
            Err(Error::web_search("upstream 500"))
        }

        fn origin(&self) -> Origin {
            Origin::Web
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct RejectingRetriever;

    #[async_trait]
    impl Retriever for RejectingRetriever {
        async fn retrieve(&self, _query: &str, _k: usize) -> Result<Vec<EvidenceItem>> {
            Err(Error::OutOfDomain)
        }

        fn origin(&self) -> Origin {
            Origin::Web
        }

        fn name(&self) -> &str {
            "rejecting"
        }
    }

    struct SlowRetriever;

    #[async_trait]
    impl Retriever for SlowRetriever {
        async fn retrieve(&self, _query: &str, _k: usize) -> Result<Vec<EvidenceItem>> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(vec![item(Origin::Web, "slow", "late evidence")])
        }

        fn origin(&self) -> Origin {
            Origin::Web
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    fn item(origin: Origin, identity: &str, text: &str) -> EvidenceItem {
        EvidenceItem::new(identity, origin, text.to_string(), Some(0.5), identity.to_string())
    }

    fn aggregator() -> Aggregator {
        Aggregator::new(Duration::from_secs(5), 6000)
    }

    #[tokio::test]
    async fn test_merge_preserves_registration_order() {
        let agg = aggregator()
            .with_source(
                StubRetriever::with_items(Origin::Vector, vec![item(Origin::Vector, "a", "A")]),
                3,
            )
            .with_source(
                StubRetriever::with_items(Origin::Local, vec![item(Origin::Local, "b", "B")]),
                10,
            )
            .with_source(
                StubRetriever::with_items(Origin::Web, vec![item(Origin::Web, "c", "C")]),
                3,
            );

        match agg.aggregate("flu symptoms").await {
            RetrievalOutcome::Evidence(set) => {
                let origins: Vec<Origin> = set.items.iter().map(|i| i.origin).collect();
                assert_eq!(origins, vec![Origin::Vector, Origin::Local, Origin::Web]);
            }
            other => panic!("expected evidence, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dedup_first_source_wins() {
        let shared = "data/medical_book.pdf";
        let agg = aggregator()
            .with_source(
                StubRetriever::with_items(
                    Origin::Vector,
                    vec![item(Origin::Vector, shared, "from the index")],
                ),
                3,
            )
            .with_source(
                StubRetriever::with_items(
                    Origin::Local,
                    vec![item(Origin::Local, shared, "from local datasets")],
                ),
                10,
            );

        match agg.aggregate("flu symptoms").await {
            RetrievalOutcome::Evidence(set) => {
                assert_eq!(set.items.len(), 1);
                assert_eq!(set.items[0].origin, Origin::Vector);
                assert_eq!(set.items[0].text, "from the index");
            }
            other => panic!("expected evidence, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_source_degrades_not_aborts() {
        let agg = aggregator()
            .with_source(
                StubRetriever::with_items(Origin::Vector, vec![item(Origin::Vector, "a", "A")]),
                3,
            )
            .with_source(Arc::new(FailingRetriever), 3);

        match agg.aggregate("flu symptoms").await {
            RetrievalOutcome::Evidence(set) => assert_eq!(set.items.len(), 1),
            other => panic!("expected evidence, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_counts_as_failure() {
        let agg = Aggregator::new(Duration::from_millis(20), 6000)
            .with_source(
                StubRetriever::with_items(Origin::Vector, vec![item(Origin::Vector, "a", "A")]),
                3,
            )
            .with_source(Arc::new(SlowRetriever), 3);

        match agg.aggregate("flu symptoms").await {
            RetrievalOutcome::Evidence(set) => {
                assert_eq!(set.items.len(), 1);
                assert_eq!(set.items[0].source_identity, "a");
            }
            other => panic!("expected evidence, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_web_rejection_with_nothing_else_is_out_of_domain() {
        let agg = aggregator()
            .with_source(StubRetriever::with_items(Origin::Vector, vec![]), 3)
            .with_source(StubRetriever::with_items(Origin::Local, vec![]), 10)
            .with_source(Arc::new(RejectingRetriever), 3);

        assert!(matches!(
            agg.aggregate("capital of france").await,
            RetrievalOutcome::OutOfDomain
        ));
    }

    #[tokio::test]
    async fn test_web_rejection_with_other_evidence_still_answers() {
        let agg = aggregator()
            .with_source(
                StubRetriever::with_items(Origin::Vector, vec![item(Origin::Vector, "a", "A")]),
                3,
            )
            .with_source(Arc::new(RejectingRetriever), 3);

        assert!(matches!(
            agg.aggregate("flu symptoms").await,
            RetrievalOutcome::Evidence(_)
        ));
    }

    #[tokio::test]
    async fn test_all_empty_is_insufficient_evidence() {
        let agg = aggregator()
            .with_source(StubRetriever::with_items(Origin::Vector, vec![]), 3)
            .with_source(StubRetriever::with_items(Origin::Local, vec![]), 10);

        assert!(matches!(
            agg.aggregate("rare disease").await,
            RetrievalOutcome::InsufficientEvidence
        ));
    }

    #[tokio::test]
    async fn test_char_budget_drops_from_end_keeps_first() {
        let agg = Aggregator::new(Duration::from_secs(5), 10).with_source(
            StubRetriever::with_items(
                Origin::Vector,
                vec![
                    item(Origin::Vector, "a", "twelve chars."),
                    item(Origin::Vector, "b", "never kept"),
                ],
            ),
            3,
        );

        match agg.aggregate("flu").await {
            RetrievalOutcome::Evidence(set) => {
                // First item exceeds the budget on its own but survives
                assert_eq!(set.items.len(), 1);
                assert_eq!(set.items[0].source_identity, "a");
            }
            other => panic!("expected evidence, got {:?}", other),
        }
    }
}
