//! Evidence items flowing from the retrieval sources into synthesis

use serde::{Deserialize, Serialize};

/// Which retrieval source produced an evidence item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Vector similarity index
    Vector,
    /// Locally ingested datasets
    Local,
    /// Live web search
    Web,
}

impl Origin {
    /// Merge and attribution order
    pub const ALL: [Origin; 3] = [Origin::Vector, Origin::Local, Origin::Web];

    /// Human-readable group name used in the attribution footer
    pub fn display_name(&self) -> &'static str {
        match self {
            Origin::Vector => "knowledge base",
            Origin::Local => "local datasets",
            Origin::Web => "web",
        }
    }
}

/// Canonical form of a source identity so the same file or URL collapses
/// to one key regardless of which retriever reported it.
pub fn normalize_identity(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_lowercase()
}

/// One piece of evidence from a retrieval source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// Dedup key: normalized file path or URL
    pub source_identity: String,
    /// Which source produced it
    pub origin: Origin,
    /// The evidence text
    pub text: String,
    /// Source-specific relevance in 0..1; None where only rank order is
    /// meaningful (web results)
    pub relevance_score: Option<f32>,
    /// Short label shown to the user (filename, dataset name, or domain)
    pub display_label: String,
}

impl EvidenceItem {
    pub fn new(
        identity: impl AsRef<str>,
        origin: Origin,
        text: impl Into<String>,
        relevance_score: Option<f32>,
        display_label: impl Into<String>,
    ) -> Self {
        Self {
            source_identity: normalize_identity(identity.as_ref()),
            origin,
            text: text.into(),
            relevance_score,
            display_label: display_label.into(),
        }
    }
}

/// Merged, deduplicated, bounded evidence for one query
#[derive(Debug, Clone, Default)]
pub struct EvidenceSet {
    pub items: Vec<EvidenceItem>,
}

impl EvidenceSet {
    pub fn new(items: Vec<EvidenceItem>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Combined character count across all evidence text
    pub fn total_chars(&self) -> usize {
        self.items.iter().map(|i| i.text.len()).sum()
    }

    /// Distinct display labels for one origin, in item order
    pub fn labels_for(&self, origin: Origin) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for item in self.items.iter().filter(|i| i.origin == origin) {
            if !labels.contains(&item.display_label.as_str()) {
                labels.push(&item.display_label);
            }
        }
        labels
    }

    /// Per-origin counts for the response
    pub fn breakdown(&self) -> SourceBreakdown {
        let mut breakdown = SourceBreakdown::default();
        for item in &self.items {
            match item.origin {
                Origin::Vector => breakdown.rag_count += 1,
                Origin::Local => breakdown.mcp_count += 1,
                Origin::Web => breakdown.web_count += 1,
            }
            breakdown.total += 1;
        }
        breakdown
    }
}

/// How many evidence items each source contributed to the answer
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceBreakdown {
    /// Vector index hits
    pub rag_count: usize,
    /// Locally ingested dataset hits
    pub mcp_count: usize,
    /// Web search hits
    pub web_count: usize,
    /// Sum of the above
    pub total: usize,
}
