//! Answer synthesis with deterministic source attribution

use std::sync::Arc;

use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::providers::LlmProvider;
use crate::types::{EvidenceSet, Origin};

/// Labels listed per origin in the answer footer
const MAX_FOOTER_LABELS: usize = 3;

/// Turns evidence into a grounded answer. The model writes the body; the
/// source footer is appended here, not by the model, so attribution stays
/// deterministic.
pub struct AnswerSynthesizer {
    llm: Arc<dyn LlmProvider>,
}

impl AnswerSynthesizer {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Synthesize an answer from the evidence set. A language-model
    /// failure propagates to the caller; there is no fallback answer.
    pub async fn synthesize(
        &self,
        question: &str,
        evidence: &EvidenceSet,
        history: &[(String, String)],
    ) -> Result<String> {
        let context = PromptBuilder::build_context(evidence);
        let prompt = PromptBuilder::build_answer_prompt(question, &context, history);

        tracing::debug!(
            "Synthesizing answer from {} evidence items ({} chars of context)",
            evidence.len(),
            context.len()
        );

        let raw = self.llm.complete(&prompt).await?;
        Ok(append_source_footer(raw.trim().to_string(), evidence))
    }
}

/// Append "Sources: ..." listing up to three labels per origin, origins in
/// fixed knowledge-base, local, web order. Duplicate labels within an
/// origin collapse; an origin with no evidence is omitted.
fn append_source_footer(mut answer: String, evidence: &EvidenceSet) -> String {
    let mut parts = Vec::new();

    for origin in Origin::ALL {
        let labels = evidence.labels_for(origin);
        if labels.is_empty() {
            continue;
        }
        let shown: Vec<&str> = labels.into_iter().take(MAX_FOOTER_LABELS).collect();
        parts.push(format!("{} ({})", origin.display_name(), shown.join(", ")));
    }

    if parts.is_empty() {
        return answer;
    }

    answer.push_str("\n\nSources: ");
    answer.push_str(&parts.join("; "));
    answer
}
