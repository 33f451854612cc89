//! Prompt templates for grounded medical answers

use crate::domain::REFUSAL_REPLY;
use crate::types::EvidenceSet;

/// Prompt builder for answer synthesis
pub struct PromptBuilder;

impl PromptBuilder {
    /// Number the evidence items and tag each with its origin so the model
    /// can tell a textbook excerpt from a web snippet.
    pub fn build_context(evidence: &EvidenceSet) -> String {
        let mut context = String::new();

        for (i, item) in evidence.items.iter().enumerate() {
            context.push_str(&format!(
                "[{}] {} ({})\n{}\n\n---\n\n",
                i + 1,
                item.display_label,
                item.origin.display_name(),
                item.text
            ));
        }

        context
    }

    /// Recent exchanges as alternating User/Assistant lines
    pub fn format_history(history: &[(String, String)]) -> String {
        history
            .iter()
            .map(|(question, answer)| format!("User: {}\nAssistant: {}", question, answer))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Build the full answer prompt with strict grounding
    pub fn build_answer_prompt(
        question: &str,
        context: &str,
        history: &[(String, String)],
    ) -> String {
        let history_section = if history.is_empty() {
            String::new()
        } else {
            format!("\nChat History:\n{}\n", Self::format_history(history))
        };

        format!(
            r#"You are a MEDICAL chatbot.
Use ONLY the provided medical context to answer.
Do not add facts that are not in the context.
Maintain conversation coherence by considering previous interactions.
If the user asks something unrelated to health or medicine, reply:
'{refusal}'

Context:
{context}
{history}
Question:
{question}

Answer:"#,
            refusal = REFUSAL_REPLY,
            context = context,
            history = history_section,
            question = question
        )
    }
}
