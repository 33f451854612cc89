//! Medical domain gate applied before any retrieval is attempted

/// Fixed refusal returned for questions outside the medical domain
pub const REFUSAL_REPLY: &str = "Sorry, I can only answer medical-related questions.";

/// Phrasings that mark a question as geographic trivia
const LOCATION_PATTERNS: &[&str] = &["where is", "capital of"];

/// Topics the service explicitly does not cover
const OFF_DOMAIN_KEYWORDS: &[&str] = &["recipe", "programming", "sports", "movie", "weather"];

/// Medical vocabulary that marks a question as in-domain
const MEDICAL_KEYWORDS: &[&str] = &[
    "disease",
    "symptom",
    "treatment",
    "medication",
    "drug",
    "condition",
    "illness",
    "health",
    "medical",
    "diagnosis",
    "doctor",
    "hospital",
    "surgery",
    "pain",
    "fever",
    "diabetes",
    "heart",
    "cancer",
    "pneumonia",
    "virus",
    "infection",
    "vaccine",
    "therapy",
    "cure",
    "medicine",
    "patient",
    "clinical",
    "healthcare",
    "disorder",
    "syndrome",
    "hypertension",
    "asthma",
    "arthritis",
    "depression",
    "anxiety",
    "nutrition",
    "vitamin",
    "supplement",
    "exercise",
    "wellness",
    "epidemic",
    "pandemic",
];

/// Keyword-only check, shared with the web retriever's pre-call guard
pub fn contains_medical_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    MEDICAL_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Decide whether a question is in the medical domain.
///
/// Rules run in a fixed order: off-domain phrasings and topics reject first
/// (even when medical vocabulary is also present), known medical vocabulary
/// accepts second, a bare "what is X" question is accepted by default, and
/// everything else is rejected. Pure function of the input text.
pub fn classify(text: &str) -> bool {
    let lower = text.to_lowercase();

    if LOCATION_PATTERNS.iter().any(|p| lower.contains(p)) {
        return false;
    }
    if OFF_DOMAIN_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return false;
    }

    if MEDICAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return true;
    }

    let trimmed = lower.trim_start();
    if trimmed.starts_with("what is") || trimmed.starts_with("what's") || trimmed.starts_with("what are") {
        return true;
    }

    false
}
