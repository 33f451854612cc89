//! Command and small-talk detection for incoming queries

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::DatasetFormat;

/// What the user asked for, beyond a plain question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Open question, no command detected
    None,
    /// Conversational filler with a fixed reply
    SmallTalk(SmallTalkKind),
    /// Enumerate the ingested datasets
    ListDatasets,
    /// Ingest a dataset file
    Ingest {
        file_path: String,
        /// None means detect from the extension at ingest time
        format_hint: Option<DatasetFormat>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmallTalkKind {
    Greeting,
    Farewell,
    Thanks,
}

impl SmallTalkKind {
    /// The fixed reply for this kind of small talk
    pub fn reply(&self) -> &'static str {
        match self {
            Self::Greeting => "Hello! How can I help you with a medical question today?",
            Self::Farewell => "Goodbye! Stay healthy.",
            Self::Thanks => "You're welcome! Do you have another medical question?",
        }
    }
}

const GREETING_WORDS: &[&str] = &["hi", "hello", "hey"];
const FAREWELL_WORDS: &[&str] = &["bye", "exit", "quit", "goodbye"];
const THANKS_PHRASES: &[&str] = &["thanks", "thank you"];

const LIST_PHRASES: &[&str] = &[
    "list datasets",
    "show datasets",
    "what datasets",
    "which datasets",
    "available datasets",
];

/// Ordered ingest patterns; the first match wins and its trailing capture
/// is taken as the path.
static INGEST_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // verb + noun + optional preposition + path
        Regex::new(
            r"(?i)^\s*(?:please\s+)?(?:ingest|add|load|import|upload|use)\s+(?:the\s+)?(?:dataset|file|data)\s+(?:from\s+)?(.+)$",
        )
        .expect("Invalid regex"),
        // verb + path
        Regex::new(r"(?i)^\s*(?:please\s+)?(?:ingest|add|load|import|upload|use)\s+(.+)$")
            .expect("Invalid regex"),
    ]
});

/// Words dropped from the front of a captured path
const PATH_FILLER_WORDS: &[&str] = &["the ", "a ", "file ", "dataset ", "from ", "called ", "named "];

/// Detect the intent of a message. Categories are tested in a fixed order
/// (small talk, dataset listing, ingestion, none) and the first hit wins.
pub fn detect(text: &str) -> Intent {
    let lower = text.trim().to_lowercase();

    if let Some(kind) = detect_small_talk(&lower) {
        return Intent::SmallTalk(kind);
    }

    if LIST_PHRASES.iter().any(|p| lower.contains(p)) {
        return Intent::ListDatasets;
    }

    if let Some((file_path, format_hint)) = detect_ingest(text) {
        return Intent::Ingest { file_path, format_hint };
    }

    Intent::None
}

fn detect_small_talk(lower: &str) -> Option<SmallTalkKind> {
    // Word match for single tokens so "hi" does not fire inside "which";
    // multi-word thanks phrases match as substrings.
    if GREETING_WORDS.iter().any(|w| contains_word(lower, w)) {
        return Some(SmallTalkKind::Greeting);
    }
    if FAREWELL_WORDS.iter().any(|w| contains_word(lower, w)) {
        return Some(SmallTalkKind::Farewell);
    }
    if THANKS_PHRASES.iter().any(|p| {
        if p.contains(' ') {
            lower.contains(p)
        } else {
            contains_word(lower, p)
        }
    }) {
        return Some(SmallTalkKind::Thanks);
    }
    None
}

fn contains_word(lower: &str, word: &str) -> bool {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}

fn detect_ingest(text: &str) -> Option<(String, Option<DatasetFormat>)> {
    for pattern in INGEST_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            if let Some(raw) = caps.get(1) {
                let path = clean_path(raw.as_str());
                if path.is_empty() {
                    continue;
                }
                let hint = DatasetFormat::from_path(Path::new(&path));
                return Some((path, hint));
            }
        }
    }
    None
}

/// Strip leading filler words and surrounding quotes from a captured path
fn clean_path(raw: &str) -> String {
    let mut path = raw.trim().trim_end_matches('?').trim_end();

    loop {
        let mut stripped = false;
        for filler in PATH_FILLER_WORDS {
            if path.len() >= filler.len()
                && path.is_char_boundary(filler.len())
                && path[..filler.len()].eq_ignore_ascii_case(filler)
            {
                path = path[filler.len()..].trim_start();
                stripped = true;
                break;
            }
        }
        if !stripped {
            break;
        }
    }

    path.trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim()
        .to_string()
}
