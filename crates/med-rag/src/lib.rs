//! med-rag: Medical question answering with multi-source retrieval
//!
//! This crate answers medical questions from three evidence sources at
//! once: a remote vector index over medical reference text, locally
//! ingested datasets (JSON, CSV, PDF), and live web search restricted to
//! medical sites. Evidence is merged, deduplicated, and synthesized into
//! a grounded answer with per-source attribution. Non-medical questions
//! are refused before any retrieval happens, and lightweight chat
//! commands (small talk, dataset listing, dataset ingestion) are handled
//! without touching the pipeline.

pub mod config;
pub mod datasets;
pub mod domain;
pub mod error;
pub mod generation;
pub mod intent;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod session;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{
    dataset::{DatasetFormat, DatasetMetadata},
    evidence::{EvidenceItem, EvidenceSet, Origin, SourceBreakdown},
    query::AskRequest,
    response::{AskResponse, SourceRef},
};
