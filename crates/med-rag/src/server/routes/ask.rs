//! Ask endpoint: chat commands, domain gating, retrieval, synthesis

use axum::{extract::State, Json};
use std::time::Instant;

use crate::domain::{self, REFUSAL_REPLY};
use crate::error::{Error, Result};
use crate::intent::{self, Intent};
use crate::retrieval::{RetrievalOutcome, INSUFFICIENT_EVIDENCE_REPLY};
use crate::server::state::AppState;
use crate::types::{AskRequest, AskResponse, DatasetMetadata};

/// POST /api/ask - Answer a medical question or run a chat command
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();

    tracing::info!(
        "Ask: \"{}\" (session '{}')",
        request.query,
        request.session_id
    );

    // Chat commands bypass retrieval entirely
    match intent::detect(&request.query) {
        Intent::SmallTalk(kind) => {
            return Ok(Json(AskResponse::canned(kind.reply())));
        }
        Intent::ListDatasets => {
            let answer = format_dataset_listing(&state.registry().list());
            return Ok(Json(AskResponse::canned(answer)));
        }
        Intent::Ingest {
            file_path,
            format_hint,
        } => {
            let registry = state.registry().clone();
            let metadata =
                tokio::task::spawn_blocking(move || registry.ingest(&file_path, format_hint))
                    .await
                    .map_err(|e| Error::internal(format!("Ingestion task failed: {}", e)))??;

            let answer = format!(
                "Ingested dataset '{}' ({} format, {} records). You can now ask questions about it.",
                metadata.name, metadata.format, metadata.record_count
            );
            return Ok(Json(AskResponse::canned(answer)));
        }
        Intent::None => {}
    }

    if !domain::classify(&request.query) {
        return Ok(Json(AskResponse::canned(REFUSAL_REPLY)));
    }

    let history = state.sessions().history(&request.session_id);

    let response = match state.aggregator().aggregate(&request.query).await {
        RetrievalOutcome::OutOfDomain => AskResponse::canned(REFUSAL_REPLY),
        RetrievalOutcome::InsufficientEvidence => {
            AskResponse::canned(INSUFFICIENT_EVIDENCE_REPLY)
        }
        RetrievalOutcome::Evidence(evidence) => {
            let answer = state
                .synthesizer()
                .synthesize(&request.query, &evidence, &history)
                .await?;
            state
                .sessions()
                .append(&request.session_id, &request.query, &answer);
            AskResponse::from_evidence(answer, &evidence)
        }
    };

    tracing::info!(
        "Answered in {}ms ({} sources)",
        start.elapsed().as_millis(),
        response.sources.len()
    );

    Ok(Json(response))
}

fn format_dataset_listing(datasets: &[DatasetMetadata]) -> String {
    if datasets.is_empty() {
        return "No datasets have been ingested yet. \
                Ask me to ingest one, for example: 'ingest dataset flu_facts.json'."
            .to_string();
    }

    let mut lines = vec![format!(
        "I have {} ingested dataset{}:",
        datasets.len(),
        if datasets.len() == 1 { "" } else { "s" }
    )];
    for dataset in datasets {
        lines.push(format!(
            "- {} ({} format, {} records, ingested {})",
            dataset.name,
            dataset.format,
            dataset.record_count,
            dataset.ingested_at.format("%Y-%m-%d")
        ));
    }
    lines.join("\n")
}
