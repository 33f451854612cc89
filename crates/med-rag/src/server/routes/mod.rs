//! API routes

pub mod ask;
pub mod datasets;

use axum::{
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ask", post(ask::ask))
        .route("/datasets", get(datasets::list_datasets))
        .route("/datasets/ingest", post(datasets::ingest_dataset))
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "med-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Medical question answering over vector, local, and web sources",
        "endpoints": {
            "POST /api/ask": "Ask a medical question (chat commands supported)",
            "GET /api/datasets": "List ingested datasets",
            "POST /api/datasets/ingest": "Ingest a dataset file (json, csv, pdf)"
        }
    }))
}
