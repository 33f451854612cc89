//! Error types for the medical RAG service

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset file not found: {0}")]
    DatasetNotFound(String),

    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),

    /// A retrieval source failed or timed out. Recovered by the aggregator;
    /// only surfaces when a caller hits the source directly.
    /// (Field is `source_name`, not `source`: thiserror reserves a field
    /// literally named `source` for the error-chain source, which must be
    /// `impl std::error::Error`.)
    #[error("Retrieval source '{source_name}' unavailable: {message}")]
    SourceUnavailable { source_name: String, message: String },

    #[error("Embedding service error: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    VectorIndex(String),

    #[error("Web search error: {0}")]
    WebSearch(String),

    #[error("Question is outside the medical domain")]
    OutOfDomain,

    #[error("No supporting evidence found across retrieval sources")]
    InsufficientEvidence,

    #[error("Answer synthesis failed: {0}")]
    Synthesis(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn source_unavailable(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            source_name: source.into(),
            message: message.into(),
        }
    }

    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    pub fn vector_index(message: impl Into<String>) -> Self {
        Self::VectorIndex(message.into())
    }

    pub fn web_search(message: impl Into<String>) -> Self {
        Self::WebSearch(message.into())
    }

    pub fn synthesis(message: impl Into<String>) -> Self {
        Self::Synthesis(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            Error::Config(_) => (StatusCode::BAD_REQUEST, "config"),
            Error::DatasetNotFound(_) => (StatusCode::NOT_FOUND, "dataset_not_found"),
            Error::UnsupportedFormat(_) => (StatusCode::BAD_REQUEST, "unsupported_format"),
            Error::SourceUnavailable { .. } => (StatusCode::SERVICE_UNAVAILABLE, "source_unavailable"),
            Error::Embedding(_) => (StatusCode::BAD_GATEWAY, "embedding"),
            Error::VectorIndex(_) => (StatusCode::BAD_GATEWAY, "vector_index"),
            Error::WebSearch(_) => (StatusCode::BAD_GATEWAY, "web_search"),
            Error::OutOfDomain => (StatusCode::UNPROCESSABLE_ENTITY, "out_of_domain"),
            Error::InsufficientEvidence => (StatusCode::NOT_FOUND, "insufficient_evidence"),
            Error::Synthesis(_) => (StatusCode::SERVICE_UNAVAILABLE, "synthesis"),
            Error::Json(_) => (StatusCode::BAD_REQUEST, "json"),
            Error::Http(_) => (StatusCode::BAD_GATEWAY, "http"),
            Error::Io(_) | Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };

        let message = self.to_string();
        tracing::error!("Request failed: {} ({})", message, error_type);

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
