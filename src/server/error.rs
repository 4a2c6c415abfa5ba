//! The boundary error mapper.
//!
//! Every internal failure kind converts into one declared JSON shape and
//! an appropriate status code here, instead of ad hoc catch-and-stringify
//! in each handler. Graceful degradations (missing credential, reported
//! PDF parse failure) are not errors and never reach this type.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;
use crate::ingest::IngestError;
use crate::llm::LlmError;

/// Error payload for the `/export-pdf/` empty-input case.
pub const EMPTY_EXPORT_MESSAGE: &str = "No text provided to export";

/// Failures crossing the HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("provider error: {0}")]
    Provider(#[from] LlmError),

    #[error("upload error: {0}")]
    Ingest(#[from] IngestError),

    #[error("export error: {0}")]
    Export(#[from] ExportError),

    #[error("invalid multipart body: {message}")]
    Multipart { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            // Provider failures are upstream failures, not client mistakes.
            ApiError::Provider(e) => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": format!("generation failed: {e}") }),
            ),

            // Upload errors keep the upload response shape so the UI's
            // status rendering stays uniform.
            ApiError::Ingest(IngestError::UnsupportedType { extension }) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "status": format!(
                        "Upload failed: unsupported file type {extension}. \
                         Only .txt and .pdf are allowed."
                    ),
                    "preview": null,
                }),
            ),
            ApiError::Ingest(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "status": format!("Upload failed: {e}"), "preview": null }),
            ),

            ApiError::Export(ExportError::EmptyText) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": EMPTY_EXPORT_MESSAGE }),
            ),
            ApiError::Export(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": format!("{e}") }),
            ),

            ApiError::Multipart { message } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": format!("invalid multipart body: {message}") }),
            ),

            ApiError::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": message }),
            ),
        };

        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::warn!(%status, error = %self, "request rejected");
        }

        (status, Json(body)).into_response()
    }
}
