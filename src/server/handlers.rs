//! Request handlers and their wire types.
//!
//! Each endpoint has a statically validated request struct
//! (`deny_unknown_fields`; missing required fields reject the body) —
//! no attribute-bag request objects. Blocking work (provider calls, disk
//! I/O, PDF parsing/rendering) runs on the blocking pool.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::export;
use crate::index::StyleIndex;
use crate::prompt;
use crate::sample::truncate_chars;
use crate::server::ApiState;
use crate::server::error::ApiError;

/// Filename offered for the exported PDF download.
pub const EXPORT_FILENAME: &str = "quillmate_output.pdf";

// ── Wire types ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateRequest {
    pub mode: String,
    pub input_text: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub tone: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpandRequest {
    pub mode: String,
    pub input_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzeRequest {
    pub input_text: String,
}

/// Shared by `/enhance/` and `/mimic/`; `style` is the optional user
/// request line appended to the rewrite prompt.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RewriteRequest {
    pub input_text: String,
    #[serde(default)]
    pub style: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct OutputResponse {
    pub output: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: String,
    pub preview: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sample_loaded: bool,
}

// ── Generation endpoints ──────────────────────────────────────────────────

pub async fn generate(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<OutputResponse>, ApiError> {
    let p = prompt::generate_prompt(&req.mode, &req.genre, &req.tone, &req.input_text);
    let output = complete_blocking(&state, p).await?;
    Ok(Json(OutputResponse { output }))
}

pub async fn expand(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<ExpandRequest>,
) -> Result<Json<OutputResponse>, ApiError> {
    let p = prompt::expand_prompt(&req.mode, &req.input_text);
    let output = complete_blocking(&state, p).await?;
    Ok(Json(OutputResponse { output }))
}

pub async fn analyze(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<OutputResponse>, ApiError> {
    let p = prompt::analyze_prompt(&req.input_text);
    let output = complete_blocking(&state, p).await?;
    Ok(Json(OutputResponse { output }))
}

pub async fn enhance(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<RewriteRequest>,
) -> Result<Json<OutputResponse>, ApiError> {
    rewrite(state, req, prompt::ENHANCE_DEFAULT_REQUEST).await
}

pub async fn mimic(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<RewriteRequest>,
) -> Result<Json<OutputResponse>, ApiError> {
    rewrite(state, req, prompt::MIMIC_DEFAULT_REQUEST).await
}

async fn rewrite(
    state: Arc<ApiState>,
    req: RewriteRequest,
    default_request: &str,
) -> Result<Json<OutputResponse>, ApiError> {
    let sample = state.samples.text();
    let user_request = if req.style.trim().is_empty() {
        default_request
    } else {
        req.style.as_str()
    };

    let p = prompt::rewrite_prompt(&sample, &req.input_text, user_request);
    tracing::debug!(prompt_head = %truncate_chars(&p, 1000), "rewrite prompt");

    let output = complete_blocking(&state, p).await?;
    Ok(Json(OutputResponse { output }))
}

/// Run the blocking provider call off the async runtime.
async fn complete_blocking(state: &Arc<ApiState>, prompt: String) -> Result<String, ApiError> {
    let backend = Arc::clone(&state.backend);
    tokio::task::spawn_blocking(move || backend.complete(&prompt))
        .await
        .map_err(|e| ApiError::Internal {
            message: format!("completion task failed: {e}"),
        })?
        .map_err(ApiError::Provider)
}

// ── Upload ────────────────────────────────────────────────────────────────

pub async fn upload(
    State(state): State<Arc<ApiState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Multipart {
            message: e.to_string(),
        })?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let data = field.bytes().await.map_err(|e| ApiError::Multipart {
            message: e.to_string(),
        })?;
        file = Some((filename, data.to_vec()));
    }

    let Some((filename, data)) = file else {
        return Err(ApiError::Multipart {
            message: "missing \"file\" field".into(),
        });
    };

    let ingestor = state.ingestor.clone();
    let samples = Arc::clone(&state.samples);
    let outcome = tokio::task::spawn_blocking(move || {
        ingestor.ingest(&samples, &filename, &data)
    })
    .await
    .map_err(|e| ApiError::Internal {
        message: format!("upload task failed: {e}"),
    })??;

    Ok(Json(UploadResponse {
        status: outcome.status,
        preview: outcome.preview,
    }))
}

// ── Export ────────────────────────────────────────────────────────────────

pub async fn export_pdf(Json(req): Json<ExportRequest>) -> Result<Response, ApiError> {
    let bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, ApiError> {
        // Ephemeral file: rendered, read back, deleted when the guard
        // drops — it never outlives the request.
        let tmp = tempfile::Builder::new()
            .prefix("quillmate-export-")
            .suffix(".pdf")
            .tempfile()
            .map_err(|e| ApiError::Internal {
                message: format!("failed to create temp file: {e}"),
            })?;

        export::render_pdf(&req.text, tmp.path())?;

        std::fs::read(tmp.path()).map_err(|e| ApiError::Internal {
            message: format!("failed to read rendered PDF: {e}"),
        })
    })
    .await
    .map_err(|e| ApiError::Internal {
        message: format!("export task failed: {e}"),
    })??;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{EXPORT_FILENAME}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}

// ── Diagnostics ───────────────────────────────────────────────────────────

/// Self-test of the style index stack: builds a scratch index from a fixed
/// document and queries it. Always answers 200 with a status line.
pub async fn test_index() -> Json<StatusResponse> {
    let result = tokio::task::spawn_blocking(|| {
        let scratch = StyleIndex::new();
        scratch.build_from_text("This is a test document for the style index.")?;
        Ok::<String, crate::index::IndexError>(scratch.query("test document"))
    })
    .await;

    let status = match result {
        Ok(Ok(_)) => "style index is working properly".to_string(),
        Ok(Err(e)) => format!("style index test failed: {e}"),
        Err(e) => format!("style index test failed: {e}"),
    };
    Json(StatusResponse { status })
}

pub async fn health(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sample_loaded: state.samples.has_sample(),
    })
}
