//! HTTP surface: axum router over the assistant's components.
//!
//! State is explicit and injected — handlers receive the completion
//! backend, the sample store, and the ingestor through [`ApiState`], so
//! tests drive the router in-process with a stub backend. Every failure
//! crosses one boundary mapper ([`error::ApiError`]) that fixes the
//! response shape and status code.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

use crate::ingest::Ingestor;
use crate::llm::CompletionBackend;
use crate::sample::SampleStore;

/// Shared state injected into every handler.
pub struct ApiState {
    /// The provider adapter (or a stub in tests).
    pub backend: Arc<dyn CompletionBackend>,
    /// Holder of the current style sample.
    pub samples: Arc<SampleStore>,
    /// Upload persistence + parsing.
    pub ingestor: Ingestor,
}

/// Build the application router.
///
/// Routes keep the original trailing-slash spelling; CORS is wide open
/// (the UI client may be served from anywhere).
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health.
        .route("/health", get(handlers::health))
        // Generation endpoints.
        .route("/generate/", post(handlers::generate))
        .route("/expand/", post(handlers::expand))
        .route("/analyze/", post(handlers::analyze))
        .route("/enhance/", post(handlers::enhance))
        .route("/mimic/", post(handlers::mimic))
        // Sample upload.
        .route("/upload/", post(handlers::upload))
        // Export.
        .route("/export-pdf/", post(handlers::export_pdf))
        // Diagnostics.
        .route("/test-index/", get(handlers::test_index))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
