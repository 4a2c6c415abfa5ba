//! quillmate HTTP server.
//!
//! Serves the assistant's endpoints:
//!
//! **Generation:**
//! - `POST /generate/` — fresh piece from mode/genre/tone
//! - `POST /expand/` — continue a piece
//! - `POST /analyze/` — tone and style analysis
//! - `POST /enhance/` / `POST /mimic/` — rewrite in the uploaded style
//!
//! **Sample & export:**
//! - `POST /upload/` — multipart .txt/.pdf writing sample
//! - `POST /export-pdf/` — render text to a PDF download
//!
//! **Diagnostics:**
//! - `GET /test-index/` — style index self-test
//! - `GET /health` — server status
//!
//! Configuration comes from the environment: `GROQ_API_KEY`, `GROQ_MODEL`,
//! `QUILLMATE_BIND`, `QUILLMATE_PORT`.

use std::sync::Arc;

use quillmate::error::QuillResult;
use quillmate::ingest::Ingestor;
use quillmate::llm::{GroqClient, GroqConfig};
use quillmate::paths::QuillPaths;
use quillmate::sample::SampleStore;
use quillmate::server::{ApiState, build_router};

fn init_state() -> QuillResult<Arc<ApiState>> {
    let paths = QuillPaths::resolve()?;
    paths.ensure_dirs()?;

    let config = GroqConfig::from_env();
    let client = GroqClient::new(config);
    if client.is_available() {
        tracing::info!(model = client.model(), "provider configured");
    } else {
        tracing::warn!(
            "GROQ_API_KEY is missing — generation endpoints will return a configuration notice"
        );
    }

    Ok(Arc::new(ApiState {
        backend: Arc::new(client),
        samples: Arc::new(SampleStore::new()),
        ingestor: Ingestor::new(paths),
    }))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let bind = std::env::var("QUILLMATE_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("QUILLMATE_PORT").unwrap_or_else(|_| "8000".to_string());
    let addr = format!("{bind}:{port}");

    let state = init_state().unwrap_or_else(|e| {
        tracing::error!("failed to initialize server state: {e}");
        std::process::exit(1);
    });

    let app = build_router(state);

    tracing::info!("quillmate server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}
