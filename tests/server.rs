//! Router-level tests: every endpoint driven in-process with a stub
//! completion backend capturing the prompts it receives.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::util::ServiceExt;

use quillmate::ingest::Ingestor;
use quillmate::llm::{
    CONFIGURE_KEY_MESSAGE, CompletionBackend, GroqClient, GroqConfig, LlmError,
};
use quillmate::paths::QuillPaths;
use quillmate::prompt::SAMPLE_EXCERPT_CHARS;
use quillmate::sample::SampleStore;
use quillmate::server::{ApiState, build_router};

/// Backend stub: records every prompt, answers with a fixed reply.
struct StubBackend {
    prompts: Mutex<Vec<String>>,
    reply: String,
}

impl StubBackend {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            reply: reply.to_string(),
        })
    }

    fn captured(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl CompletionBackend for StubBackend {
    fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

fn test_state(backend: Arc<dyn CompletionBackend>) -> (Arc<ApiState>, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().unwrap();
    let paths = QuillPaths::under_root(dir.path());
    let state = Arc::new(ApiState {
        backend,
        samples: Arc::new(SampleStore::new()),
        ingestor: Ingestor::new(paths),
    });
    (state, dir)
}

async fn post_json(
    router: Router,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn multipart_request(path: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let boundary = "test-boundary";
    let mut body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(path)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn generation_endpoints_degrade_without_credential() {
    // A real client with no key: fixed message, no network.
    let backend = Arc::new(GroqClient::new(GroqConfig::default()));
    let (state, _dir) = test_state(backend);

    let cases = [
        (
            "/generate/",
            serde_json::json!({"mode": "Story", "genre": "noir", "tone": "wry", "input_text": "x"}),
        ),
        (
            "/expand/",
            serde_json::json!({"mode": "Poem", "input_text": "x"}),
        ),
        ("/analyze/", serde_json::json!({"input_text": "x"})),
    ];

    for (path, body) in cases {
        let (status, json) = post_json(build_router(Arc::clone(&state)), path, body).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(json["output"], CONFIGURE_KEY_MESSAGE, "{path}");
    }
}

#[tokio::test]
async fn generate_builds_the_expected_prompt() {
    let stub = StubBackend::new("generated text");
    let (state, _dir) = test_state(stub.clone());

    let (status, json) = post_json(
        build_router(state),
        "/generate/",
        serde_json::json!({
            "mode": "Story", "genre": "noir", "tone": "tense", "input_text": "It was raining.",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["output"], "generated text");
    assert_eq!(
        stub.captured(),
        vec!["Write a Story in the noir genre. Tone: tense. Start with:\nIt was raining."]
    );
}

#[tokio::test]
async fn upload_txt_sets_sample_and_returns_preview() {
    let stub = StubBackend::new("ok");
    let (state, _dir) = test_state(stub);

    let content = "My writing voice, in two sentences. Short and dry.";
    let response = build_router(Arc::clone(&state))
        .oneshot(multipart_request("/upload/", "voice.txt", content.as_bytes()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "Upload and parsing successful.");
    assert_eq!(json["preview"], content);
    assert_eq!(state.samples.text(), content);
}

#[tokio::test]
async fn upload_unsupported_type_is_rejected_and_sample_unchanged() {
    let stub = StubBackend::new("ok");
    let (state, _dir) = test_state(stub);

    let response = build_router(Arc::clone(&state))
        .oneshot(multipart_request("/upload/", "image.png", b"\x89PNG..."))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(
        json["status"]
            .as_str()
            .unwrap()
            .contains("unsupported file type"),
        "status was: {}",
        json["status"]
    );
    assert!(!state.samples.has_sample());
}

#[tokio::test]
async fn enhance_embeds_sample_excerpt_and_input_in_prompt() {
    let stub = StubBackend::new("rewritten");
    let (state, _dir) = test_state(stub.clone());

    // Upload a sample longer than the excerpt limit through the endpoint.
    let sample = "v".repeat(SAMPLE_EXCERPT_CHARS + 300);
    let response = build_router(Arc::clone(&state))
        .oneshot(multipart_request("/upload/", "sample.txt", sample.as_bytes()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, json) = post_json(
        build_router(state),
        "/enhance/",
        serde_json::json!({"input_text": "Plain sentence to lift."}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["output"], "rewritten");

    let prompts = stub.captured();
    assert_eq!(prompts.len(), 1);
    let p = &prompts[0];
    assert!(p.contains(&"v".repeat(SAMPLE_EXCERPT_CHARS)));
    assert!(!p.contains(&"v".repeat(SAMPLE_EXCERPT_CHARS + 1)));
    assert!(p.contains("Text to change:\nPlain sentence to lift.\n"));
    assert!(p.contains("User request: Rewrite in the uploaded style."));
}

#[tokio::test]
async fn mimic_uses_its_own_default_request() {
    let stub = StubBackend::new("mimicked");
    let (state, _dir) = test_state(stub.clone());

    let (status, _) = post_json(
        build_router(state),
        "/mimic/",
        serde_json::json!({"input_text": "t"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(stub.captured()[0].contains("User request: Mimic the uploaded style."));
}

#[tokio::test]
async fn export_pdf_empty_text_is_rejected_without_a_file() {
    let stub = StubBackend::new("ok");
    let (state, _dir) = test_state(stub);

    let (status, json) = post_json(
        build_router(state),
        "/export-pdf/",
        serde_json::json!({"text": "   \n  "}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No text provided to export");
}

#[tokio::test]
async fn export_pdf_returns_a_download_and_cleans_up() {
    let stub = StubBackend::new("ok");
    let (state, _dir) = test_state(stub);

    let response = build_router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/export-pdf/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({"text": "line1\nline2"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    assert!(
        response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("quillmate_output.pdf")
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.starts_with(b"%PDF"));

    // The ephemeral render file is deleted once the bytes are captured.
    let leftovers: Vec<_> = std::fs::read_dir(std::env::temp_dir())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_string_lossy()
                .starts_with("quillmate-export-")
        })
        .collect();
    assert!(leftovers.is_empty(), "temp PDF files left behind");
}

#[tokio::test]
async fn request_bodies_with_unknown_or_missing_fields_are_rejected() {
    let stub = StubBackend::new("ok");
    let (state, _dir) = test_state(stub.clone());

    // Unknown field.
    let (status, _) = post_json(
        build_router(Arc::clone(&state)),
        "/generate/",
        serde_json::json!({"mode": "Story", "input_text": "x", "bogus": true}),
    )
    .await;
    assert!(status.is_client_error(), "unknown field got {status}");

    // Missing required field.
    let (status, _) = post_json(
        build_router(state),
        "/expand/",
        serde_json::json!({"mode": "Story"}),
    )
    .await;
    assert!(status.is_client_error(), "missing field got {status}");

    // Neither request reached the backend.
    assert!(stub.captured().is_empty());
}

#[tokio::test]
async fn test_index_diagnostic_reports_working() {
    let stub = StubBackend::new("ok");
    let (state, _dir) = test_state(stub);

    let response = build_router(state)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/test-index/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "style index is working properly");
}

#[tokio::test]
async fn health_reports_sample_state() {
    let stub = StubBackend::new("ok");
    let (state, _dir) = test_state(stub);

    let response = build_router(Arc::clone(&state))
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["sample_loaded"], false);

    build_router(Arc::clone(&state))
        .oneshot(multipart_request("/upload/", "s.txt", b"sample"))
        .await
        .unwrap();

    let response = build_router(state)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["sample_loaded"], true);
}
