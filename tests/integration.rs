//! End-to-end integration tests for the quillmate library.
//!
//! These exercise the pipeline from upload through sample capture to
//! prompt building, plus the export and style-index stacks, without going
//! through HTTP (tests/server.rs covers the router).

use std::sync::Arc;

use quillmate::export;
use quillmate::index::{INDEX_UNAVAILABLE_MESSAGE, StyleIndex};
use quillmate::ingest::{Ingestor, PREVIEW_CHARS, UPLOAD_OK_STATUS, detect_format};
use quillmate::paths::QuillPaths;
use quillmate::prompt::{self, ENHANCE_DEFAULT_REQUEST, SAMPLE_EXCERPT_CHARS};
use quillmate::sample::SampleStore;

fn test_ingestor(dir: &std::path::Path) -> Ingestor {
    Ingestor::new(QuillPaths::under_root(dir))
}

#[test]
fn upload_then_rewrite_prompt_round_trip() {
    let dir = tempfile::TempDir::new().unwrap();
    let ingestor = test_ingestor(dir.path());
    let store = SampleStore::new();

    let sample = "Fog rolled in off the water.\n\nThe pier creaked under old boots.";
    let outcome = ingestor
        .ingest(&store, "style.txt", sample.as_bytes())
        .unwrap();
    assert_eq!(outcome.status, UPLOAD_OK_STATUS);
    assert_eq!(outcome.preview.as_deref(), Some(sample));

    // The rewrite prompt embeds the captured sample and the input verbatim.
    let p = prompt::rewrite_prompt(&store.text(), "A trip to the store.", ENHANCE_DEFAULT_REQUEST);
    assert!(p.contains(sample));
    assert!(p.contains("Text to change:\nA trip to the store.\n"));
    assert!(p.contains(ENHANCE_DEFAULT_REQUEST));
}

#[test]
fn rewrite_prompt_quotes_at_most_the_excerpt_limit() {
    let dir = tempfile::TempDir::new().unwrap();
    let ingestor = test_ingestor(dir.path());
    let store = SampleStore::new();

    let sample = "s".repeat(SAMPLE_EXCERPT_CHARS + 700);
    ingestor
        .ingest(&store, "long.txt", sample.as_bytes())
        .unwrap();

    let p = prompt::rewrite_prompt(&store.text(), "text", ENHANCE_DEFAULT_REQUEST);
    assert!(p.contains(&"s".repeat(SAMPLE_EXCERPT_CHARS)));
    assert!(!p.contains(&"s".repeat(SAMPLE_EXCERPT_CHARS + 1)));
}

#[test]
fn preview_is_first_thousand_chars() {
    let dir = tempfile::TempDir::new().unwrap();
    let ingestor = test_ingestor(dir.path());
    let store = SampleStore::new();

    let content = "p".repeat(PREVIEW_CHARS * 3);
    let outcome = ingestor
        .ingest(&store, "big.txt", content.as_bytes())
        .unwrap();
    assert_eq!(outcome.preview.unwrap(), "p".repeat(PREVIEW_CHARS));
    assert_eq!(store.text().len(), PREVIEW_CHARS * 3);
}

#[test]
fn concurrent_uploads_leave_one_full_sample() {
    let dir = tempfile::TempDir::new().unwrap();
    let ingestor = test_ingestor(dir.path());
    let store = Arc::new(SampleStore::new());

    let doc_a = "alpha ".repeat(5_000);
    let doc_b = "omega ".repeat(5_000);

    let handles: Vec<_> = [("a.txt", doc_a.clone()), ("b.txt", doc_b.clone())]
        .into_iter()
        .map(|(name, content)| {
            let ingestor = ingestor.clone();
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..20 {
                    ingestor.ingest(&store, name, content.as_bytes()).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    // Atomic overwrite: the winner is undefined, a mixture is a bug.
    let text = store.text();
    assert!(text == doc_a || text == doc_b, "sample is a mixture");
}

#[test]
fn unsupported_upload_is_rejected_after_persisting_raw_bytes() {
    let dir = tempfile::TempDir::new().unwrap();
    let ingestor = test_ingestor(dir.path());
    let store = SampleStore::new();

    assert!(ingestor.ingest(&store, "notes.docx", b"zip bytes").is_err());
    assert!(!store.has_sample());
    assert!(
        dir.path()
            .join("data/user_writings/notes.docx")
            .is_file()
    );
}

#[test]
fn format_detection_matrix() {
    assert!(detect_format("a.txt").is_some());
    assert!(detect_format("a.PDF").is_some());
    assert!(detect_format("a.md").is_some());
    assert!(detect_format("a.docx").is_none());
    assert!(detect_format("a").is_none());
}

#[test]
fn index_over_an_ingested_sample() {
    let dir = tempfile::TempDir::new().unwrap();
    let ingestor = test_ingestor(dir.path());
    let store = SampleStore::new();

    let sample = "Rain hammered the tin roof.\n\nShe counted thunderclaps until dawn.";
    ingestor
        .ingest(&store, "storms.txt", sample.as_bytes())
        .unwrap();

    // The raw upload on disk is what the index builds from.
    let uploaded = dir.path().join("data/user_writings/storms.txt");
    let index = StyleIndex::new();
    assert_eq!(index.query("anything"), INDEX_UNAVAILABLE_MESSAGE);
    assert_eq!(index.build(&uploaded).unwrap(), 2);

    let answer = index.query("thunder and rain");
    assert!(!answer.is_empty());
    assert!(answer.contains("thunder") || answer.contains("Rain"));
}

#[test]
fn export_renders_ingested_output() {
    let dir = tempfile::TempDir::new().unwrap();
    let out = dir.path().join("piece.pdf");
    export::render_pdf("A first stanza\n\nA second stanza", &out).unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}
