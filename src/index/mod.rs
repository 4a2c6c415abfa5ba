//! Style index: optional ANN retrieval over an uploaded writing sample.
//!
//! A single process-wide index, rebuilt (not merged) on each build call.
//! The enhance/mimic endpoints do not consult it — they inline the
//! truncated raw sample — so this stays a self-contained adapter exercised
//! by the `/test-index/` diagnostic, the CLI, and tests.

pub mod embed;

use std::path::Path;
use std::sync::{PoisonError, RwLock};

use anndists::dist::DistCosine;
use hnsw_rs::hnsw::Hnsw;
use miette::Diagnostic;
use thiserror::Error;

use embed::{EMBED_DIM, embed_text, is_zero};

/// Fixed result returned by [`StyleIndex::query`] before any build.
pub const INDEX_UNAVAILABLE_MESSAGE: &str = "Style mimicry is not available.";

/// Number of chunks returned per query.
pub const DEFAULT_TOP_K: usize = 3;

/// HNSW search width.
const EF_SEARCH: usize = 24;

/// Errors from the style index.
#[derive(Debug, Error, Diagnostic)]
pub enum IndexError {
    #[error("failed to build index: {message}")]
    #[diagnostic(
        code(quill::index::build_failed),
        help("The document yielded no indexable text. Upload a sample with readable paragraphs.")
    )]
    BuildFailed { message: String },

    #[error("failed to read document: {path}")]
    #[diagnostic(
        code(quill::index::read),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type IndexResult<T> = std::result::Result<T, IndexError>;

/// A built index: the ANN structure plus the chunk texts it points into.
struct BuiltIndex {
    hnsw: Hnsw<'static, f32, DistCosine>,
    chunks: Vec<String>,
}

/// Process-wide retrieval index over the current writing sample.
pub struct StyleIndex {
    inner: RwLock<Option<BuiltIndex>>,
}

// Safety: Hnsw uses internal synchronization via atomics/locks; the outer
// RwLock serializes rebuilds against searches.
unsafe impl Send for StyleIndex {}
unsafe impl Sync for StyleIndex {}

impl Default for StyleIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleIndex {
    /// Create an empty (unbuilt) index.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Whether a build has completed.
    pub fn is_built(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Build the index from a document on disk, replacing any previous
    /// index. Returns the number of indexed chunks.
    pub fn build(&self, filepath: &Path) -> IndexResult<usize> {
        let text = std::fs::read_to_string(filepath).map_err(|e| IndexError::Read {
            path: filepath.display().to_string(),
            source: e,
        })?;
        self.build_from_text(&text)
    }

    /// Build the index from already-extracted text, replacing any previous
    /// index. Returns the number of indexed chunks.
    pub fn build_from_text(&self, text: &str) -> IndexResult<usize> {
        let chunks: Vec<String> = text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        if chunks.is_empty() {
            return Err(IndexError::BuildFailed {
                message: "document contains no text".into(),
            });
        }

        let max_elements = chunks.len().max(16);
        let max_layer = (max_elements as f64).log2().ceil() as usize;
        let max_layer = max_layer.clamp(4, 16);
        let hnsw = Hnsw::new(max_layer, max_elements, 16, 200, DistCosine {});

        let mut indexed = 0usize;
        for (id, chunk) in chunks.iter().enumerate() {
            let vector = embed_text(chunk);
            if is_zero(&vector) {
                // Punctuation-only chunk; keep the slot so ids stay aligned.
                continue;
            }
            hnsw.insert((&vector, id));
            indexed += 1;
        }

        if indexed == 0 {
            return Err(IndexError::BuildFailed {
                message: "document contains no indexable tokens".into(),
            });
        }

        let built = BuiltIndex { hnsw, chunks };
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(built);

        tracing::info!(chunks = indexed, dim = EMBED_DIM, "style index rebuilt");
        Ok(indexed)
    }

    /// Answer a query against the index: the most similar chunks, joined by
    /// blank lines. Returns [`INDEX_UNAVAILABLE_MESSAGE`] if no index has
    /// been built.
    pub fn query(&self, prompt: &str) -> String {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let Some(built) = guard.as_ref() else {
            return INDEX_UNAVAILABLE_MESSAGE.to_string();
        };

        let query = embed_text(prompt);
        if is_zero(&query) {
            return String::new();
        }

        let neighbours = built.hnsw.search(&query, DEFAULT_TOP_K, EF_SEARCH);
        neighbours
            .iter()
            .filter_map(|n| built.chunks.get(n.d_id))
            .cloned()
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl std::fmt::Debug for StyleIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleIndex")
            .field("built", &self.is_built())
            .finish()
    }
}
