//! The style sample: text extracted from the most recently uploaded document.
//!
//! `SampleStore` is the single process-wide holder, passed explicitly to
//! request handlers rather than living in module-global state. Each
//! successful upload replaces the whole sample; readers observe either the
//! full previous value or the full next one, never a mixture. Last writer
//! wins — ordering between concurrent uploads is undefined.

use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

/// Text extracted from the most recently uploaded document.
#[derive(Debug, Clone)]
pub struct StyleSample {
    /// The full extracted text.
    pub text: String,
    /// Filename the sample was uploaded as.
    pub source_name: String,
    /// When the sample was captured.
    pub ingested_at: SystemTime,
}

impl StyleSample {
    pub fn new(text: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_name: source_name.into(),
            ingested_at: SystemTime::now(),
        }
    }
}

/// Truncate a string to at most `max_chars` characters (not bytes).
///
/// Sample excerpts and previews are char-indexed; byte slicing could split
/// a UTF-8 sequence.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Holder of the current style sample.
///
/// At most one sample exists at a time; `replace` swaps the whole value
/// under a write lock.
#[derive(Debug, Default)]
pub struct SampleStore {
    current: RwLock<Option<StyleSample>>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current sample wholesale.
    pub fn replace(&self, sample: StyleSample) {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Some(sample);
    }

    /// The current sample, if any document has been uploaded.
    pub fn current(&self) -> Option<StyleSample> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The current sample's text, or empty if none was uploaded.
    pub fn text(&self) -> String {
        self.current().map(|s| s.text).unwrap_or_default()
    }

    pub fn has_sample(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
