//! Document ingestion: uploaded writing samples become the style sample.
//!
//! An upload is persisted raw under the uploads directory first (the
//! directory accumulates; nothing cleans it up), then parsed if the
//! extension is supported. A successful parse overwrites the process-wide
//! [`SampleStore`] and returns a preview of the extracted text. A PDF that
//! fails to parse is reported in the outcome status but does not fail the
//! upload.

pub mod pdf;

use std::path::Path;

use miette::Diagnostic;
use thiserror::Error;

use crate::paths::QuillPaths;
use crate::sample::{SampleStore, StyleSample, truncate_chars};

/// Number of characters of extracted text returned as the upload preview.
pub const PREVIEW_CHARS: usize = 1000;

/// Status string for a fully successful upload.
pub const UPLOAD_OK_STATUS: &str = "Upload and parsing successful.";

/// Errors from document ingestion.
#[derive(Debug, Error, Diagnostic)]
pub enum IngestError {
    #[error("unsupported file type {extension}")]
    #[diagnostic(
        code(quill::ingest::unsupported_type),
        help("Only .txt and .pdf writing samples are accepted.")
    )]
    UnsupportedType { extension: String },

    #[error("failed to persist upload: {path}")]
    #[diagnostic(
        code(quill::ingest::persist),
        help("Check that the uploads directory exists and is writable.")
    )]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{format} parse error: {message}")]
    #[diagnostic(
        code(quill::ingest::parse),
        help("The document could not be parsed. PDF support is experimental.")
    )]
    Parse { format: String, message: String },
}

pub type IngestResult<T> = std::result::Result<T, IngestError>;

/// Supported writing-sample formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    PlainText,
    Pdf,
}

/// Detect the sample format from a file extension.
pub fn detect_format(filename: &str) -> Option<SampleFormat> {
    let lower = filename.to_lowercase();
    if lower.ends_with(".txt") || lower.ends_with(".text") || lower.ends_with(".md") {
        Some(SampleFormat::PlainText)
    } else if lower.ends_with(".pdf") {
        Some(SampleFormat::Pdf)
    } else {
        None
    }
}

/// Trait for format-specific sample parsers.
pub trait SampleParser {
    /// Extract plain text from raw bytes.
    fn parse(&self, data: &[u8]) -> IngestResult<String>;

    /// The format this parser handles.
    fn format(&self) -> SampleFormat;
}

/// Get the appropriate parser for a sample format.
pub fn parser_for(format: SampleFormat) -> Box<dyn SampleParser> {
    match format {
        SampleFormat::PlainText => Box::new(PlainTextParser),
        SampleFormat::Pdf => Box::new(pdf::PdfParser),
    }
}

/// Plain-text parser: decodes bytes as UTF-8, replacing invalid sequences.
pub struct PlainTextParser;

impl SampleParser for PlainTextParser {
    fn format(&self) -> SampleFormat {
        SampleFormat::PlainText
    }

    fn parse(&self, data: &[u8]) -> IngestResult<String> {
        Ok(String::from_utf8_lossy(data).into_owned())
    }
}

/// Outcome of an accepted upload.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Human-readable status line.
    pub status: String,
    /// First [`PREVIEW_CHARS`] characters of the extracted text, when
    /// parsing succeeded.
    pub preview: Option<String>,
}

/// Ingests uploaded documents into a [`SampleStore`].
#[derive(Debug, Clone)]
pub struct Ingestor {
    paths: QuillPaths,
}

impl Ingestor {
    pub fn new(paths: QuillPaths) -> Self {
        Self { paths }
    }

    /// Persist and parse one uploaded document.
    ///
    /// Raw bytes are written to the uploads directory before the extension
    /// check, so even rejected uploads leave a file behind. On a successful
    /// parse the store's sample is replaced wholesale. A PDF parse failure
    /// is reported in the outcome, leaving the previous sample in place.
    pub fn ingest(
        &self,
        store: &SampleStore,
        filename: &str,
        data: &[u8],
    ) -> IngestResult<UploadOutcome> {
        let saved = self.persist_raw(filename, data)?;
        tracing::info!(file = %saved, bytes = data.len(), "upload persisted");

        let format = detect_format(filename).ok_or_else(|| IngestError::UnsupportedType {
            extension: extension_of(filename),
        })?;

        let text = match parser_for(format).parse(data) {
            Ok(text) => text,
            Err(IngestError::Parse { message, .. }) if format == SampleFormat::Pdf => {
                tracing::warn!(file = %saved, error = %message, "PDF parse failed");
                return Ok(UploadOutcome {
                    status: format!(
                        "PDF parsing failed: {message}. PDF support is experimental."
                    ),
                    preview: None,
                });
            }
            Err(e) => return Err(e),
        };

        let preview = truncate_chars(&text, PREVIEW_CHARS).to_string();
        store.replace(StyleSample::new(text, filename));

        Ok(UploadOutcome {
            status: UPLOAD_OK_STATUS.to_string(),
            preview: Some(preview),
        })
    }

    /// Write the raw upload under the uploads directory, returning the path.
    fn persist_raw(&self, filename: &str, data: &[u8]) -> IngestResult<String> {
        let dir = self.paths.uploads_dir();
        std::fs::create_dir_all(&dir).map_err(|e| IngestError::Persist {
            path: dir.display().to_string(),
            source: e,
        })?;

        // Only the final path component; uploads must not escape the directory.
        let name = Path::new(filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let path = dir.join(name);

        std::fs::write(&path, data).map_err(|e| IngestError::Persist {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(path.display().to_string())
    }
}

fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
