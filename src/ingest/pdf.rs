//! PDF sample parser using the `pdf-extract` crate.
//!
//! `pdf-extract` returns all pages as one string with form feeds between
//! pages; pages are re-joined with newlines to match the plain-text shape
//! the rewrite prompts expect.

use crate::ingest::{IngestError, IngestResult, SampleFormat, SampleParser};

/// PDF document parser backed by `pdf-extract`.
pub struct PdfParser;

impl SampleParser for PdfParser {
    fn format(&self) -> SampleFormat {
        SampleFormat::Pdf
    }

    fn parse(&self, data: &[u8]) -> IngestResult<String> {
        let text =
            pdf_extract::extract_text_from_mem(data).map_err(|e| IngestError::Parse {
                format: "pdf".into(),
                message: e.to_string(),
            })?;

        if text.trim().is_empty() {
            return Err(IngestError::Parse {
                format: "pdf".into(),
                message: "document contains no extractable text".into(),
            });
        }

        // Page breaks come through as form feeds; join pages with newlines.
        let joined = text
            .split('\x0C')
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n");

        Ok(joined)
    }
}
