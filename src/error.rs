//! Top-level error type for quillmate.
//!
//! Each subsystem defines its own error enum with miette `#[diagnostic]`
//! derives (error codes, help text, source chains); `QuillError` wraps them
//! transparently so binaries can report any failure with full diagnostics.

use miette::Diagnostic;
use thiserror::Error;

use crate::export::ExportError;
use crate::index::IndexError;
use crate::ingest::IngestError;
use crate::llm::LlmError;
use crate::paths::PathError;

/// Top-level error type, wrapping each subsystem's error.
#[derive(Debug, Error, Diagnostic)]
pub enum QuillError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),
}

/// Convenience alias for functions returning quillmate results.
pub type QuillResult<T> = std::result::Result<T, QuillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn llm_error_converts_to_quill_error() {
        let err = LlmError::RequestFailed {
            message: "connection refused".into(),
        };
        let quill: QuillError = err.into();
        assert!(matches!(quill, QuillError::Llm(LlmError::RequestFailed { .. })));
    }

    #[test]
    fn ingest_error_converts_to_quill_error() {
        let err = IngestError::UnsupportedType {
            extension: ".png".into(),
        };
        let quill: QuillError = err.into();
        assert!(matches!(
            quill,
            QuillError::Ingest(IngestError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn export_error_display_is_descriptive() {
        let err = ExportError::EmptyText;
        let quill: QuillError = err.into();
        let msg = format!("{quill}");
        assert!(msg.contains("no text"), "unexpected message: {msg}");
    }
}
