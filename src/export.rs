//! PDF export: renders generated text to a single-column PDF.
//!
//! One input line maps to one word-wrapped paragraph, A4 pages, builtin
//! Helvetica, fixed margins. Output goes to a caller-supplied path; the
//! HTTP surface points this at an ephemeral temp file.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use miette::Diagnostic;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use thiserror::Error;

/// A4 page size in millimetres.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

/// Page margin on all sides.
const MARGIN_MM: f32 = 15.0;

/// Font size and line advance.
const FONT_SIZE_PT: f32 = 12.0;
const LINE_HEIGHT_MM: f32 = 7.0;

/// Wrap column for Helvetica 12pt inside the printable width.
const WRAP_COLUMNS: usize = 90;

/// Errors from PDF export.
#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("no text provided to export")]
    #[diagnostic(
        code(quill::export::empty_text),
        help("Provide non-empty text to render.")
    )]
    EmptyText,

    #[error("PDF rendering failed: {message}")]
    #[diagnostic(
        code(quill::export::render),
        help("The PDF backend rejected the document. This is a bug worth reporting.")
    )]
    Render { message: String },

    #[error("failed to write PDF file")]
    #[diagnostic(
        code(quill::export::io),
        help("Check free disk space and permissions on the output path.")
    )]
    Io {
        #[source]
        source: std::io::Error,
    },
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// The rendered lines for a text: each input line word-wrapped at
/// [`WRAP_COLUMNS`], blank input lines kept as empty entries (paragraph
/// spacing).
pub fn wrapped_lines(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.split('\n') {
        let line = line.trim_end();
        if line.trim().is_empty() {
            out.push(String::new());
            continue;
        }
        out.extend(wrap_line(line, WRAP_COLUMNS));
    }
    out
}

/// Word-wrap one line at `columns` characters, hard-splitting words longer
/// than a full line.
fn wrap_line(line: &str, columns: usize) -> Vec<String> {
    let mut wrapped = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in line.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > columns {
            // Flush, then hard-split the oversized word.
            if !current.is_empty() {
                wrapped.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(columns) {
                wrapped.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { word_len + 1 };
        if current_len + needed > columns {
            wrapped.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        wrapped.push(current);
    }
    wrapped
}

/// Render `text` to a PDF at `out`.
///
/// Empty or whitespace-only input is rejected rather than producing an
/// empty document.
pub fn render_pdf(text: &str, out: &Path) -> ExportResult<()> {
    if text.trim().is_empty() {
        return Err(ExportError::EmptyText);
    }

    let (doc, first_page, first_layer) = PdfDocument::new(
        "quillmate export",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "text",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Render {
            message: e.to_string(),
        })?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    for line in wrapped_lines(text) {
        if y < MARGIN_MM + LINE_HEIGHT_MM {
            let (page, layer_idx) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "text");
            layer = doc.get_page(page).get_layer(layer_idx);
            y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        if !line.is_empty() {
            layer.use_text(line, FONT_SIZE_PT, Mm(MARGIN_MM), Mm(y), &font);
        }
        y -= LINE_HEIGHT_MM;
    }

    let file = File::create(out).map_err(|e| ExportError::Io { source: e })?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| ExportError::Render {
            message: e.to_string(),
        })?;
    Ok(())
}
