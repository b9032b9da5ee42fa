pub mod cad;
pub mod docx;
pub mod pdf;

use std::fs;
use std::path::Path;
use tracing::warn;

/// Closed set of container formats the extractor understands. Everything
/// else is `Unknown` and goes straight to raw-byte hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    PlainText,
    Pdf,
    Docx,
    Unknown,
}

impl ContainerKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("txt") => ContainerKind::PlainText,
            Some("pdf") => ContainerKind::Pdf,
            Some("docx") => ContainerKind::Docx,
            _ => ContainerKind::Unknown,
        }
    }

    pub fn is_text_bearing(self) -> bool {
        self != ContainerKind::Unknown
    }
}

/// Result of one extraction attempt. Consumed by exhaustive match in the
/// classifier; there is no error path here because every non-success
/// outcome falls back to raw-byte hashing.
#[derive(Debug)]
pub enum ExtractOutcome {
    /// Raw text pulled out of the container.
    Extracted(String),
    /// Not a text-bearing format; raw-byte hashing applies.
    NotApplicable,
    /// The vector-origin heuristic flagged the document before extraction.
    VectorOrigin,
    /// The container claims to carry text but could not be parsed.
    Failed,
}

/// Attempt raw-text extraction for a path. PDF files are screened by the
/// vector-origin heuristic before any text is pulled out of them.
pub fn extract(path: &Path, vector_ops_threshold: usize) -> ExtractOutcome {
    match ContainerKind::from_path(path) {
        ContainerKind::Unknown => ExtractOutcome::NotApplicable,
        ContainerKind::PlainText => match fs::read(path) {
            Ok(bytes) => ExtractOutcome::Extracted(String::from_utf8_lossy(&bytes).into_owned()),
            Err(err) => {
                warn!("Failed to read {}: {}", path.display(), err);
                ExtractOutcome::Failed
            }
        },
        ContainerKind::Pdf => match pdf::load(path) {
            Ok(doc) => {
                if cad::is_vector_origin(&doc, vector_ops_threshold) {
                    ExtractOutcome::VectorOrigin
                } else {
                    match pdf::document_text(&doc) {
                        Ok(text) => ExtractOutcome::Extracted(text),
                        Err(err) => {
                            warn!("Failed to extract text from {}: {}", path.display(), err);
                            ExtractOutcome::Failed
                        }
                    }
                }
            }
            Err(err) => {
                warn!("Failed to open PDF {}: {}", path.display(), err);
                ExtractOutcome::Failed
            }
        },
        ContainerKind::Docx => match docx::document_text(path) {
            Ok(text) => ExtractOutcome::Extracted(text),
            Err(err) => {
                warn!("Failed to extract text from {}: {}", path.display(), err);
                ExtractOutcome::Failed
            }
        },
    }
}
