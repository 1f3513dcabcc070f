//! Document text extraction.
//!
//! Turns an uploaded blob into plain text. Dispatch is driven by the declared
//! MIME type; the only file-name check is the `.docx` suffix fallback for
//! Word documents whose browser-reported type is missing or generic.
//!
//! PDF and DOCX parsing is CPU-bound and runs inside `spawn_blocking`.

pub mod docx;
pub mod pdf;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info};

pub const MIME_PLAIN_TEXT: &str = "text/plain";
pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOCX_SUFFIX: &str = ".docx";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {declared_type}")]
    UnsupportedType { declared_type: String },

    #[error("PDF could not be read: {0}")]
    PdfUnreadable(String),

    #[error("DOCX could not be read: {0}")]
    DocxUnreadable(String),
}

impl ExtractionError {
    /// Message shown to the user, with a format-specific remediation hint.
    pub fn user_message(&self) -> &'static str {
        match self {
            ExtractionError::UnsupportedType { .. } => {
                "Unsupported file format. Please upload PDF, DOCX, or TXT."
            }
            ExtractionError::PdfUnreadable(_) => {
                "Could not extract text from PDF. Please ensure it is a valid text-based PDF."
            }
            ExtractionError::DocxUnreadable(_) => "Could not extract text from DOCX.",
        }
    }
}

/// The formats the extractor knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Resolves the document kind from the declared MIME type, falling back
    /// to the `.docx` suffix. Never looks at the file contents.
    pub fn detect(declared_type: &str, file_name: &str) -> Result<Self, ExtractionError> {
        match declared_type {
            MIME_PLAIN_TEXT => Ok(DocumentKind::PlainText),
            MIME_PDF => Ok(DocumentKind::Pdf),
            MIME_DOCX => Ok(DocumentKind::Docx),
            _ if file_name.ends_with(DOCX_SUFFIX) => Ok(DocumentKind::Docx),
            other => Err(ExtractionError::UnsupportedType {
                declared_type: other.to_string(),
            }),
        }
    }
}

/// A file handed over by the presentation layer.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub declared_type: String,
    pub data: Bytes,
}

/// Extracts plain text from an uploaded file.
///
/// Unsupported types fail before the payload is touched.
pub async fn extract(file: &UploadedFile) -> Result<String, ExtractionError> {
    let kind = DocumentKind::detect(&file.declared_type, &file.file_name)?;
    debug!(
        "Extracting {:?} from '{}' ({} bytes)",
        kind,
        file.file_name,
        file.data.len()
    );

    let text = match kind {
        DocumentKind::PlainText => decode_plain_text(&file.data),
        DocumentKind::Pdf => {
            let data = file.data.clone();
            tokio::task::spawn_blocking(move || pdf::extract_text(&data))
                .await
                .map_err(|e| ExtractionError::PdfUnreadable(format!("worker failed: {e}")))??
        }
        DocumentKind::Docx => {
            let data = file.data.clone();
            tokio::task::spawn_blocking(move || docx::extract_text(&data))
                .await
                .map_err(|e| ExtractionError::DocxUnreadable(format!("worker failed: {e}")))??
        }
    };

    info!(
        "Extracted {} chars from '{}' ({:?})",
        text.chars().count(),
        file.file_name,
        kind
    );
    Ok(text)
}

/// Plain text is taken verbatim; invalid UTF-8 sequences become U+FFFD.
fn decode_plain_text(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}
