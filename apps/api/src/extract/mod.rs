//! File text extraction: turns an uploaded PDF or plain-text resume into a string.

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

pub mod handlers;

pub const PDF_MIME: &str = "application/pdf";
pub const TEXT_MIME: &str = "text/plain";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}. Please upload a PDF or TXT file.")]
    UnsupportedType(String),

    #[error("Error reading file.")]
    Read,

    #[error("Error processing file: {0}")]
    Pdf(String),
}

/// An upload as received: declared MIME type plus raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    PlainText,
}

impl FileKind {
    /// Matches on the MIME essence; parameters such as `charset` are ignored.
    pub fn from_mime(mime: &str) -> Result<Self, ExtractError> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            PDF_MIME => Ok(FileKind::Pdf),
            TEXT_MIME => Ok(FileKind::PlainText),
            _ => Err(ExtractError::UnsupportedType(mime.to_string())),
        }
    }
}

/// Extracts plain text. The type is checked before any byte is read.
pub async fn extract_text(file: &UploadedFile) -> Result<String, ExtractError> {
    let kind = FileKind::from_mime(&file.mime_type)?;
    debug!(file = %file.file_name, ?kind, size = file.bytes.len(), "Extracting text");

    match kind {
        FileKind::PlainText => String::from_utf8(file.bytes.to_vec()).map_err(|e| {
            warn!(file = %file.file_name, "Text upload is not valid UTF-8: {e}");
            ExtractError::Read
        }),
        FileKind::Pdf => {
            let bytes = file.bytes.clone();
            // pdf-extract is CPU-bound and may panic on hostile input; keep it off the runtime.
            tokio::task::spawn_blocking(move || extract_pdf(&bytes))
                .await
                .map_err(|e| {
                    warn!(file = %file.file_name, "PDF extraction aborted: {e}");
                    ExtractError::Read
                })?
        }
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;
    Ok(join_pages(&pages))
}

/// Each page's text runs joined by single spaces, each page terminated by a newline.
fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| {
            let runs: Vec<&str> = page
                .lines()
                .map(str::trim)
                .filter(|run| !run.is_empty())
                .collect();
            format!("{}\n", runs.join(" "))
        })
        .collect()
}
