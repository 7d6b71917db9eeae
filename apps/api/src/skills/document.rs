//! Turns an uploaded resume into plain text for the extractor.
//!
//! Decoding never fails from the caller's point of view: an unreadable
//! document decodes to empty text, which extracts to an empty skill set.

use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeMethod {
    PdfText,
    PlainText,
    Failed,
}

#[derive(Debug, Clone)]
pub struct DecodedDocument {
    pub text: String,
    pub method: DecodeMethod,
}

impl DecodedDocument {
    fn failed() -> Self {
        Self {
            text: String::new(),
            method: DecodeMethod::Failed,
        }
    }
}

pub fn is_pdf(file_name: &str, content_type: Option<&str>) -> bool {
    content_type == Some("application/pdf") || file_name.to_lowercase().ends_with(".pdf")
}

/// Decodes raw upload bytes. CPU-bound for PDFs; call from `spawn_blocking`.
pub fn decode_document(file_name: &str, content_type: Option<&str>, bytes: &[u8]) -> DecodedDocument {
    if is_pdf(file_name, content_type) {
        return match pdf_extract::extract_text_from_mem(bytes) {
            Ok(text) => {
                debug!("Extracted {} chars of text from PDF {file_name}", text.len());
                DecodedDocument {
                    text,
                    method: DecodeMethod::PdfText,
                }
            }
            Err(e) => {
                warn!("PDF text extraction failed for {file_name}: {e}");
                DecodedDocument::failed()
            }
        };
    }

    DecodedDocument {
        text: String::from_utf8_lossy(bytes).into_owned(),
        method: DecodeMethod::PlainText,
    }
}

/// Runs `decode_document` on the blocking pool. A panic inside the PDF
/// parser is treated like any other decoding failure.
pub async fn decode_document_blocking(
    file_name: String,
    content_type: Option<String>,
    bytes: bytes::Bytes,
) -> DecodedDocument {
    let name_for_log = file_name.clone();
    tokio::task::spawn_blocking(move || decode_document(&file_name, content_type.as_deref(), &bytes))
        .await
        .unwrap_or_else(|e| {
            warn!("Document decoding task for {name_for_log} aborted: {e}");
            DecodedDocument::failed()
        })
}
