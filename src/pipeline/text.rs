//! Text extraction: PDF bytes → one newline-joined string.
//!
//! ## Why spawn_blocking?
//!
//! Parsing the xref table and decoding content streams is CPU-bound and can
//! take hundreds of milliseconds on a large form. Running it on the blocking
//! pool keeps the Tokio workers free to accept other uploads meanwhile.
//!
//! ## What this does not do
//!
//! No layout reconstruction, no table detection, no OCR. Text is taken from
//! each page's content stream in page order; a page without a text layer
//! simply contributes nothing.

use crate::error::Pdf2JsonError;
use lopdf::Document;
use tracing::{debug, info, warn};

/// Extract the text of every page, off the async executor.
pub async fn extract_text(bytes: Vec<u8>) -> Result<String, Pdf2JsonError> {
    tokio::task::spawn_blocking(move || extract_text_blocking(&bytes))
        .await
        .map_err(|e| Pdf2JsonError::Internal(format!("Text extraction task panicked: {}", e)))?
}

/// Blocking implementation of text extraction.
///
/// Pages whose text is empty (after trimming trailing whitespace) or whose
/// content stream cannot be decoded are skipped. Surviving pages are joined
/// with `\n`. A document with no text anywhere yields `""`; deciding whether
/// that is an error is left to the caller.
pub fn extract_text_blocking(bytes: &[u8]) -> Result<String, Pdf2JsonError> {
    if !bytes.starts_with(b"%PDF") {
        return Err(Pdf2JsonError::NotAPdf {
            magic: bytes.iter().take(4).copied().collect(),
        });
    }

    let document = Document::load_mem(bytes).map_err(|e| Pdf2JsonError::CorruptPdf {
        detail: e.to_string(),
    })?;

    let pages = document.get_pages();
    info!("PDF loaded: {} pages", pages.len());

    let mut parts: Vec<String> = Vec::with_capacity(pages.len());
    for &page_num in pages.keys() {
        match document.extract_text(&[page_num]) {
            Ok(text) => {
                let text = text.trim_end();
                if text.is_empty() {
                    debug!("Page {}: no text layer, skipping", page_num);
                } else {
                    debug!("Page {}: {} chars", page_num, text.len());
                    parts.push(text.to_string());
                }
            }
            Err(e) => warn!("Page {}: text extraction failed ({}), skipping", page_num, e),
        }
    }

    Ok(parts.join("\n"))
}
