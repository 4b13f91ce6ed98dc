//! Error types for the edgequake-pdf2json library.
//!
//! Two error types reflect two distinct boundaries:
//!
//! * [`Pdf2JsonError`]: **Fatal** for one extraction: the request cannot be
//!   answered (no credential, unreadable PDF, no text layer, upstream failure).
//!   Returned as `Err(Pdf2JsonError)` from [`crate::service::ExtractionService`].
//!
//! * [`ClientError`]: what [`crate::client::ExtractorClient`] reports to the
//!   front-end, split so that "the backend is not reachable" can be told apart
//!   from "the backend answered with an error".
//!
//! A model reply that is not valid JSON is **not** an error anywhere in this
//! crate; see [`crate::pipeline::normalize::ExtractionResult::Unparsed`].

use thiserror::Error;

/// All fatal errors returned by the extraction service.
#[derive(Debug, Error)]
pub enum Pdf2JsonError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// The API key could not be resolved (absent or blank).
    #[error(
        "{var} not found in environment variables or .env file.\n\
Set it with: export {var}=<your key>"
    )]
    MissingCredential { var: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// The upload is not a PDF at all.
    #[error("File is not a valid PDF. First bytes: {magic:?}")]
    NotAPdf { magic: Vec<u8> },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF is corrupt: {detail}")]
    CorruptPdf { detail: String },

    /// Every page came back empty, almost always a scan without a text layer.
    #[error("No text could be extracted from the PDF. It may be a scanned image-only PDF.")]
    NoExtractableText,

    // ── Upstream errors ───────────────────────────────────────────────────
    /// The upstream model call failed (network, quota, bad response).
    #[error("Error processing document with {provider}: {message}")]
    Upstream { provider: String, message: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2JsonError {
    /// `true` for failures caused by the uploaded document itself.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Pdf2JsonError::NotAPdf { .. }
                | Pdf2JsonError::CorruptPdf { .. }
                | Pdf2JsonError::NoExtractableText
        )
    }
}

/// Errors surfaced by the HTTP API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend could not be reached at all.
    #[error("Could not connect to the backend server at {url}. Please ensure the backend is running.")]
    Connection { url: String },

    /// The backend accepted the connection but did not answer in time.
    #[error("The request to the backend timed out after {secs}s.")]
    Timeout { secs: u64 },

    /// The backend answered with a non-200 status.
    #[error("Backend Error ({status}): {body}")]
    Backend { status: u16, body: String },

    /// Anything else (undecodable body, request construction).
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl ClientError {
    /// `true` when the backend was never heard from (connect or timeout).
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ClientError::Connection { .. } | ClientError::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_names_the_variable() {
        let e = Pdf2JsonError::MissingCredential {
            var: "GROQ_API_KEY".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("GROQ_API_KEY not found"), "got: {msg}");
    }

    #[test]
    fn upstream_display_carries_message() {
        let e = Pdf2JsonError::Upstream {
            provider: "Groq".into(),
            message: "API returned HTTP 429: quota".into(),
        };
        assert_eq!(
            e.to_string(),
            "Error processing document with Groq: API returned HTTP 429: quota"
        );
    }

    #[test]
    fn input_error_classification() {
        assert!(Pdf2JsonError::NoExtractableText.is_input_error());
        assert!(Pdf2JsonError::CorruptPdf { detail: "xref".into() }.is_input_error());
        assert!(!Pdf2JsonError::Internal("boom".into()).is_input_error());
        assert!(!Pdf2JsonError::Upstream {
            provider: "Groq".into(),
            message: "down".into()
        }
        .is_input_error());
    }

    #[test]
    fn client_error_connectivity() {
        assert!(ClientError::Connection { url: "http://x".into() }.is_connectivity());
        assert!(ClientError::Timeout { secs: 300 }.is_connectivity());
        assert!(!ClientError::Backend {
            status: 502,
            body: "{}".into()
        }
        .is_connectivity());
        assert!(!ClientError::Unexpected("bad json".into()).is_connectivity());
    }

    #[test]
    fn backend_display() {
        let e = ClientError::Backend {
            status: 400,
            body: r#"{"detail":"Invalid file type. Only PDF is allowed."}"#.into(),
        };
        assert!(e.to_string().starts_with("Backend Error (400)"));
    }
}
