use crate::error::Pdf2JsonError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

pub(crate) const NOT_INITIALISED: &str = "Service not initialized properly";
pub(crate) const INVALID_FILE_TYPE: &str = "Invalid file type. Only PDF is allowed.";
pub(crate) const INTERNAL: &str = "An internal server error occurred.";

/// An error response: a status plus `{"detail": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn unavailable() -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, NOT_INITIALISED)
    }
}

impl From<Pdf2JsonError> for ApiError {
    fn from(e: Pdf2JsonError) -> Self {
        match e {
            Pdf2JsonError::Upstream { .. } => Self::new(StatusCode::BAD_GATEWAY, e.to_string()),
            Pdf2JsonError::MissingCredential { .. } => {
                error!("Credential unavailable during extraction: {}", e);
                Self::new(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
            e if e.is_input_error() => Self::bad_request(e.to_string()),
            e => {
                error!("Unexpected error during extraction: {}", e);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}
