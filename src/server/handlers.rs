use super::error::{ApiError, INVALID_FILE_TYPE};
use super::state::{AppState, ServiceHandle};
use super::upload;
use super::HEALTH_MESSAGE;
use crate::pipeline::normalize;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::{info, warn};

pub async fn health() -> Json<Value> {
    Json(json!({ "message": HEALTH_MESSAGE }))
}

/// `POST /extract`.
///
/// Checks run in a fixed order: service readiness, form shape, declared
/// content type. Only then is the document handed to the service.
pub async fn extract(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let service = match &state.service {
        ServiceHandle::Ready(service) => service.clone(),
        ServiceHandle::Unavailable { reason } => {
            warn!("Rejecting extraction, service unavailable: {}", reason);
            return Err(ApiError::unavailable());
        }
    };

    let multipart = multipart.map_err(|e| ApiError::new(e.status(), e.body_text()))?;
    let file = upload::parse_multipart(multipart).await?;

    if !file.declares_pdf() {
        info!(
            "Rejected upload '{}' with content type {:?}",
            file.filename, file.content_type
        );
        return Err(ApiError::bad_request(INVALID_FILE_TYPE));
    }

    info!("Received file: {} ({} bytes)", file.filename, file.data.len());
    let raw = service.extract_raw(file.data, None).await?;
    Ok(Json(normalize::parse_model_output(&raw).into_value()))
}
