//! HTTP endpoint over [`crate::service::ExtractionService`].
//!
//! ```text
//! GET  /         → {"message": "PDF Extractor API is running"}
//! POST /extract  → multipart field `file` (application/pdf)
//!                  200 parsed JSON, or {"error", "raw_output"} envelope
//!                  400 / 502 / 503 / 500 with {"detail": string}
//! ```
//!
//! The service is built by the caller and handed in through [`AppState`].
//! When it could not be built the router still starts and answers every
//! extraction with 503.

mod error;
mod handlers;
mod state;
mod upload;

pub use error::ApiError;
pub use state::{AppState, ServiceHandle};

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Message returned by `GET /`.
pub const HEALTH_MESSAGE: &str = "PDF Extractor API is running";

/// Build the router. Any origin, method and header is allowed.
pub fn router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.body_limit_bytes());

    Router::new()
        .route("/", get(handlers::health))
        .route("/extract", post(handlers::extract))
        .layer(body_limit)
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Serve [`router`] on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
