use crate::config::ServerConfig;
use crate::error::Pdf2JsonError;
use crate::service::ExtractionService;
use std::sync::Arc;

/// The result of building the service at startup.
#[derive(Debug, Clone)]
pub enum ServiceHandle {
    Ready(Arc<ExtractionService>),
    /// Startup failed; `reason` is logged, never sent to clients.
    Unavailable { reason: String },
}

impl ServiceHandle {
    /// Turn a construction result into a handle.
    pub fn from_result(result: Result<ExtractionService, Pdf2JsonError>) -> Self {
        match result {
            Ok(service) => ServiceHandle::Ready(Arc::new(service)),
            Err(e) => ServiceHandle::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}

/// Shared application state accessible from all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub(crate) service: ServiceHandle,
    body_limit_bytes: usize,
}

impl AppState {
    pub fn new(service: ServiceHandle) -> Self {
        Self {
            service,
            body_limit_bytes: ServerConfig::default().body_limit_bytes,
        }
    }

    pub fn ready(service: ExtractionService) -> Self {
        Self::new(ServiceHandle::Ready(Arc::new(service)))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::new(ServiceHandle::Unavailable {
            reason: reason.into(),
        })
    }

    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit_bytes = bytes;
        self
    }

    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_bytes
    }
}
