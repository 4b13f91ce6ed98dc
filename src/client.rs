//! HTTP client for the extraction endpoint.
//!
//! Used by the `pdf2json` front-end, and usable from any Rust program that
//! wants to talk to a running server instead of embedding the service.
//!
//! ```rust,no_run
//! use edgequake_pdf2json::{ClientConfig, ExtractorClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ExtractorClient::new(ClientConfig::default())?;
//! let bytes = std::fs::read("form.pdf")?;
//! let json = client.extract("form.pdf", bytes).await?;
//! println!("{}", serde_json::to_string_pretty(&json)?);
//! # Ok(())
//! # }
//! ```

use crate::config::ClientConfig;
use crate::error::ClientError;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Default MIME type declared for uploads.
pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Deserialize)]
struct HealthBody {
    message: String,
}

/// Talks to `POST /extract` and `GET /` on one backend. No retries.
#[derive(Debug, Clone)]
pub struct ExtractorClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ExtractorClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Unexpected(format!("Failed to build HTTP client: {}", e)))?;
        let config = ClientConfig {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ..config
        };
        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Upload `bytes` as `application/pdf` and return the response JSON.
    pub async fn extract(
        &self,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Value, ClientError> {
        self.extract_with_mime(file_name, bytes, PDF_MIME).await
    }

    /// Upload `bytes` declaring `mime`. The server rejects anything other
    /// than `application/pdf`; this exists so callers can pass through what
    /// they were given.
    pub async fn extract_with_mime(
        &self,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<Value, ClientError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.into())
            .mime_str(mime)
            .map_err(|e| ClientError::Unexpected(format!("Invalid MIME type '{}': {}", mime, e)))?;
        let form = Form::new().part("file", part);

        let url = format!("{}/extract", self.config.base_url);
        debug!("POST {}", url);
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(|e| self.classify(e))?;
            return Err(ClientError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| self.classify(e))
    }

    /// `GET /` and return its `message`.
    pub async fn health(&self) -> Result<String, ClientError> {
        let url = format!("{}/", self.config.base_url);
        let response = self.http.get(&url).send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(|e| self.classify(e))?;
            return Err(ClientError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let body: HealthBody = response.json().await.map_err(|e| self.classify(e))?;
        Ok(body.message)
    }

    fn classify(&self, e: reqwest::Error) -> ClientError {
        if e.is_connect() {
            ClientError::Connection {
                url: self.config.base_url.clone(),
            }
        } else if e.is_timeout() {
            ClientError::Timeout {
                secs: self.config.timeout_secs,
            }
        } else {
            ClientError::Unexpected(e.to_string())
        }
    }
}
