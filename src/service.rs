//! The extraction service: PDF bytes in, model text (or parsed JSON) out.
//!
//! ## Request lifecycle
//!
//! ```text
//! resolve credential ──▶ extract text ──▶ one chat call ──▶ raw text
//!   (MissingCredential)   (NoExtractableText)  (Upstream)
//! ```
//!
//! Every failure before the chat call happens without touching the network.
//! Both steps before it read files or parse, so they run on the blocking pool.
//! The service holds no mutable state; share it behind an `Arc`.

use crate::config::ExtractionConfig;
use crate::credentials::ApiKey;
use crate::error::Pdf2JsonError;
use crate::pipeline::llm::{self, ModelTarget};
use crate::pipeline::normalize::{self, ExtractionResult};
use crate::pipeline::text;
use edgequake_llm::{ChatMessage, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Turns uploaded PDFs into model output.
#[derive(Debug)]
pub struct ExtractionService {
    config: ExtractionConfig,
}

impl ExtractionService {
    /// Build a service that sends every request to `provider`.
    ///
    /// # Errors
    /// [`Pdf2JsonError::MissingCredential`] when no key can be resolved now.
    pub fn new(
        config: ExtractionConfig,
        provider: Arc<dyn LLMProvider>,
    ) -> Result<Self, Pdf2JsonError> {
        Self::from_config(ExtractionConfig {
            provider: Some(provider),
            ..config
        })
    }

    /// Build a service from `config` alone. Without an injected provider, an
    /// OpenAI-compatible one for `api_base_url` is built on every call.
    pub fn from_config(config: ExtractionConfig) -> Result<Self, Pdf2JsonError> {
        let service = Self { config };
        service.resolve_credential()?;
        info!(
            "Extraction service initialised (provider: {}, model: {})",
            service
                .config
                .provider
                .as_ref()
                .map(|p| p.name())
                .unwrap_or(service.config.api_base_url.as_str()),
            service.config.model
        );
        Ok(service)
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Resolve the key as it is right now.
    ///
    /// May read the `.env` file. [`Self::extract_raw`] runs the same lookup on
    /// the blocking pool at the start of every extraction, so a rotated key
    /// takes effect on the next request.
    pub fn resolve_credential(&self) -> Result<ApiKey, Pdf2JsonError> {
        self.config.credentials.resolve()
    }

    /// Extract text from `pdf` and return the model's reply verbatim.
    ///
    /// `prompt_override` replaces the configured system prompt for this call.
    ///
    /// # Errors
    /// - [`Pdf2JsonError::MissingCredential`]: key absent now
    /// - [`Pdf2JsonError::NotAPdf`] / [`Pdf2JsonError::CorruptPdf`]: unreadable upload
    /// - [`Pdf2JsonError::NoExtractableText`]: no text layer on any page
    /// - [`Pdf2JsonError::Upstream`]: the model call failed
    pub async fn extract_raw(
        &self,
        pdf: Vec<u8>,
        prompt_override: Option<&str>,
    ) -> Result<String, Pdf2JsonError> {
        let start = Instant::now();
        let source = self.config.credentials.clone();
        let api_key = tokio::task::spawn_blocking(move || source.resolve())
            .await
            .map_err(|e| Pdf2JsonError::Internal(format!("Credential task panicked: {}", e)))??;

        info!("Extracting text from PDF ({} bytes)...", pdf.len());
        let document_text = text::extract_text(pdf).await?;
        if document_text.trim().is_empty() {
            return Err(Pdf2JsonError::NoExtractableText);
        }

        let target = ModelTarget::for_request(&self.config, &api_key);
        info!(
            "Extracted {} characters from PDF. Sending to {}...",
            document_text.chars().count(),
            target.label
        );

        let messages = self.messages_for(&document_text, prompt_override);
        let options = llm::build_options(&self.config);
        let response =
            llm::call_model(&target, &messages, &options, self.config.api_timeout_secs).await?;

        info!(
            "Received response from {} ({} in / {} out tokens, {}ms)",
            target.label,
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed().as_millis()
        );
        Ok(response.content)
    }

    /// [`Self::extract_raw`] followed by fence stripping and JSON parsing.
    pub async fn extract(&self, pdf: Vec<u8>) -> Result<ExtractionResult, Pdf2JsonError> {
        let raw = self.extract_raw(pdf, None).await?;
        Ok(normalize::parse_model_output(&raw))
    }

    fn messages_for(&self, document_text: &str, prompt_override: Option<&str>) -> Vec<ChatMessage> {
        let system_prompt =
            prompt_override.unwrap_or_else(|| self.config.effective_system_prompt());
        llm::build_messages(system_prompt, document_text)
    }
}
