//! Model interaction: build the chat messages and make the one completion call.
//!
//! All prompt wording lives in [`crate::prompts`]. This module only decides
//! which provider answers and turns its failures into
//! [`Pdf2JsonError::Upstream`].
//!
//! ## Provider per call
//!
//! Unless a provider is injected through
//! [`crate::config::ExtractionConfigBuilder::provider`], a fresh
//! `OpenAIProvider` pointed at `api_base_url` is built for every extraction
//! from the key resolved for that request. A rotated key is therefore used on
//! the very next call. Groq and any other OpenAI-compatible server (vLLM,
//! Ollama, LiteLLM) work unchanged.
//!
//! No retry: a failed call is reported once to the caller.

use crate::config::{ExtractionConfig, GROQ_BASE_URL};
use crate::credentials::ApiKey;
use crate::error::Pdf2JsonError;
use crate::prompts;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, LLMResponse, OpenAIProvider};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// The provider answering one extraction, plus the name used in errors.
pub struct ModelTarget {
    pub provider: Arc<dyn LLMProvider>,
    pub label: String,
}

impl ModelTarget {
    /// The injected provider if any, else an OpenAI-compatible one for `api_key`.
    pub fn for_request(config: &ExtractionConfig, api_key: &ApiKey) -> Self {
        if let Some(ref provider) = config.provider {
            return Self {
                provider: Arc::clone(provider),
                label: provider.name().to_string(),
            };
        }

        let provider = OpenAIProvider::compatible(api_key.expose(), &config.api_base_url)
            .with_model(&config.model);
        let label = if config.api_base_url == GROQ_BASE_URL {
            "Groq"
        } else {
            "OpenAI-compatible API"
        };
        Self {
            provider: Arc::new(provider),
            label: label.to_string(),
        }
    }
}

/// System prompt followed by the document text as the user turn.
pub fn build_messages(system_prompt: &str, document_text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user(prompts::user_message(document_text)),
    ]
}

/// Build `CompletionOptions` from the extraction config.
pub fn build_options(config: &ExtractionConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

/// Send one chat request, bounded by `timeout_secs`.
pub async fn call_model(
    target: &ModelTarget,
    messages: &[ChatMessage],
    options: &CompletionOptions,
    timeout_secs: u64,
) -> Result<LLMResponse, Pdf2JsonError> {
    let start = Instant::now();
    let call = target.provider.chat(messages, Some(options));

    let message = match tokio::time::timeout(Duration::from_secs(timeout_secs), call).await {
        Ok(Ok(response)) => {
            debug!(
                "{} input tokens, {} output tokens, {:?}",
                response.prompt_tokens,
                response.completion_tokens,
                start.elapsed()
            );
            return Ok(response);
        }
        Ok(Err(e)) => e.to_string(),
        Err(_) => format!("Request timed out after {}s", timeout_secs),
    };

    error!("Error during {} API call: {}", target.label, message);
    Err(Pdf2JsonError::Upstream {
        provider: target.label.clone(),
        message,
    })
}
