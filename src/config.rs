//! Configuration types for extraction, the HTTP endpoint and the API client.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. The endpoint and the client each get a
//! small plain struct ([`ServerConfig`], [`ClientConfig`]) since they only
//! carry addresses and limits.

use crate::credentials::{ApiKey, CredentialSource};
use crate::error::Pdf2JsonError;
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Default Groq OpenAI-compatible endpoint.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default upstream model.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Configuration for the extraction service.
///
/// # Example
/// ```rust
/// use edgequake_pdf2json::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .model("llama-3.1-8b-instant")
///     .max_tokens(2048)
///     .build()
///     .unwrap();
/// assert_eq!(config.temperature, 0.0);
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Upstream model identifier. Default: `llama-3.3-70b-versatile`.
    pub model: String,

    /// Sampling temperature. Default: 0.0.
    ///
    /// Extraction must be repeatable: the same form should always produce the
    /// same JSON, so sampling is deterministic unless the caller opts out.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 4096.
    ///
    /// A dense multi-section form serialises to a few thousand tokens of JSON;
    /// too low a cap truncates the object and the reply will not parse.
    pub max_tokens: usize,

    /// Custom system prompt. If None, uses the built-in default.
    pub system_prompt: Option<String>,

    /// Base URL of the OpenAI-compatible API. Default: Groq.
    pub api_base_url: String,

    /// Per-call timeout for the upstream request in seconds. Default: 120.
    pub api_timeout_secs: u64,

    /// Where the API key is read from. Default: `GROQ_API_KEY` in `.env`,
    /// then in the process environment.
    pub credentials: CredentialSource,

    /// Pre-constructed LLM provider. When set, `api_base_url` and the
    /// credential are not used to build one per call.
    pub provider: Option<Arc<dyn LLMProvider>>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            max_tokens: 4096,
            system_prompt: None,
            api_base_url: GROQ_BASE_URL.to_string(),
            api_timeout_secs: 120,
            credentials: CredentialSource::default(),
            provider: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("system_prompt", &self.system_prompt.as_ref().map(|p| p.len()))
            .field("api_base_url", &self.api_base_url)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("credentials", &self.credentials)
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_string()))
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The system prompt that will be sent when no per-call override is given.
    pub fn effective_system_prompt(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn credentials(mut self, source: CredentialSource) -> Self {
        self.config.credentials = source;
        self
    }

    /// Use a fixed key instead of the environment.
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.config.credentials = CredentialSource::Static(key);
        self
    }

    /// Use this provider for every call instead of building one per call.
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    /// Read the key from `var`, optionally preferring a dotenv file.
    pub fn credential_env(mut self, var: impl Into<String>, dotenv_path: Option<PathBuf>) -> Self {
        self.config.credentials = CredentialSource::Environment {
            var: var.into(),
            dotenv_path,
        };
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, Pdf2JsonError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(Pdf2JsonError::InvalidConfig("Model must not be empty".into()));
        }
        if c.max_tokens == 0 {
            return Err(Pdf2JsonError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if !c.api_base_url.starts_with("http://") && !c.api_base_url.starts_with("https://") {
            return Err(Pdf2JsonError::InvalidConfig(format!(
                "API base URL must be http(s), got '{}'",
                c.api_base_url
            )));
        }
        if c.api_timeout_secs == 0 {
            return Err(Pdf2JsonError::InvalidConfig("API timeout must be ≥ 1s".into()));
        }
        Ok(self.config)
    }
}

/// Settings for the HTTP endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host. Default: 127.0.0.1.
    pub host: String,
    /// Bind port. Default: 8000.
    pub port: u16,
    /// Maximum accepted request body in bytes. Default: 50 MiB.
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            body_limit_bytes: 50 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Parse `host:port` into a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, Pdf2JsonError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                Pdf2JsonError::InvalidConfig(format!(
                    "Invalid bind address '{}:{}': {}",
                    self.host, self.port, e
                ))
            })
    }
}

/// Settings for [`crate::client::ExtractorClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL. Default: `http://127.0.0.1:8000`.
    pub base_url: String,
    /// Whole-request timeout in seconds. Default: 300.
    ///
    /// Request time is dominated by model latency on long forms, so this is
    /// deliberately generous.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 300,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}
