//! # edgequake-pdf2json
//!
//! Turn text-based PDF forms into structured JSON with a hosted LLM.
//!
//! ## Why this crate?
//!
//! Form PDFs carry their content as text, but the labels, values and layout
//! differ from one issuer to the next. Instead of writing a parser per form,
//! this crate pulls the text layer out of the document and asks a chat model
//! (Groq's `llama-3.3-70b-versatile` by default) to return it as key/value
//! JSON. Section headings become nested objects; blank fields come back as
//! empty strings.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Text       per-page text via lopdf (CPU-bound, spawn_blocking)
//!  ├─ 2. Model      one chat call through edgequake-llm, temperature 0
//!  └─ 3. Normalize  strip ```json fences, parse, or wrap in an error envelope
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2json::{ExtractionConfig, ExtractionService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Key read from GROQ_API_KEY (or a .env file in the working directory)
//!     let service = ExtractionService::from_config(ExtractionConfig::default())?;
//!     let pdf = std::fs::read("form.pdf")?;
//!     let result = service.extract(pdf).await?;
//!     println!("{}", serde_json::to_string_pretty(&result)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | The `pdf2json` front-end (clap + anyhow + indicatif + tracing-subscriber) |
//! | `server` | on      | The axum endpoint in [`server`] and, with `cli`, the `pdf2json-server` binary |
//!
//! Library-only users can drop both:
//! ```toml
//! edgequake-pdf2json = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod pipeline;
pub mod prompts;
#[cfg(feature = "server")]
pub mod server;
pub mod service;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::ExtractorClient;
pub use config::{ClientConfig, ExtractionConfig, ExtractionConfigBuilder, ServerConfig};
pub use credentials::{ApiKey, CredentialSource};
pub use error::{ClientError, Pdf2JsonError};
pub use pipeline::normalize::ExtractionResult;
pub use service::ExtractionService;
