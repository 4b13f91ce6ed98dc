//! HTTP server binary for edgequake-pdf2json.
//!
//! Builds the extraction service from flags/env, then serves the axum router.
//! A service that cannot be built (no API key, bad config) does not stop the
//! server: it starts anyway and answers extractions with 503.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2json::config::{GROQ_BASE_URL, DEFAULT_MODEL};
use edgequake_pdf2json::credentials::DEFAULT_CREDENTIAL_VAR;
use edgequake_pdf2json::server::{self, AppState, ServiceHandle};
use edgequake_pdf2json::{ExtractionConfig, ExtractionService, ServerConfig};
use std::io;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on the default address (http://127.0.0.1:8000)
  pdf2json-server

  # Listen on all interfaces, port 9000
  pdf2json-server --host 0.0.0.0 --port 9000

  # Use a custom extraction prompt
  pdf2json-server --system-prompt prompts/invoice.txt

  # Any OpenAI-compatible endpoint
  pdf2json-server --api-base-url http://localhost:11434/v1 --model llama3.1

ENDPOINTS:
  GET  /         health check
  POST /extract  multipart upload, field "file", content type application/pdf

ENVIRONMENT VARIABLES:
  GROQ_API_KEY        Groq API key (a .env file in the working directory wins)
  PDF2JSON_HOST       Bind host
  PDF2JSON_PORT       Bind port
  PDF2JSON_MODEL      Model ID
  RUST_LOG            Log filter, overrides --verbose / --quiet
"#;

/// Serve the PDF-to-JSON extraction API.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2json-server",
    version,
    about = "Serve the PDF-to-JSON extraction API",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Bind host.
    #[arg(long, env = "PDF2JSON_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Bind port.
    #[arg(short, long, env = "PDF2JSON_PORT", default_value_t = 8000)]
    port: u16,

    /// Maximum upload size in MiB.
    #[arg(long, env = "PDF2JSON_BODY_LIMIT_MB", default_value_t = 50)]
    body_limit_mb: usize,

    /// Model ID.
    #[arg(long, env = "PDF2JSON_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "PDF2JSON_TEMPERATURE", default_value_t = 0.0)]
    temperature: f32,

    /// Max output tokens per extraction.
    #[arg(long, env = "PDF2JSON_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "PDF2JSON_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// OpenAI-compatible API base URL.
    #[arg(long, env = "PDF2JSON_API_BASE_URL", default_value = GROQ_BASE_URL)]
    api_base_url: String,

    /// Upstream call timeout in seconds.
    #[arg(long, env = "PDF2JSON_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Environment variable holding the API key.
    #[arg(long, env = "PDF2JSON_CREDENTIAL_VAR", default_value = DEFAULT_CREDENTIAL_VAR)]
    credential_var: String,

    /// `.env` file consulted before the process environment.
    #[arg(long, env = "PDF2JSON_ENV_FILE", default_value = ".env")]
    env_file: PathBuf,

    /// Ignore `.env` files; read the key from the process environment only.
    #[arg(long)]
    no_env_file: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2JSON_VERBOSE")]
    verbose: bool,

    /// Log errors only.
    #[arg(short, long, env = "PDF2JSON_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let server_config = ServerConfig {
        host: cli.host.clone(),
        port: cli.port,
        body_limit_bytes: cli.body_limit_mb.saturating_mul(1024 * 1024),
    };
    let addr = server_config.socket_addr()?;

    let handle = match build_config(&cli).await {
        Ok(config) => ServiceHandle::from_result(ExtractionService::from_config(config)),
        Err(e) => ServiceHandle::Unavailable {
            reason: format!("{:#}", e),
        },
    };
    match &handle {
        ServiceHandle::Ready(_) => info!("Extraction service ready"),
        ServiceHandle::Unavailable { reason } => {
            error!("Failed to initialise extraction service: {}", reason);
            warn!("Serving anyway; POST /extract will answer 503 until restarted");
        }
    }

    let state = AppState::new(handle).with_body_limit(server_config.body_limit_bytes);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    server::serve(listener, state, shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
async fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .model(&cli.model)
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .api_base_url(&cli.api_base_url)
        .api_timeout_secs(cli.api_timeout)
        .credential_env(
            &cli.credential_var,
            (!cli.no_env_file).then(|| cli.env_file.clone()),
        );

    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }

    builder.build().context("Invalid configuration")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, draining connections");
}
