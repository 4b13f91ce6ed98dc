//! Terminal front-end for edgequake-pdf2json.
//!
//! Uploads a PDF to a running `pdf2json-server`, shows a spinner while the
//! backend works, then prints the extracted JSON and optionally saves it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use edgequake_pdf2json::{ClientConfig, ClientError, ExtractorClient};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const DEFAULT_DOWNLOAD_NAME: &str = "extracted_data.json";

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract and print
  pdf2json extract application.pdf

  # Extract and save to extracted_data.json
  pdf2json extract application.pdf -o

  # Extract and save to a chosen path
  pdf2json extract application.pdf -o out/application.json

  # Talk to a remote backend
  pdf2json --server http://10.0.0.5:8000 extract form.pdf

  # Is the backend up?
  pdf2json health

EXIT CODES:
  0  success
  1  unexpected error (bad input file, undecodable response)
  2  processing error (backend answered with an error status)
  3  connection error (backend unreachable or timed out)

ENVIRONMENT VARIABLES:
  PDF2JSON_SERVER     Backend base URL (default http://127.0.0.1:8000)
  PDF2JSON_TIMEOUT    Request timeout in seconds (default 300)
"#;

/// Extract structured JSON from PDF forms.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2json",
    version,
    about = "Extract structured JSON from PDF forms",
    long_about = "Upload a text-based PDF form to a pdf2json-server backend and get its \
content back as key/value JSON. Start the backend first with `pdf2json-server`.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Backend base URL.
    #[arg(long, global = true, env = "PDF2JSON_SERVER", default_value = "http://127.0.0.1:8000")]
    server: String,

    /// Request timeout in seconds.
    #[arg(long, global = true, env = "PDF2JSON_TIMEOUT", default_value_t = 300)]
    timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDF2JSON_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a PDF and print the extracted JSON.
    Extract {
        /// PDF file to upload.
        file: PathBuf,

        /// Also save the JSON. Without a value, saves to extracted_data.json.
        #[arg(
            short,
            long,
            num_args = 0..=1,
            default_missing_value = DEFAULT_DOWNLOAD_NAME
        )]
        output: Option<PathBuf>,

        /// Do not show the spinner.
        #[arg(long, env = "PDF2JSON_NO_PROGRESS")]
        no_progress: bool,
    },
    /// Check that the backend is running.
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let (message, code) = describe_failure(&e);
            eprintln!("{} {}", red("✘"), message);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = ExtractorClient::new(
        ClientConfig::new(&cli.server).with_timeout_secs(cli.timeout),
    )?;

    match cli.command {
        Command::Health => {
            let message = client.health().await?;
            println!("{} {}", green("✔"), message);
            Ok(())
        }
        Command::Extract {
            file,
            output,
            no_progress,
        } => extract(&client, &file, output.as_deref(), !no_progress).await,
    }
}

async fn extract(
    client: &ExtractorClient,
    file: &Path,
    output: Option<&Path>,
    show_progress: bool,
) -> Result<()> {
    ensure_pdf_extension(file)?;
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.pdf".to_string());

    let spinner = show_progress.then(|| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_message("Analyzing document... This may take a moment.");
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    });

    let result = client.extract(file_name, bytes).await;
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    let value = result?;

    eprintln!("{} {}", green("✔"), bold("Extraction Complete!"));
    let rendered = to_pretty_json(&value)?;
    println!("{rendered}");

    if let Some(path) = output {
        tokio::fs::write(path, &rendered)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("   {} {}", dim("saved to"), bold(&path.display().to_string()));
    }
    Ok(())
}

/// Only `.pdf` files are offered for upload.
fn ensure_pdf_extension(file: &Path) -> Result<()> {
    let is_pdf = file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        anyhow::bail!("Only .pdf files can be uploaded (got {})", file.display());
    }
    Ok(())
}

/// Serialise with a four-space indent.
fn to_pretty_json(value: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .context("Failed to serialise JSON")?;
    String::from_utf8(buf).context("Serialised JSON was not UTF-8")
}

/// Message and exit code for a failed run.
fn describe_failure(e: &anyhow::Error) -> (String, u8) {
    match e.downcast_ref::<ClientError>() {
        Some(ce) if ce.is_connectivity() => (format!("Connection Error: {ce}"), 3),
        Some(ce @ ClientError::Backend { .. }) => (format!("Processing Error: {ce}"), 2),
        // Already reads "An unexpected error occurred: …".
        Some(ce) => (ce.to_string(), 1),
        None => (format!("An unexpected error occurred: {e:#}"), 1),
    }
}
