//! CLI binary for docsum.
//!
//! A thin shim over the library crate that treats a local JSON file as the
//! triggering object and a local directory as the storage container.

use anyhow::{Context, Result};
use clap::Parser;
use docsum::{
    run_and_upload, DirStore, RunProgressCallback, RunStage, ServiceCredentials, SummaryConfig,
    SummaryFormat,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal spinner that narrates the orchestrator's state machine.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Summarizing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl RunProgressCallback for CliProgressCallback {
    fn on_run_start(&self, blob_name: &str) {
        self.bar.set_message(format!("loading {blob_name}"));
    }

    fn on_stage(&self, stage: RunStage) {
        match stage {
            RunStage::Skipped => self.bar.finish_and_clear(),
            RunStage::Uploaded => self.bar.finish_and_clear(),
            other => self.bar.set_message(other.to_string()),
        }
    }

    fn on_failure(&self, _stage: &str, _error: &str) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarize a batch into ./container/summary_report.json
  docsum batch.json --output-dir ./container

  # Numbered-list summary instead of JSON
  docsum batch.json --format numbered --output-dir ./container

  # Looser confidence threshold
  docsum batch.json --threshold 0.6 --output-dir ./container

  # Show what would be sent to the model, make no call
  docsum batch.json --dry-run

  # Print run statistics as JSON on stderr
  docsum batch.json --output-dir ./container --stats

ENVIRONMENT VARIABLES:
  DOCSUM_ENDPOINT_URL   Summarization service endpoint URL (required)
  DOCSUM_DEPLOYMENT     Deployment / model identifier (required)
  DOCSUM_API_KEY        Service API key (required)
  DOCSUM_CONTAINER_DIR  Default --output-dir

SETUP:
  1. export DOCSUM_ENDPOINT_URL=https://myresource.openai.azure.com
  2. export DOCSUM_DEPLOYMENT=gpt-4o
  3. export DOCSUM_API_KEY=…
  4. docsum batch.json --output-dir ./container
"#;

/// Summarize OCR document batches with LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "docsum",
    version,
    about = "Summarize OCR document batches with LLMs",
    long_about = "Reads an OCR document batch (JSON), filters low-confidence and low-value \
tokens, linearizes the survivors with per-page provenance markers, asks a chat-completions \
service for a summary, validates its shape, and writes summary_report.{json,txt} into the \
output directory.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the triggering batch JSON file.
    input: PathBuf,

    /// Directory acting as the storage container for the write-back.
    #[arg(short, long, env = "DOCSUM_CONTAINER_DIR")]
    output_dir: Option<PathBuf>,

    /// Summary shape: json or numbered.
    #[arg(long, env = "DOCSUM_FORMAT", default_value = "json")]
    format: FormatArg,

    /// Minimum OCR confidence a word must strictly exceed, in (0,1).
    #[arg(long, env = "DOCSUM_THRESHOLD", default_value_t = 0.8)]
    threshold: f64,

    /// Max tokens the model may generate.
    #[arg(long, env = "DOCSUM_MAX_TOKENS", default_value_t = 800)]
    max_tokens: u32,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "DOCSUM_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Per-call service timeout in seconds.
    #[arg(long, env = "DOCSUM_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "DOCSUM_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Print the linearized text that would be sent, then exit (no service
    /// call, no write-back, no credentials needed).
    #[arg(long)]
    dry_run: bool,

    /// Print run statistics as JSON on stderr.
    #[arg(long)]
    stats: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "DOCSUM_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCSUM_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOCSUM_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum FormatArg {
    Json,
    Numbered,
}

impl From<FormatArg> for SummaryFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Json => SummaryFormat::Json,
            FormatArg::Numbered => SummaryFormat::NumberedList,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the spinner is active; the
    // spinner narrates the stages that matter to an interactive user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.dry_run;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
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

    let blob_name = cli
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.input.display().to_string());
    let bytes = tokio::fs::read(&cli.input)
        .await
        .with_context(|| format!("Failed to read batch file {:?}", cli.input))?;

    // ── Dry-run mode ─────────────────────────────────────────────────────
    if cli.dry_run {
        use docsum::pipeline::{confidence, input, linearize, tokens};
        let batch = input::decode_batch(&blob_name, &bytes).context("Bad batch file")?;
        let confident = confidence::filter_batch(&batch, cli.threshold);
        let tokenized = tokens::filter_batch(&confident);
        let blob = linearize::linearize(&tokenized);
        io::stdout()
            .write_all(blob.as_bytes())
            .context("Failed to write to stdout")?;
        println!();
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let output_dir = cli
        .output_dir
        .clone()
        .context("No output directory: pass --output-dir or set DOCSUM_CONTAINER_DIR")?;

    let system_prompt = match cli.system_prompt {
        Some(ref path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read system prompt from {path:?}"))?,
        ),
        None => None,
    };

    let credentials = ServiceCredentials::from_env().context("Service credentials missing")?;

    let mut builder = SummaryConfig::builder()
        .format(cli.format.clone().into())
        .confidence_threshold(cli.threshold)
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .api_timeout_secs(cli.api_timeout)
        .credentials(credentials)
        .store(Arc::new(DirStore::new(&output_dir)));

    if let Some(prompt) = system_prompt {
        builder = builder.system_prompt(prompt);
    }
    if show_progress {
        builder = builder.progress_callback(CliProgressCallback::new());
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run ──────────────────────────────────────────────────────────────
    match run_and_upload(&blob_name, &bytes, &config).await {
        Ok(Some(outcome)) => {
            if !cli.quiet {
                eprintln!(
                    "{} {}  {}  {}",
                    green("✔"),
                    bold(outcome.output_name),
                    dim(&format!(
                        "{} docs / {} pages / {} words kept",
                        outcome.stats.documents, outcome.stats.pages, outcome.stats.words_kept
                    )),
                    dim(&format!("{}ms", outcome.stats.total_duration_ms)),
                );
            }
            if cli.stats {
                eprintln!(
                    "{}",
                    serde_json::to_string_pretty(&outcome.stats)
                        .context("Failed to serialise stats")?
                );
            }
            Ok(())
        }
        Ok(None) => {
            if !cli.quiet {
                eprintln!("{} skipped: {blob_name} is a produced summary", dim("∅"));
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {e}", red("✘"));
            std::process::exit(1);
        }
    }
}
