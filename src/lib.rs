//! # docsum
//!
//! Summarize OCR document batches with LLMs.
//!
//! ## Why this crate?
//!
//! OCR output is a poor summarization input: it is structured JSON, it is
//! full of low-confidence misreads, and most of its tokens are stopwords and
//! punctuation fragments that waste context-window budget. This crate
//! implements the reduction pipeline that turns a batch of scanned documents
//! into a compact, provenance-annotated text blob a summarization model can
//! work with — and then refuses to persist anything the model returns unless
//! it has exactly the shape that was asked for.
//!
//! ## Pipeline Overview
//!
//! ```text
//! batch.json (blob arrival)
//!  │
//!  ├─ 1. Input       skip self-produced summaries, decode the typed batch
//!  ├─ 2. Confidence  drop words at or below the OCR threshold (default 0.8)
//!  ├─ 3. Tokens      drop stopwords and non-alphabetic / short tokens
//!  ├─ 4. Linearize   flatten with [Document D, Page P] provenance markers
//!  ├─ 5. Summarize   one chat-completions call, no retries
//!  ├─ 6. Validate    all-or-nothing shape check (JSON or numbered list)
//!  └─ 7. Upload      overwrite summary_report.{json,txt} in the container
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docsum::{handle_trigger, DirStore, SummaryConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Credentials auto-read from DOCSUM_ENDPOINT_URL / DOCSUM_DEPLOYMENT
//!     // / DOCSUM_API_KEY when no summarizer is injected.
//!     let mut config = SummaryConfig::default();
//!     config.store = Some(Arc::new(DirStore::new("./container")));
//!
//!     let bytes = std::fs::read("container/batch-1.json").unwrap();
//!     // Logs and swallows every failure: safe to call from a trigger host.
//!     handle_trigger("batch-1.json", &bytes, &config).await;
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docsum` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! docsum = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod run;
pub mod storage;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ServiceCredentials, SummaryConfig, SummaryConfigBuilder, SummaryFormat};
pub use error::DocsumError;
pub use model::{Document, Page, PageExtract, Word};
pub use output::{RunStats, SummaryOutcome};
pub use pipeline::llm::{GenerationParams, Summarizer};
pub use pipeline::validate::SummaryValue;
pub use progress::{NoopProgressCallback, ProgressCallback, RunProgressCallback, RunStage};
pub use run::{handle_trigger, run, run_and_upload, run_sync};
pub use storage::{BlobStore, DirStore};
