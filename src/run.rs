//! Pipeline orchestrator: one triggering object in, one summary out.
//!
//! The run is a strict sequence — each stage consumes the previous stage's
//! full output, there is no pipelining or streaming within a run, and any
//! stage failure halts everything with no retry and no partial output.
//! Multiple triggering objects may be dispatched concurrently by the host;
//! runs share no mutable state and each is idempotent with respect to its
//! own output name.
//!
//! Three entry points, from most to least typed:
//!
//! * [`run`] — process bytes, return the validated summary without writing
//!   anything. `Ok(None)` means the trigger was a self-produced summary.
//! * [`run_and_upload`] — [`run`] plus the write-back through the
//!   configured [`crate::storage::BlobStore`].
//! * [`handle_trigger`] — the trigger-facing wrapper: logs every failure
//!   and always returns cleanly so the hosting event framework never sees
//!   an unhandled fault.

use crate::config::{ServiceCredentials, SummaryConfig};
use crate::error::DocsumError;
use crate::output::{RunStats, SummaryOutcome};
use crate::pipeline::llm::{ChatCompletionsSummarizer, GenerationParams, Summarizer};
use crate::pipeline::{confidence, input, linearize, tokens, validate};
use crate::progress::RunStage;
use crate::prompts::{user_prompt, DEFAULT_SYSTEM_PROMPT};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Process one triggering object end to end, without the write-back.
///
/// Returns `Ok(None)` when the object's name identifies it as a previously
/// produced summary (self-trigger prevention); `Ok(Some(..))` with the
/// validated summary otherwise.
pub async fn run(
    blob_name: &str,
    bytes: &[u8],
    config: &SummaryConfig,
) -> Result<Option<SummaryOutcome>, DocsumError> {
    let total_start = Instant::now();
    info!("Processing triggering object: {blob_name}");
    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(blob_name);
    }

    // ── Self-trigger guard ───────────────────────────────────────────────
    if input::classify_trigger(blob_name, config.format) == input::TriggerAction::Skip {
        if let Some(ref cb) = config.progress_callback {
            cb.on_stage(RunStage::Skipped);
        }
        return Ok(None);
    }

    // ── Load ─────────────────────────────────────────────────────────────
    let batch = input::decode_batch(blob_name, bytes)?;
    if batch.is_empty() {
        return Err(DocsumError::MalformedDocument {
            name: blob_name.to_string(),
            detail: "batch contains no documents".into(),
        });
    }
    let mut stats = RunStats {
        documents: batch.len(),
        pages: batch.iter().map(|d| d.content.len()).sum(),
        words_in: batch
            .iter()
            .flat_map(|d| &d.content)
            .map(|p| p.words.len())
            .sum(),
        ..RunStats::default()
    };
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage(RunStage::DataLoaded);
    }

    // ── Clean ────────────────────────────────────────────────────────────
    let confident = confidence::filter_batch(&batch, config.confidence_threshold);
    stats.words_confident = confident
        .iter()
        .flat_map(|d| &d.content)
        .map(|p| p.words.len())
        .sum();

    let tokenized = tokens::filter_batch(&confident);
    stats.words_kept = tokenized
        .iter()
        .flat_map(|d| &d.content)
        .map(|p| p.words.len())
        .sum();
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage(RunStage::Cleaned);
    }

    // ── Linearize ────────────────────────────────────────────────────────
    let blob = linearize::linearize(&tokenized);
    stats.linearized_bytes = blob.len();
    debug!(
        "Linearized {} words into {} bytes",
        stats.words_kept, stats.linearized_bytes
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage(RunStage::Linearized);
    }

    // The numbered-list variant prompts from re-extracted per-page records;
    // the JSON variant sends the raw marker stream.
    let prompt_body = if config.format.reextracts() {
        let records = linearize::reextract(&blob);
        debug!("Re-extracted {} per-page records", records.len());
        if let Some(ref cb) = config.progress_callback {
            cb.on_stage(RunStage::Extracted);
        }
        records
            .iter()
            .map(|r| format!("[Document {}, Page {}] {}", r.doc_id, r.page_number, r.text))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        blob
    };

    // ── Summarize ────────────────────────────────────────────────────────
    let summarizer = resolve_summarizer(config)?;
    let system = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);
    let user = user_prompt(config.format, &prompt_body);
    let params = GenerationParams::from_config(config);

    let llm_start = Instant::now();
    let raw_summary = summarizer.summarize(system, &user, params).await?;
    stats.llm_duration_ms = llm_start.elapsed().as_millis() as u64;
    info!(
        "Service returned {} bytes in {}ms",
        raw_summary.len(),
        stats.llm_duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage(RunStage::Summarized);
    }

    // ── Validate ─────────────────────────────────────────────────────────
    let summary = validate::validate(&raw_summary, config.format)?;
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage(RunStage::Validated);
    }

    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    Ok(Some(SummaryOutcome {
        summary,
        output_name: config.format.output_blob_name(),
        stats,
    }))
}

/// Process one triggering object and write the summary back through the
/// configured store. Overwrites any previous summary under the same name.
pub async fn run_and_upload(
    blob_name: &str,
    bytes: &[u8],
    config: &SummaryConfig,
) -> Result<Option<SummaryOutcome>, DocsumError> {
    let store = config
        .store
        .clone()
        .ok_or_else(|| DocsumError::InvalidConfig("no blob store configured".into()))?;

    let Some(outcome) = run(blob_name, bytes, config).await? else {
        return Ok(None);
    };

    let body = outcome.summary.to_upload_bytes()?;
    store.put(outcome.output_name, &body).await?;
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage(RunStage::Uploaded);
    }

    Ok(Some(outcome))
}

/// Trigger-facing entry point: run the whole pipeline and never raise.
///
/// Every failure path ends in a logged message and a clean return — the
/// hosting event framework must not see an unhandled fault. Returns the
/// outcome for hosts that want it, `None` on skip or any failure.
pub async fn handle_trigger(
    blob_name: &str,
    bytes: &[u8],
    config: &SummaryConfig,
) -> Option<SummaryOutcome> {
    match run_and_upload(blob_name, bytes, config).await {
        Ok(Some(outcome)) => {
            info!(
                "Run complete for '{}': {} documents, {} words kept, {}ms total",
                blob_name,
                outcome.stats.documents,
                outcome.stats.words_kept,
                outcome.stats.total_duration_ms
            );
            Some(outcome)
        }
        Ok(None) => None,
        Err(e) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_failure(e.stage(), &e.to_string());
            }
            error!("Run halted at {} stage for '{}': {}", e.stage(), blob_name, e);
            None
        }
    }
}

/// Synchronous wrapper around [`run_and_upload`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_sync(
    blob_name: &str,
    bytes: &[u8],
    config: &SummaryConfig,
) -> Result<Option<SummaryOutcome>, DocsumError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DocsumError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(run_and_upload(blob_name, bytes, config))
}

/// Resolve the summarization client, from most-specific to least-specific:
/// an injected client, explicit credentials, then the environment.
fn resolve_summarizer(config: &SummaryConfig) -> Result<Arc<dyn Summarizer>, DocsumError> {
    if let Some(ref s) = config.summarizer {
        return Ok(Arc::clone(s));
    }

    let creds = match config.credentials {
        Some(ref c) => c.clone(),
        None => ServiceCredentials::from_env()?,
    };

    let client = ChatCompletionsSummarizer::new(&creds, &config.api_version, config.api_timeout_secs)?;
    Ok(Arc::new(client) as Arc<dyn Summarizer>)
}
