//! Stage-event callback for run observability.
//!
//! Inject an [`Arc<dyn RunProgressCallback>`] via
//! [`crate::config::SummaryConfigBuilder::progress_callback`] to receive an
//! event at each state-machine transition as the orchestrator walks
//! `DataLoaded → Cleaned → Linearized → (Extracted) → Summarized →
//! Validated → Uploaded` (or `Skipped`). Callers can forward events to a
//! channel, a metrics sink, or a terminal spinner. The trait is
//! `Send + Sync`: configs are shared across concurrently dispatched
//! triggers.

use std::fmt;
use std::sync::Arc;

/// The orchestrator's state machine over a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    /// The triggering object was a previously produced summary; terminal.
    Skipped,
    /// Input bytes decoded into the typed document batch.
    DataLoaded,
    /// Confidence and token filters applied.
    Cleaned,
    /// Batch flattened into the marker-annotated blob.
    Linearized,
    /// Per-page records recovered from the blob (numbered-list variant only).
    Extracted,
    /// The service returned a raw summary.
    Summarized,
    /// The summary passed shape validation.
    Validated,
    /// The summary object was written back.
    Uploaded,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStage::Skipped => "skipped",
            RunStage::DataLoaded => "data loaded",
            RunStage::Cleaned => "cleaned",
            RunStage::Linearized => "linearized",
            RunStage::Extracted => "extracted",
            RunStage::Summarized => "summarized",
            RunStage::Validated => "validated",
            RunStage::Uploaded => "uploaded",
        };
        f.write_str(s)
    }
}

/// Called by the orchestrator as the run advances.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait RunProgressCallback: Send + Sync {
    /// Called once when processing of a triggering object begins.
    fn on_run_start(&self, blob_name: &str) {
        let _ = blob_name;
    }

    /// Called at each completed state transition.
    fn on_stage(&self, stage: RunStage) {
        let _ = stage;
    }

    /// Called when a stage fails; the run halts here.
    fn on_failure(&self, stage: &str, error: &str) {
        let _ = (stage, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RunProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SummaryConfig`].
pub type ProgressCallback = Arc<dyn RunProgressCallback>;
