//! Run results: the validated summary plus statistics about the run.

use crate::pipeline::validate::SummaryValue;
use serde::Serialize;

/// Statistics about one pipeline run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Documents in the triggering batch.
    pub documents: usize,
    /// Pages across all documents.
    pub pages: usize,
    /// Recognized words before any filtering.
    pub words_in: usize,
    /// Words surviving the confidence filter.
    pub words_confident: usize,
    /// Words surviving the token filter (what the model actually saw).
    pub words_kept: usize,
    /// Byte length of the linearized blob sent to the service.
    pub linearized_bytes: usize,
    /// Wall-clock time of the service call in milliseconds.
    pub llm_duration_ms: u64,
    /// Wall-clock time of the whole run in milliseconds.
    pub total_duration_ms: u64,
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    /// The validated summary.
    pub summary: SummaryValue,
    /// Name the summary was (or would be) uploaded under.
    pub output_name: &'static str,
    /// Run statistics.
    pub stats: RunStats,
}
