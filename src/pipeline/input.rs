//! Input stage: self-trigger guard and document-batch decoding.
//!
//! The pipeline runs when a new object lands in the watched container — and
//! the pipeline itself puts its finished summary into that same container.
//! Without a name-based guard every summary upload would trigger a fresh run
//! on the summary, forever. Objects whose name ends with the active
//! variant's output name are therefore classified [`TriggerAction::Skip`]
//! before a single byte is parsed.
//!
//! Decoding distinguishes two failures deliberately: bytes that are not
//! UTF-8 JSON at all ([`DocsumError::InputDecode`]) and JSON that parses but
//! is not a document batch ([`DocsumError::MalformedDocument`]). The second
//! pass through `serde_json::from_value` is what turns a would-be field
//! lookup fault deep in the pipeline into a typed, named error at the edge.

use crate::config::SummaryFormat;
use crate::error::DocsumError;
use crate::model::Document;
use tracing::{debug, info};

/// What the orchestrator should do with a triggering object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerAction {
    /// A data batch: process it.
    Process,
    /// The object is a previously produced summary: halt at `Skipped`.
    Skip,
}

/// Classify a triggering object name.
pub fn classify_trigger(blob_name: &str, format: SummaryFormat) -> TriggerAction {
    if blob_name.ends_with(format.output_blob_name()) {
        info!("Skipping self-produced summary object: {blob_name}");
        TriggerAction::Skip
    } else {
        TriggerAction::Process
    }
}

/// Decode the triggering object's bytes into the typed document batch.
pub fn decode_batch(blob_name: &str, bytes: &[u8]) -> Result<Vec<Document>, DocsumError> {
    let text = std::str::from_utf8(bytes).map_err(|e| DocsumError::InputDecode {
        name: blob_name.to_string(),
        detail: e.to_string(),
    })?;

    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| DocsumError::InputDecode {
            name: blob_name.to_string(),
            detail: e.to_string(),
        })?;

    let batch: Vec<Document> =
        serde_json::from_value(value).map_err(|e| DocsumError::MalformedDocument {
            name: blob_name.to_string(),
            detail: e.to_string(),
        })?;

    debug!(
        "Decoded batch '{}': {} documents, {} pages",
        blob_name,
        batch.len(),
        batch.iter().map(|d| d.content.len()).sum::<usize>()
    );
    Ok(batch)
}
