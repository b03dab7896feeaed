//! Error types for the docsum library.
//!
//! Every pipeline stage maps its failure into one [`DocsumError`] variant,
//! and every failure is **run-terminal**: the pipeline halts at that stage
//! and no output object is written. There are no retries and no partial
//! output — either the full summary is produced and uploaded, or nothing is.
//!
//! The trigger-facing entry point ([`crate::run::handle_trigger`]) swallows
//! these errors after logging them so the hosting event framework never sees
//! an unhandled fault; library callers using [`crate::run::run`] get the
//! typed error and can decide for themselves.

use thiserror::Error;

/// All errors produced by the docsum pipeline.
#[derive(Debug, Error)]
pub enum DocsumError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The triggering object is not valid UTF-8 JSON.
    #[error("Input object '{name}' is not valid UTF-8 JSON: {detail}")]
    InputDecode { name: String, detail: String },

    /// The JSON parsed, but it does not have the expected document-batch
    /// shape (a required field such as `doc_id`, `content`, `page_number`,
    /// or a word's `content` is missing or mistyped).
    #[error("Input object '{name}' is not a document batch: {detail}")]
    MalformedDocument { name: String, detail: String },

    // ── Summarization errors ──────────────────────────────────────────────
    /// The outbound call to the summarization service failed
    /// (network, auth, quota). Never retried.
    #[error("Summarization service call failed: {detail}")]
    SummarizerError { detail: String },

    /// The service answered, but the response body did not contain a
    /// `choices[0].message.content` string.
    #[error("Summarization response has no message content: {detail}")]
    EmptyCompletion { detail: String },

    /// The returned summary failed shape validation for the active variant.
    #[error("Summary rejected by the {expected} validator: {detail}")]
    MalformedSummary { expected: String, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The write-back of the finished summary failed.
    #[error("Failed to upload summary as '{name}': {detail}")]
    Upload { name: String, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// A required environment variable is absent; the run must fail rather
    /// than silently degrade.
    #[error("Missing required environment variable {var}\nSet it before running, e.g. export {var}=…")]
    MissingEnv { var: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocsumError {
    /// The stage label used in log lines, matching the orchestrator's
    /// state machine vocabulary.
    pub fn stage(&self) -> &'static str {
        match self {
            DocsumError::InputDecode { .. } | DocsumError::MalformedDocument { .. } => "load",
            DocsumError::SummarizerError { .. } | DocsumError::EmptyCompletion { .. } => {
                "summarize"
            }
            DocsumError::MalformedSummary { .. } => "validate",
            DocsumError::Upload { .. } => "upload",
            DocsumError::MissingEnv { .. } | DocsumError::InvalidConfig(_) => "config",
            DocsumError::Internal(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_decode_display_names_object() {
        let e = DocsumError::InputDecode {
            name: "batch-7.json".into(),
            detail: "invalid utf-8 at byte 12".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("batch-7.json"), "got: {msg}");
        assert!(msg.contains("invalid utf-8"), "got: {msg}");
    }

    #[test]
    fn malformed_summary_names_validator() {
        let e = DocsumError::MalformedSummary {
            expected: "numbered-list".into(),
            detail: "line 3 does not start with 'N. '".into(),
        };
        assert!(e.to_string().contains("numbered-list"));
    }

    #[test]
    fn missing_env_is_actionable() {
        let e = DocsumError::MissingEnv {
            var: "DOCSUM_API_KEY".into(),
        };
        assert!(e.to_string().contains("export DOCSUM_API_KEY"));
    }

    #[test]
    fn stage_labels() {
        assert_eq!(
            DocsumError::Upload {
                name: "summary_report.json".into(),
                detail: "denied".into()
            }
            .stage(),
            "upload"
        );
        assert_eq!(DocsumError::MissingEnv { var: "X".into() }.stage(), "config");
    }
}
