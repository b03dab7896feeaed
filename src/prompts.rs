//! Prompts sent to the summarization service.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing what the model is asked for
//!    (point count, output shape, provenance wording) is one edit.
//! 2. **Testability** — unit tests can inspect the exact request text
//!    without a live service.
//!
//! Callers can override the system prompt via
//! [`crate::config::SummaryConfig::system_prompt`]; the constant here is
//! used only when no override is provided.

use crate::config::SummaryFormat;

/// Default system prompt: the persona reads a whole collection and distils
/// cross-document points, not a per-page digest.
pub const DEFAULT_SYSTEM_PROMPT: &str = "Lawyer that wants to sum up a collection of documents \
into the most important points of all the data. We don't want a summary of each page.";

/// Build the user prompt for the given variant around the linearized text.
///
/// The text already carries `[Document D, Page P]` provenance markers, which
/// is the only mechanism the model has for attributing each point to a page,
/// so the prompt explicitly asks for that attribution.
pub fn user_prompt(format: SummaryFormat, linearized: &str) -> String {
    match format {
        SummaryFormat::Json => format!(
            "Sum up this collection of documents in {} different important concepts \
             and tell me from which certain page you took each concept. \
             The result must be in json format:\n{}",
            format.point_count(),
            linearized,
        ),
        SummaryFormat::NumberedList => format!(
            "Sum up this collection of documents in {} different important points \
             and tell me from which certain page you took each point. \
             Write the result as a numbered list, one point per line, \
             each line starting with its number and a period:\n{}",
            format.point_count(),
            linearized,
        ),
    }
}
