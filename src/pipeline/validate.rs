//! Summary validation: the gate on what counts as an acceptable response.
//!
//! Validation is all-or-nothing. A single malformed line or a parse failure
//! discards the entire summary — no partial recovery, no repair attempts.
//! The model either produced the shape it was asked for, or the run halts
//! with [`DocsumError::MalformedSummary`] and nothing is uploaded.

use crate::config::SummaryFormat;
use crate::error::DocsumError;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

/// A numbered point: leading integer, period, whitespace, then anything.
static NUMBERED_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s.*$").unwrap());

/// A validated summary, ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryValue {
    /// Any syntactically valid JSON value, kept parsed.
    Json(serde_json::Value),
    /// Numbered-list text, kept verbatim.
    Text(String),
}

impl SummaryValue {
    /// Serialise for the write-back: pretty-printed JSON with 4-space
    /// indentation, or the raw text.
    pub fn to_upload_bytes(&self) -> Result<Vec<u8>, DocsumError> {
        match self {
            SummaryValue::Json(value) => {
                let mut buf = Vec::new();
                let indent = serde_json::ser::PrettyFormatter::with_indent(b"    ");
                let mut ser = serde_json::Serializer::with_formatter(&mut buf, indent);
                serde::Serialize::serialize(value, &mut ser)
                    .map_err(|e| DocsumError::Internal(format!("summary serialisation: {e}")))?;
                Ok(buf)
            }
            SummaryValue::Text(text) => Ok(text.as_bytes().to_vec()),
        }
    }
}

/// Check the raw summary string against the active variant's shape.
pub fn validate(summary: &str, format: SummaryFormat) -> Result<SummaryValue, DocsumError> {
    match format {
        SummaryFormat::Json => validate_json(summary),
        SummaryFormat::NumberedList => validate_numbered(summary),
    }
}

fn validate_json(summary: &str) -> Result<SummaryValue, DocsumError> {
    match serde_json::from_str::<serde_json::Value>(summary) {
        Ok(value) => {
            info!("Summary accepted: schematic and standardised JSON");
            Ok(SummaryValue::Json(value))
        }
        Err(e) => Err(DocsumError::MalformedSummary {
            expected: "json".into(),
            detail: e.to_string(),
        }),
    }
}

fn validate_numbered(summary: &str) -> Result<SummaryValue, DocsumError> {
    for (i, line) in summary.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if !NUMBERED_LINE.is_match(line) {
            return Err(DocsumError::MalformedSummary {
                expected: "numbered-list".into(),
                detail: format!("line {} is not 'N. <text>': {:?}", i + 1, line),
            });
        }
    }
    info!("Summary accepted: numbered-list shape");
    Ok(SummaryValue::Text(summary.to_string()))
}
