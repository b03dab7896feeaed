//! Typed data model for OCR document batches.
//!
//! The triggering object is a JSON array of documents, each a list of pages,
//! each a list of recognized words with confidence scores. The OCR engine
//! also emits per-page layout metadata (`width`, `height`, `unit`,
//! `selection_marks`); those fields carry nothing a summary needs, so the
//! model simply does not declare them and serde drops them at the
//! deserialization boundary.
//!
//! Two filtered shapes mirror the two reduction stages:
//!
//! * [`ScoredPage`] / [`ScoredDocument`] — after the confidence filter;
//!   words still carry their scores.
//! * [`TokenPage`] / [`TokenDocument`] — after the token filter; words
//!   collapsed to their surviving content strings.
//!
//! Ordering of documents, pages, and words is preserved through every stage:
//! all filters are stable and nothing is deduplicated or reordered.

use serde::{Deserialize, Serialize};

/// A single recognized word with the OCR engine's certainty score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub content: String,
    /// Certainty in `[0, 1]`. Absent on input means 0, which can never pass
    /// the strictly-greater-than threshold check.
    #[serde(default)]
    pub confidence: f64,
}

impl Word {
    pub fn new(content: impl Into<String>, confidence: f64) -> Self {
        Self {
            content: content.into(),
            confidence,
        }
    }
}

/// One page of recognized words, as delivered by the OCR engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub page_number: u64,
    pub words: Vec<Word>,
}

/// One document: an ordered sequence of pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: u64,
    pub content: Vec<Page>,
}

/// A page after confidence filtering: metadata gone, words restricted to
/// those strictly above the threshold, scores retained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPage {
    pub page_number: u64,
    pub words: Vec<Word>,
}

/// A document after confidence filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument {
    pub doc_id: u64,
    pub content: Vec<ScoredPage>,
}

/// A page after token filtering: surviving words collapsed to plain strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenPage {
    pub page_number: u64,
    pub words: Vec<String>,
}

/// A document after token filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenDocument {
    pub doc_id: u64,
    pub content: Vec<TokenPage>,
}

/// A `(doc_id, page_number, text)` record recovered from linearized text by
/// the provenance re-extractor.
///
/// The identifiers are strings, not integers: they round-trip through the
/// marker text and are re-parsed from regex captures, and keeping them as
/// captured text makes that lossless even if a future marker format carries
/// non-numeric ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageExtract {
    pub doc_id: String,
    pub page_number: String,
    pub text: String,
}
