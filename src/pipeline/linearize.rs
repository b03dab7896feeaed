//! Linearizer and provenance re-extractor.
//!
//! NLP services take unstructured text, so the filtered batch is flattened
//! into one blob. Provenance must survive that flattening: each page's words
//! are preceded by a `\n[Document D, Page P]\n` marker line, and the whole
//! emitted sequence (markers interleaved with individual words) is joined by
//! single spaces. The marker format is load-bearing — it is the only way the
//! model prompt and the re-extractor can attribute text to a page.
//!
//! The re-extractor inverts the marker syntax: it scans lines, starts a new
//! record at each marker, space-joins everything else into the current
//! record, and flushes on the next marker and at end of input. A page whose
//! words were all filtered away accumulates no text and yields no record.
//!
//! A surviving word can never collide with a marker in practice (the token
//! filter admits only bracket-free alphabetic tokens), but `linearize` is a
//! public function over arbitrary `TokenDocument`s. A page's words all land
//! on one line, and the re-extractor trims that line, so the word that
//! starts it after trimming — the first word preceded only by blank words —
//! is the one position where a marker-shaped string would be misread. Any
//! word in that position is escaped with a leading backslash when it would
//! parse as a marker, and the re-extractor strips the escape when
//! accumulating text. Words containing newlines are outside the contract.

use crate::model::{PageExtract, TokenDocument};
use once_cell::sync::Lazy;
use regex::Regex;

/// A full line that carries provenance: `[Document D, Page P]`.
static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[Document (\d+), Page (\d+)\]$").unwrap());

/// Render the provenance marker for a page.
fn marker(doc_id: u64, page_number: u64) -> String {
    format!("\n[Document {doc_id}, Page {page_number}]\n")
}

/// Escape a line-leading word whose content would itself parse as a marker
/// line. Words after it share the line and can never match.
fn escape_leading_word(word: &str) -> String {
    if MARKER.is_match(word) {
        format!("\\{word}")
    } else {
        word.to_string()
    }
}

/// Flatten a token-filtered batch into one marker-annotated text blob.
///
/// For each document in order, for each page in order: emit the marker, then
/// that page's surviving words. All emitted segments are joined by single
/// spaces, so a page's words end up space-separated on the line after its
/// marker.
pub fn linearize(batch: &[TokenDocument]) -> String {
    let mut segments: Vec<String> = Vec::new();
    for doc in batch {
        for page in &doc.content {
            segments.push(marker(doc.doc_id, page.page_number));
            // A blank word renders to whitespace the re-extractor trims, so
            // the line-start position carries forward past it.
            let mut at_line_start = true;
            for word in &page.words {
                segments.push(if at_line_start {
                    escape_leading_word(word)
                } else {
                    word.clone()
                });
                if !word.trim().is_empty() {
                    at_line_start = false;
                }
            }
        }
    }
    segments.join(" ")
}

/// Parse a marker-annotated blob back into ordered per-page records.
///
/// Pages that accumulated no text between their marker and the next one are
/// absent from the result; the round-trip with [`linearize`] is exact for
/// every page that had at least one surviving word.
pub fn reextract(text: &str) -> Vec<PageExtract> {
    let mut records: Vec<PageExtract> = Vec::new();
    let mut current: Option<(String, String)> = None;
    let mut accumulated: Vec<String> = Vec::new();

    let mut flush =
        |current: &Option<(String, String)>, accumulated: &mut Vec<String>| {
            if let Some((doc_id, page_number)) = current {
                if !accumulated.is_empty() {
                    records.push(PageExtract {
                        doc_id: doc_id.clone(),
                        page_number: page_number.clone(),
                        text: accumulated.join(" "),
                    });
                }
            }
            accumulated.clear();
        };

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = MARKER.captures(line) {
            flush(&current, &mut accumulated);
            current = Some((caps[1].to_string(), caps[2].to_string()));
        } else {
            accumulated.push(line.strip_prefix('\\').unwrap_or(line).to_string());
        }
    }
    flush(&current, &mut accumulated);

    records
}
