//! Token filter: drop stopwords and low-value token shapes.
//!
//! A word survives only if its lowercased content is not an English stopword
//! AND its **original-case** content matches the anchored shape pattern
//! `^[a-zA-Z]{3,}$` — purely alphabetic, at least three letters, no digits
//! or punctuation. Lowercasing is used for the stopword lookup only; the
//! shape test runs on the token as recognized.
//!
//! The stopword set comes from the `stop-words` crate's English list and is
//! built once per process.

use crate::model::{ScoredDocument, TokenDocument, TokenPage, Word};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// Anchored token shape: alphabetic, length ≥ 3.
static TOKEN_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]{3,}$").unwrap());

/// English stopwords, lowercased.
static STOPWORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    stop_words::get(stop_words::LANGUAGE::English)
        .into_iter()
        .map(|w| w.to_lowercase())
        .collect()
});

/// Keep the word only if it passes both the stopword and the shape check.
fn keeps(word: &Word) -> bool {
    !STOPWORDS.contains(&word.content.to_lowercase()) && TOKEN_SHAPE.is_match(&word.content)
}

/// Reduce one page's words to the surviving content strings, in order.
pub fn clean_words(words: &[Word]) -> Vec<String> {
    words
        .iter()
        .filter(|w| keeps(w))
        .map(|w| w.content.clone())
        .collect()
}

/// Apply the token filter to a confidence-filtered batch.
pub fn filter_batch(batch: &[ScoredDocument]) -> Vec<TokenDocument> {
    let filtered: Vec<TokenDocument> = batch
        .iter()
        .map(|doc| TokenDocument {
            doc_id: doc.doc_id,
            content: doc
                .content
                .iter()
                .map(|page| TokenPage {
                    page_number: page.page_number,
                    words: clean_words(&page.words),
                })
                .collect(),
        })
        .collect();

    let kept: usize = filtered
        .iter()
        .flat_map(|d| &d.content)
        .map(|p| p.words.len())
        .sum();
    debug!("Token filter: {kept} words kept");

    filtered
}
