//! Confidence filter: drop words the OCR engine was not sure about.
//!
//! Survival is strictly `confidence > threshold` — a word sitting exactly at
//! the threshold is dropped, and a word whose score was absent on input
//! deserialised to 0 and can never pass. The filter is stable: documents,
//! pages, and words keep their original order, and empty pages are kept so
//! page identity survives into the later stages.

use crate::model::{Document, ScoredDocument, ScoredPage};
use tracing::debug;

/// Filter one document, retaining only `doc_id`, per-page `page_number`,
/// and the words strictly above `threshold`.
pub fn filter_document(doc: &Document, threshold: f64) -> ScoredDocument {
    ScoredDocument {
        doc_id: doc.doc_id,
        content: doc
            .content
            .iter()
            .map(|page| ScoredPage {
                page_number: page.page_number,
                words: page
                    .words
                    .iter()
                    .filter(|w| w.confidence > threshold)
                    .cloned()
                    .collect(),
            })
            .collect(),
    }
}

/// Filter a whole batch.
pub fn filter_batch(batch: &[Document], threshold: f64) -> Vec<ScoredDocument> {
    let filtered: Vec<ScoredDocument> = batch
        .iter()
        .map(|doc| filter_document(doc, threshold))
        .collect();

    let before: usize = batch
        .iter()
        .flat_map(|d| &d.content)
        .map(|p| p.words.len())
        .sum();
    let after: usize = filtered
        .iter()
        .flat_map(|d| &d.content)
        .map(|p| p.words.len())
        .sum();
    debug!("Confidence filter: {before} words in, {after} kept (threshold {threshold})");

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Page, Word};

    fn doc(words: Vec<Word>) -> Document {
        Document {
            doc_id: 1,
            content: vec![Page {
                page_number: 1,
                words,
            }],
        }
    }

    #[test]
    fn strictly_above_threshold_survives() {
        let d = doc(vec![
            Word::new("keep", 0.81),
            Word::new("edge", 0.8),
            Word::new("drop", 0.2),
        ]);
        let out = filter_document(&d, 0.8);
        let kept: Vec<&str> = out.content[0].words.iter().map(|w| w.content.as_str()).collect();
        assert_eq!(kept, vec!["keep"], "equality must not pass");
    }

    #[test]
    fn absent_confidence_never_passes() {
        let d: Document = serde_json::from_str(
            r#"{"doc_id":1,"content":[{"page_number":1,
                "words":[{"content":"unscored"},{"content":"scored","confidence":0.9}]}]}"#,
        )
        .unwrap();
        let out = filter_document(&d, 0.8);
        assert_eq!(out.content[0].words.len(), 1);
        assert_eq!(out.content[0].words[0].content, "scored");
    }

    #[test]
    fn word_order_is_preserved() {
        let d = doc(vec![
            Word::new("alpha", 0.9),
            Word::new("beta", 0.1),
            Word::new("gamma", 0.95),
            Word::new("delta", 0.85),
        ]);
        let out = filter_document(&d, 0.8);
        let kept: Vec<&str> = out.content[0].words.iter().map(|w| w.content.as_str()).collect();
        assert_eq!(kept, vec!["alpha", "gamma", "delta"]);
    }

    #[test]
    fn empty_pages_are_retained() {
        let d = doc(vec![Word::new("faint", 0.1)]);
        let out = filter_document(&d, 0.8);
        assert_eq!(out.content.len(), 1);
        assert!(out.content[0].words.is_empty());
        assert_eq!(out.content[0].page_number, 1);
    }

    #[test]
    fn batch_preserves_document_order_and_ids() {
        let batch = vec![
            Document {
                doc_id: 7,
                content: vec![],
            },
            Document {
                doc_id: 3,
                content: vec![],
            },
        ];
        let out = filter_batch(&batch, 0.8);
        assert_eq!(out[0].doc_id, 7);
        assert_eq!(out[1].doc_id, 3);
    }
}
