//! Pipeline stages for document-batch summarization.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. point the summarizer at a different service)
//! without touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ confidence ──▶ tokens ──▶ linearize ──▶ llm ──▶ validate
//! (bytes)   (threshold)   (stopwords)  (markers)    (chat)   (shape)
//! ```
//!
//! 1. [`input`]      — guard against self-triggering, decode UTF-8 JSON into
//!    the typed document batch
//! 2. [`confidence`] — drop words at or below the confidence threshold
//! 3. [`tokens`]     — drop stopwords and tokens failing the alphabetic
//!    length-≥-3 shape
//! 4. [`linearize`]  — flatten into one marker-annotated text blob; the
//!    numbered-list variant re-extracts per-page records from it
//! 5. [`llm`]        — drive the chat-completions call; the only stage with
//!    network I/O
//! 6. [`validate`]   — all-or-nothing shape check on the returned summary
//!
//! Stages 2–4 and 6 are pure functions over their inputs; every correctness
//! property of the crate lives in them and is exercised without any network.

pub mod confidence;
pub mod input;
pub mod linearize;
pub mod llm;
pub mod tokens;
pub mod validate;
