//! End-to-end integration tests for docsum.
//!
//! Every test runs the full orchestrator against a scripted summarizer and a
//! temp-directory blob store — no network, no credentials. The scripted
//! client records the prompts it receives so tests can assert on exactly
//! what the reduction stages produced.

use async_trait::async_trait;
use docsum::{
    handle_trigger, run_and_upload, DocsumError, GenerationParams, SummaryConfig, SummaryFormat,
    Summarizer,
};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// A summarizer that returns a canned reply and records every user prompt.
struct Scripted {
    reply: Result<String, String>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl Scripted {
    fn ok(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing(detail: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(detail.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Summarizer for Scripted {
    async fn summarize(
        &self,
        system: &str,
        user: &str,
        _params: GenerationParams,
    ) -> Result<String, DocsumError> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        match &self.reply {
            Ok(s) => Ok(s.clone()),
            Err(detail) => Err(DocsumError::SummarizerError {
                detail: detail.clone(),
            }),
        }
    }
}

fn config(
    summarizer: Arc<Scripted>,
    format: SummaryFormat,
    container: &TempDir,
) -> SummaryConfig {
    SummaryConfig::builder()
        .format(format)
        .summarizer(summarizer)
        .store(Arc::new(docsum::DirStore::new(container.path())))
        .build()
        .unwrap()
}

/// Two documents, three pages, a mix of confidences and token shapes.
const BATCH: &[u8] = br#"[
  {"doc_id": 1, "content": [
    {"page_number": 1, "width": 8.5, "height": 11.0, "unit": "inch",
     "selection_marks": [],
     "words": [
       {"content": "the", "confidence": 0.9},
       {"content": "contract", "confidence": 0.95},
       {"content": "is", "confidence": 0.2},
       {"content": "void", "confidence": 0.92}
     ]},
    {"page_number": 2,
     "words": [
       {"content": "clause", "confidence": 0.99},
       {"content": "7b", "confidence": 0.99}
     ]}
  ]},
  {"doc_id": 2, "content": [
    {"page_number": 1,
     "words": [
       {"content": "tribunal", "confidence": 0.85},
       {"content": "blurry"}
     ]}
  ]}
]"#;

// ── JSON variant ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn json_variant_uploads_pretty_summary_report() {
    let container = TempDir::new().unwrap();
    let scripted = Scripted::ok(r#"{"points":[{"text":"Void contract","page":1}]}"#);
    let config = config(Arc::clone(&scripted), SummaryFormat::Json, &container);

    let outcome = run_and_upload("batch.json", BATCH, &config)
        .await
        .unwrap()
        .expect("run should complete");

    assert_eq!(outcome.output_name, "summary_report.json");
    let written =
        std::fs::read_to_string(container.path().join("summary_report.json")).unwrap();
    // Pretty-printed with 4-space indentation, identical structure.
    assert!(written.starts_with("{\n    \"points\""));
    let round: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(round["points"][0]["page"], 1);
}

#[tokio::test]
async fn linearized_prompt_carries_all_provenance_markers() {
    let container = TempDir::new().unwrap();
    let scripted = Scripted::ok("{}");
    let config = config(Arc::clone(&scripted), SummaryFormat::Json, &container);

    run_and_upload("batch.json", BATCH, &config).await.unwrap();

    let prompts = scripted.prompts.lock().unwrap();
    let (system, user) = &prompts[0];
    assert!(system.contains("collection of documents"));

    // All three pages are announced, in order.
    let p11 = user.find("[Document 1, Page 1]").unwrap();
    let p12 = user.find("[Document 1, Page 2]").unwrap();
    let p21 = user.find("[Document 2, Page 1]").unwrap();
    assert!(p11 < p12 && p12 < p21);

    // Survivors: stopword "the" gone, "is" below threshold, "7b" fails the
    // token shape, unscored "blurry" defaulted to 0 confidence.
    assert!(user.contains("contract void"));
    assert!(user.contains("clause"));
    assert!(user.contains("tribunal"));
    let body = &user[p11..];
    for dropped in ["the", "is", "7b", "blurry"] {
        assert!(
            !body.split_whitespace().any(|w| w == dropped),
            "'{dropped}' must not reach the model"
        );
    }
}

#[tokio::test]
async fn malformed_json_reply_writes_nothing() {
    let container = TempDir::new().unwrap();
    let scripted = Scripted::ok("Sorry, here is your summary: fine.");
    let config = config(scripted, SummaryFormat::Json, &container);

    let err = run_and_upload("batch.json", BATCH, &config).await.unwrap_err();
    assert!(matches!(err, DocsumError::MalformedSummary { .. }));
    assert!(!container.path().join("summary_report.json").exists());
}

// ── Numbered-list variant ────────────────────────────────────────────────────

#[tokio::test]
async fn numbered_variant_uploads_raw_text() {
    let container = TempDir::new().unwrap();
    let scripted = Scripted::ok("1. Contract declared void\n\n2. Tribunal has jurisdiction");
    let config = config(
        Arc::clone(&scripted),
        SummaryFormat::NumberedList,
        &container,
    );

    let outcome = run_and_upload("batch.json", BATCH, &config)
        .await
        .unwrap()
        .expect("run should complete");

    assert_eq!(outcome.output_name, "summary_report.txt");
    let written = std::fs::read_to_string(container.path().join("summary_report.txt")).unwrap();
    assert_eq!(
        written,
        "1. Contract declared void\n\n2. Tribunal has jurisdiction"
    );
}

#[tokio::test]
async fn numbered_variant_prompts_from_page_records() {
    let container = TempDir::new().unwrap();
    let scripted = Scripted::ok("1. Fine");
    let config = config(
        Arc::clone(&scripted),
        SummaryFormat::NumberedList,
        &container,
    );

    run_and_upload("batch.json", BATCH, &config).await.unwrap();

    let prompts = scripted.prompts.lock().unwrap();
    let user = &prompts[0].1;
    // Re-extracted record lines: marker and text on one line per page.
    assert!(user.contains("[Document 1, Page 1] contract void"));
    assert!(user.contains("[Document 1, Page 2] clause"));
    assert!(user.contains("[Document 2, Page 1] tribunal"));
    assert!(user.contains("20 different important points"));
}

#[tokio::test]
async fn unnumbered_line_rejects_whole_summary() {
    let container = TempDir::new().unwrap();
    let scripted = Scripted::ok("1. Fine\nBut this line is not numbered");
    let config = config(scripted, SummaryFormat::NumberedList, &container);

    let err = run_and_upload("batch.json", BATCH, &config).await.unwrap_err();
    assert!(matches!(err, DocsumError::MalformedSummary { .. }));
    assert!(!container.path().join("summary_report.txt").exists());
}

// ── Guard rails and failure behaviour ────────────────────────────────────────

#[tokio::test]
async fn self_trigger_names_are_skipped_per_variant() {
    let container = TempDir::new().unwrap();
    let scripted = Scripted::ok("{}");
    let config = config(Arc::clone(&scripted), SummaryFormat::Json, &container);

    for name in ["summary_report.json", "nested/summary_report.json"] {
        let outcome = run_and_upload(name, BATCH, &config).await.unwrap();
        assert!(outcome.is_none(), "{name} must be skipped");
    }
    assert_eq!(scripted.calls(), 0);
    assert!(!container.path().join("summary_report.json").exists());
}

#[tokio::test]
async fn service_failure_is_terminal_and_unretried() {
    let container = TempDir::new().unwrap();
    let scripted = Scripted::failing("HTTP 429: quota exceeded");
    let config = config(Arc::clone(&scripted), SummaryFormat::Json, &container);

    let err = run_and_upload("batch.json", BATCH, &config).await.unwrap_err();
    assert!(matches!(err, DocsumError::SummarizerError { .. }));
    assert_eq!(scripted.calls(), 1, "no retry is ever attempted");
    assert!(!container.path().join("summary_report.json").exists());
}

#[tokio::test]
async fn handle_trigger_never_raises() {
    let container = TempDir::new().unwrap();

    // Garbage input, failing service, malformed reply: all swallowed.
    let cases: Vec<(Arc<Scripted>, &[u8])> = vec![
        (Scripted::ok("{}"), b"\xff\xfenot utf8".as_slice()),
        (Scripted::ok("{}"), b"{\"not\":\"a batch\"}".as_slice()),
        (Scripted::failing("down"), BATCH),
        (Scripted::ok("no shape"), BATCH),
    ];
    for (scripted, bytes) in cases {
        let config = config(scripted, SummaryFormat::Json, &container);
        assert!(handle_trigger("batch.json", bytes, &config).await.is_none());
    }
    assert!(!container.path().join("summary_report.json").exists());
}

#[tokio::test]
async fn rerun_overwrites_previous_summary() {
    let container = TempDir::new().unwrap();

    let first = config(Scripted::ok(r#"{"v":1}"#), SummaryFormat::Json, &container);
    run_and_upload("batch.json", BATCH, &first).await.unwrap();

    let second = config(Scripted::ok(r#"{"v":2}"#), SummaryFormat::Json, &container);
    run_and_upload("batch.json", BATCH, &second).await.unwrap();

    let written: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(container.path().join("summary_report.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(written["v"], 2);
}

#[tokio::test]
async fn minimal_batch_reduces_to_single_word() {
    let container = TempDir::new().unwrap();
    let scripted = Scripted::ok("{}");
    let config = config(Arc::clone(&scripted), SummaryFormat::Json, &container);

    let raw = br#"[{"doc_id":1,"content":[{"page_number":1,"words":[
        {"content":"the","confidence":0.9},
        {"content":"contract","confidence":0.95},
        {"content":"is","confidence":0.2}]}]}]"#;
    let outcome = run_and_upload("batch.json", raw, &config)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome.stats.words_in, 3);
    assert_eq!(outcome.stats.words_confident, 2);
    assert_eq!(outcome.stats.words_kept, 1);

    let user = &scripted.prompts.lock().unwrap()[0].1;
    assert!(user.ends_with("\n[Document 1, Page 1]\n contract"));
}
