//! Summarization service interaction.
//!
//! This module is intentionally thin — all prompt engineering lives in
//! [`crate::prompts`] so it can be changed without touching transport or
//! error handling here. The service is a text-in/text-out collaborator:
//! we send a system prompt, a user prompt, and generation parameters, and
//! extract `choices[0].message.content` from the reply. The call is
//! synchronous request/response with no streaming and **no retry** — a
//! failure here is terminal for the run.
//!
//! [`Summarizer`] is the seam: tests inject a scripted implementation via
//! [`crate::config::SummaryConfig::summarizer`] and never touch the network.

use crate::config::{ServiceCredentials, SummaryConfig};
use crate::error::DocsumError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Generation parameters forwarded verbatim to the service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    /// Always false: the pipeline wants the whole answer at once.
    pub stream: bool,
}

impl GenerationParams {
    pub fn from_config(config: &SummaryConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
            stream: false,
        }
    }
}

/// A text-in/text-out summarization capability.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Send one prompt pair and return the raw summary string.
    async fn summarize(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: GenerationParams,
    ) -> Result<String, DocsumError>;
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

// ── HTTP client ──────────────────────────────────────────────────────────

/// Chat-completions client for an Azure-OpenAI-style deployment endpoint.
///
/// Requests go to
/// `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version=…`
/// with the key in the `api-key` header.
pub struct ChatCompletionsSummarizer {
    client: reqwest::Client,
    url: String,
}

impl ChatCompletionsSummarizer {
    pub fn new(
        creds: &ServiceCredentials,
        api_version: &str,
        timeout_secs: u64,
    ) -> Result<Self, DocsumError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                let mut key = reqwest::header::HeaderValue::from_str(&creds.api_key)
                    .map_err(|_| {
                        DocsumError::InvalidConfig("API key is not a valid header value".into())
                    })?;
                key.set_sensitive(true);
                headers.insert("api-key", key);
                headers
            })
            .build()
            .map_err(|e| DocsumError::Internal(format!("HTTP client build failed: {e}")))?;

        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            creds.endpoint.trim_end_matches('/'),
            creds.deployment,
            api_version,
        );

        Ok(Self { client, url })
    }
}

#[async_trait]
impl Summarizer for ChatCompletionsSummarizer {
    async fn summarize(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: GenerationParams,
    ) -> Result<String, DocsumError> {
        let request = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            stream: false,
        };

        debug!(
            "Summarization request: {} prompt bytes, max_tokens {}",
            user_prompt.len(),
            params.max_tokens
        );

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DocsumError::SummarizerError {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Summarization service returned HTTP {status}");
            return Err(DocsumError::SummarizerError {
                detail: format!("HTTP {status}: {body}"),
            });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| DocsumError::SummarizerError {
                    detail: format!("response body: {e}"),
                })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DocsumError::EmptyCompletion {
                detail: "choices[0].message.content missing".into(),
            })
    }
}
