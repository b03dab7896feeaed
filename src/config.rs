//! Configuration for a summarization run.
//!
//! All run behaviour is controlled through [`SummaryConfig`], built via its
//! [`SummaryConfigBuilder`]. Keeping every knob in one struct makes it easy
//! to share configs across triggers, serialise them for logging, and inject
//! a fake summarization client or blob store in tests — the global env-read
//! credential state of ad-hoc deployments is deliberately reconstructed here
//! as an explicit value passed into the orchestrator at construction time.

use crate::error::DocsumError;
use crate::pipeline::llm::Summarizer;
use crate::progress::RunProgressCallback;
use crate::storage::BlobStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Environment variable holding the summarization service endpoint URL.
pub const ENV_ENDPOINT: &str = "DOCSUM_ENDPOINT_URL";
/// Environment variable holding the deployment / model identifier.
pub const ENV_DEPLOYMENT: &str = "DOCSUM_DEPLOYMENT";
/// Environment variable holding the service API key.
pub const ENV_API_KEY: &str = "DOCSUM_API_KEY";

/// Which summary shape the model is asked for and validated against.
///
/// One core, two variants: the reduction stages are shared, the variant
/// selects the prompt wording, the validator, whether the linearized text is
/// re-extracted into per-page records before prompting, and the output name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SummaryFormat {
    /// Ask for JSON; accept any syntactically valid JSON value. (default)
    #[default]
    Json,
    /// Ask for a numbered list; accept only `N. <text>` lines.
    NumberedList,
}

impl SummaryFormat {
    /// Fixed name of the produced output object. Triggering objects whose
    /// name ends with this are skipped to prevent self-retriggering.
    pub fn output_blob_name(&self) -> &'static str {
        match self {
            SummaryFormat::Json => "summary_report.json",
            SummaryFormat::NumberedList => "summary_report.txt",
        }
    }

    /// How many points the user prompt asks the model for.
    pub fn point_count(&self) -> usize {
        match self {
            SummaryFormat::Json => 10,
            SummaryFormat::NumberedList => 20,
        }
    }

    /// Validator name used in error messages and logs.
    pub fn validator_name(&self) -> &'static str {
        match self {
            SummaryFormat::Json => "json",
            SummaryFormat::NumberedList => "numbered-list",
        }
    }

    /// The numbered-list variant prompts from re-extracted per-page records
    /// rather than the raw marker stream.
    pub fn reextracts(&self) -> bool {
        matches!(self, SummaryFormat::NumberedList)
    }
}

/// Credentials and routing for the summarization service, sourced from the
/// environment. All three values are required — a missing variable fails the
/// run rather than silently degrading.
///
/// The key never leaves the struct through `Debug` or `Serialize`; it is
/// only ever written into the request header.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceCredentials {
    /// Base URL of the service, e.g. `https://myresource.openai.azure.com`.
    pub endpoint: String,
    /// Deployment / model identifier routed in the request path.
    pub deployment: String,
    /// API key sent in the `api-key` header.
    #[serde(skip_serializing)]
    pub api_key: String,
}

impl ServiceCredentials {
    /// Read all required variables from the environment.
    pub fn from_env() -> Result<Self, DocsumError> {
        Ok(Self {
            endpoint: require_env(ENV_ENDPOINT)?,
            deployment: require_env(ENV_DEPLOYMENT)?,
            api_key: require_env(ENV_API_KEY)?,
        })
    }
}

impl fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn require_env(var: &str) -> Result<String, DocsumError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DocsumError::MissingEnv { var: var.into() }),
    }
}

/// Configuration for one summarization run.
///
/// Built via [`SummaryConfig::builder()`] or [`SummaryConfig::default()`].
///
/// # Example
/// ```rust
/// use docsum::{SummaryConfig, SummaryFormat};
///
/// let config = SummaryConfig::builder()
///     .format(SummaryFormat::NumberedList)
///     .confidence_threshold(0.75)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct SummaryConfig {
    /// Summary shape variant. Default: [`SummaryFormat::Json`].
    pub format: SummaryFormat,

    /// Minimum OCR confidence a word must strictly exceed to survive.
    /// Range: (0, 1) exclusive. Default: 0.8.
    ///
    /// Equality does not pass: a word at exactly the threshold is dropped,
    /// and a word with no confidence score at all is treated as 0.
    pub confidence_threshold: f64,

    /// Maximum tokens the model may generate. Default: 800.
    pub max_tokens: u32,

    /// Sampling temperature. Default: 0.7.
    pub temperature: f32,

    /// Nucleus sampling cutoff. Default: 0.95.
    pub top_p: f32,

    /// Custom system prompt. If None, uses the built-in default.
    pub system_prompt: Option<String>,

    /// Wire API version for the chat-completions path. Default: `2024-05-01-preview`.
    pub api_version: String,

    /// Per-call timeout for the summarization request in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Service credentials. If None and no `summarizer` is injected, they
    /// are read from the environment when the run starts.
    pub credentials: Option<ServiceCredentials>,

    /// Pre-constructed summarization client. Takes precedence over
    /// `credentials`; the seam tests use to avoid the network.
    pub summarizer: Option<Arc<dyn Summarizer>>,

    /// Pre-constructed blob store for the write-back. Required by
    /// [`crate::run::run_and_upload`] and [`crate::run::handle_trigger`].
    pub store: Option<Arc<dyn BlobStore>>,

    /// Optional stage-event callback for observability.
    pub progress_callback: Option<Arc<dyn RunProgressCallback>>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            format: SummaryFormat::Json,
            confidence_threshold: 0.8,
            max_tokens: 800,
            temperature: 0.7,
            top_p: 0.95,
            system_prompt: None,
            api_version: "2024-05-01-preview".to_string(),
            api_timeout_secs: 60,
            credentials: None,
            summarizer: None,
            store: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SummaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryConfig")
            .field("format", &self.format)
            .field("confidence_threshold", &self.confidence_threshold)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("api_version", &self.api_version)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("credentials", &self.credentials)
            .field("summarizer", &self.summarizer.as_ref().map(|_| "<dyn Summarizer>"))
            .field("store", &self.store.as_ref().map(|_| "<dyn BlobStore>"))
            .finish()
    }
}

impl SummaryConfig {
    /// Create a new builder for `SummaryConfig`.
    pub fn builder() -> SummaryConfigBuilder {
        SummaryConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SummaryConfig`].
#[derive(Debug)]
pub struct SummaryConfigBuilder {
    config: SummaryConfig,
}

impl SummaryConfigBuilder {
    pub fn format(mut self, format: SummaryFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn confidence_threshold(mut self, t: f64) -> Self {
        self.config.confidence_threshold = t;
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = n.max(1);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn top_p(mut self, p: f32) -> Self {
        self.config.top_p = p.clamp(0.0, 1.0);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn api_version(mut self, v: impl Into<String>) -> Self {
        self.config.api_version = v.into();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn credentials(mut self, creds: ServiceCredentials) -> Self {
        self.config.credentials = Some(creds);
        self
    }

    pub fn summarizer(mut self, s: Arc<dyn Summarizer>) -> Self {
        self.config.summarizer = Some(s);
        self
    }

    pub fn store(mut self, s: Arc<dyn BlobStore>) -> Self {
        self.config.store = Some(s);
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn RunProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummaryConfig, DocsumError> {
        let c = &self.config;
        if !(c.confidence_threshold > 0.0 && c.confidence_threshold < 1.0) {
            return Err(DocsumError::InvalidConfig(format!(
                "confidence threshold must lie in (0, 1), got {}",
                c.confidence_threshold
            )));
        }
        if let Some(ref creds) = c.credentials {
            if !creds.endpoint.starts_with("http://") && !creds.endpoint.starts_with("https://") {
                return Err(DocsumError::InvalidConfig(format!(
                    "endpoint must be an http(s) URL, got '{}'",
                    creds.endpoint
                )));
            }
        }
        Ok(self.config)
    }
}
