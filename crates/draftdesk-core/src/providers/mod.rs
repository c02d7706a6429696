//! LLM provider integrations.
//!
//! Three vendors are supported as a closed set: Gemini, OpenAI, and
//! DeepSeek. OpenAI and DeepSeek share the chat-completions wire format, so
//! both are backed by [`ChatCompletionsProvider`]. Every provider can
//! [`generate`](Provider::generate) a variation, [`shorten`](Provider::shorten)
//! a draft, and [`validate_key`](Provider::validate_key).
//!
//! Credentials, models, and endpoints are not held globally. Callers build a
//! [`DispatchConfig`] and hand it to the [`Dispatcher`] on every call.

mod chat_completions;
mod dispatch;
mod gemini;

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use chat_completions::ChatCompletionsProvider;
pub use dispatch::Dispatcher;
pub use gemini::GeminiProvider;

use crate::classifier::ContentType;
use crate::error::{ProviderError, ProviderResult};
use crate::keys::{ApiKeys, ModelChoices};
use crate::metrics;
use crate::tone::TonePreset;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Longest error body kept in [`ProviderError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// A supported LLM vendor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ProviderKind {
    /// Google Gemini.
    Gemini,
    /// OpenAI chat completions.
    #[cfg_attr(feature = "clap", value(name = "openai"))]
    OpenAi,
    /// DeepSeek (OpenAI-compatible).
    #[cfg_attr(feature = "clap", value(name = "deepseek"))]
    DeepSeek,
}

impl ProviderKind {
    /// All providers, in option order.
    pub const ALL: [Self; 3] = [Self::Gemini, Self::OpenAi, Self::DeepSeek];

    /// Returns the provider as a lowercase identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::DeepSeek => "deepseek",
        }
    }

    /// Display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Gemini => "Google Gemini",
            Self::OpenAi => "ChatGPT",
            Self::DeepSeek => "DeepSeek",
        }
    }

    /// Icon name.
    pub const fn icon(&self) -> &'static str {
        self.as_str()
    }

    /// Storage key for the provider's (obscured) API key.
    pub const fn api_key_storage_key(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini_api_key",
            Self::OpenAi => "openai_api_key",
            Self::DeepSeek => "deepseek_api_key",
        }
    }

    /// Storage key for the provider's selected model.
    pub const fn model_storage_key(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini_model",
            Self::OpenAi => "openai_model",
            Self::DeepSeek => "deepseek_model",
        }
    }

    /// Model used when none is selected.
    pub const fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-1.5-flash",
            Self::OpenAi => "gpt-4o-mini",
            Self::DeepSeek => "deepseek-chat",
        }
    }

    /// Models offered for selection. Any other model name is also accepted.
    pub const fn model_options(&self) -> &'static [&'static str] {
        match self {
            Self::Gemini => &["gemini-1.5-flash", "gemini-1.5-pro", "gemini-3-flash-preview"],
            Self::OpenAi => &["gpt-4o-mini", "gpt-4o"],
            Self::DeepSeek => &["deepseek-chat", "deepseek-reasoner"],
        }
    }

    /// Production endpoint.
    ///
    /// For Gemini this is the models collection; the model name and
    /// `:generateContent` are appended per request.
    pub const fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta/models",
            Self::OpenAi => "https://api.openai.com/v1/chat/completions",
            Self::DeepSeek => "https://api.deepseek.com/v1/chat/completions",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown provider: {s}. Use: gemini, openai, deepseek"))
    }
}

/// Which providers a multi-variation request fans out to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProviderTarget {
    /// Every configured provider, round-robin.
    #[default]
    All,
    /// A single provider.
    Only(ProviderKind),
}

impl ProviderTarget {
    /// Returns the target as `"all"` or a provider identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(kind) => kind.as_str(),
        }
    }
}

impl std::fmt::Display for ProviderTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<ProviderKind>()
            .map(Self::Only)
            .map_err(|_| format!("unknown provider: {s}. Use: all, gemini, openai, deepseek"))
    }
}

impl TryFrom<String> for ProviderTarget {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProviderTarget> for String {
    fn from(value: ProviderTarget) -> Self {
        value.as_str().to_string()
    }
}

/// A request for tone-adjusted rewrites of a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GenerateRequest {
    /// The draft text.
    pub content: String,
    /// Requested tone.
    pub tone: TonePreset,
    /// Detected or chosen content type.
    pub content_type: ContentType,
    /// Number of variations the caller wants in total.
    pub variation_count: usize,
}

/// A request to shorten a draft to a target length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ShortenRequest {
    /// The text to shorten.
    pub content: String,
    /// Tone to keep.
    pub tone: TonePreset,
    /// Detected or chosen content type.
    pub content_type: ContentType,
    /// Target length in characters.
    pub target_length: usize,
}

/// Text returned by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedText {
    /// The rewritten text, trimmed.
    pub variation: String,
    /// Provider that produced it.
    pub provider: ProviderKind,
    /// Tone that was requested.
    pub tone: TonePreset,
    /// When the response arrived.
    pub generated_at: DateTime<Utc>,
    /// Length of `variation` in UTF-16 code units.
    pub character_count: usize,
}

impl GeneratedText {
    fn new(text: &str, provider: ProviderKind, tone: TonePreset) -> Self {
        let variation = text.trim().to_string();
        Self {
            character_count: metrics::text_length(&variation),
            variation,
            provider,
            tone,
            generated_at: Utc::now(),
        }
    }
}

/// A provider-independent completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    /// Instructions (tone prompt plus context).
    pub system: String,
    /// The user turn.
    pub user: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Output token cap.
    pub max_tokens: u32,
}

impl Prompt {
    /// Prompt for generating a variation.
    pub fn for_generate(request: &GenerateRequest) -> Self {
        Self {
            system: build_system_prompt(request.tone, request.content_type),
            user: format!("Original text: {}", request.content),
            temperature: 0.7,
            max_tokens: 500,
        }
    }

    /// Prompt for shortening.
    pub fn for_shorten(request: &ShortenRequest) -> Self {
        Self {
            system: build_shorten_prompt(request.tone, request.content_type, request.target_length),
            user: format!("Text to shorten: {}", request.content),
            temperature: 0.5,
            max_tokens: 300,
        }
    }
}

/// Tone instructions plus the content type and the length reminder.
pub fn build_system_prompt(tone: TonePreset, content_type: ContentType) -> String {
    format!(
        "{}\n\nContent type: {content_type}\nImportant: Keep the response within Twitter's 280 character limit when possible. If the original content is longer, maintain the essence while being concise.",
        tone.system_prompt()
    )
}

/// Tone instructions plus the content type and a hard target length.
pub fn build_shorten_prompt(
    tone: TonePreset,
    content_type: ContentType,
    target_length: usize,
) -> String {
    format!(
        "{}\n\nContent type: {content_type}\nTASK OVERRIDE: Shorten the text to at most {target_length} characters. Keep the core message, the tone, and any @mentions, #hashtags, and links. Return only the shortened text.",
        tone.system_prompt()
    )
}

/// API key and model for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCredential {
    /// The API key.
    pub api_key: String,
    /// Model to request.
    pub model: String,
}

/// Everything the dispatcher needs for one call.
///
/// Immutable once built; construct a new one when keys or models change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    credentials: BTreeMap<ProviderKind, ProviderCredential>,
    endpoints: BTreeMap<ProviderKind, String>,
    timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchConfig {
    /// An empty config: no credentials, default endpoints, default timeout.
    pub const fn new() -> Self {
        Self {
            credentials: BTreeMap::new(),
            endpoints: BTreeMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Config for every provider that has a saved key, using the saved models.
    pub fn from_saved(keys: &ApiKeys, models: &ModelChoices) -> Self {
        ProviderKind::ALL
            .into_iter()
            .fold(Self::new(), |config, kind| match keys.get(kind) {
                Some(key) => config.with_credential(kind, key, models.get(kind)),
                None => config,
            })
    }

    /// Add or replace the credential for `kind`. A blank model falls back to the default.
    pub fn with_credential(
        mut self,
        kind: ProviderKind,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let model = model.into();
        let model = if model.trim().is_empty() {
            kind.default_model().to_string()
        } else {
            model.trim().to_string()
        };
        self.credentials.insert(
            kind,
            ProviderCredential {
                api_key: api_key.into(),
                model,
            },
        );
        self
    }

    /// Override the endpoint for `kind`.
    pub fn with_endpoint(mut self, kind: ProviderKind, endpoint: impl Into<String>) -> Self {
        self.endpoints.insert(kind, endpoint.into());
        self
    }

    /// Per-request timeout.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The credential for `kind`, if its key is non-empty.
    pub fn credential(&self, kind: ProviderKind) -> Option<&ProviderCredential> {
        self.credentials
            .get(&kind)
            .filter(|c| !c.api_key.trim().is_empty())
    }

    /// The model for `kind`: configured, else the provider default.
    pub fn model(&self, kind: ProviderKind) -> &str {
        self.credentials
            .get(&kind)
            .map_or_else(|| kind.default_model(), |c| c.model.as_str())
    }

    /// The endpoint for `kind`: overridden, else the production endpoint.
    pub fn endpoint(&self, kind: ProviderKind) -> &str {
        self.endpoints
            .get(&kind)
            .map_or_else(|| kind.default_endpoint(), String::as_str)
    }

    /// Per-request timeout.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// A provider client, one variant per vendor.
#[derive(Debug, Clone)]
pub enum Provider {
    /// Google Gemini.
    Gemini(GeminiProvider),
    /// OpenAI chat completions.
    OpenAi(ChatCompletionsProvider),
    /// DeepSeek chat completions.
    DeepSeek(ChatCompletionsProvider),
}

impl Provider {
    /// Build the client for `kind` against the endpoint and timeout in `config`.
    pub fn new(kind: ProviderKind, config: &DispatchConfig, client: Client) -> Self {
        let endpoint = config.endpoint(kind);
        let timeout = config.timeout();
        match kind {
            ProviderKind::Gemini => Self::Gemini(GeminiProvider::new(client, endpoint, timeout)),
            ProviderKind::OpenAi => Self::OpenAi(ChatCompletionsProvider::new(
                kind, client, endpoint, timeout,
            )),
            ProviderKind::DeepSeek => Self::DeepSeek(ChatCompletionsProvider::new(
                kind, client, endpoint, timeout,
            )),
        }
    }

    /// Which vendor this is.
    pub const fn kind(&self) -> ProviderKind {
        match self {
            Self::Gemini(_) => ProviderKind::Gemini,
            Self::OpenAi(_) => ProviderKind::OpenAi,
            Self::DeepSeek(_) => ProviderKind::DeepSeek,
        }
    }

    /// Send a prompt and return the raw completion text.
    pub async fn complete(&self, prompt: &Prompt, api_key: &str, model: &str) -> ProviderResult<String> {
        match self {
            Self::Gemini(p) => p.complete(prompt, api_key, model).await,
            Self::OpenAi(p) | Self::DeepSeek(p) => p.complete(prompt, api_key, model).await,
        }
    }

    /// Rewrite a draft in the requested tone.
    #[tracing::instrument(skip_all, fields(provider = %self.kind(), tone = %request.tone))]
    pub async fn generate(
        &self,
        request: &GenerateRequest,
        api_key: &str,
        model: &str,
    ) -> ProviderResult<GeneratedText> {
        let text = self.complete(&Prompt::for_generate(request), api_key, model).await?;
        self.finish(&text, request.tone)
    }

    /// Shorten a draft toward `request.target_length`.
    #[tracing::instrument(skip_all, fields(provider = %self.kind(), target = request.target_length))]
    pub async fn shorten(
        &self,
        request: &ShortenRequest,
        api_key: &str,
        model: &str,
    ) -> ProviderResult<GeneratedText> {
        let text = self.complete(&Prompt::for_shorten(request), api_key, model).await?;
        self.finish(&text, request.tone)
    }

    /// Whether `api_key` is accepted. Any failure counts as invalid.
    #[tracing::instrument(skip_all, fields(provider = %self.kind()))]
    pub async fn validate_key(&self, api_key: &str, model: &str) -> bool {
        let valid = match self {
            Self::Gemini(p) => p.probe(api_key, model).await,
            Self::OpenAi(p) | Self::DeepSeek(p) => p.probe(api_key, model).await,
        };
        tracing::info!(provider = %self.kind(), valid, "validated API key");
        valid
    }

    fn finish(&self, text: &str, tone: TonePreset) -> ProviderResult<GeneratedText> {
        if text.trim().is_empty() {
            return Err(ProviderError::EmptyCompletion(self.kind()));
        }
        Ok(GeneratedText::new(text, self.kind(), tone))
    }
}

/// Turn a non-success response into [`ProviderError::Status`].
async fn check_status(
    provider: ProviderKind,
    response: reqwest::Response,
) -> ProviderResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        provider,
        status: status.as_u16(),
        body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    })
}

/// Wrap a transport error, dropping the URL so query-string keys never reach logs.
fn http_error(provider: ProviderKind, source: reqwest::Error) -> ProviderError {
    ProviderError::Http {
        provider,
        source: source.without_url(),
    }
}
