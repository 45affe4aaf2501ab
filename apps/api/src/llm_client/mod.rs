/// LLM Client — the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the generation API directly.
/// All LLM interactions MUST go through a `TextGenerator`.
///
/// Model: gemini-2.0-flash (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// The model used for all generation calls.
pub const MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    /// Single-turn request: the prompt is the only content.
    fn single_turn(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        }
    }
}

// Typed view over the parts of the response we read internally.
// Unknown fields are ignored so upstream shape drift never breaks decoding.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseView {
    #[serde(default)]
    candidates: Vec<CandidateView>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidateView {
    content: Option<ContentView>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentView {
    #[serde(default)]
    parts: Vec<PartView>,
}

#[derive(Debug, Deserialize)]
struct PartView {
    text: Option<String>,
}

/// Envelope around a successful `generateContent` response.
///
/// Internal callers use `text()` / `finish_reason()`; the raw payload is
/// kept untouched so it can be forwarded to the caller as-is.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    raw: Value,
    text: Option<String>,
    finish_reason: Option<String>,
}

impl GenerationResult {
    pub fn from_raw(raw: Value) -> Self {
        let view: ResponseView = serde_json::from_value(raw.clone()).unwrap_or_default();
        let first = view.candidates.into_iter().next();

        let finish_reason = first.as_ref().and_then(|c| c.finish_reason.clone());
        let text = first
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .filter(|t| !t.is_empty());

        Self {
            raw,
            text,
            finish_reason,
        }
    }

    /// Concatenated text of the first candidate, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.finish_reason.as_deref()
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

/// Anything that can turn a prompt into a generation result.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, LlmError>;
}

/// Gemini `generateContent` client. One call per prompt, no retries.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: &str) -> Result<Self, LlmError> {
        // Timeouts are left at the reqwest defaults.
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!(
                "{}/v1beta/models/{MODEL}:generateContent",
                base_url.trim_end_matches('/')
            ),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, LlmError> {
        let request_body = GenerateContentRequest::single_turn(prompt);

        // The key travels as a query parameter; never log the full URL.
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Gemini API error (status {}): {}", status, body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = response.bytes().await?;
        let raw: Value = serde_json::from_slice(&bytes)?;
        let result = GenerationResult::from_raw(raw);

        debug!(
            "Gemini call succeeded: text_len={}, finish_reason={:?}",
            result.text().map(str::len).unwrap_or(0),
            result.finish_reason()
        );

        Ok(result)
    }
}
