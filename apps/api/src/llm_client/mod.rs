//! LLM Client: the single point of entry for hosted-model calls in the screener.
//!
//! Talks to an OpenAI-compatible `/chat/completions` endpoint (Groq by default).
//! Timeout and retry budget live here, at the client level; callers never retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "deepseek-r1-distill-llama-70b";

/// Closing sentinel of the reasoning section emitted by reasoning models.
pub const REASONING_END: &str = "</think>";
const REASONING_START: &str = "<think>";

const RATE_LIMIT_HINT: &str = "Rate limit reached. Wait a few seconds and try again.";
const TIMEOUT_HINT: &str = "The analysis timed out. The document may be too large or complex.";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// A short user-facing hint for failures the user can act on.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            LlmError::RateLimited { .. } => Some(RATE_LIMIT_HINT),
            LlmError::Api { status: 429, .. } => Some(RATE_LIMIT_HINT),
            LlmError::Http(e) if e.is_timeout() => Some(TIMEOUT_HINT),
            other => {
                let message = other.to_string().to_lowercase();
                if message.contains("rate limit") {
                    Some(RATE_LIMIT_HINT)
                } else if message.contains("timeout") || message.contains("timed out") {
                    Some(TIMEOUT_HINT)
                } else {
                    None
                }
            }
        }
    }
}

/// A hosted chat model that turns one prompt into one text completion.
///
/// `AppState` carries an `Arc<dyn ChatModel>` so the pipeline can run against
/// a scripted model in tests.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    fn model_id(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if the provider returned any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Connection and sampling settings for [`LlmClient`].
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
    pub max_retries: u32,
    /// First backoff delay; doubles on each further attempt.
    pub retry_backoff: Duration,
}

impl LlmSettings {
    pub fn new(api_key: String) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            timeout: Duration::from_secs(60),
            max_retries: 3,
            retry_backoff: Duration::from_secs(1),
        }
    }
}

/// Chat-completions client with retry logic on rate limits and server errors.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    settings: LlmSettings,
}

impl LlmClient {
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    /// Makes a raw call to the provider, returning the full response object.
    /// Retries on 429 (rate limit), 5xx and transport errors with exponential backoff.
    pub async fn call(&self, prompt: &str) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: &self.settings.model,
            temperature: self.settings.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let attempts = self.settings.max_retries.max(1);
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = self.settings.retry_backoff * (1 << (attempt - 1));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(self.endpoint())
                .bearer_auth(&self.settings.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(if status.as_u16() == 429 {
                    LlmError::RateLimited {
                        retries: attempt + 1,
                    }
                } else {
                    LlmError::Api {
                        status: status.as_u16(),
                        message: body,
                    }
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ProviderError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            let chat_response: ChatResponse = serde_json::from_str(&body)?;

            if let Some(usage) = &chat_response.usage {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(chat_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited { retries: attempts }))
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.call(prompt).await?;
        match response.text() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            _ => Err(LlmError::EmptyContent),
        }
    }

    fn model_id(&self) -> &str {
        &self.settings.model
    }
}

/// Cleans a raw model answer.
///
/// Without `keep_reasoning`, everything up to the last reasoning sentinel is
/// dropped. With it, the reasoning markers are rewritten into readable
/// separators so the whole transcript can be shown.
pub fn format_response(text: &str, keep_reasoning: bool) -> String {
    let text = text.trim();
    if keep_reasoning {
        text.replace(REASONING_START, "[thinking...] ")
            .replace(REASONING_END, "\n---\n")
    } else {
        strip_reasoning(text).to_string()
    }
}

/// Returns the text after the last reasoning sentinel, trimmed.
pub fn strip_reasoning(text: &str) -> &str {
    match text.rfind(REASONING_END) {
        Some(idx) => text[idx + REASONING_END.len()..].trim(),
        None => text,
    }
}
