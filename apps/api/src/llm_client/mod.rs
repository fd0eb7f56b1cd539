/// LLM client: the single point of entry for all Gemini calls in Kanso.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// HTTP endpoints go through `LlmClient::invoke` (rate-limit backoff applied).
/// The live interview socket is the one caller that uses `ChatModel::complete`
/// directly and therefore has no backoff.
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub mod gemini;
pub mod prompts;
pub mod retry;

pub use gemini::{GeminiModel, MODEL};
pub use retry::invoke_with_retry;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("AI not available – API key not configured")]
    Disabled,
}

impl From<reqwest::Error> for LlmError {
    /// Drops the request URL: it ends in `:generateContent`, which contains
    /// the `rate` marker the retry wrapper looks for.
    fn from(e: reqwest::Error) -> Self {
        LlmError::Http(e.without_url())
    }
}

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single role-tagged message. A conversation is a `Vec<Turn>` in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// What a model call accepts: a bare prompt or an ordered message list.
#[derive(Debug, Clone, Copy)]
pub enum LlmInput<'a> {
    Prompt(&'a str),
    Messages(&'a [Turn]),
}

/// One unguarded call to a text-generation backend.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, input: LlmInput<'_>) -> Result<String, LlmError>;
}

/// Handle injected into `AppState`. Carries either a live backend or the
/// `Disabled` state when no credential was configured at startup.
#[derive(Clone)]
pub struct LlmClient {
    model: Option<Arc<dyn ChatModel>>,
}

impl LlmClient {
    /// Builds a Gemini-backed client, or a disabled one when the key is absent.
    pub fn from_api_key(api_key: Option<&str>) -> Result<Self, LlmError> {
        match api_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => {
                info!("LLM client initialized (model: {MODEL})");
                Ok(Self::with_model(Arc::new(GeminiModel::new(key.to_string())?)))
            }
            None => {
                tracing::warn!("GOOGLE_API_KEY not set – AI features disabled");
                Ok(Self::disabled())
            }
        }
    }

    pub fn with_model(model: Arc<dyn ChatModel>) -> Self {
        Self { model: Some(model) }
    }

    pub fn disabled() -> Self {
        Self { model: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    /// The raw backend, for callers that must not go through the retry wrapper.
    pub fn model(&self) -> Result<Arc<dyn ChatModel>, LlmError> {
        self.model.clone().ok_or(LlmError::Disabled)
    }

    /// Calls the model with rate-limit backoff and returns the trimmed text.
    pub async fn invoke(&self, input: LlmInput<'_>) -> Result<String, LlmError> {
        let model = self.model()?;
        let text = invoke_with_retry(|| model.complete(input)).await?;
        Ok(text.trim().to_string())
    }

    /// Calls the model and deserializes the text response as JSON.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn invoke_json<T: DeserializeOwned>(
        &self,
        input: LlmInput<'_>,
    ) -> Result<T, LlmError> {
        let text = self.invoke(input).await?;
        serde_json::from_str(strip_code_fences(&text)).map_err(LlmError::Parse)
    }
}

/// Strips a leading ```lang line and a trailing ``` from LLM output.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (```json, ```latex, ...) up to the first newline.
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}
