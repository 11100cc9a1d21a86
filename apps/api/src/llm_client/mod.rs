//! Provider client — the single point of entry for all LLM calls.
//!
//! All chat-completion traffic goes through this module. It speaks the
//! OpenAI-style `/chat/completions` wire format, which both supported
//! providers (OpenRouter and OpenAI) accept.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::errors::GenerateError;

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENROUTER_MODEL: &str = "openai/gpt-4o-mini";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";

/// Fixed low temperature for reduced variance between generations.
const TEMPERATURE: f32 = 0.4;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<LlmError> for GenerateError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Api { status, .. } if status == 401 || status == 403 => {
                GenerateError::Authentication(status)
            }
            LlmError::Api { status, message } => {
                GenerateError::Upstream(format!("provider returned {status}: {message}"))
            }
            LlmError::Http(e) => GenerateError::Upstream(e.to_string()),
        }
    }
}

/// One resolved provider: which service to call, with which model and
/// credentials. Immutable once resolved; handlers build it per request so
/// tests can inject fakes instead of reading the environment ambiently.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: &'static str,
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub extra_headers: Vec<(&'static str, String)>,
}

impl ProviderConfig {
    /// Picks exactly one provider from the loaded configuration.
    /// OpenRouter takes precedence when both keys are set.
    pub fn resolve(config: &Config) -> Result<Self, GenerateError> {
        if let Some(key) = &config.openrouter_api_key {
            let mut extra_headers = Vec::new();
            if let Some(site) = &config.openrouter_site_url {
                extra_headers.push(("HTTP-Referer", site.clone()));
            }
            if let Some(name) = &config.openrouter_app_name {
                extra_headers.push(("X-Title", name.clone()));
            }

            return Ok(ProviderConfig {
                provider: "openrouter",
                model: config
                    .openrouter_model
                    .clone()
                    .or_else(|| config.openai_model.clone())
                    .unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string()),
                api_key: key.clone(),
                base_url: config
                    .openrouter_base_url
                    .clone()
                    .unwrap_or_else(|| OPENROUTER_BASE_URL.to_string()),
                extra_headers,
            });
        }

        if let Some(key) = &config.openai_api_key {
            return Ok(ProviderConfig {
                provider: "openai",
                model: config
                    .openai_model
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                api_key: key.clone(),
                base_url: OPENAI_BASE_URL.to_string(),
                extra_headers: Vec::new(),
            });
        }

        Err(GenerateError::Configuration(
            "missing API key: set OPENROUTER_API_KEY (recommended) or OPENAI_API_KEY".to_string(),
        ))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatRequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatRequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<MessageContent>,
}

/// Provider message content arrives in one of two shapes: a plain string, or
/// a sequence of content parts. Modeled as an explicit union so extraction
/// can fail loudly when neither shape matches, instead of probing optional
/// fields.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// One element of a multi-part content array: a bare string fragment, or an
/// object carrying its text under `text` or `text.value`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    Text(String),
    Fragment {
        #[serde(default)]
        text: Option<FragmentText>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FragmentText {
    Plain(String),
    Wrapped { value: String },
}

/// Thin wrapper over a shared reqwest client. One chat-completion call per
/// generation request; no retries — a failed call surfaces to the user, who
/// decides whether to resubmit.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
}

impl LlmClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// Issues a single chat-completion request against the resolved provider.
    pub async fn complete(
        &self,
        provider: &ProviderConfig,
        system: &str,
        prompt: &str,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let request_body = ChatRequest {
            model: &provider.model,
            temperature: TEMPERATURE,
            messages: vec![
                ChatRequestMessage {
                    role: "system",
                    content: system,
                },
                ChatRequestMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let mut request = self
            .client
            .post(format!("{}/chat/completions", provider.base_url))
            .bearer_auth(&provider.api_key)
            .json(&request_body);
        for (name, value) in &provider.extra_headers {
            request = request.header(*name, value);
        }

        let response = request.send().await?;
        let status = response.status();

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

        let completion: ChatCompletionResponse = response.json().await?;
        debug!(
            provider = provider.provider,
            model = %provider.model,
            choices = completion.choices.len(),
            "chat completion succeeded"
        );

        Ok(completion)
    }
}

impl Default for LlmClient {
    fn default() -> Self {
        Self::new()
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
