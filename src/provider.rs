use crate::config::{Provider, ProviderConfig};
use crate::constants::{
    ANTHROPIC_MAX_TOKENS, ANTHROPIC_VERSION, MODEL_CALL_FAILED, PROVIDER_TIMEOUT_SECS,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use ureq::Agent;
use ureq::http::Response;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("no API key configured for the {0} provider")]
    MissingApiKey(Provider),

    #[error("request failed: {0}")]
    Transport(#[from] ureq::Error),

    #[error("model API error: {status} {reason}")]
    Status {
        status: u16,
        reason: String,
        /// parsed error body, when the provider sent JSON
        details: Option<serde_json::Value>,
    },

    #[error("unexpected response payload: {0}")]
    Malformed(String),

    #[error("model returned no text")]
    EmptyResponse,
}

/// one generation attempt, as shown in the confirmation loop
#[derive(Debug)]
pub enum Candidate {
    Ready(String),
    Failed(ProviderError),
}

impl Candidate {
    /// text to show the user, the failure marker for failed attempts
    pub fn display_text(&self) -> &str {
        match self {
            Candidate::Ready(message) => message,
            Candidate::Failed(_) => MODEL_CALL_FAILED,
        }
    }

    /// the committable message, never the failure marker
    pub fn message(&self) -> Option<&str> {
        match self {
            Candidate::Ready(message) => Some(message),
            Candidate::Failed(_) => None,
        }
    }
}

impl From<Result<String, ProviderError>> for Candidate {
    fn from(result: Result<String, ProviderError>) -> Self {
        match result {
            Ok(message) => Candidate::Ready(message),
            Err(e) => Candidate::Failed(e),
        }
    }
}

/// turns a compiled prompt into a single completion
pub trait Gateway {
    fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

/// blocking HTTP client for the configured provider
pub struct HttpGateway {
    agent: Agent,
    config: ProviderConfig,
}

impl HttpGateway {
    pub fn new(config: ProviderConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(PROVIDER_TIMEOUT_SECS)))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent, config }
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.config
            .api_key()
            .ok_or(ProviderError::MissingApiKey(self.config.provider))
    }

    fn chat_completion(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.config.base_url());
        let request = ChatRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .agent
            .post(url.as_str())
            .header("Authorization", format!("Bearer {}", self.api_key()?))
            .send_json(&request)?;
        let payload: ChatResponse = read_payload(response)?;

        first_text(
            payload
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content),
        )
    }

    fn messages(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/v1/messages", self.config.base_url());
        let request = MessagesRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            max_tokens: ANTHROPIC_MAX_TOKENS,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .agent
            .post(url.as_str())
            .header("x-api-key", self.api_key()?)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .send_json(&request)?;
        let payload: MessagesResponse = read_payload(response)?;

        first_text(
            payload
                .content
                .into_iter()
                .next()
                .and_then(|block| block.text),
        )
    }
}

impl Gateway for HttpGateway {
    fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        tracing::debug!(
            provider = %self.config.provider,
            model = %self.config.model,
            prompt_chars = prompt.len(),
            "requesting completion"
        );
        match self.config.provider {
            Provider::OpenAiCompatible => self.chat_completion(prompt),
            Provider::AnthropicCompatible => self.messages(prompt),
        }
    }
}

/// decode a success body, or turn an error status into `ProviderError::Status`
fn read_payload<T: DeserializeOwned>(
    mut response: Response<ureq::Body>,
) -> Result<T, ProviderError> {
    let status = response.status();
    tracing::debug!(status = status.as_u16(), "provider responded");

    if !status.is_success() {
        let details = response
            .body_mut()
            .read_to_string()
            .ok()
            .and_then(|body| serde_json::from_str(&body).ok());
        return Err(ProviderError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
            details,
        });
    }

    response
        .body_mut()
        .read_json::<T>()
        .map_err(|e| ProviderError::Malformed(e.to_string()))
}

fn first_text(text: Option<String>) -> Result<String, ProviderError> {
    text.map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(ProviderError::EmptyResponse)
}
