//! OpenAI chat-completions client.
//!
//! ### Protocol
//!
//! - **Endpoint**: `{base_url}/chat/completions`
//! - **Authentication**: `Authorization: Bearer <key>` header.
//! - **Failures**: 401/403 → auth, 429 → rate limited, other non-2xx → HTTP
//!   error carrying the provider's message. Nothing is retried.
//! - **Normalization**: first choice's content plus `usage.total_tokens`.

pub mod error;
pub mod request;
pub mod response;

pub use error::OpenAiError;
pub use request::{ChatMessage, ChatRequest, Role};
pub use response::{ApiErrorBody, ChatCompletionResponse};

use async_trait::async_trait;
use reqwest::header;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wwjs_core::AppConfig;

use crate::{Generation, TextGenerator};

/// Default base URL for the OpenAI API.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "wwjs/0.1";

/// OpenAI client configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Base URL (default: https://api.openai.com/v1).
    pub base_url: String,
    pub model: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub user_agent: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_output_tokens: 300,
            temperature: 0.7,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for OpenAiConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.openai_api_key.clone().unwrap_or_default(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: config.openai_model.clone(),
            timeout: config.timeout(),
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
            ..Default::default()
        }
    }
}

/// Chat-completions API client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, OpenAiError> {
        if config.api_key.trim().is_empty() {
            return Err(OpenAiError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| OpenAiError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Build the request body for one system/user exchange.
    pub fn chat_request(&self, system: &str, user: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            max_tokens: self.config.max_output_tokens,
            temperature: self.config.temperature,
        }
    }

    /// Execute a chat completion.
    pub async fn chat(&self, req: &ChatRequest) -> Result<ChatCompletionResponse, OpenAiError> {
        req.validate()?;

        let start = Instant::now();
        let url = format!("{}/chat/completions", self.config.base_url);

        tracing::debug!(model = %req.model, "calling chat completions");

        let http_response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .json(req)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("chat completions response status: {}", status);

        if !status.is_success() {
            let body = http_response.text().await.unwrap_or_default();
            let message = ApiErrorBody::message_from(&body);

            return Err(match status.as_u16() {
                401 | 403 => OpenAiError::AuthError(message),
                429 => OpenAiError::RateLimited(message),
                code => OpenAiError::HttpError { status: code, message },
            });
        }

        let bytes = http_response.bytes().await?;
        let completion: ChatCompletionResponse =
            serde_json::from_slice(&bytes).map_err(|e| OpenAiError::Parse(e.to_string()))?;

        tracing::debug!(
            "chat completion finished in {:?}, {} choices",
            start.elapsed(),
            completion.choices.len()
        );

        Ok(completion)
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, system: &str, user: &str) -> Result<Generation, OpenAiError> {
        let req = self.chat_request(system, user);
        self.chat(&req).await.map(Generation::from)
    }
}
