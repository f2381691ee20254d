//! OpenAI client error types.

use std::sync::Arc;

/// Errors from the chat-completions client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OpenAiError {
    /// Missing API key.
    #[error("missing API key: WWJS_OPENAI_API_KEY not set")]
    MissingApiKey,

    /// Request rejected before sending.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthError(String),

    /// Rate limited by the provider.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Other non-2xx response.
    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl OpenAiError {
    /// HTTP status reported by the provider, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            OpenAiError::AuthError(_) => Some(401),
            OpenAiError::RateLimited(_) => Some(429),
            OpenAiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for OpenAiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { OpenAiError::Timeout } else { OpenAiError::Network(Arc::new(err)) }
    }
}

impl From<OpenAiError> for wwjs_core::Error {
    fn from(err: OpenAiError) -> Self {
        wwjs_core::Error::Upstream { status: err.status(), message: format!("OpenAI API error: {err}") }
    }
}
