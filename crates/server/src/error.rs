//! JSON error envelope for the HTTP API.
//!
//! Client mistakes carry a descriptive message. Server-side failures carry
//! a localized generic message, plus the underlying detail outside
//! production.

use axum::{
    Json,
    http::{StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use wwjs_core::{Error, Language};

/// Body of every error response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Only set on rate-limit rejections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into(), ..Default::default() }
    }
}

/// Seconds until the client's rate-limit quota refills.
///
/// Attached to 429 responses so outer layers can re-render them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryAfter(pub u64);

/// JSON 429 for a client that exhausted its quota.
pub fn rate_limited(language: Language, wait_secs: u64) -> Response {
    let minutes = wait_secs.div_ceil(60).max(1);
    let messages = language.messages();
    let body = ErrorResponse {
        error: messages.rate_limited(minutes),
        details: None,
        retry_after: Some(messages.retry_after(minutes)),
    };

    let mut response = (StatusCode::TOO_MANY_REQUESTS, [(RETRY_AFTER, wait_secs.to_string())], Json(body)).into_response();
    response.extensions_mut().insert(RetryAfter(wait_secs));
    response
}

/// A request failure on its way to becoming a response.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct ApiError {
    pub error: Error,
    pub language: Language,
    pub expose_details: bool,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn body(&self) -> ErrorResponse {
        let messages = self.language.messages();
        match &self.error {
            Error::MissingField(msg) | Error::InvalidInput(msg) => ErrorResponse::new(msg.clone()),
            Error::UpstreamEmptyResponse => ErrorResponse {
                details: self.expose_details.then(|| self.error.to_string()),
                ..ErrorResponse::new(messages.server_error)
            },
            Error::Upstream { .. } => ErrorResponse {
                details: self.expose_details.then(|| self.error.to_string()),
                ..ErrorResponse::new(messages.api_error)
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.error.is_client_error() {
            tracing::warn!(error = %self.error, "rejected request");
        } else {
            tracing::error!(error = %self.error, "request failed");
        }

        (self.status(), Json(self.body())).into_response()
    }
}
