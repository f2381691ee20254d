//! Unified error types for wwjs.
//!
//! Every per-request failure ends up as one of these variants and is
//! converted to a JSON error envelope at the HTTP boundary. Startup
//! failures live in [`crate::ConfigError`] instead.

/// Unified per-request error types.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// A required input field is absent or empty.
    #[error("MISSING_FIELD: {0}")]
    MissingField(String),

    /// Request body could not be parsed.
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Upstream call succeeded but produced no usable text.
    #[error("UPSTREAM_EMPTY_RESPONSE: no response text from model")]
    UpstreamEmptyResponse,

    /// Upstream call failed (network, auth, rate limit, malformed payload).
    #[error("UPSTREAM_ERROR: {message}")]
    Upstream { status: Option<u16>, message: String },
}

impl Error {
    /// HTTP status the error maps to at the request boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::MissingField(_) | Error::InvalidInput(_) => 400,
            Error::UpstreamEmptyResponse | Error::Upstream { .. } => 500,
        }
    }

    /// Whether the caller sent a bad request (as opposed to a server-side failure).
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
