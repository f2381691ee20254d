//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
///
/// All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `openai_model` or `openai_base_url` is empty
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `max_output_tokens` is 0 or exceeds 4096
    /// - `temperature` is outside 0.0..=2.0
    /// - either rate limit setting is 0
    /// - `rate_limit_skip_ips` holds something other than IP addresses
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.openai_model.trim().is_empty() {
            return Err(invalid("openai_model", "must not be empty"));
        }

        if !self.openai_base_url.starts_with("http://") && !self.openai_base_url.starts_with("https://") {
            return Err(invalid("openai_base_url", "must be an http(s) URL"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.max_output_tokens == 0 || self.max_output_tokens > 4096 {
            return Err(invalid("max_output_tokens", "must be between 1 and 4096"));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid("temperature", "must be between 0.0 and 2.0"));
        }

        if self.rate_limit_window_ms == 0 {
            return Err(invalid("rate_limit_window_ms", "must be greater than 0"));
        }
        if self.rate_limit_max_requests == 0 {
            return Err(invalid("rate_limit_max_requests", "must be greater than 0"));
        }

        self.rate_limit_skip_ips()?;

        if self.allowed_origins().is_empty() {
            tracing::warn!("allowed_origins is empty; only extension and origin-less requests will pass CORS");
        }

        Ok(())
    }
}
