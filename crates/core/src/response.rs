//! Response envelope returned by the analyze operation.

use serde::{Deserialize, Serialize};

/// Result of analyzing one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub message: String,
    pub cached: bool,
    pub model: String,
    /// Present only on a fresh generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
}

impl AnalyzeResponse {
    /// Envelope for text served from the cache.
    pub fn from_cache(message: String, model: impl Into<String>) -> Self {
        Self { message, cached: true, model: model.into(), tokens_used: None }
    }

    /// Envelope for freshly generated text.
    pub fn generated(message: String, model: impl Into<String>, tokens_used: Option<u32>) -> Self {
        Self { message, cached: false, model: model.into(), tokens_used }
    }
}
