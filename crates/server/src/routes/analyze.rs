//! `POST /api/analyze`.
//!
//! Validates the body, sanitizes the page description and hands it to the
//! analyzer. The body's `language` wins over `Accept-Language`.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, header::ACCEPT_LANGUAGE},
};
use serde::{Deserialize, Serialize};
use wwjs_core::{AnalyzeResponse, Error, Language, PageDescription, sanitize};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body sent by the extension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub page_data: Option<PageDescription>,
    /// Language tag; unsupported tags fall back to English.
    #[serde(default)]
    pub language: Option<String>,
}

pub async fn analyze(
    State(state): State<AppState>, headers: HeaderMap, payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let header_language = Language::detect(headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok()));

    let Json(request) = payload.map_err(|rejection| state.error(Error::InvalidInput(rejection.body_text()), header_language))?;

    let language = request
        .language
        .as_deref()
        .map(Language::parse)
        .unwrap_or(header_language);

    let page = request
        .page_data
        .ok_or_else(|| state.error(Error::MissingField("Missing pageData in request body".into()), language))?;
    page.validate().map_err(|e| state.error(e, language))?;

    let sanitized = sanitize(&page);
    tracing::info!(title = %sanitized.title, %language, "Analyzing page");

    state
        .analyzer
        .analyze(&sanitized, language)
        .await
        .map(Json)
        .map_err(|e| state.error(e, language))
}
