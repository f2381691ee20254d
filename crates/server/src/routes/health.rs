//! `GET /api/health`.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use wwjs_core::CacheStats;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339 server time.
    pub timestamp: String,
    pub cache: CacheStats,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        cache: state.analyzer.cache().stats(),
    })
}
