//! Service description at `/` and the JSON 404 fallback.

use axum::{Json, extract::OriginalUri, http::StatusCode};
use serde_json::{Value, json};

pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "What Would Jesus Say API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "analyze": "POST /api/analyze",
            "health": "GET /api/health",
        },
    }))
}

pub async fn not_found(OriginalUri(uri): OriginalUri) -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found", "path": uri.path() })))
}
