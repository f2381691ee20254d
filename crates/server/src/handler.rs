//! Router assembly.
//!
//! This module wires the routes, the body limit, CORS, security headers,
//! request tracing and (when serving for real) the per-IP rate limiter on
//! `/api`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use wwjs_core::ConfigError;

use crate::layers;
use crate::routes;
use crate::state::AppState;

/// Largest accepted request body.
pub const BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Build the application router.
///
/// The rate limiter keys on the client IP and needs connect info from
/// the listener, so in-process tests build the router without it.
pub fn app(state: AppState, rate_limit: bool) -> Result<Router, ConfigError> {
    let mut api = Router::new()
        .route("/analyze", post(routes::analyze))
        .route("/health", get(routes::health));

    if rate_limit {
        api = layers::rate_limited(api, &state.config)?;
    }

    let router = Router::new()
        .route("/", get(routes::index))
        .nest("/api", api)
        .fallback(routes::not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT));

    Ok(layers::security_headers(router)
        .layer(layers::cors(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
