//! Cross-cutting HTTP layers: CORS, security headers and per-IP rate
//! limiting.

use std::net::IpAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Request,
    http::{
        HeaderName, HeaderValue, Method, StatusCode,
        header::{ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE},
        request::Parts,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use tower::{Layer, ServiceExt};
use tower_governor::{
    GovernorError, GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, SmartIpKeyExtractor},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use wwjs_core::{AppConfig, ConfigError, Language};

use crate::error::{self, ErrorResponse, RetryAfter};

const EXTENSION_ORIGIN_PREFIX: &str = "chrome-extension://";

/// Headers added to every response unless a handler already set them.
pub const SECURITY_HEADERS: [(&str, &str); 12] = [
    (
        "content-security-policy",
        "default-src 'self';base-uri 'self';font-src 'self' https: data:;form-action 'self';\
frame-ancestors 'self';img-src 'self' data:;object-src 'none';script-src 'self';script-src-attr 'none';\
style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=31536000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

/// Whether a browser origin may call the API.
///
/// Any origin passes when the list holds `*` or outside production;
/// otherwise it must be listed or be a browser extension.
pub fn origin_allowed(origin: &str, allowed: &[String], production: bool) -> bool {
    if !production || allowed.iter().any(|o| o == "*") {
        return true;
    }

    allowed.iter().any(|o| o == origin) || origin.starts_with(EXTENSION_ORIGIN_PREFIX)
}

pub fn cors(config: &AppConfig) -> CorsLayer {
    let allowed = config.allowed_origins();
    let production = config.is_production();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &Parts| {
            origin
                .to_str()
                .is_ok_and(|origin| origin_allowed(origin, &allowed, production))
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}

pub fn security_headers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SECURITY_HEADERS.iter().fold(router, |router, &(name, value)| {
        router.layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ))
    })
}

/// Limit each client IP to `rate_limit_max_requests` per window.
///
/// The bucket holds the full allowance and refills one request every
/// `window / max`. Addresses in `rate_limit_skip_ips` bypass the limiter.
/// Rejections are JSON in the caller's `Accept-Language`.
pub fn rate_limited<S>(router: Router<S>, config: &AppConfig) -> Result<Router<S>, ConfigError>
where
    S: Clone + Send + Sync + 'static,
{
    let period = config.rate_limit_window() / config.rate_limit_max_requests;
    if period.is_zero() {
        return Err(ConfigError::Invalid {
            field: "rate_limit_window_ms".into(),
            reason: format!("window too short for {} requests", config.rate_limit_max_requests),
        });
    }

    let governor_config = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .period(period)
        .burst_size(config.rate_limit_max_requests)
        .error_handler(governor_error)
        .finish()
        .ok_or_else(|| ConfigError::Invalid {
            field: "rate_limit_max_requests".into(),
            reason: "rejected by rate limiter".into(),
        })?;
    let governor = GovernorLayer { config: Arc::new(governor_config) };
    let exempt: Arc<[IpAddr]> = config.rate_limit_skip_ips()?.into();

    tracing::info!(
        max_requests = config.rate_limit_max_requests,
        window_ms = config.rate_limit_window_ms,
        exempt = exempt.len(),
        "rate limiting enabled"
    );

    Ok(router.layer(middleware::from_fn(move |request: Request, next: Next| {
        let governor = governor.clone();
        let exempt = exempt.clone();
        async move {
            if is_exempt(&request, &exempt) {
                return next.run(request).await;
            }

            let language = Language::detect(request.headers().get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok()));
            let response = match governor.layer(next).oneshot(request).await {
                Ok(response) => response,
                Err(never) => match never {},
            };

            match response.extensions().get::<RetryAfter>().copied() {
                Some(RetryAfter(wait_secs)) if language != Language::En => error::rate_limited(language, wait_secs),
                _ => response,
            }
        }
    })))
}

fn is_exempt(request: &Request, exempt: &[IpAddr]) -> bool {
    !exempt.is_empty() && SmartIpKeyExtractor.extract(request).is_ok_and(|ip| exempt.contains(&ip))
}

fn governor_error(err: GovernorError) -> Response {
    match err {
        GovernorError::TooManyRequests { wait_time, .. } => error::rate_limited(Language::En, wait_time),
        other => {
            tracing::error!(error = %other, "rate limiter could not process request");
            let body = ErrorResponse::new(Language::En.messages().server_error);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origins(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_wildcard_allows_everything() {
        assert!(origin_allowed("https://evil.example", &origins(&["*"]), true));
    }

    #[test]
    fn test_development_allows_everything() {
        assert!(origin_allowed("https://evil.example", &origins(&["https://good.example"]), false));
    }

    #[test]
    fn test_production_list() {
        let allowed = origins(&["https://good.example"]);
        assert!(origin_allowed("https://good.example", &allowed, true));
        assert!(!origin_allowed("https://evil.example", &allowed, true));
    }

    #[test]
    fn test_extension_origin_always_allowed() {
        assert!(origin_allowed("chrome-extension://abcdefghijklmnop", &origins(&[]), true));
    }

    #[test]
    fn test_rate_limited_rejects_degenerate_window() {
        let config = AppConfig { rate_limit_window_ms: 1, rate_limit_max_requests: 10, ..Default::default() };
        assert!(rate_limited(Router::<()>::new(), &config).is_ok());

        let config = AppConfig { rate_limit_window_ms: 1, rate_limit_max_requests: 2_000_000, ..Default::default() };
        assert!(matches!(rate_limited(Router::<()>::new(), &config), Err(ConfigError::Invalid { .. })));
    }
}
