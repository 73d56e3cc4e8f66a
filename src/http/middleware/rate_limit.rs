//! Rate limiting middleware for API routes.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::response;
use crate::observability::metrics;
use crate::security::identity::resolve_identity;
use crate::security::RateLimiter;

/// State required by the rate limit stage.
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<RateLimiter>,
    pub api_marker: String,
    pub fingerprint_cookie: String,
}

pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Only API-marked routes consume tokens.
    if !request.uri().path().contains(&state.api_marker) {
        return next.run(request).await;
    }

    let Some(identity) = resolve_identity(&request, &state.fingerprint_cookie) else {
        tracing::warn!(path = %request.uri().path(), "Cannot identify caller for rate limiting");
        metrics::record_rejected("identification_failed");
        return response::identification_failed();
    };

    if state.limiter.allow(&identity) {
        next.run(request).await
    } else {
        tracing::warn!(client = %identity, "Rate limit exceeded");
        metrics::record_rejected("rate_limited");
        response::too_many_requests()
    }
}
