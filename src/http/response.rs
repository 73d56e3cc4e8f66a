//! Terminal admission responses.
//!
//! # Responsibilities
//! - Produce the rejection responses the pipeline may end with
//! - Keep body shapes stable; clients match on them
//!
//! # Design Decisions
//! - Every admission failure is a terminal response object, never an
//!   error propagated to downstream handlers
//! - The redirect carries no return URL

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde_json::json;

/// Redirect an unauthenticated request to the login path.
pub fn redirect_to_login(login_path: &str) -> Response {
    Redirect::temporary(login_path).into_response()
}

/// 403 for requests whose identity cannot be resolved.
pub fn identification_failed() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "message": "Unable to identify request source",
            "error": "IDENTIFICATION_FAILED",
        })),
    )
        .into_response()
}

/// 429 for an exhausted token bucket.
pub fn too_many_requests() -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({ "message": "Too Many Requests" })),
    )
        .into_response()
}
