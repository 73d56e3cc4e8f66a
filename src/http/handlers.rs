//! Application handlers gated by the admission pipeline.
//!
//! Deliberately thin: they exist so the pipeline has real routes to
//! protect and so session issuance is exercised end to end.

use axum::extract::{Extension, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::session::SessionClaims;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResult {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// POST /api/v1/auth/login
///
/// Checks credentials against the configured demo users. Success issues
/// the session cookie and redirects to the home page, mirroring a
/// browser form flow.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Response {
    let user = state
        .users
        .iter()
        .find(|u| u.username == body.username && u.password == body.password);

    let Some(user) = user else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(AuthResult {
                success: false,
                message: "Invalid username or password".to_string(),
            }),
        )
            .into_response();
    };

    match state.verifier.issue(&user.username, &user.user_id) {
        Ok(token) => {
            tracing::info!(username = %user.username, "Session issued");
            let cookie = format!(
                "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
                state.session_cookie,
                token,
                state.verifier.ttl_secs()
            );
            ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to issue session");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AuthResult {
                    success: false,
                    message: "Internal server error".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// POST /api/v1/auth/logout
///
/// Clears the session cookie. Succeeds whether or not a session was
/// present.
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
        state.session_cookie
    );
    (
        [(header::SET_COOKIE, cookie)],
        Json(AuthResult {
            success: true,
            message: "Successfully logged out".to_string(),
        }),
    )
        .into_response()
}

/// GET /api/v1/me — echo the verified session claims.
pub async fn me(claims: Option<Extension<SessionClaims>>) -> Response {
    match claims {
        Some(Extension(claims)) => Json(claims).into_response(),
        // Only reachable if the route is misconfigured as public.
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}

/// GET / — protected landing page placeholder.
pub async fn home(claims: Option<Extension<SessionClaims>>) -> String {
    match claims {
        Some(Extension(claims)) => format!("Signed in as {}\n", claims.sub),
        None => "Signed in\n".to_string(),
    }
}

/// GET /login — public login page placeholder.
pub async fn login_page() -> &'static str {
    "Please log in via POST /api/v1/auth/login\n"
}

/// GET /health — public liveness endpoint.
pub async fn health() -> Json<SystemStatus> {
    Json(SystemStatus {
        status: "operational",
        version: env!("CARGO_PKG_VERSION"),
    })
}
