//! Session gate middleware.
//! Redirects unauthenticated requests on non-public routes to login.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::request::cookie_value;
use crate::http::response;
use crate::observability::metrics;
use crate::session::{GateDecision, SessionGate, SessionVerifier};

/// State required by the session gate.
#[derive(Clone)]
pub struct SessionGateState {
    pub gate: Arc<SessionGate>,
    pub verifier: Arc<SessionVerifier>,
    pub cookie_name: String,
}

pub async fn session_gate_middleware(
    State(state): State<SessionGateState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    metrics::record_request();

    let token = cookie_value(request.headers(), &state.cookie_name);
    let verification = state.verifier.verify(token.as_deref());
    let path = request.uri().path().to_string();

    match state.gate.decide(&path, verification) {
        GateDecision::Allow(Some(claims)) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        GateDecision::Allow(None) => next.run(request).await,
        GateDecision::RedirectToLogin => {
            tracing::debug!(path = %path, "No valid session, redirecting to login");
            metrics::record_rejected("unauthenticated");
            response::redirect_to_login(state.gate.login_path())
        }
    }
}
