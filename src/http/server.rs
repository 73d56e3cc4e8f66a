//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up the admission pipeline (session gate, then rate limiter)
//! - Apply cross-cutting layers (tracing, timeout, body limit, request ID)
//! - Serve with graceful shutdown and tear the limiter down afterwards

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::schema::UserConfig;
use crate::config::GateConfig;
use crate::http::handlers;
use crate::http::middleware::{
    rate_limit_middleware, session_gate_middleware, RateLimitState, SessionGateState,
};
use crate::http::request::RequestIdLayer;
use crate::security::RateLimiter;
use crate::session::{SessionGate, SessionVerifier};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<SessionVerifier>,
    pub users: Arc<Vec<UserConfig>>,
    pub session_cookie: String,
}

/// HTTP server for the admission gate.
pub struct HttpServer {
    router: Router,
    limiter: Arc<RateLimiter>,
    config: GateConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GateConfig) -> Self {
        // Initialize subsystems
        let verifier = Arc::new(SessionVerifier::new(
            &config.session.secret,
            config.session.ttl_hours,
        ));
        let gate = Arc::new(SessionGate::new(&config.routes));
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));

        let state = AppState {
            verifier: verifier.clone(),
            users: Arc::new(config.users.clone()),
            session_cookie: config.session.cookie_name.clone(),
        };

        let router = Self::build_router(&config, state, gate, verifier, limiter.clone());
        Self {
            router,
            limiter,
            config,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(
        config: &GateConfig,
        state: AppState,
        gate: Arc<SessionGate>,
        verifier: Arc<SessionVerifier>,
        limiter: Arc<RateLimiter>,
    ) -> Router {
        let session_state = SessionGateState {
            gate,
            verifier,
            cookie_name: config.session.cookie_name.clone(),
        };
        let rate_state = RateLimitState {
            limiter,
            api_marker: config.routes.api_marker.clone(),
            fingerprint_cookie: config.session.fingerprint_cookie_name.clone(),
        };

        Router::new()
            .route("/", get(handlers::home))
            .route("/login", get(handlers::login_page))
            .route("/health", get(handlers::health))
            .route("/api/v1/auth/login", post(handlers::login))
            .route("/api/v1/auth/logout", post(handlers::logout))
            .route("/api/v1/me", get(handlers::me))
            .with_state(state)
            // Layers apply outermost-last: the session gate wraps the
            // rate limiter, so gating always runs first.
            .layer(middleware::from_fn_with_state(rate_state, rate_limit_middleware))
            .layer(middleware::from_fn_with_state(session_state, session_gate_middleware))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        // Periodic staleness sweep for the rate limit store.
        let sweeper = self.limiter.spawn_sweeper(shutdown.resubscribe());

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        // Drain order: requests first, then the limiter and its sweeper.
        self.limiter.shutdown();
        let _ = sweeper.await;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The assembled router, for in-process testing without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}
