//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! admission gate. All types derive Serde traits for deserialization
//! from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the admission gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address, body limits).
    pub listener: ListenerConfig,

    /// Route classification (public paths, API marker, login path).
    pub routes: RoutesConfig,

    /// Session cookie and token settings.
    pub session: SessionConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Demo credential set accepted by the login endpoint.
    pub users: Vec<UserConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Route classification.
///
/// Public paths are matched exactly (not by prefix). The API marker is a
/// substring test deciding which routes pass through the rate limiter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Paths exempt from session enforcement (exact match).
    pub public_paths: Vec<String>,

    /// Substring identifying rate-limited API routes.
    pub api_marker: String,

    /// Redirect target for unauthenticated requests.
    pub login_path: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            public_paths: vec![
                "/login".to_string(),
                "/api/v1/auth/login".to_string(),
                "/health".to_string(),
            ],
            api_marker: "/api".to_string(),
            login_path: "/login".to_string(),
        }
    }
}

/// Session cookie and token settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the session cookie.
    pub cookie_name: String,

    /// Name of the client fingerprint cookie.
    pub fingerprint_cookie_name: String,

    /// HMAC secret for session tokens. Must be non-empty; may also be
    /// supplied via the SESSION_SECRET environment variable.
    pub secret: String,

    /// Session lifetime in hours.
    pub ttl_hours: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session".to_string(),
            fingerprint_cookie_name: "x-fp-id".to_string(),
            secret: String::new(),
            ttl_hours: 12,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum burst of tokens a single identity may accumulate.
    pub bucket_capacity: u32,

    /// Steady refill rate in tokens per minute.
    pub tokens_per_minute: u32,

    /// Interval between staleness sweeps, in seconds.
    pub sweep_interval_secs: u64,

    /// Entries idle longer than this are removed by the sweep.
    pub max_idle_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            bucket_capacity: 10,
            tokens_per_minute: 20,
            sweep_interval_secs: 5 * 60,
            max_idle_secs: 60 * 60,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics listener.
    pub metrics_enabled: bool,

    /// Address the metrics listener binds to.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9100".to_string(),
        }
    }
}

/// A demo user accepted by the login endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserConfig {
    /// Login name.
    pub username: String,

    /// Plaintext demo password.
    pub password: String,

    /// Stable identifier carried in session claims.
    pub user_id: String,
}
