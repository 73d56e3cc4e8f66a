//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cookie extracted by the session gate middleware
//!     → verifier.rs (signature + expiry check → Verified | Unverified)
//!     → SessionGate::decide (pure function of route + verification)
//!     → Allow (claims attached) or RedirectToLogin
//! ```
//!
//! # Design Decisions
//! - Verification fails closed: every failure mode collapses to Unverified
//! - Public paths are exact matches, never prefixes
//! - The redirect target is always the login path; the originally
//!   requested path is not preserved

pub mod verifier;

pub use verifier::{SessionClaims, SessionError, SessionVerifier, Verification};

use crate::config::RoutesConfig;

/// Outcome of the session gate for one request.
#[derive(Debug, Clone)]
pub enum GateDecision {
    /// Continue down the pipeline, with claims when a session verified.
    Allow(Option<SessionClaims>),
    /// Terminate with a redirect to the login path.
    RedirectToLogin,
}

/// Decides whether a request may proceed without a session.
pub struct SessionGate {
    public_paths: Vec<String>,
    login_path: String,
}

impl SessionGate {
    /// Create a gate from route configuration.
    pub fn new(routes: &RoutesConfig) -> Self {
        Self {
            public_paths: routes.public_paths.clone(),
            login_path: routes.login_path.clone(),
        }
    }

    /// Whether the path is exempt from session enforcement.
    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|p| p == path)
    }

    /// Redirect target for unauthenticated requests.
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Gate a request given its path and the verification outcome.
    pub fn decide(&self, path: &str, verification: Verification) -> GateDecision {
        match verification {
            Verification::Verified(claims) => GateDecision::Allow(Some(claims)),
            Verification::Unverified if self.is_public(path) => GateDecision::Allow(None),
            Verification::Unverified => GateDecision::RedirectToLogin,
        }
    }
}
