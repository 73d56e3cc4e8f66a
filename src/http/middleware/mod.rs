//! Admission middleware stages.
//!
//! Applied in order: session gate first, then rate limiting. The gate
//! attaches verified claims to request extensions so the limiter can
//! bucket authenticated callers by user id without re-verifying.

pub mod rate_limit;
pub mod session_gate;

pub use rate_limit::{rate_limit_middleware, RateLimitState};
pub use session_gate::{session_gate_middleware, SessionGateState};
