//! Admission control subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming API request:
//!     → identity.rs (resolve caller identity, fallback chain)
//!     → rate_limit.rs (consume a token for that identity)
//!     → Pass to handler, or terminal 403/429 response
//! ```
//!
//! # Design Decisions
//! - Fail closed: unidentifiable callers are rejected before the store
//!   is touched
//! - One limiter instance owns the store for the process lifetime
//! - Per-key read-modify-write serialized by the store mutex

pub mod identity;
pub mod rate_limit;

pub use rate_limit::RateLimiter;
