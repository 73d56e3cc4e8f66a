//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layer stack)
//!     → request.rs (request ID, cookie access)
//!     → middleware/session_gate.rs (redirect or continue)
//!     → middleware/rate_limit.rs (API routes: 403/429 or continue)
//!     → handlers.rs (application endpoints)
//!     → response.rs (terminal rejection responses)
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{cookie_value, RequestId, RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
