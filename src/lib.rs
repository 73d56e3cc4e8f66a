//! Request Admission Gate Library

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod session;

pub use config::schema::GateConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
