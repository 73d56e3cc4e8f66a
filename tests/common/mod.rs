//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;

use admission_gate::config::schema::UserConfig;
use admission_gate::{GateConfig, HttpServer, Shutdown};
use tokio::net::TcpListener;

pub const SECRET: &str = "integration-test-secret";

/// Baseline test configuration with one demo user.
pub fn test_config() -> GateConfig {
    let mut config = GateConfig::default();
    config.session.secret = SECRET.to_string();
    config.users.push(UserConfig {
        username: "demouser".to_string(),
        password: "demo123".to_string(),
        user_id: "user_001".to_string(),
    });
    config
}

/// Start a gate on an ephemeral port.
///
/// Returns the bound address and the shutdown handle keeping the server
/// task alive for the duration of the test.
pub async fn start_gate(mut config: GateConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that neither follows redirects nor stores cookies, so each
/// assertion sees the raw admission response.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
