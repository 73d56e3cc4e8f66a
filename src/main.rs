//! Request Admission Gate
//!
//! A standalone admission service built with Tokio and Axum: every
//! inbound request passes the session gate and the per-identity rate
//! limiter before any application handler runs.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌───────────────────────────────────────────────┐
//!                   │               ADMISSION GATE                  │
//!                   │                                               │
//!   Client Request  │  ┌─────────┐   ┌──────────────┐   ┌────────┐  │
//!   ────────────────┼─▶│  http   │──▶│ session gate │──▶│  rate  │  │
//!                   │  │ server  │   │  middleware  │   │limiter │  │
//!                   │  └─────────┘   └──────┬───────┘   └───┬────┘  │
//!                   │                       │               │       │
//!                   │        redirect ◀─────┘      403/429 ◀┘       │
//!                   │                                       │       │
//!                   │                                       ▼       │
//!                   │                                 ┌──────────┐  │
//!                   │                                 │ handlers │  │
//!                   │                                 └──────────┘  │
//!                   │                                               │
//!                   │  ┌─────────────────────────────────────────┐  │
//!                   │  │          Cross-Cutting Concerns         │  │
//!                   │  │  ┌────────┐ ┌───────────┐ ┌──────────┐  │  │
//!                   │  │  │ config │ │ observa-  │ │lifecycle │  │  │
//!                   │  │  │        │ │ bility    │ │          │  │  │
//!                   │  │  └────────┘ └───────────┘ └──────────┘  │  │
//!                   │  └─────────────────────────────────────────┘  │
//!                   └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use admission_gate::config::loader::{self, ConfigError};
use admission_gate::config::validation::validate_config;
use admission_gate::config::GateConfig;
use admission_gate::lifecycle::{signals, Shutdown};
use admission_gate::observability::{logging, metrics};
use admission_gate::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "admission-gate")]
#[command(about = "Session gating and per-identity rate limiting for inbound HTTP")]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => loader::read_config(path)?,
        None => GateConfig::default(),
    };
    if let Some(listen) = args.listen {
        config.listener.bind_address = listen;
    }
    if config.session.secret.is_empty() {
        if let Ok(secret) = std::env::var("SESSION_SECRET") {
            config.session.secret = secret;
        }
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        bucket_capacity = config.rate_limit.bucket_capacity,
        tokens_per_minute = config.rate_limit.tokens_per_minute,
        public_paths = config.routes.public_paths.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
