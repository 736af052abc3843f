//! hsts-guard
//!
//! Serves an application behind HTTP Strict Transport Security enforcement.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ listener (plain or TLS)
//!                         │
//!                         ▼
//!                   interceptor chain ──── plaintext? ──▶ 301 https://…
//!                         │               bad policy? ──▶ 500
//!                         ▼
//!                      handler
//!                         │
//!                         ▼
//!     ◀─────────────── response + Strict-Transport-Security
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{routing::get, Router};
use clap::Parser;
use tokio::net::TcpListener;

use hsts_guard::config::{load_config, GuardConfig};
use hsts_guard::lifecycle::{signals, Shutdown};
use hsts_guard::net::tls;
use hsts_guard::observability::{logging, metrics};
use hsts_guard::HttpServer;

#[derive(Parser)]
#[command(name = "hsts-guard")]
#[command(about = "Serve an application behind HSTS enforcement", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GuardConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    tracing::info!("hsts-guard v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.is_some(),
        max_age_secs = config.hsts.max_age_secs,
        include_subdomains = config.hsts.include_subdomains,
        preload = config.hsts.preload,
        behind_proxy = config.hsts.behind_proxy,
        local_dev = config.environment.local_dev,
        "Configuration loaded"
    );

    if config.listener.tls.is_none()
        && !config.hsts.behind_proxy
        && !config.environment.local_dev
    {
        tracing::warn!(
            "Listener has no TLS and behind_proxy is off: every request will be redirected to https"
        );
    }

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let addr: SocketAddr = config.listener.bind_address.parse()?;
    let tls_config = config.listener.tls.clone();

    let server = HttpServer::new(config, demo_app());

    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    match tls_config {
        Some(tls_config) => {
            let rustls = tls::from_config(&tls_config).await?;
            server.run_tls(addr, rustls, server_shutdown).await?;
        }
        None => {
            let listener = TcpListener::bind(addr).await?;
            server.run(listener, server_shutdown).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Minimal application served behind the guard.
fn demo_app() -> Router {
    Router::new()
        .route("/", get(|| async { "hsts-guard" }))
        .route("/health", get(|| async { "ok" }))
}
