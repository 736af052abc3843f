//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap the application Router with the interceptor chain
//! - Wire up middleware (tracing, request timeout)
//! - Serve plaintext via `axum::serve` or TLS via `axum-server`
//! - Mark requests arriving on the TLS listener as encrypted
//! - Graceful shutdown on the lifecycle broadcast

use std::net::SocketAddr;
use std::time::Duration;

use axum::{middleware, Extension, Router};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GuardConfig;
use crate::http::middleware::{interceptor_middleware, InterceptorChain};
use crate::http::request::{Environment, TransportSecurity};

/// Time allowed for in-flight TLS connections to drain on shutdown.
const TLS_DRAIN_SECS: u64 = 10;

/// HTTP server enforcing the configured security policy.
pub struct HttpServer {
    router: Router,
    config: GuardConfig,
}

impl HttpServer {
    /// Wrap `app` with HSTS enforcement built from `config`.
    pub fn new(config: GuardConfig, app: Router) -> Self {
        let environment = Environment {
            local_dev: config.environment.local_dev,
        };
        let chain = InterceptorChain::hsts(config.hsts.to_policy(), environment);
        Self::with_chain(config, app, chain)
    }

    /// Wrap `app` with a caller-assembled interceptor chain.
    pub fn with_chain(config: GuardConfig, app: Router, chain: InterceptorChain) -> Self {
        let router = Self::build_router(&config, app, chain);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GuardConfig, app: Router, chain: InterceptorChain) -> Router {
        app.layer(middleware::from_fn_with_state(chain, interceptor_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for embedding or testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Serve plaintext HTTP on `listener` until shutdown is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, tls = false, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS on `addr` until shutdown is signalled.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let listener = std::net::TcpListener::bind(addr)?;
        self.run_tls_listener(listener, tls, shutdown).await
    }

    /// Serve HTTPS on an already bound `listener` until shutdown is signalled.
    pub async fn run_tls_listener(
        self,
        listener: std::net::TcpListener,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, tls = true, "HTTP server starting");

        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            shutdown_handle.graceful_shutdown(Some(Duration::from_secs(TLS_DRAIN_SECS)));
        });

        // Outermost, so the chain sees it.
        let app = self.router.layer(Extension(TransportSecurity::Encrypted));

        axum_server::from_tcp_rustls(listener, tls)
            .handle(handle)
            .serve(app.into_make_service())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
