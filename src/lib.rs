//! HTTP Strict Transport Security enforcement for Axum services.

pub mod config;
pub mod hsts;
pub mod http;
pub mod intercept;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::schema::GuardConfig;
pub use hsts::{HstsInterceptor, HstsPolicy};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
