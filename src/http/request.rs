//! Request inspection for the interceptor chain.
//!
//! # Responsibilities
//! - Tell whether the request arrived over TLS at this server
//! - Rebuild the absolute request URL as the client addressed it
//! - Carry the server's run mode into the per-request context

use axum::http::{header::HOST, Request};

use crate::intercept::TransportContext;

/// Transport security of the connection a request arrived on.
///
/// The TLS listener inserts `Encrypted` as a request extension. A request
/// without the extension is treated as plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportSecurity {
    Encrypted,
    #[default]
    Plaintext,
}

/// Server-wide run mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Environment {
    /// Local development: security enforcement is suspended.
    pub local_dev: bool,
}

impl Environment {
    pub fn production() -> Self {
        Self { local_dev: false }
    }

    pub fn local_dev() -> Self {
        Self { local_dev: true }
    }
}

/// Build the transport context for `request`.
pub fn transport_context<B>(request: &Request<B>, environment: Environment) -> TransportContext {
    let encrypted = matches!(
        request.extensions().get::<TransportSecurity>(),
        Some(TransportSecurity::Encrypted)
    );

    TransportContext {
        local_dev: environment.local_dev,
        encrypted,
        url: request_url(request, encrypted),
    }
}

/// Absolute URL of `request`.
///
/// The scheme reflects what this server observed, not what the client
/// claims. The authority comes from an absolute-form URI (HTTP/2) or the
/// `Host` header. A request with neither yields a URL with an empty host.
pub fn request_url<B>(request: &Request<B>, encrypted: bool) -> String {
    let scheme = if encrypted { "https" } else { "http" };

    let authority = request
        .uri()
        .authority()
        .map(|a| a.as_str())
        .or_else(|| request.headers().get(HOST).and_then(|h| h.to_str().ok()))
        .unwrap_or_default();

    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or("/");

    format!("{}://{}{}", scheme, authority, path_and_query)
}
