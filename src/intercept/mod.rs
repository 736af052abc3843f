//! Two-phase interceptor contract.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → host builds TransportContext
//!     → Interceptor::before (each interceptor, in order)
//!         Written     → response already produced, stop
//!         NotWritten  → next interceptor, then the handler
//!     → HeaderClaims applied to the handler's response
//!     → Interceptor::commit (each interceptor, reverse order)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Interceptors never touch the response directly; they go through a
//!   `ResponseWriter` owned by the host
//! - Headers an interceptor owns are claimed, not inserted
//! - Per-route overrides are opaque to the host and routed by `matches`

pub mod claims;

use std::any::Any;
use std::fmt::Debug;

use axum::http::{HeaderMap, StatusCode};

pub use claims::{ClaimError, HeaderClaim, HeaderClaims};

/// Whether the response was fully produced during an interceptor phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// A terminal response was written; skip the remaining stages.
    Written,
    /// Nothing terminal was written; continue the chain.
    NotWritten,
}

impl Disposition {
    pub fn is_written(self) -> bool {
        matches!(self, Disposition::Written)
    }
}

/// Transport facts about the current request, derived by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportContext {
    /// Server runs in local development mode.
    pub local_dev: bool,
    /// Request arrived over a live TLS session at this server.
    pub encrypted: bool,
    /// Absolute URL of the request as observed by this server.
    pub url: String,
}

/// Per-route override handed to interceptors that accept it.
pub trait InterceptorConfig: Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// Writer available during the `before` phase.
pub trait ResponseWriter {
    /// Header claims for this response.
    fn header_claims(&mut self) -> &mut HeaderClaims;

    /// Terminate the response with `status`.
    fn write_error(&mut self, status: StatusCode) -> Disposition;

    /// Terminate the response with a redirect to `location`.
    fn redirect(&mut self, location: &str, status: StatusCode) -> Disposition;
}

/// Writer available during the `commit` phase, after the handler ran.
pub trait ResponseHeadersWriter {
    fn status(&self) -> StatusCode;
    fn headers(&self) -> &HeaderMap;
    fn headers_mut(&mut self) -> &mut HeaderMap;
}

/// A decision-making stage wrapped around every request.
pub trait Interceptor: Send + Sync {
    /// Runs before the handler. Returning [`Disposition::Written`] stops the chain.
    fn before(
        &self,
        writer: &mut dyn ResponseWriter,
        request: &TransportContext,
        config: Option<&dyn InterceptorConfig>,
    ) -> Disposition;

    /// Runs after the handler produced a response.
    fn commit(
        &self,
        writer: &mut dyn ResponseHeadersWriter,
        request: &TransportContext,
        config: Option<&dyn InterceptorConfig>,
    );

    /// Whether `config` is an override this interceptor understands.
    fn matches(&self, config: &dyn InterceptorConfig) -> bool;
}
