//! HTTP Strict Transport Security.
//!
//! # Data Flow
//! ```text
//! HstsPolicy (immutable, shared)
//!     + TransportContext (per request)
//!     → evaluator.rs (pure decision)
//!     → interceptor.rs (apply Outcome through the host's ResponseWriter)
//! ```
//!
//! # Design Decisions
//! - Local development mode disables enforcement entirely
//! - A negative max-age is accepted at construction and rejected per request
//! - Behind a TLS-terminating proxy the header is always sent, never a redirect
//! - The header is claimed, so handlers cannot overwrite or duplicate it
//!
//! See RFC 6797.

pub mod evaluator;
pub mod interceptor;
pub mod policy;

pub use evaluator::{evaluate, https_target, Outcome};
pub use interceptor::HstsInterceptor;
pub use policy::{HstsPolicy, MaxAge, PolicyError, DEFAULT_MAX_AGE_SECS};
