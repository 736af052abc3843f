//! HTTP host adapter subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, TLS marks requests Encrypted)
//!     → request.rs (transport context: scheme, URL, run mode)
//!     → middleware/ (interceptor chain around the handler)
//!     → response.rs (terminal responses, claimed headers)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use middleware::{interceptor_middleware, InterceptorChain, RouteOverrides};
pub use request::{Environment, TransportSecurity};
pub use server::HttpServer;
