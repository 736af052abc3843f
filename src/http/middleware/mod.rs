//! HTTP middleware.

pub mod interceptors;

pub use interceptors::{interceptor_middleware, InterceptorChain, RouteOverrides};
