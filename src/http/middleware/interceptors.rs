//! Interceptor chain middleware.
//! Runs every installed interceptor around the handler.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::hsts::{HstsInterceptor, HstsPolicy};
use crate::http::request::{transport_context, Environment};
use crate::http::response::{error_response, CommittedResponse, PendingResponse};
use crate::intercept::{Interceptor, InterceptorConfig};
use crate::observability::metrics;

/// Ordered interceptors plus the server's run mode.
#[derive(Clone)]
pub struct InterceptorChain {
    interceptors: Arc<Vec<Arc<dyn Interceptor>>>,
    environment: Environment,
}

impl InterceptorChain {
    pub fn new(environment: Environment) -> Self {
        Self {
            interceptors: Arc::new(Vec::new()),
            environment,
        }
    }

    /// Chain holding only HSTS enforcement.
    pub fn hsts(policy: HstsPolicy, environment: Environment) -> Self {
        Self::new(environment).with(HstsInterceptor::new(policy))
    }

    /// Append an interceptor. `before` runs in insertion order, `commit` in reverse.
    pub fn with<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        Arc::make_mut(&mut self.interceptors).push(Arc::new(interceptor));
        self
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}

/// Per-route interceptor overrides.
///
/// Must be inserted as a request extension by a layer outside the chain.
#[derive(Clone, Debug, Default)]
pub struct RouteOverrides(Vec<Arc<dyn InterceptorConfig>>);

impl RouteOverrides {
    pub fn new(configs: Vec<Arc<dyn InterceptorConfig>>) -> Self {
        Self(configs)
    }

    /// First override `interceptor` accepts.
    pub fn find(&self, interceptor: &dyn Interceptor) -> Option<&dyn InterceptorConfig> {
        self.0
            .iter()
            .map(|config| config.as_ref())
            .find(|config| interceptor.matches(*config))
    }
}

pub async fn interceptor_middleware(
    State(chain): State<InterceptorChain>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let ctx = transport_context(&request, chain.environment);
    let overrides = request
        .extensions()
        .get::<RouteOverrides>()
        .cloned()
        .unwrap_or_default();

    // 1. Pre-handler decisions
    let mut pending = PendingResponse::new();
    let mut written = false;
    for interceptor in chain.interceptors.iter() {
        let config = overrides.find(interceptor.as_ref());
        // A terminal response ends the phase even if the disposition disagrees.
        written = interceptor.before(&mut pending, &ctx, config).is_written()
            || pending.is_written();
        if written {
            break;
        }
    }

    let (claims, terminal) = pending.into_parts();
    if written {
        let response = terminal.unwrap_or_else(|| {
            tracing::error!(url = %ctx.url, "Interceptor reported a write without a response");
            error_response(StatusCode::INTERNAL_SERVER_ERROR)
        });
        let status = response.status();
        if status.is_redirection() {
            tracing::debug!(url = %ctx.url, status = %status, "Redirecting to secure transport");
            metrics::record_decision("redirect");
        } else {
            tracing::warn!(url = %ctx.url, status = %status, "Request rejected by interceptor");
            metrics::record_decision("error");
        }
        return response;
    }

    let claimed = !claims.is_empty();

    // 2. Handler
    let mut response = next.run(request).await;

    // 3. Claimed headers replace anything the handler wrote
    for name in claims.apply(response.headers_mut()) {
        tracing::warn!(header = %name, url = %ctx.url, "Handler set a claimed header; value replaced");
    }

    // 4. Post-handler finalize
    {
        let mut committed = CommittedResponse::new(&mut response);
        for interceptor in chain.interceptors.iter().rev() {
            let config = overrides.find(interceptor.as_ref());
            interceptor.commit(&mut committed, &ctx, config);
        }
    }

    metrics::record_decision(if claimed { "header" } else { "pass" });
    response
}
