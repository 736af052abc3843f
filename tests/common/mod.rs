//! Shared utilities for integration tests.

use axum::{
    body::Body,
    http::{header::HOST, Request, StatusCode},
    routing::get,
    Router,
};

use hsts_guard::http::TransportSecurity;

/// Application used behind the guard in tests.
#[allow(dead_code)]
pub fn app() -> Router {
    Router::new()
        .route("/", get(|| async { "home" }))
        .route("/a", get(|| async { "a" }))
        .route("/gone", get(|| async { StatusCode::GONE }))
        .route(
            "/conflict",
            get(|| async {
                (
                    [("strict-transport-security", "max-age=1")],
                    "handler sets its own header",
                )
            }),
        )
}

/// GET `path_and_query` addressed to `host`.
#[allow(dead_code)]
pub fn get_request(host: &str, path_and_query: &str, transport: TransportSecurity) -> Request<Body> {
    let mut request = Request::builder()
        .uri(path_and_query)
        .header(HOST, host)
        .body(Body::empty())
        .unwrap();
    request.extensions_mut().insert(transport);
    request
}
