//! Response writers handed to interceptors.
//!
//! # Responsibilities
//! - Collect header claims made before the handler runs
//! - Hold at most one terminal response (error or redirect)
//! - Expose the finished response's headers during commit
//!
//! # Design Decisions
//! - The first terminal write wins; later writes are ignored
//! - An unencodable redirect location becomes a 500

use axum::{
    body::Body,
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::intercept::{Disposition, HeaderClaims, ResponseHeadersWriter, ResponseWriter};

/// Writer for the `before` phase.
#[derive(Debug, Default)]
pub struct PendingResponse {
    claims: HeaderClaims,
    terminal: Option<Response>,
}

impl PendingResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_written(&self) -> bool {
        self.terminal.is_some()
    }

    pub fn into_parts(self) -> (HeaderClaims, Option<Response>) {
        (self.claims, self.terminal)
    }

    fn terminate(&mut self, response: Response) -> Disposition {
        if self.terminal.is_none() {
            self.terminal = Some(response);
        }
        Disposition::Written
    }
}

impl ResponseWriter for PendingResponse {
    fn header_claims(&mut self) -> &mut HeaderClaims {
        &mut self.claims
    }

    fn write_error(&mut self, status: StatusCode) -> Disposition {
        self.terminate(error_response(status))
    }

    fn redirect(&mut self, location: &str, status: StatusCode) -> Disposition {
        let response = match HeaderValue::from_str(location) {
            Ok(location) => {
                let mut response = Response::new(Body::empty());
                *response.status_mut() = status;
                response.headers_mut().insert(LOCATION, location);
                response
            }
            Err(_) => error_response(StatusCode::INTERNAL_SERVER_ERROR),
        };
        self.terminate(response)
    }
}

/// Plain-text response carrying the status's canonical reason.
pub fn error_response(status: StatusCode) -> Response {
    (status, status.canonical_reason().unwrap_or_default()).into_response()
}

/// Writer for the `commit` phase.
pub struct CommittedResponse<'a> {
    response: &'a mut Response,
}

impl<'a> CommittedResponse<'a> {
    pub fn new(response: &'a mut Response) -> Self {
        Self { response }
    }
}

impl ResponseHeadersWriter for CommittedResponse<'_> {
    fn status(&self) -> StatusCode {
        self.response.status()
    }

    fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.response.headers_mut()
    }
}
