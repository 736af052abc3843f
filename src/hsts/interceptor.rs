//! HSTS as a stage of the interceptor chain.

use axum::http::{HeaderValue, StatusCode};

use crate::hsts::evaluator::{evaluate, Outcome};
use crate::hsts::policy::HstsPolicy;
use crate::intercept::{
    Disposition, Interceptor, InterceptorConfig, ResponseHeadersWriter, ResponseWriter,
    TransportContext,
};

/// Redirects plaintext traffic to HTTPS and claims the
/// `Strict-Transport-Security` header on everything else.
#[derive(Debug, Clone, Default)]
pub struct HstsInterceptor {
    policy: HstsPolicy,
}

impl HstsInterceptor {
    pub fn new(policy: HstsPolicy) -> Self {
        Self { policy }
    }
}

impl Interceptor for HstsInterceptor {
    fn before(
        &self,
        writer: &mut dyn ResponseWriter,
        request: &TransportContext,
        _config: Option<&dyn InterceptorConfig>,
    ) -> Disposition {
        match evaluate(&self.policy, request) {
            Outcome::PassThrough => Disposition::NotWritten,
            Outcome::Fail { status, .. } => writer.write_error(status),
            Outcome::Redirect { location, status } => writer.redirect(&location, status),
            Outcome::SetHeader { name, value } => {
                let Ok(value) = HeaderValue::from_str(&value) else {
                    return writer.write_error(StatusCode::INTERNAL_SERVER_ERROR);
                };
                // A second owner of the header is a wiring mistake.
                match writer.header_claims().claim(name) {
                    Ok(claim) => {
                        writer.header_claims().set(claim, value);
                        Disposition::NotWritten
                    }
                    Err(_) => writer.write_error(StatusCode::INTERNAL_SERVER_ERROR),
                }
            }
        }
    }

    fn commit(
        &self,
        _writer: &mut dyn ResponseHeadersWriter,
        _request: &TransportContext,
        _config: Option<&dyn InterceptorConfig>,
    ) {
    }

    /// No per-route overrides exist for HSTS.
    fn matches(&self, _config: &dyn InterceptorConfig) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hsts::policy::MaxAge;
    use crate::intercept::HeaderClaims;
    use axum::http::header::STRICT_TRANSPORT_SECURITY;
    use axum::http::HeaderMap;
    use std::any::Any;

    #[derive(Default)]
    struct RecordingWriter {
        claims: HeaderClaims,
        error: Option<StatusCode>,
        redirect: Option<(String, StatusCode)>,
    }

    impl ResponseWriter for RecordingWriter {
        fn header_claims(&mut self) -> &mut HeaderClaims {
            &mut self.claims
        }

        fn write_error(&mut self, status: StatusCode) -> Disposition {
            self.error = Some(status);
            Disposition::Written
        }

        fn redirect(&mut self, location: &str, status: StatusCode) -> Disposition {
            self.redirect = Some((location.to_string(), status));
            Disposition::Written
        }
    }

    struct FinishedResponse {
        headers: HeaderMap,
    }

    impl ResponseHeadersWriter for FinishedResponse {
        fn status(&self) -> StatusCode {
            StatusCode::OK
        }

        fn headers(&self) -> &HeaderMap {
            &self.headers
        }

        fn headers_mut(&mut self) -> &mut HeaderMap {
            &mut self.headers
        }
    }

    #[derive(Debug)]
    struct RouteOverride;

    impl InterceptorConfig for RouteOverride {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn request(local_dev: bool, encrypted: bool, url: &str) -> TransportContext {
        TransportContext {
            local_dev,
            encrypted,
            url: url.to_string(),
        }
    }

    #[test]
    fn test_secure_request_claims_header() {
        let interceptor = HstsInterceptor::default();
        let mut writer = RecordingWriter::default();

        let disposition = interceptor.before(
            &mut writer,
            &request(false, true, "https://example.com/"),
            None,
        );

        assert_eq!(disposition, Disposition::NotWritten);
        assert_eq!(
            writer.claims.get(&STRICT_TRANSPORT_SECURITY).unwrap(),
            "max-age=63072000; includeSubDomains"
        );
        assert!(writer.error.is_none());
        assert!(writer.redirect.is_none());
    }

    #[test]
    fn test_plaintext_request_redirected() {
        let interceptor = HstsInterceptor::default();
        let mut writer = RecordingWriter::default();

        let disposition = interceptor.before(
            &mut writer,
            &request(false, false, "http://example.com/a?b=1"),
            None,
        );

        assert_eq!(disposition, Disposition::Written);
        assert_eq!(
            writer.redirect,
            Some((
                "https://example.com/a?b=1".to_string(),
                StatusCode::MOVED_PERMANENTLY
            ))
        );
        assert!(writer.claims.is_empty());
    }

    #[test]
    fn test_negative_max_age_writes_error() {
        let interceptor = HstsInterceptor::new(HstsPolicy {
            max_age: MaxAge::from_secs(-10),
            ..HstsPolicy::default()
        });
        let mut writer = RecordingWriter::default();

        let disposition = interceptor.before(
            &mut writer,
            &request(false, true, "https://example.com/"),
            None,
        );

        assert_eq!(disposition, Disposition::Written);
        assert_eq!(writer.error, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(writer.claims.is_empty());
    }

    #[test]
    fn test_local_dev_touches_nothing() {
        let interceptor = HstsInterceptor::default();
        let mut writer = RecordingWriter::default();

        let disposition = interceptor.before(
            &mut writer,
            &request(true, false, "http://localhost:8080/"),
            None,
        );

        assert_eq!(disposition, Disposition::NotWritten);
        assert!(writer.claims.is_empty());
        assert!(writer.error.is_none());
        assert!(writer.redirect.is_none());
    }

    #[test]
    fn test_conflicting_claim_is_an_error() {
        let interceptor = HstsInterceptor::default();
        let mut writer = RecordingWriter::default();
        let _other = writer.claims.claim(STRICT_TRANSPORT_SECURITY).unwrap();

        let disposition = interceptor.before(
            &mut writer,
            &request(false, true, "https://example.com/"),
            None,
        );

        assert_eq!(disposition, Disposition::Written);
        assert_eq!(writer.error, Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_commit_is_a_no_op() {
        let interceptor = HstsInterceptor::new(HstsPolicy {
            max_age: MaxAge::from_secs(-1),
            ..HstsPolicy::default()
        });
        let mut headers = HeaderMap::new();
        headers.insert(STRICT_TRANSPORT_SECURITY, HeaderValue::from_static("max-age=1"));
        let mut response = FinishedResponse {
            headers: headers.clone(),
        };

        for (local_dev, encrypted) in [(false, false), (false, true), (true, false)] {
            interceptor.commit(
                &mut response,
                &request(local_dev, encrypted, "http://example.com/"),
                Some(&RouteOverride),
            );
        }

        assert_eq!(response.headers, headers);
    }

    #[test]
    fn test_never_matches_overrides() {
        assert!(!HstsInterceptor::default().matches(&RouteOverride));
    }
}
