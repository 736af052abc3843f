//! Per-request HSTS decision.
//!
//! The decision is a pure function of the policy and the transport context.
//! Checks run in a fixed order and the first match wins:
//!
//! 1. local development mode: pass through untouched
//! 2. negative max-age: fail with 500
//! 3. plaintext request observed directly: 301 to the https URL
//! 4. otherwise: set the header and pass through

use axum::http::{header::STRICT_TRANSPORT_SECURITY, HeaderName, StatusCode};
use url::Url;

use crate::hsts::policy::{HstsPolicy, PolicyError};
use crate::intercept::TransportContext;

/// Result of evaluating a policy against one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Leave the request and response alone.
    PassThrough,

    /// Send the client to the https equivalent of its URL.
    Redirect { location: String, status: StatusCode },

    /// Abort the request; the handler is never invoked.
    Fail { status: StatusCode, error: PolicyError },

    /// Set the header, then let the request proceed.
    SetHeader { name: HeaderName, value: String },
}

/// Decide what to do with a request under `policy`.
pub fn evaluate(policy: &HstsPolicy, ctx: &TransportContext) -> Outcome {
    if ctx.local_dev {
        return Outcome::PassThrough;
    }

    if policy.max_age.is_negative() {
        return fail(PolicyError::NegativeMaxAge(policy.max_age));
    }

    if !policy.behind_proxy && !ctx.encrypted {
        return match https_target(&ctx.url) {
            Ok(location) => Outcome::Redirect {
                location,
                status: StatusCode::MOVED_PERMANENTLY,
            },
            Err(error) => fail(error),
        };
    }

    match policy.header_value() {
        Ok(value) => Outcome::SetHeader {
            name: STRICT_TRANSPORT_SECURITY,
            value,
        },
        Err(error) => fail(error),
    }
}

/// Rewrite `url` to the https scheme.
///
/// The URL is parsed only to reject targets that cannot be redirected. The
/// location itself is the input text with the scheme swapped: host case,
/// explicit ports, dot segments and escaping are returned as received.
pub fn https_target(url: &str) -> Result<String, PolicyError> {
    let invalid = |reason: String| PolicyError::RedirectTarget {
        url: url.to_string(),
        reason,
    };

    let mut parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if parsed.set_scheme("https").is_err() {
        return Err(invalid(format!(
            "scheme `{}` cannot be switched to https",
            parsed.scheme()
        )));
    }

    // The parser accepted a scheme, so the first ':' ends it.
    let (_, rest) = url
        .split_once(':')
        .ok_or_else(|| invalid("missing scheme".to_string()))?;
    Ok(format!("https:{}", rest))
}

fn fail(error: PolicyError) -> Outcome {
    Outcome::Fail {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hsts::policy::MaxAge;

    fn ctx(local_dev: bool, encrypted: bool, url: &str) -> TransportContext {
        TransportContext {
            local_dev,
            encrypted,
            url: url.to_string(),
        }
    }

    fn policy(max_age_secs: i64, behind_proxy: bool) -> HstsPolicy {
        HstsPolicy {
            max_age: MaxAge::from_secs(max_age_secs),
            behind_proxy,
            ..HstsPolicy::default()
        }
    }

    #[test]
    fn test_local_dev_always_passes_through() {
        for behind_proxy in [false, true] {
            for encrypted in [false, true] {
                for max_age in [0, 100, 63_072_000] {
                    let outcome = evaluate(
                        &policy(max_age, behind_proxy),
                        &ctx(true, encrypted, "http://example.com/"),
                    );
                    assert_eq!(outcome, Outcome::PassThrough);
                }
            }
        }
        // Even a URL that could never be redirected.
        assert_eq!(
            evaluate(&policy(10, false), &ctx(true, false, "not a url")),
            Outcome::PassThrough
        );
    }

    #[test]
    fn test_negative_max_age_fails_regardless_of_transport() {
        for behind_proxy in [false, true] {
            for encrypted in [false, true] {
                let outcome = evaluate(
                    &policy(-1, behind_proxy),
                    &ctx(false, encrypted, "http://example.com/"),
                );
                match outcome {
                    Outcome::Fail { status, error } => {
                        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                        assert_eq!(error, PolicyError::NegativeMaxAge(MaxAge::from_secs(-1)));
                    }
                    other => panic!("expected Fail, got {:?}", other),
                }
            }
        }
    }

    #[test]
    fn test_plaintext_redirects_to_https() {
        let outcome = evaluate(
            &policy(100, false),
            &ctx(false, false, "http://example.com/a?b=1"),
        );
        assert_eq!(
            outcome,
            Outcome::Redirect {
                location: "https://example.com/a?b=1".to_string(),
                status: StatusCode::MOVED_PERMANENTLY,
            }
        );
    }

    #[test]
    fn test_redirect_preserves_port_and_fragment() {
        let outcome = evaluate(
            &policy(100, false),
            &ctx(false, false, "http://example.com:8080/x/y?q=a%20b#frag"),
        );
        assert_eq!(
            outcome,
            Outcome::Redirect {
                location: "https://example.com:8080/x/y?q=a%20b#frag".to_string(),
                status: StatusCode::MOVED_PERMANENTLY,
            }
        );
    }

    #[test]
    fn test_unparsable_url_fails() {
        let outcome = evaluate(&policy(100, false), &ctx(false, false, "http:///"));
        assert!(matches!(
            outcome,
            Outcome::Fail {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: PolicyError::RedirectTarget { .. }
            }
        ));
    }

    #[test]
    fn test_encrypted_sets_header() {
        let outcome = evaluate(
            &HstsPolicy::default(),
            &ctx(false, true, "https://example.com/"),
        );
        assert_eq!(
            outcome,
            Outcome::SetHeader {
                name: STRICT_TRANSPORT_SECURITY,
                value: "max-age=63072000; includeSubDomains".to_string(),
            }
        );
    }

    #[test]
    fn test_behind_proxy_trusts_plaintext() {
        let outcome = evaluate(&policy(3600, true), &ctx(false, false, "http://example.com/"));
        assert_eq!(
            outcome,
            Outcome::SetHeader {
                name: STRICT_TRANSPORT_SECURITY,
                value: "max-age=3600; includeSubDomains".to_string(),
            }
        );
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let p = policy(100, false);
        let c = ctx(false, false, "http://example.com/a?b=1");
        assert_eq!(evaluate(&p, &c), evaluate(&p, &c));

        let c = ctx(false, true, "https://example.com/");
        assert_eq!(evaluate(&p, &c), evaluate(&p, &c));
    }

    #[test]
    fn test_https_target_keeps_request_text_verbatim() {
        let cases = [
            ("http://example.com/a?b='x'", "https://example.com/a?b='x'"),
            ("http://example.com/a/./b/../c?q=1", "https://example.com/a/./b/../c?q=1"),
            ("http://example.com:80/a", "https://example.com:80/a"),
            ("http://Example.COM/%7euser", "https://Example.COM/%7euser"),
            ("http://[::1]:8080/", "https://[::1]:8080/"),
        ];
        for (input, expected) in cases {
            assert_eq!(https_target(input).unwrap(), expected, "input {}", input);
        }
    }

    #[test]
    fn test_https_target_rejects_non_special_scheme() {
        assert!(https_target("mailto:someone@example.com").is_err());
        assert_eq!(
            https_target("http://example.com/").unwrap(),
            "https://example.com/"
        );
    }
}
