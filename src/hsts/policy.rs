//! HSTS policy configuration and header construction.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Two years.
pub const DEFAULT_MAX_AGE_SECS: i64 = 63_072_000;

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Errors produced while applying a policy to a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// max-age below zero cannot be expressed in the header.
    #[error("max-age must not be negative, got {0}")]
    NegativeMaxAge(MaxAge),

    /// The HTTPS redirect target could not be built from the request URL.
    #[error("cannot build https redirect target from `{url}`: {reason}")]
    RedirectTarget { url: String, reason: String },
}

/// Signed duration used for the `max-age` directive.
///
/// Unlike [`std::time::Duration`] this can hold negative values, so a
/// misconfigured policy survives construction and is rejected per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MaxAge {
    nanos: i128,
}

impl MaxAge {
    pub const ZERO: MaxAge = MaxAge { nanos: 0 };

    pub const fn from_secs(secs: i64) -> Self {
        Self {
            nanos: secs as i128 * NANOS_PER_SEC,
        }
    }

    pub const fn from_millis(millis: i64) -> Self {
        Self {
            nanos: millis as i128 * 1_000_000,
        }
    }

    pub const fn from_nanos(nanos: i128) -> Self {
        Self { nanos }
    }

    /// Build from fractional seconds. Non-finite input saturates (NaN is zero).
    pub fn from_secs_f64(secs: f64) -> Self {
        let whole = secs.trunc();
        let frac = secs - whole;
        let nanos = (whole as i128)
            .saturating_mul(NANOS_PER_SEC)
            .saturating_add((frac * 1e9) as i128);
        Self { nanos }
    }

    pub fn is_negative(&self) -> bool {
        self.nanos < 0
    }

    /// Whole seconds, fractional part discarded (truncated toward zero).
    pub fn whole_seconds(&self) -> i64 {
        let secs = self.nanos / NANOS_PER_SEC;
        i64::try_from(secs).unwrap_or(if secs < 0 { i64::MIN } else { i64::MAX })
    }

    pub fn as_nanos(&self) -> i128 {
        self.nanos
    }
}

impl From<Duration> for MaxAge {
    fn from(duration: Duration) -> Self {
        Self {
            nanos: i128::try_from(duration.as_nanos()).unwrap_or(i128::MAX),
        }
    }
}

impl fmt::Display for MaxAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.nanos / NANOS_PER_SEC;
        let sub = (self.nanos % NANOS_PER_SEC).unsigned_abs();
        if sub == 0 {
            write!(f, "{}s", secs)
        } else {
            let sign = if self.nanos < 0 && secs == 0 { "-" } else { "" };
            write!(f, "{}{}.{:09}s", sign, secs, sub)
        }
    }
}

/// Strict-Transport-Security policy shared by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HstsPolicy {
    /// How long browsers remember to use HTTPS only.
    pub max_age: MaxAge,

    /// Extend the policy to every subdomain.
    pub include_subdomains: bool,

    /// Ask for inclusion in browser preload lists. See https://hstspreload.org/.
    pub preload: bool,

    /// TLS is terminated upstream: always send the header, never redirect.
    pub behind_proxy: bool,
}

impl Default for HstsPolicy {
    fn default() -> Self {
        Self {
            max_age: MaxAge::from_secs(DEFAULT_MAX_AGE_SECS),
            include_subdomains: true,
            preload: false,
            behind_proxy: false,
        }
    }
}

impl HstsPolicy {
    /// Render the `Strict-Transport-Security` value.
    ///
    /// Directives are always in the order max-age, includeSubDomains, preload.
    pub fn header_value(&self) -> Result<String, PolicyError> {
        if self.max_age.is_negative() {
            return Err(PolicyError::NegativeMaxAge(self.max_age));
        }

        let mut value = format!("max-age={}", self.max_age.whole_seconds());
        if self.include_subdomains {
            value.push_str("; includeSubDomains");
        }
        if self.preload {
            value.push_str("; preload");
        }
        Ok(value)
    }
}
