//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the guard.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::hsts::{HstsPolicy, MaxAge, DEFAULT_MAX_AGE_SECS};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Strict-Transport-Security policy.
    pub hsts: HstsConfig,

    /// Run mode.
    pub environment: EnvironmentConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8443").
    pub bind_address: String,

    /// Optional TLS configuration. Without it requests are plaintext.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// HSTS settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HstsConfig {
    /// max-age in seconds. Fractions are truncated when the header is built.
    /// Negative values are accepted here and rejected on every request.
    pub max_age_secs: f64,

    /// Add the includeSubDomains directive.
    pub include_subdomains: bool,

    /// Add the preload directive.
    pub preload: bool,

    /// TLS is terminated by an upstream proxy.
    pub behind_proxy: bool,
}

impl Default for HstsConfig {
    fn default() -> Self {
        Self {
            max_age_secs: DEFAULT_MAX_AGE_SECS as f64,
            include_subdomains: true,
            preload: false,
            behind_proxy: false,
        }
    }
}

impl HstsConfig {
    pub fn to_policy(&self) -> HstsPolicy {
        HstsPolicy {
            max_age: MaxAge::from_secs_f64(self.max_age_secs),
            include_subdomains: self.include_subdomains,
            preload: self.preload,
            behind_proxy: self.behind_proxy,
        }
    }
}

/// Run mode configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Local development: HSTS is not enforced at all.
    pub local_dev: bool,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty for development, JSON for production.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
