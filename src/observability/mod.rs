//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Interceptor chain and server produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (decision counters)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Policy evaluation itself never logs; the host adapter reports outcomes
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
