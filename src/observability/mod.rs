//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request pipeline produces:
//!     → logging.rs (structured log events, request ID in every span)
//!     → metrics.rs (request counter, latency histogram)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! Nothing here influences what a client receives.

pub mod logging;
pub mod metrics;
