//! JavaScript compiler service.
//!
//! A single HTTP endpoint that takes form-encoded source text plus
//! optimization parameters and answers with optimized code or a diagnostic
//! report, following the Closure Compiler service API.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request ──▶ http::server ──▶ form ──▶ http::request ──▶ optimizer
//!                         (axum, limits)   (decode)  (validate)        (fresh per request)
//!                                                                        │
//!     Client Response ◀── http::response ◀───────────────────────────────┘
//!                          (status, output mode)
//! ```
//!
//! Cross-cutting: `config`, `observability`, `lifecycle`.

pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod optimizer;

pub use config::ServiceConfig;
pub use http::HttpServer;
