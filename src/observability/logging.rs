//! Structured logging.
//!
//! `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directives for `level`.
pub fn default_directives(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    format!("compiler_service={level},tower_http={level}")
}

/// Install the global tracing subscriber.
pub fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directives(level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
