#![forbid(unsafe_code)]

//! Tracing subscriber setup for the harness binary.
//!
//! Filter priority: `ORBIT_LOG`, then `RUST_LOG`, then `warn`. Logs go to
//! stderr so stdout stays a clean stream of replay records.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable with harness-specific filter directives.
pub const LOG_ENV: &str = "ORBIT_LOG";

/// Install the global subscriber. A second call is ignored.
pub fn init_subscriber(json: bool) {
    let filter = build_env_filter();
    let result = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .without_time()
                    .compact(),
            )
            .try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

fn build_env_filter() -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV)
        && let Ok(filter) = EnvFilter::try_new(&directives)
    {
        return filter;
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}
