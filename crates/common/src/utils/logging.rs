use std::io;
use tracing_subscriber::{fmt, EnvFilter};

fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize tracing subscriber with compact output on stderr.
/// - Respects `RUST_LOG` if set
/// - Falls back to `default_filter`, or `info` when none is given
/// - Writes to stderr so command output on stdout stays clean
pub fn init_logging_default(default_filter: Option<&str>) {
    let _ = fmt()
        .with_env_filter(filter_or(default_filter.unwrap_or("info")))
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output on stderr.
pub fn init_logging_json(default_filter: Option<&str>) {
    let _ = fmt()
        .with_env_filter(filter_or(default_filter.unwrap_or("info")))
        .with_target(true)
        .json()
        .with_writer(io::stderr)
        .try_init();
}
