//! Logging configuration for sqltour.
//!
//! Logs go to stderr so rendered tables on stdout stay clean and pipeable.

use tracing_subscriber::EnvFilter;

/// Initializes logging to stderr, filtered by `RUST_LOG` (default: warn).
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
