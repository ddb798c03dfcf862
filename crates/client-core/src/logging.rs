//! Logging initialization for the client runtime.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging system.
///
/// Sets up tracing with:
/// - Log level from the `RUST_LOG` env var, falling back to the provided default
/// - Human-readable output to stderr, or JSONL when `GRAAVITONS_LOG_FORMAT=json`
///
/// # Example
///
/// ```ignore
/// init_logging("info");
/// tracing::info!("Client started");
/// ```
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let json_output = std::env::var("GRAAVITONS_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    // Ignore a second initialization; tests may race to install the subscriber.
    let result = if json_output {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(error) = result {
        tracing::debug!(%error, "logging already initialized");
    }
}
