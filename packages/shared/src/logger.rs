//! Logging setup utilities for the chatterm binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// This function sets up logging for both the application crate and the binary.
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// Log lines are written to stderr so they never interleave with the chat log
/// that the client prints to stdout.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "chatterm-client")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use chatterm_shared::logger::setup_logger;
///
/// setup_logger("chatterm-client", "warn");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build the `EnvFilter` directive used when `RUST_LOG` is not set.
///
/// Crate and binary names use `-` in Cargo but `_` in module paths, so both
/// targets are normalized before being joined.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "chatterm_client={level},chatterm_shared={level},{bin}={level}",
        level = default_log_level,
        bin = binary_name.replace('-', "_"),
    )
}
