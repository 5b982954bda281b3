//! Logging initialization.
//!
//! Logs go to stderr so progress and summaries stay readable; the RUST_LOG
//! environment variable overrides the configured level.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem with a default level and output format.
pub fn init(default_level: &str, json_format: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` config section plus CLI overrides.
pub fn init_from_config(config: &lumabatch_core::Config, verbose: bool, json_logs: bool) {
    let (level, json_format) = resolve(config, verbose, json_logs);
    init(level, json_format);
}

fn resolve(config: &lumabatch_core::Config, verbose: bool, json_logs: bool) -> (&str, bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    (level, json_logs || config.logging.format == "json")
}
