//! `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the verbosity-derived filter.
pub const LOG_ENV: &str = "GRIDPLAN_LOG";

/// Map the `-v` count to a filter directive.
#[must_use]
pub fn filter_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Logs go to stderr so reports on stdout
/// stay machine-readable.
///
/// `GRIDPLAN_LOG` takes precedence, then `RUST_LOG`, then `verbosity`.
/// Calling this twice is harmless; the second install is ignored.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
