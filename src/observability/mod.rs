//! Logging setup for the `specscore` binary.
//!
//! The library only emits `tracing` events (the config loader emits `log`
//! records); installing a subscriber is left to the binary.

use tracing_subscriber::EnvFilter;

/// Default filter directive for a `-v` count.
pub fn verbosity_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over
/// `verbosity` when set. Calling it twice is harmless.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
