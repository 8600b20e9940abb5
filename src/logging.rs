//! Logging initialization.
//!
//! Built on `tracing` + `tracing-subscriber`. Log level is controlled by the
//! `RUST_LOG` environment variable (default: `info`).

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the process-wide tracing subscriber.
///
/// # Environment variables
/// - `RUST_LOG`: filter directive (default: `info`), e.g. `RUST_LOG=debug` or
///   `RUST_LOG=lot_dispatch=trace`.
///
/// ```no_run
/// use lot_dispatch::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Initialize a test-scoped subscriber; safe to call from multiple test threads.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
