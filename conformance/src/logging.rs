//! Development-time tracing for conformance runs.
//!
//! Test outcomes reach the user through listeners and `report.json`; this
//! module only wires `tracing` diagnostics to stderr.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset. Pair with
/// [`crate::LoggingListener`] and `RUST_LOG=conformance=info` to see one line
/// per finished test.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
