//! Development-time tracing for the dataset tools.
//!
//! Diagnostics go to stderr via `RUST_LOG`; the JSON rows printed by the CLI
//! go to stdout and are unaffected by the filter.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset.
///
/// # Example
/// ```bash
/// RUST_LOG=dataset=debug cargo run -p dataset -- inspect units.txt --columns int,str
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
