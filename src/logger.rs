//! Process-wide `tracing` setup for the binary. `RUST_LOG` selects the
//! level, falling back to `info`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global subscriber. Events go to stderr; stdout is reserved
/// for the run report.
pub fn init_logging() {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
