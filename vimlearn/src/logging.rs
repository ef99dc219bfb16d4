//! Development-time tracing for debugging the tutor.
//!
//! Diagnostics go to stderr and are never part of what the learner sees;
//! lesson screens go through [`crate::console::Console`] only. The editor
//! shares the terminal, so the default level stays quiet.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber for development logging.
///
/// `RUST_LOG` wins when set. Otherwise the filter is `warn`, or
/// `vimlearn=debug` when `verbose` is true (`--verbose`).
///
/// # Example
/// ```bash
/// RUST_LOG=vimlearn::io=debug vimlearn start --user ada 2>trace.log
/// ```
pub fn init(verbose: bool) {
    let fallback = if verbose { "vimlearn=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
