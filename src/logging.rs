//! Diagnostic logging.
//!
//! User-facing terminal output goes through the `info!`/`success!`/
//! `warning!`/`error!` macros. Diagnostics from the session and the HTTP
//! layer go through `tracing` and are written to stderr, filtered by
//! `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt};

/// Directive used by the long running dashboard server.
pub const SERVER_DEFAULT: &str = "sporlstats=info,warn";

/// Directive used by one-shot commands, which print their own output.
pub const CLI_DEFAULT: &str = "sporlstats=warn,warn";

/// Installs the global subscriber. `default_directive` applies when
/// `RUST_LOG` is unset or invalid. Calling it twice is harmless.
pub fn init_logging(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
