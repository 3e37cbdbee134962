//! Log subscriber setup.

use std::io;

use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

/// Default filter directive for a verbosity count.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Installs a stderr subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level follows `-v`.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    // A subscriber may already be installed when commands are driven from tests.
    if fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .try_init()
        .is_err()
    {
        debug!("log subscriber already installed");
    }
}
