//! Logging setup
//!
//! All modules log through `tracing` macros; this only installs the
//! subscriber. Level comes from `RUST_LOG` (default `info`), e.g.
//! `RUST_LOG=crossfire_simulation=debug` shows every transition and shot.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info";

/// Install the fmt subscriber. Safe to call more than once (tests, repeated
/// app construction): later calls are ignored.
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
