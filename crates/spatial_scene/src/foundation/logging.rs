//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system.
///
/// Defaults to `info`; `RUST_LOG` overrides it.
pub fn init() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Initialize the logging system, ignoring a previous initialization.
///
/// Useful from tests and tools that may run more than once per process.
pub fn try_init() {
    let _ = env_logger::builder().is_test(true).try_init();
}
