//! Logger setup and a per-module switchable debug logging macro.
//!
//! Modules with chatty hot paths define a flag and use the macro:
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//! use crate::log_debug;
//!
//! log_debug!("cache hit for {user_id}");
//! ```

use log::LevelFilter;

/// Install `env_logger` at `info`, overridable through `RUST_LOG`.
///
/// Only binaries call this; calling it twice is harmless.
pub fn init() {
    let result = env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .try_init();
    if result.is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Debug logging gated on the calling module's `ENABLE_LOGS` const.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}
