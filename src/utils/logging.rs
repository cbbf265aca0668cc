//! Logger setup plus conditional, tagged logging macros.
//!
//! Each module that logs through these macros defines two constants:
//! ```rust,ignore
//! const ENABLE_LOGS: bool = true;
//! const LOG_TAG: &str = "tracker";
//!
//! use crate::{log_info, log_warn};
//!
//! log_info!("record replaced"); // -> "[tracker] record replaced"
//! ```

/// Initialise `env_logger` from `RUST_LOG`.
///
/// Without `RUST_LOG` the level is `Info`, or `Debug` when `debug` is set.
/// Safe to call more than once; later calls are no-ops.
pub fn init(debug: bool) {
    let default_level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    let _ = builder.try_init();
}

/// Reads `CASEWATCH_DEBUG` ("1" or "true", any case).
pub fn debug_requested() -> bool {
    std::env::var("CASEWATCH_DEBUG")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Conditional debug logging, prefixed with `[LOG_TAG]`.
///
/// The calling module must define:
/// ```rust,ignore
/// const ENABLE_LOGS: bool = true; // or false
/// const LOG_TAG: &str = "module";
/// ```
/// The format string must be a literal and cannot capture variables inline;
/// pass every argument positionally.
#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!(concat!("[{}] ", $fmt), LOG_TAG $($arg)*);
        }
    };
}

/// Conditional info logging, prefixed with `[LOG_TAG]`.
///
/// The calling module must define:
/// ```rust,ignore
/// const ENABLE_LOGS: bool = true; // or false
/// const LOG_TAG: &str = "module";
/// ```
/// The format string must be a literal and cannot capture variables inline;
/// pass every argument positionally.
#[macro_export]
macro_rules! log_info {
    ($fmt:literal $($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!(concat!("[{}] ", $fmt), LOG_TAG $($arg)*);
        }
    };
}

/// Conditional warn logging, prefixed with `[LOG_TAG]`.
///
/// The calling module must define:
/// ```rust,ignore
/// const ENABLE_LOGS: bool = true; // or false
/// const LOG_TAG: &str = "module";
/// ```
/// The format string must be a literal and cannot capture variables inline;
/// pass every argument positionally.
#[macro_export]
macro_rules! log_warn {
    ($fmt:literal $($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!(concat!("[{}] ", $fmt), LOG_TAG $($arg)*);
        }
    };
}

/// Conditional error logging, prefixed with `[LOG_TAG]`.
///
/// The calling module must define:
/// ```rust,ignore
/// const ENABLE_LOGS: bool = true; // or false
/// const LOG_TAG: &str = "module";
/// ```
/// The format string must be a literal and cannot capture variables inline;
/// pass every argument positionally.
#[macro_export]
macro_rules! log_error {
    ($fmt:literal $($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!(concat!("[{}] ", $fmt), LOG_TAG $($arg)*);
        }
    };
}
