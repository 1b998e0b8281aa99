//! Logging infrastructure for Searchable.
//!
//! Structured logging is controlled by environment variables.
//!
//! # Environment Variables
//!
//! - `SEARCHABLE_DEBUG=true` - Enable debug logging
//! - `SEARCHABLE_DEBUG=1` - Enable debug logging
//! - `SEARCHABLE_LOG_LEVEL=debug|info|warn|error|trace` - Set specific log level
//! - `SEARCHABLE_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! # Usage
//!
//! ```rust,no_run
//! use searchable_query::logging;
//!
//! // Initialize logging (call once at startup)
//! logging::init();
//!
//! // Or with custom settings
//! logging::init_with_level("debug");
//! ```
//!
//! Within the crate, guard skips log at `debug`, fold steps at `trace`, and
//! filter re-registration at `warn`.

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `SEARCHABLE_DEBUG`.
///
/// Returns `true` if `SEARCHABLE_DEBUG` is set to "true", "1", or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("SEARCHABLE_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from `SEARCHABLE_LOG_LEVEL`.
///
/// Defaults to "debug" if `SEARCHABLE_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    match env::var("SEARCHABLE_LOG_LEVEL") {
        Ok(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

/// Get the configured log format from `SEARCHABLE_LOG_FORMAT`.
///
/// Defaults to "json" for structured logging.
pub fn get_log_format() -> &'static str {
    env::var("SEARCHABLE_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Initialize the Searchable logging system.
///
/// Subsequent calls are no-ops. Without the `tracing-subscriber` feature
/// nothing is installed and the host application's subscriber, if any,
/// receives the events.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("SEARCHABLE_LOG_LEVEL").is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!(
                "searchable={},searchable_query={}",
                level, level
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            let registry = tracing_subscriber::registry().with(filter);
            let installed = match get_log_format() {
                "json" => registry.with(fmt::layer().json()).try_init(),
                "compact" => registry.with(fmt::layer().compact()).try_init(),
                _ => registry.with(fmt::layer().pretty()).try_init(),
            };

            if installed.is_ok() {
                tracing::info!(
                    level = level,
                    format = get_log_format(),
                    "Searchable logging initialized"
                );
            }
        }
    });
}

/// Initialize logging with a specific level.
///
/// # Safety
///
/// This function modifies environment variables, which is unsafe in
/// multi-threaded programs. Call this early in your program before
/// spawning threads.
pub fn init_with_level(level: &str) {
    // SAFETY: This should only be called at program startup before threads are spawned.
    unsafe {
        env::set_var("SEARCHABLE_LOG_LEVEL", level);
    }
    init();
}

/// Initialize logging for debugging.
///
/// Equivalent to setting `SEARCHABLE_DEBUG=true` and calling `init()`.
pub fn init_debug() {
    // SAFETY: This should only be called at program startup before threads are spawned.
    unsafe {
        env::set_var("SEARCHABLE_DEBUG", "true");
    }
    init();
}

/// Debug log that only fires when `SEARCHABLE_DEBUG` is enabled at runtime.
#[macro_export]
macro_rules! search_debug {
    ($($arg:tt)*) => {
        if $crate::logging::is_debug_enabled() {
            $crate::tracing::debug!($($arg)*);
        }
    };
}
