//! Tracing initialization for the client and its demo binary.
//!
//! This module provides utilities for initializing the tracing subscriber
//! with environment-based filtering via the `RUST_LOG` environment variable.
//!
//! # Usage
//!
//! ```no_run
//! use azure_tts_common::tracing::init_tracing;
//!
//! fn main() {
//!     // Initialize tracing at the start of your application
//!     init_tracing();
//!
//!     // Now you can use tracing macros
//!     tracing::info!("Application started");
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls the log level and filtering. Examples:
//!   - `RUST_LOG=debug` - Enable debug logging for all modules
//!   - `RUST_LOG=azure_tts=debug` - Enable debug for the client crate
//!   - `RUST_LOG=warn,azure_tts_common=debug` - Warn by default, debug for token handling

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn fmt_layer<S>() -> fmt::Layer<S> {
    fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE)
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Filtering comes from `RUST_LOG` and defaults to `info`.
///
/// # Panics
///
/// This function will panic if called more than once, as the global
/// subscriber can only be set once.
pub fn init_tracing() {
    init_tracing_with_default("info");
}

/// Initialize tracing with a custom default level.
///
/// Similar to `init_tracing()`, but allows specifying a default log level
/// when `RUST_LOG` is not set.
///
/// # Example
///
/// ```no_run
/// use azure_tts_common::tracing::init_tracing_with_default;
///
/// fn main() {
///     // Default to debug level if RUST_LOG is not set
///     init_tracing_with_default("debug");
/// }
/// ```
pub fn init_tracing_with_default(default_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(fmt_layer())
        .init();
}

/// Try to initialize tracing, returning an error if already initialized.
///
/// Unlike `init_tracing()`, this function does not panic if the subscriber
/// is already set. Useful in tests where several cases may race to install it.
///
/// # Example
///
/// ```
/// use azure_tts_common::tracing::try_init_tracing;
///
/// // result is Ok(()) or Err(()) depending on prior initialization
/// let _ = try_init_tracing();
/// ```
pub fn try_init_tracing() -> Result<(), ()> {
    tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(fmt_layer())
        .try_init()
        .map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_try_init_tracing_does_not_panic() {
        let _ = try_init_tracing();
        // A second attempt must report failure instead of panicking.
        assert!(try_init_tracing().is_err());
    }

    #[test]
    fn test_env_filter_parses_module_specific() {
        let filter = EnvFilter::try_new("warn,azure_tts_common=debug").unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_env_filter_rejects_malformed_directive() {
        assert!(EnvFilter::try_new("azure_tts_common=loud").is_err());
    }
}
