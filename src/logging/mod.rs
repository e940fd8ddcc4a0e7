//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Console output on stderr
//! - JSON lines in a rolling local file
//!
//! # Example
//!
//! ```no_run
//! use almanac::logging::init_logging;
//! use almanac::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(day = "2024-03-11", "Day exported");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a day written to the archive
///
/// # Example
///
/// ```no_run
/// use almanac::log_day_exported;
/// use almanac::domain::UtcDay;
///
/// let day = UtcDay::from_ymd(2024, 3, 11).unwrap();
/// log_day_exported!(day, 288, "/data/archive/20240301T000000Z_aws_weather/20240311.json");
/// ```
#[macro_export]
macro_rules! log_day_exported {
    ($day:expr, $records:expr, $path:expr) => {
        tracing::info!(
            day = %$day,
            records = $records,
            path = %$path,
            "Day exported"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use almanac::log_error_with_context;
/// use almanac::domain::AlmanacError;
///
/// let error = AlmanacError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
