//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human readable console output on stderr
//! - Configurable log levels (overridable with `RUST_LOG`)
//! - JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use leadex::logging::init_logging;
//! use leadex::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an export run
///
/// # Example
///
/// ```no_run
/// use leadex::log_export_start;
///
/// log_export_start!("redis", "lead_", false);
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($backend:expr, $prefix:expr, $dry_run:expr) => {
        tracing::info!(
            backend = $backend,
            prefix = %$prefix,
            dry_run = $dry_run,
            "Starting export"
        );
    };
}

/// Log periodic progress of an export run
///
/// # Example
///
/// ```no_run
/// use leadex::log_export_progress;
///
/// log_export_progress!(1000, 42);
/// ```
#[macro_export]
macro_rules! log_export_progress {
    ($scanned:expr, $exported:expr) => {
        tracing::info!(
            scanned = $scanned,
            exported = $exported,
            "Export progress"
        );
    };
}

/// Log the completion of an export run
///
/// # Example
///
/// ```no_run
/// use leadex::log_export_complete;
/// use std::time::Duration;
///
/// log_export_complete!(42, Duration::from_secs(10));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Export finished"
        );
    };
}

/// Log a failed record with its key
///
/// # Example
///
/// ```no_run
/// use leadex::log_record_failure;
///
/// log_record_failure!("lead_42", "Malformed: expected value at line 1");
/// ```
#[macro_export]
macro_rules! log_record_failure {
    ($key:expr, $failure:expr) => {
        tracing::error!(
            key = $key,
            error = %$failure,
            "Failed to export record"
        );
    };
}
