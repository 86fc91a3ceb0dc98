//! Logging and observability
//!
//! This module provides:
//! - Structured logging through `tracing`, with console output and a JSON
//!   `integration.log` file ([`init_logging`])
//! - Dedicated success and error channels for submission outcomes
//!   ([`FileOutcomeLog`])
//!
//! # Example
//!
//! ```no_run
//! use benesync::logging::init_logging;
//! use benesync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod channels;
pub mod structured;

pub use channels::FileOutcomeLog;
pub use structured::{init_logging, LoggingGuard};

/// Log batch progress
///
/// # Example
///
/// ```no_run
/// use benesync::log_sync_progress;
///
/// log_sync_progress!(100, 1000);
/// ```
#[macro_export]
macro_rules! log_sync_progress {
    ($current:expr, $total:expr) => {
        tracing::info!(
            current = $current,
            total = $total,
            progress_pct = ($current as f64 / $total as f64 * 100.0),
            "Processing beneficiaries"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use benesync::log_retry_attempt;
/// use std::time::Duration;
///
/// log_retry_attempt!(1, 3, Duration::from_millis(2500), "HTTP 503");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $delay:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay.as_millis() as u64,
            reason = %$reason,
            "Retrying request after error"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use benesync::log_error_with_context;
/// use benesync::domain::SyncError;
///
/// let error = SyncError::Configuration("Invalid config".to_string());
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
