//! Configuration management for benesync.
//!
//! Configuration lives in a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `BENESYNC_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [api]
//! base_url = "https://api.example.com/v1"
//! token = "${BENESYNC_API_TOKEN}"
//!
//! [api.retry]
//! max_attempts = 3
//!
//! [postgresql]
//! connection_string = "${BENESYNC_POSTGRESQL_CONNECTION_STRING}"
//!
//! [sync]
//! halt_on_record_error = false
//!
//! [logging]
//! local_path = "logs"
//! ```
//!
//! ```rust,no_run
//! use benesync::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("benesync.toml")?;
//! println!("API: {}", config.api.base_url);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApiConfig, ApplicationConfig, LoggingConfig, NotificationConfig, PostgreSQLConfig,
    RetryConfig, RunConfig, SyncConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
