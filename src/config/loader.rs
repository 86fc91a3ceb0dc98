//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SyncConfig;
use super::secret::secret_string;
use crate::domain::errors::SyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`SyncConfig`]
/// 4. Applies environment variable overrides (`BENESYNC_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`SyncError::Configuration`] if the file is missing or unreadable,
/// a referenced variable is unset, parsing fails or validation fails.
pub fn load_config(path: impl AsRef<Path>) -> Result<SyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: SyncConfig = toml::from_str(&contents)
        .map_err(|e| SyncError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config
        .validate()
        .map_err(|e| SyncError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SyncError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `BENESYNC_*` prefix
///
/// Variables follow the pattern `BENESYNC_<SECTION>_<KEY>`, for example
/// `BENESYNC_API_BASE_URL` or `BENESYNC_SYNC_HALT_ON_RECORD_ERROR`.
/// Unparsable numeric or boolean values are ignored.
fn apply_env_overrides(config: &mut SyncConfig) {
    if let Ok(val) = std::env::var("BENESYNC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // API overrides
    if let Ok(val) = std::env::var("BENESYNC_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("BENESYNC_API_TOKEN") {
        config.api.token = secret_string(val);
    }
    if let Ok(val) = std::env::var("BENESYNC_API_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.api.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("BENESYNC_API_CONTRACT_NUMBER") {
        config.api.contract_number = val;
    }
    if let Ok(val) = std::env::var("BENESYNC_API_RETRY_MAX_ATTEMPTS") {
        if let Ok(attempts) = val.parse() {
            config.api.retry.max_attempts = attempts;
        }
    }

    // PostgreSQL overrides
    if let Ok(val) = std::env::var("BENESYNC_POSTGRESQL_CONNECTION_STRING") {
        config.postgresql.connection_string = secret_string(val);
    }
    if let Ok(val) = std::env::var("BENESYNC_POSTGRESQL_SSL_MODE") {
        config.postgresql.ssl_mode = val;
    }

    // Run overrides
    if let Ok(val) = std::env::var("BENESYNC_SYNC_HALT_ON_RECORD_ERROR") {
        if let Ok(halt) = val.parse() {
            config.sync.halt_on_record_error = halt;
        }
    }
    if let Ok(val) = std::env::var("BENESYNC_SYNC_PROGRESS_INTERVAL") {
        if let Ok(interval) = val.parse() {
            config.sync.progress_interval = interval;
        }
    }

    // Notification overrides
    if let Ok(val) = std::env::var("BENESYNC_NOTIFICATION_WEBHOOK_URL") {
        config.notification.webhook_url = Some(val);
    }
    if let Ok(val) = std::env::var("BENESYNC_NOTIFICATION_WEBHOOK_TOKEN") {
        config.notification.webhook_token = Some(secret_string(val));
    }

    // Logging overrides
    if let Ok(val) = std::env::var("BENESYNC_LOGGING_LOCAL_ENABLED") {
        if let Ok(enabled) = val.parse() {
            config.logging.local_enabled = enabled;
        }
    }
    if let Ok(val) = std::env::var("BENESYNC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
